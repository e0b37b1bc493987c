//! In-place ebuild patching via anchored, count-checked substitution.
//!
//! Each target region is located by a pattern anchoring on a stable
//! prefix and the quote character opening the value; the body is matched
//! across lines up to the paired closing quote at end of line. Every
//! substitution counts its matches, and any count other than the expected
//! one means the document is not an ebuild this tool produced - that is
//! reported as a fatal error, never papered over.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::Result;
use regex::{Captures, Regex};
use thiserror::Error;

use crate::core::crates::Crate;
use crate::ebuild::blocks::{crates_block, git_crates_block};
use crate::ebuild::render::EbuildOptions;
use crate::license::resolve::crate_licenses;
use crate::util::diagnostic::Diagnostic;

/// Structural violation found while patching an existing ebuild.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UpdateError {
    #[error("{anchor} matched {found} times, {expected} expected")]
    CountMismatch {
        anchor: &'static str,
        found: usize,
        expected: usize,
    },
}

// The `regex` crate has no backreferences, so the paired-quote-delimiter
// match is expressed as one pattern per quote character, counts summed.

static CRATES_DQ: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^(CRATES=")[^"]*(")$"#).unwrap());
static CRATES_SQ: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(CRATES=')[^']*(')$").unwrap());

static GIT_CRATES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?ms)(\n\n?)declare -A GIT_CRATES=\(.*?\)$").unwrap());

static CRATE_LICENSE_DQ: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^(# Dependent crate licenses\nLICENSE\+=")[^"]*(")$"#).unwrap()
});
static CRATE_LICENSE_SQ: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(# Dependent crate licenses\nLICENSE\+=')[^']*(')$").unwrap()
});

static CRATES_APPEND_DQ: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^(CRATES="[^"]*")()$"#).unwrap());
static CRATES_APPEND_SQ: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(CRATES='[^']*')()$").unwrap());

/// Replace the value between capture groups 1 and 2, counting matches.
fn substitute(text: String, patterns: &[&Regex], value: &str) -> (String, usize) {
    let mut count = 0;
    let mut text = text;
    for pattern in patterns {
        text = pattern
            .replace_all(&text, |caps: &Captures| {
                count += 1;
                format!("{}{}{}", &caps[1], value, &caps[2])
            })
            .into_owned();
    }
    (text, count)
}

fn assert_count(anchor: &'static str, found: usize, expected: usize) -> Result<(), UpdateError> {
    if found != expected {
        return Err(UpdateError::CountMismatch {
            anchor,
            found,
            expected,
        });
    }
    Ok(())
}

/// Update the CRATES, GIT_CRATES and dependent-crate LICENSE regions of
/// an existing ebuild, preserving everything else byte-for-byte.
///
/// `CRATES=` must appear exactly once. The crate `LICENSE+=` block must
/// appear exactly once when the crate-license feature is on and not at
/// all when it is off. `GIT_CRATES=` may appear at most once; it is
/// removed (with its separating blank line) when no longer needed and
/// inserted right after the `CRATES=` assignment when newly needed.
pub fn update_ebuild(
    ebuild: &str,
    crates: &[Crate],
    distdir: &Path,
    options: &EbuildOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<String> {
    let listed: &[Crate] = if options.crate_tarball.is_some() {
        &[]
    } else {
        crates
    };
    let crates_value = crates_block(listed);
    let git_value = git_crates_block(crates, distdir)?;
    let license_value = if options.crate_license {
        crate_licenses(crates, distdir, &options.license_overrides, diagnostics)?
    } else {
        String::new()
    };

    let (text, crates_count) =
        substitute(ebuild.to_string(), &[&CRATES_DQ, &CRATES_SQ], &crates_value);

    let mut git_count = 0;
    let text = GIT_CRATES_RE
        .replace_all(&text, |caps: &Captures| {
            git_count += 1;
            let stripped = git_value.trim_start();
            if stripped.is_empty() {
                String::new()
            } else {
                format!("{}{}", &caps[1], stripped)
            }
        })
        .into_owned();

    let (mut text, license_count) = substitute(
        text,
        &[&CRATE_LICENSE_DQ, &CRATE_LICENSE_SQ],
        &license_value,
    );

    assert_count("CRATES=", crates_count, 1)?;
    assert_count(
        "crate LICENSE+= (with marker comment)",
        license_count,
        if options.crate_license { 1 } else { 0 },
    )?;

    if git_count == 0 {
        if !git_value.is_empty() {
            let (appended, append_count) = substitute(
                text,
                &[&CRATES_APPEND_DQ, &CRATES_APPEND_SQ],
                &git_value,
            );
            assert_count("CRATES= (while appending GIT_CRATES=)", append_count, 1)?;
            text = appended;
        }
    } else {
        assert_count("GIT_CRATES=", git_count, 1)?;
    }

    Ok(text)
}
