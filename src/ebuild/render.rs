//! Fresh ebuild rendering from the template skeleton.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Datelike;

use crate::core::crates::Crate;
use crate::core::metadata::PackageMetadata;
use crate::ebuild::blocks::{crates_block, git_crates_block};
use crate::license::resolve::{crate_licenses, package_license};
use crate::util::diagnostic::Diagnostic;
use crate::util::escape::{bash_dquote_escape, collapse_whitespace, url_dquote_escape};

/// Options shared by the renderer and the patcher.
#[derive(Debug, Clone)]
pub struct EbuildOptions {
    /// Emit the aggregated dependent-crate `LICENSE+=` block.
    pub crate_license: bool,

    /// Pre-built crate tarball replacing the individual CRATES entries.
    pub crate_tarball: Option<PathBuf>,

    /// Crate name to SPDX expression, overriding archive inspection.
    pub license_overrides: BTreeMap<String, String>,
}

impl Default for EbuildOptions {
    fn default() -> Self {
        EbuildOptions {
            crate_license: true,
            crate_tarball: None,
            license_overrides: BTreeMap::new(),
        }
    }
}

/// Render a complete ebuild for the given package metadata and crates.
///
/// Warnings produced while reading crate licenses are appended to
/// `diagnostics`.
pub fn render_ebuild(
    metadata: &PackageMetadata,
    crates: &[Crate],
    distdir: &Path,
    options: &EbuildOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<String> {
    // A vendored tarball substitutes for the individual crate list.
    let listed: &[Crate] = if options.crate_tarball.is_some() {
        &[]
    } else {
        crates
    };

    let tarball_block = match &options.crate_tarball {
        Some(path) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .context("crate tarball path has no file name")?;
            // The PKGBUMPING guard keeps revision bumps from re-adding
            // the tarball URI.
            format!(
                "\nif [[ ${{PKGBUMPING}} != ${{PVR}} ]]; then\n\tSRC_URI+=\"\n\t\t{}\n\t\"\nfi",
                name
            )
        }
        None => String::new(),
    };

    let mut ebuild = format!(
        "\
# Copyright {year} Gentoo Authors
# Distributed under the terms of the GNU General Public License v2

# Autogenerated by cargo2ebuild {version}

EAPI=8

CRATES=\"{crates}\"{git_crates}

inherit cargo

DESCRIPTION=\"{description}\"
HOMEPAGE=\"{homepage}\"
SRC_URI=\"
\t${{CARGO_CRATE_URIS}}
\"{tarball}

LICENSE=\"{license}\"
",
        year = chrono::Utc::now().year(),
        version = env!("CARGO_PKG_VERSION"),
        crates = crates_block(listed),
        git_crates = git_crates_block(crates, distdir)?,
        description = bash_dquote_escape(&collapse_whitespace(
            metadata.description.as_deref().unwrap_or("")
        )),
        homepage = url_dquote_escape(metadata.homepage.as_deref().unwrap_or("")),
        tarball = tarball_block,
        license = package_license(metadata.license.as_deref())?,
    );

    if options.crate_license {
        ebuild.push_str(&format!(
            "# Dependent crate licenses\nLICENSE+=\"{}\"\n",
            crate_licenses(crates, distdir, &options.license_overrides, diagnostics)?
        ));
    }
    ebuild.push_str("SLOT=\"0\"\nKEYWORDS=\"~amd64\"\n");
    Ok(ebuild)
}
