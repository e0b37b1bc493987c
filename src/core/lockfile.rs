//! Cargo.lock parsing into the crate model.
//!
//! Only the `[[package]]` tables matter here: each entry is classified by
//! its `source` field into a registry crate, a git crate, or a local
//! workspace member (which is skipped).

use anyhow::{bail, Context, Result};
use semver::Version;
use serde::Deserialize;
use url::Url;

use crate::core::crates::{Crate, FileCrate, GitCrate};

const CRATES_IO_SOURCE: &str = "registry+https://github.com/rust-lang/crates.io-index";

#[derive(Debug, Deserialize)]
struct RawLockfile {
    #[serde(default)]
    package: Vec<RawPackage>,
}

#[derive(Debug, Deserialize)]
struct RawPackage {
    name: String,
    version: Version,
    source: Option<String>,
    checksum: Option<String>,
}

/// Parse Cargo.lock text into the dependency crate list.
///
/// Local packages (no `source`) are skipped. Registries other than
/// crates.io and unrecognized source kinds are errors.
pub fn parse_lockfile(text: &str) -> Result<Vec<Crate>> {
    let raw: RawLockfile = toml::from_str(text).context("failed to parse Cargo.lock")?;

    let mut crates = Vec::new();
    for package in raw.package {
        let Some(source) = package.source else {
            tracing::debug!("skipping local package {}", package.name);
            continue;
        };

        if source == CRATES_IO_SOURCE {
            crates.push(Crate::File(FileCrate {
                name: package.name,
                version: package.version,
                checksum: package.checksum,
            }));
        } else if let Some(git_url) = source.strip_prefix("git+") {
            let mut url = Url::parse(git_url).with_context(|| {
                format!("invalid git source for `{}`: {}", package.name, git_url)
            })?;
            let commit = url
                .fragment()
                .with_context(|| {
                    format!("git source for `{}` has no pinned commit: {}", package.name, git_url)
                })?
                .to_string();
            url.set_fragment(None);
            url.set_query(None);
            let repository = url.as_str().trim_end_matches('/');
            let repository = repository
                .strip_suffix(".git")
                .unwrap_or(repository)
                .to_string();

            crates.push(Crate::Git(GitCrate {
                name: package.name,
                version: package.version,
                repository,
                commit,
            }));
        } else if source.starts_with("registry+") {
            bail!(
                "unsupported registry for `{}`: {} (only crates.io is supported)",
                package.name,
                source
            );
        } else {
            bail!("unsupported source for `{}`: {}", package.name, source);
        }
    }
    Ok(crates)
}
