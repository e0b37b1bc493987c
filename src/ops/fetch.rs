//! Downloading missing crate archives into distdir.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use sha2::{Digest, Sha256};

use crate::core::crates::Crate;

/// Download every crate archive that is not already present in distdir.
///
/// Registry downloads are verified against the sha256 checksum recorded
/// in Cargo.lock; a mismatch is fatal and leaves no file behind. Git
/// snapshot tarballs carry no lockfile checksum and are stored as
/// received.
pub fn fetch_crates(crates: &[Crate], distdir: &Path) -> Result<()> {
    fs::create_dir_all(distdir)
        .with_context(|| format!("failed to create distdir: {}", distdir.display()))?;

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("cargo2ebuild/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build HTTP client")?;

    for krate in crates {
        let target = distdir.join(krate.filename());
        if target.exists() {
            verify_existing(krate, &target)?;
            tracing::debug!("{} already present", krate.filename());
            continue;
        }

        let url = krate.download_url()?;
        tracing::info!("fetching {}", url);
        let response = client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("failed to fetch {}", url))?;
        let body = response
            .bytes()
            .with_context(|| format!("failed to read response body of {}", url))?;

        if let Crate::File(file_crate) = krate {
            if let Some(expected) = &file_crate.checksum {
                let actual = hex::encode(Sha256::digest(&body));
                if &actual != expected {
                    bail!(
                        "checksum mismatch for {}: expected {}, got {}",
                        krate.filename(),
                        expected,
                        actual
                    );
                }
            }
        }

        fs::write(&target, &body)
            .with_context(|| format!("failed to write {}", target.display()))?;
    }
    Ok(())
}

/// Re-verify an archive already sitting in distdir, when a checksum is
/// known for it.
fn verify_existing(krate: &Crate, path: &Path) -> Result<()> {
    let Crate::File(file_crate) = krate else {
        return Ok(());
    };
    let Some(expected) = &file_crate.checksum else {
        return Ok(());
    };
    let body = fs::read(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let actual = hex::encode(Sha256::digest(&body));
    if &actual != expected {
        bail!(
            "checksum mismatch for existing {}: expected {}, got {} \
             (remove the file to re-fetch)",
            path.display(),
            expected,
            actual
        );
    }
    Ok(())
}
