//! Package and per-crate license resolution.
//!
//! The package license comes straight from the caller's metadata. Crate
//! licenses are read out of the downloaded archives in distdir, combined
//! into one expression, simplified and rendered as a `LICENSE+=` value.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::core::crates::{read_archive_file, Crate};
use crate::core::metadata::package_metadata;
use crate::license::format::format_license_var;
use crate::license::{gentoo, LicenseExpr};
use crate::util::diagnostic::Diagnostic;

/// Compute the package's own `LICENSE` value from its SPDX declaration.
///
/// An absent declaration renders as the empty string; an unparsable one
/// is a hard failure.
pub fn package_license(license_str: Option<&str>) -> Result<String> {
    let Some(license_str) = license_str else {
        return Ok(String::new());
    };
    let parsed = LicenseExpr::parse(license_str)?.simplify();
    let rendered = gentoo::to_ebuild(&parsed)?;
    Ok(format_license_var(&rendered, "LICENSE=\""))
}

/// License contribution of a single crate, read from its archive.
///
/// A crate that points at a license file, or declares no license at all,
/// contributes nothing and leaves a warning diagnostic. An archive that
/// lacks the crate's manifest at the expected path is fatal.
fn crate_license(
    krate: &Crate,
    distdir: &Path,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Option<String>> {
    let archive_path = distdir.join(krate.filename());
    let package_dir = krate.package_directory(distdir)?;
    let manifest_path = package_dir.join("Cargo.toml");

    let Some(manifest) = read_archive_file(&archive_path, &manifest_path)? else {
        bail!(
            "{} not found in {}",
            manifest_path.display(),
            archive_path.display()
        );
    };
    let workspace = krate.workspace_manifest(distdir)?;
    let metadata = package_metadata(&manifest, workspace.as_deref()).with_context(|| {
        format!(
            "failed to parse {} in {}",
            manifest_path.display(),
            archive_path.display()
        )
    })?;

    if let Some(license_file) = &metadata.license_file {
        diagnostics.push(
            Diagnostic::warning(format!(
                "crate {} (in {}) uses license-file={:?}",
                krate.filename(),
                package_dir.display(),
                license_file
            ))
            .with_context("inspect the license manually and add it separately from crate licenses"),
        );
    } else if metadata.license.is_none() {
        diagnostics.push(Diagnostic::warning(format!(
            "crate {} (in {}, name={:?}) does not specify a license",
            krate.filename(),
            package_dir.display(),
            metadata.name
        )));
    }
    Ok(metadata.license)
}

/// Compute the aggregated dependent-crate `LICENSE+=` value.
///
/// Crates present in `overrides` contribute the override string without
/// their archive being opened. Contributions are deduplicated and sorted
/// before combination, so the result does not depend on input order. An
/// empty contribution set renders as the empty string.
pub fn crate_licenses(
    crates: &[Crate],
    distdir: &Path,
    overrides: &BTreeMap<String, String>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<String> {
    let mut licenses = BTreeSet::new();
    for krate in crates {
        let contribution = match overrides.get(krate.name()) {
            Some(expression) => Some(expression.clone()),
            None => crate_license(krate, distdir, diagnostics)?,
        };
        if let Some(license) = contribution {
            licenses.insert(license);
        }
    }
    if licenses.is_empty() {
        return Ok(String::new());
    }

    let combined = licenses
        .iter()
        .map(|license| format!("( {} )", license))
        .collect::<Vec<_>>()
        .join(" AND ");
    let parsed = LicenseExpr::parse(&combined)?.simplify();
    let rendered = gentoo::to_ebuild(&parsed)?;
    let formatted = format_license_var(&rendered, "LICENSE+=\" ");

    // `+=` continues the previous value without a line break, so a
    // single-line value needs a separating space.
    if formatted.starts_with('\n') {
        Ok(formatted)
    } else {
        Ok(format!(" {}", formatted))
    }
}
