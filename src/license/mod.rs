//! SPDX license expression handling and Gentoo `LICENSE` rendering.

pub mod expr;
pub mod format;
pub mod gentoo;
pub mod resolve;

use thiserror::Error;

/// Error during license expression processing.
#[derive(Debug, Error)]
pub enum LicenseError {
    #[error("failed to parse SPDX expression `{expression}`: {reason}")]
    Parse { expression: String, reason: String },

    #[error("no Gentoo license mapping for SPDX identifier `{0}`")]
    UnknownLicense(String),
}

pub use expr::LicenseExpr;
pub use resolve::{crate_licenses, package_license};
