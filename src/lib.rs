//! cargo2ebuild - generate and update Gentoo ebuilds for Cargo packages.
//!
//! This crate reads a package's Cargo.toml and Cargo.lock, classifies the
//! dependency crates into registry and git crates, aggregates their
//! licenses from the downloaded archives, and emits (or patches in place)
//! the CRATES/GIT_CRATES/LICENSE variable blocks of a Gentoo ebuild.

pub mod core;
pub mod ebuild;
pub mod license;
pub mod ops;
pub mod util;

pub use crate::core::crates::{Crate, FileCrate, GitCrate};
pub use crate::core::metadata::PackageMetadata;
pub use crate::ebuild::render::{render_ebuild, EbuildOptions};
pub use crate::ebuild::update::{update_ebuild, UpdateError};
pub use crate::util::diagnostic::Diagnostic;
