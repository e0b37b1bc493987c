//! Core data model: crates, package metadata, lockfile parsing.

pub mod crates;
pub mod lockfile;
pub mod metadata;

#[cfg(test)]
pub mod test_archives;

pub use crates::{Crate, FileCrate, GitCrate};
pub use lockfile::parse_lockfile;
pub use metadata::{package_metadata, PackageMetadata};
