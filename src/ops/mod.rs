//! High-level operations composed by the CLI.

pub mod fetch;
pub mod generate;

pub use generate::{generate, GenerateOptions, GenerateResult};
