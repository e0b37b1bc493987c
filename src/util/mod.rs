//! Shared utilities

pub mod diagnostic;
pub mod escape;

pub use diagnostic::Diagnostic;
