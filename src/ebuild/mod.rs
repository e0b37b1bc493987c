//! Ebuild text generation: variable blocks, the fresh-render template and
//! the anchored update engine.

pub mod blocks;
pub mod render;
pub mod update;

pub use render::{render_ebuild, EbuildOptions};
pub use update::{update_ebuild, UpdateError};
