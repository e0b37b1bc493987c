//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;

/// cargo2ebuild - generate and update Gentoo ebuilds for Cargo packages
#[derive(Parser)]
#[command(name = "cargo2ebuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Package directory containing Cargo.toml and Cargo.lock
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Directory for downloaded crate archives
    #[arg(short, long, default_value = "distdir")]
    pub distdir: PathBuf,

    /// Update an existing ebuild instead of rendering a new one
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output path (defaults to the input file, or <name>-<version>.ebuild)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip the aggregated dependent-crate LICENSE+= block
    #[arg(long)]
    pub no_license: bool,

    /// Pre-built crate tarball to reference instead of individual crates
    #[arg(long, value_name = "PATH")]
    pub crate_tarball: Option<PathBuf>,

    /// Override a crate's license (repeatable)
    #[arg(short = 'L', long = "license-override", value_name = "NAME=EXPR")]
    pub license_overrides: Vec<String>,

    /// Do not download missing crate archives
    #[arg(long)]
    pub no_fetch: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
