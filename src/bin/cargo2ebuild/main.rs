//! cargo2ebuild CLI - Gentoo ebuild generator for Cargo packages

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cargo2ebuild::ebuild::render::EbuildOptions;
use cargo2ebuild::ops::generate::{generate, GenerateOptions};
use cli::Cli;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("cargo2ebuild=debug")
    } else {
        EnvFilter::new("cargo2ebuild=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let mut license_overrides = BTreeMap::new();
    for entry in &cli.license_overrides {
        let Some((name, expression)) = entry.split_once('=') else {
            bail!("invalid license override `{}`; expected NAME=EXPR", entry);
        };
        license_overrides.insert(name.to_string(), expression.to_string());
    }

    let options = GenerateOptions {
        package_dir: cli.directory,
        distdir: cli.distdir,
        input: cli.input,
        output: cli.output,
        fetch: !cli.no_fetch,
        ebuild: EbuildOptions {
            crate_license: !cli.no_license,
            crate_tarball: cli.crate_tarball,
            license_overrides,
        },
    };

    let result = generate(&options)?;
    for diagnostic in &result.diagnostics {
        tracing::warn!("{}", diagnostic);
    }
    println!("{}", result.path.display());
    Ok(())
}
