//! Top-level generate/update orchestration.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::lockfile::parse_lockfile;
use crate::core::metadata::package_metadata;
use crate::ebuild::render::{render_ebuild, EbuildOptions};
use crate::ebuild::update::update_ebuild;
use crate::ops::fetch::fetch_crates;
use crate::util::diagnostic::Diagnostic;

/// Options for a generate/update run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Directory containing Cargo.toml and Cargo.lock.
    pub package_dir: PathBuf,

    /// Directory holding (or receiving) downloaded crate archives.
    pub distdir: PathBuf,

    /// Existing ebuild to patch; `None` renders a fresh one.
    pub input: Option<PathBuf>,

    /// Explicit output path. Defaults to the input path in update mode,
    /// `<name>-<version>.ebuild` in the working directory otherwise.
    pub output: Option<PathBuf>,

    /// Download missing crate archives before reading licenses.
    pub fetch: bool,

    /// Renderer/patcher options.
    pub ebuild: EbuildOptions,
}

/// Outcome of a run: where the ebuild was written, plus any license
/// warnings the operator should act on.
#[derive(Debug)]
pub struct GenerateResult {
    pub path: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
}

/// Generate a new ebuild or update an existing one.
pub fn generate(options: &GenerateOptions) -> Result<GenerateResult> {
    let manifest_path = options.package_dir.join("Cargo.toml");
    let manifest = fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    let metadata = package_metadata(&manifest, None)
        .with_context(|| format!("failed to read metadata from {}", manifest_path.display()))?;

    let lockfile_path = options.package_dir.join("Cargo.lock");
    let lockfile = fs::read_to_string(&lockfile_path)
        .with_context(|| format!("failed to read {}", lockfile_path.display()))?;
    let crates = parse_lockfile(&lockfile)
        .with_context(|| format!("failed to parse {}", lockfile_path.display()))?;
    tracing::debug!("{} dependency crates in lockfile", crates.len());

    if options.fetch {
        fetch_crates(&crates, &options.distdir)?;
    }

    let mut diagnostics = Vec::new();
    let text = match &options.input {
        Some(input) => {
            let existing = fs::read_to_string(input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            update_ebuild(
                &existing,
                &crates,
                &options.distdir,
                &options.ebuild,
                &mut diagnostics,
            )?
        }
        None => render_ebuild(
            &metadata,
            &crates,
            &options.distdir,
            &options.ebuild,
            &mut diagnostics,
        )?,
    };

    let path = match (&options.output, &options.input) {
        (Some(output), _) => output.clone(),
        (None, Some(input)) => input.clone(),
        (None, None) => {
            let version = metadata
                .version
                .as_deref()
                .context("package has no version; pass --output explicitly")?;
            PathBuf::from(format!("{}-{}.ebuild", metadata.name, version))
        }
    };
    fs::write(&path, &text)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!("wrote {}", path.display());

    Ok(GenerateResult { path, diagnostics })
}
