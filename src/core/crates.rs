//! Dependency crate model - registry (file) crates and git crates.
//!
//! Crates are immutable value objects built from Cargo.lock. The ebuild
//! layer only classifies and serializes them; nothing here mutates state.

use std::ffi::OsStr;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;
use semver::Version;
use tar::Archive;

use crate::core::metadata::manifest_package_name;

/// A single dependency crate from Cargo.lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Crate {
    /// A crate downloaded from crates.io as a `.crate` tarball.
    File(FileCrate),
    /// A crate pinned to a commit in a git repository.
    Git(GitCrate),
}

/// A registry crate, distributed as `<name>-<version>.crate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCrate {
    pub name: String,
    pub version: Version,
    /// sha256 of the `.crate` file, from Cargo.lock.
    pub checksum: Option<String>,
}

/// A git crate, consumed as a forge snapshot tarball of the pinned commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCrate {
    pub name: String,
    pub version: Version,
    /// Repository URL without the `git+` prefix, query or fragment.
    pub repository: String,
    /// Full commit hash the lockfile pins.
    pub commit: String,
}

impl Crate {
    /// Crate name as it appears in Cargo.lock.
    pub fn name(&self) -> &str {
        match self {
            Crate::File(c) => &c.name,
            Crate::Git(c) => &c.name,
        }
    }

    /// File name of the downloaded archive in distdir.
    pub fn filename(&self) -> String {
        match self {
            Crate::File(c) => c.filename(),
            Crate::Git(c) => c.filename(),
        }
    }

    /// URL the archive is downloaded from.
    pub fn download_url(&self) -> Result<String> {
        match self {
            Crate::File(c) => Ok(c.download_url()),
            Crate::Git(c) => c.download_url(),
        }
    }

    /// Directory holding this crate's own `Cargo.toml` inside its archive.
    pub fn package_directory(&self, distdir: &Path) -> Result<PathBuf> {
        match self {
            Crate::File(c) => Ok(PathBuf::from(format!("{}-{}", c.name, c.version))),
            Crate::Git(c) => c.package_directory(distdir),
        }
    }

    /// Text of the workspace root `Cargo.toml`, if this crate can inherit
    /// fields from one. Registry crates publish normalized manifests, so
    /// only git crates have a workspace to consult.
    pub fn workspace_manifest(&self, distdir: &Path) -> Result<Option<String>> {
        match self {
            Crate::File(_) => Ok(None),
            Crate::Git(c) => {
                let member = c.workspace_root().join("Cargo.toml");
                read_archive_file(&distdir.join(c.filename()), &member)
            }
        }
    }
}

impl FileCrate {
    /// Entry used verbatim in the `CRATES` value.
    pub fn crate_entry(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }

    pub fn filename(&self) -> String {
        format!("{}-{}.crate", self.name, self.version)
    }

    pub fn download_url(&self) -> String {
        format!(
            "https://crates.io/api/v1/crates/{}/{}/download",
            self.name, self.version
        )
    }
}

impl GitCrate {
    /// Last path segment of the repository URL.
    pub fn repo_name(&self) -> &str {
        self.repository
            .rsplit('/')
            .next()
            .unwrap_or(&self.repository)
    }

    pub fn filename(&self) -> String {
        format!("{}-{}.gh.tar.gz", self.repo_name(), self.commit)
    }

    /// Root directory of the repository snapshot inside the archive.
    pub fn workspace_root(&self) -> PathBuf {
        PathBuf::from(format!("{}-{}", self.repo_name(), self.commit))
    }

    pub fn download_url(&self) -> Result<String> {
        let url = url::Url::parse(&self.repository)
            .with_context(|| format!("invalid git repository URL: {}", self.repository))?;
        let host = url
            .host_str()
            .with_context(|| format!("git repository URL has no host: {}", self.repository))?;
        if host.contains("github") {
            Ok(format!("{}/archive/{}.tar.gz", self.repository, self.commit))
        } else if host.contains("gitlab") {
            Ok(format!(
                "{}/-/archive/{}/{}-{}.tar.gz",
                self.repository,
                self.commit,
                self.repo_name(),
                self.commit
            ))
        } else {
            bail!(
                "do not know how to fetch snapshot tarballs from {}; \
                 download {} into distdir manually",
                host,
                self.filename()
            )
        }
    }

    /// Directory of the member package inside the repository snapshot,
    /// found by scanning for the `Cargo.toml` declaring this crate's name.
    pub fn package_directory(&self, distdir: &Path) -> Result<PathBuf> {
        let archive_path = distdir.join(self.filename());
        let file = File::open(&archive_path).with_context(|| {
            format!("failed to open crate archive: {}", archive_path.display())
        })?;
        let mut archive = Archive::new(GzDecoder::new(file));
        for entry in archive
            .entries()
            .with_context(|| format!("failed to read {}", archive_path.display()))?
        {
            let mut entry = entry
                .with_context(|| format!("failed to read {}", archive_path.display()))?;
            let path = entry.path()?.into_owned();
            if path.file_name() != Some(OsStr::new("Cargo.toml")) {
                continue;
            }
            let mut text = String::new();
            entry.read_to_string(&mut text).with_context(|| {
                format!(
                    "failed to read {} from {}",
                    path.display(),
                    archive_path.display()
                )
            })?;
            if manifest_package_name(&text).as_deref() == Some(self.name.as_str()) {
                return path
                    .parent()
                    .map(Path::to_path_buf)
                    .context("Cargo.toml archive entry has no parent directory");
            }
        }
        bail!(
            "no Cargo.toml with package name `{}` found in {}",
            self.name,
            archive_path.display()
        )
    }

    /// Entry value for the `GIT_CRATES` associative array:
    /// `<repository>;<commit>;<subdir>` with the commit hash in the
    /// subdirectory replaced by the eclass `%commit%` placeholder.
    pub fn git_crate_entry(&self, distdir: &Path) -> Result<String> {
        let package_dir = self.package_directory(distdir)?;
        let subdir = package_dir
            .to_string_lossy()
            .replace(&self.commit, "%commit%");
        Ok(format!("{};{};{}", self.repository, self.commit, subdir))
    }
}

/// Read a single member file of a gzipped tar archive to a string.
///
/// Returns `Ok(None)` when the archive has no member at that exact path.
/// The archive handle is dropped on every exit path, including parse
/// failures further up the stack.
pub fn read_archive_file(archive_path: &Path, member: &Path) -> Result<Option<String>> {
    let file = File::open(archive_path).with_context(|| {
        format!("failed to open crate archive: {}", archive_path.display())
    })?;
    let mut archive = Archive::new(GzDecoder::new(file));
    for entry in archive
        .entries()
        .with_context(|| format!("failed to read {}", archive_path.display()))?
    {
        let mut entry =
            entry.with_context(|| format!("failed to read {}", archive_path.display()))?;
        if entry.path()?.as_ref() == member {
            let mut text = String::new();
            entry.read_to_string(&mut text).with_context(|| {
                format!(
                    "failed to read {} from {}",
                    member.display(),
                    archive_path.display()
                )
            })?;
            return Ok(Some(text));
        }
    }
    Ok(None)
}
