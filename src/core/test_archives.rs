//! In-memory tar.gz fixtures for archive-handling tests.

use std::fs;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

pub struct ArchiveFile<'a> {
    pub path: PathBuf,
    pub contents: &'a str,
}

/// Write a gzipped tar archive containing the given text files.
pub fn write_archive(dest: &Path, files: &[ArchiveFile<'_>]) {
    let mut data = Vec::new();
    {
        let encoder = GzEncoder::new(&mut data, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for file in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(file.contents.len() as u64);
            header.set_mode(0o644);
            builder
                .append_data(&mut header, &file.path, file.contents.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }
    fs::write(dest, data).unwrap();
}
