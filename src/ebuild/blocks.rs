//! `CRATES` and `GIT_CRATES` variable block builders.

use std::path::Path;

use anyhow::Result;

use crate::core::crates::Crate;
use crate::util::escape::shell_quote;

/// Build the `CRATES` value: one tab-indented `name@version` entry per
/// file crate, sorted, newline-delimited on both ends.
///
/// An empty crate list yields a single newline; the cargo eclass rejects
/// an empty CRATES value, so whitespace is required.
pub fn crates_block(crates: &[Crate]) -> String {
    if crates.is_empty() {
        return "\n".to_string();
    }
    let mut entries: Vec<String> = crates
        .iter()
        .filter_map(|krate| match krate {
            Crate::File(c) => Some(format!("\t{}", c.crate_entry())),
            Crate::Git(_) => None,
        })
        .collect();
    entries.sort();
    format!("\n{}\n", entries.join("\n"))
}

/// Build the complete `GIT_CRATES` associative-array declaration, or the
/// empty string when there are no git crates.
///
/// Each entry value comes from the crate's git-entry formatter and is
/// shell-quoted so it survives literal inclusion in the script. Entries
/// are sorted by their full rendered text.
pub fn git_crates_block(crates: &[Crate], distdir: &Path) -> Result<String> {
    let mut entries = Vec::new();
    for krate in crates {
        if let Crate::Git(c) = krate {
            entries.push(format!(
                "\t[{}]={}",
                c.name,
                shell_quote(&c.git_crate_entry(distdir)?)
            ));
        }
    }
    if entries.is_empty() {
        return Ok(String::new());
    }
    entries.sort();
    Ok(format!(
        "\n\ndeclare -A GIT_CRATES=(\n{}\n)",
        entries.join("\n")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::crates::{FileCrate, GitCrate};
    use crate::core::test_archives::{write_archive, ArchiveFile};
    use semver::Version;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn file_crate(name: &str) -> Crate {
        Crate::File(FileCrate {
            name: name.to_string(),
            version: Version::new(1, 0, 0),
            checksum: None,
        })
    }

    fn git_crate(name: &str) -> GitCrate {
        GitCrate {
            name: name.to_string(),
            version: Version::new(0, 1, 0),
            repository: format!("https://github.com/example/{}", name),
            commit: "caffee00caffee00caffee00caffee00caffee00".to_string(),
        }
    }

    fn write_git_archive(distdir: &Path, c: &GitCrate) {
        write_archive(
            &distdir.join(c.filename()),
            &[ArchiveFile {
                path: c.workspace_root().join("Cargo.toml"),
                contents: &format!(
                    "[package]\nname = \"{}\"\nversion = \"0.1.0\"\n",
                    c.name
                ),
            }],
        );
    }

    #[test]
    fn test_crates_block_empty_list_is_a_newline() {
        assert_eq!(crates_block(&[]), "\n");
    }

    #[test]
    fn test_crates_block_sorted_and_stable_under_permutation() {
        let a = [file_crate("zebra"), file_crate("alpha"), file_crate("mango")];
        let b = [file_crate("mango"), file_crate("zebra"), file_crate("alpha")];
        let expected = "\n\talpha@1.0.0\n\tmango@1.0.0\n\tzebra@1.0.0\n";
        assert_eq!(crates_block(&a), expected);
        assert_eq!(crates_block(&a), crates_block(&b));
    }

    #[test]
    fn test_crates_block_excludes_git_crates() {
        let tmp = TempDir::new().unwrap();
        let git = git_crate("helper");
        write_git_archive(tmp.path(), &git);
        let crates = [file_crate("alpha"), Crate::Git(git)];
        assert_eq!(crates_block(&crates), "\n\talpha@1.0.0\n");
    }

    #[test]
    fn test_git_crates_block_empty_without_git_crates() {
        let tmp = TempDir::new().unwrap();
        let crates = [file_crate("alpha")];
        assert_eq!(git_crates_block(&crates, tmp.path()).unwrap(), "");
        assert_eq!(git_crates_block(&[], tmp.path()).unwrap(), "");
    }

    #[test]
    fn test_git_crates_block_declaration() {
        let tmp = TempDir::new().unwrap();
        let git = git_crate("helper");
        write_git_archive(tmp.path(), &git);
        let crates = [Crate::Git(git)];

        let block = git_crates_block(&crates, tmp.path()).unwrap();
        assert_eq!(
            block,
            "\n\ndeclare -A GIT_CRATES=(\n\
             \t[helper]='https://github.com/example/helper;\
             caffee00caffee00caffee00caffee00caffee00;\
             helper-%commit%'\n)"
        );
    }

    #[test]
    fn test_blocks_ignore_paths_for_file_crates() {
        // File crates never touch distdir when building blocks.
        let missing = PathBuf::from("/nonexistent");
        let crates = [file_crate("alpha")];
        assert_eq!(git_crates_block(&crates, &missing).unwrap(), "");
    }
}
