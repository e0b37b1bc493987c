//! Cargo.toml package metadata, with workspace field inheritance.
//!
//! Git crate members frequently declare `license.workspace = true` and
//! friends; those fields are resolved against the `[workspace.package]`
//! table of the repository root manifest.

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Metadata extracted from a `[package]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageMetadata {
    pub name: String,
    pub version: Option<String>,
    pub license: Option<String>,
    pub license_file: Option<String>,
    pub description: Option<String>,
    pub homepage: Option<String>,
}

/// A field that is either a literal value or inherited from the workspace.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum MaybeWorkspace<T> {
    Value(T),
    Workspace { workspace: bool },
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    package: Option<RawPackage>,
    workspace: Option<RawWorkspace>,
}

#[derive(Debug, Deserialize)]
struct RawPackage {
    name: String,
    version: Option<MaybeWorkspace<String>>,
    license: Option<MaybeWorkspace<String>>,
    #[serde(rename = "license-file")]
    license_file: Option<MaybeWorkspace<String>>,
    description: Option<MaybeWorkspace<String>>,
    homepage: Option<MaybeWorkspace<String>>,
}

#[derive(Debug, Deserialize)]
struct RawWorkspace {
    package: Option<RawWorkspacePackage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawWorkspacePackage {
    version: Option<String>,
    license: Option<String>,
    #[serde(rename = "license-file")]
    license_file: Option<String>,
    description: Option<String>,
    homepage: Option<String>,
}

/// Parse a manifest and resolve workspace-inherited fields.
///
/// `workspace_manifest` is the text of the workspace root `Cargo.toml`,
/// when one exists. A manifest that both inherits a field and has no
/// workspace to inherit it from is an error. The manifest's own
/// `[workspace]` table takes precedence, which covers the common case of
/// a root `Cargo.toml` carrying both `[package]` and `[workspace]`.
pub fn package_metadata(manifest: &str, workspace_manifest: Option<&str>) -> Result<PackageMetadata> {
    let raw: RawManifest =
        toml::from_str(manifest).context("failed to parse Cargo.toml")?;
    let Some(package) = raw.package else {
        bail!("Cargo.toml has no [package] section (virtual workspace manifest?)");
    };

    let ws_package = match raw.workspace.and_then(|w| w.package) {
        Some(ws) => Some(ws),
        None => match workspace_manifest {
            Some(text) => {
                let ws_raw: RawManifest = toml::from_str(text)
                    .context("failed to parse workspace Cargo.toml")?;
                ws_raw.workspace.and_then(|w| w.package)
            }
            None => None,
        },
    };

    let name = package.name;
    Ok(PackageMetadata {
        version: resolve(package.version, "version", &name, &ws_package, |ws| {
            ws.version.clone()
        })?,
        license: resolve(package.license, "license", &name, &ws_package, |ws| {
            ws.license.clone()
        })?,
        license_file: resolve(
            package.license_file,
            "license-file",
            &name,
            &ws_package,
            |ws| ws.license_file.clone(),
        )?,
        description: resolve(
            package.description,
            "description",
            &name,
            &ws_package,
            |ws| ws.description.clone(),
        )?,
        homepage: resolve(package.homepage, "homepage", &name, &ws_package, |ws| {
            ws.homepage.clone()
        })?,
        name,
    })
}

fn resolve<T>(
    field: Option<MaybeWorkspace<T>>,
    field_name: &str,
    package: &str,
    ws_package: &Option<RawWorkspacePackage>,
    get: impl Fn(&RawWorkspacePackage) -> Option<T>,
) -> Result<Option<T>> {
    match field {
        None => Ok(None),
        Some(MaybeWorkspace::Value(value)) => Ok(Some(value)),
        Some(MaybeWorkspace::Workspace { workspace: true }) => {
            let Some(ws) = ws_package else {
                bail!(
                    "package `{}` inherits `{}` from a workspace, \
                     but no [workspace.package] table was found",
                    package,
                    field_name
                );
            };
            get(ws).with_context(|| {
                format!(
                    "package `{}` inherits `{}`, but [workspace.package] does not define it",
                    package, field_name
                )
            }).map(Some)
        }
        Some(MaybeWorkspace::Workspace { workspace: false }) => bail!(
            "package `{}` sets `{}.workspace = false`, which Cargo does not allow",
            package,
            field_name
        ),
    }
}

/// Package name of a manifest, or `None` if it has no `[package]` section
/// or does not parse. Used when scanning repository snapshots for member
/// crates.
pub fn manifest_package_name(manifest: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct NameOnly {
        package: Option<PackageName>,
    }
    #[derive(Deserialize)]
    struct PackageName {
        name: String,
    }
    toml::from_str::<NameOnly>(manifest)
        .ok()
        .and_then(|m| m.package.map(|p| p.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_manifest() {
        let meta = package_metadata(
            r#"
[package]
name = "foo"
version = "1.2.3"
license = "MIT OR Apache-2.0"
description = "A thing"
homepage = "https://example.com"
"#,
            None,
        )
        .unwrap();
        assert_eq!(meta.name, "foo");
        assert_eq!(meta.version.as_deref(), Some("1.2.3"));
        assert_eq!(meta.license.as_deref(), Some("MIT OR Apache-2.0"));
        assert_eq!(meta.license_file, None);
        assert_eq!(meta.description.as_deref(), Some("A thing"));
        assert_eq!(meta.homepage.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_workspace_inheritance() {
        let workspace = r#"
[workspace]
members = ["foo"]

[workspace.package]
version = "2.0.0"
license = "Apache-2.0"
"#;
        let meta = package_metadata(
            r#"
[package]
name = "foo"
version.workspace = true
license.workspace = true
"#,
            Some(workspace),
        )
        .unwrap();
        assert_eq!(meta.version.as_deref(), Some("2.0.0"));
        assert_eq!(meta.license.as_deref(), Some("Apache-2.0"));
    }

    #[test]
    fn test_own_workspace_table_wins() {
        let meta = package_metadata(
            r#"
[package]
name = "foo"
license.workspace = true

[workspace.package]
license = "ISC"
"#,
            None,
        )
        .unwrap();
        assert_eq!(meta.license.as_deref(), Some("ISC"));
    }

    #[test]
    fn test_inheritance_without_workspace_is_an_error() {
        let err = package_metadata(
            "[package]\nname = \"foo\"\nlicense.workspace = true\n",
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("inherits `license`"));
    }

    #[test]
    fn test_virtual_manifest_is_an_error() {
        let err = package_metadata("[workspace]\nmembers = []\n", None).unwrap_err();
        assert!(err.to_string().contains("no [package] section"));
    }

    #[test]
    fn test_license_file_reference() {
        let meta = package_metadata(
            "[package]\nname = \"foo\"\nlicense-file = \"LICENSE.txt\"\n",
            None,
        )
        .unwrap();
        assert_eq!(meta.license, None);
        assert_eq!(meta.license_file.as_deref(), Some("LICENSE.txt"));
    }

    #[test]
    fn test_manifest_package_name() {
        assert_eq!(
            manifest_package_name("[package]\nname = \"foo\"\n").as_deref(),
            Some("foo")
        );
        assert_eq!(manifest_package_name("[workspace]\nmembers = []\n"), None);
        assert_eq!(manifest_package_name("not toml at all {{"), None);
    }
}
