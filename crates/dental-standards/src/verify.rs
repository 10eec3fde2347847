#![deny(unsafe_code)]

//! Manifest checks: schema, roles, paths and pinned checksums.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::CatalogError;
use crate::hash::sha256_hex;
use crate::manifest::{
    MANIFEST_SCHEMA, MANIFEST_SCHEMA_VERSION, Manifest, ManifestFile, ROLES, role_spec,
};

pub const MANIFEST_FILE: &str = "manifest.toml";

/// Read `manifest.toml`, validate it against the directory contents and
/// verify every listed file's sha256. Returns the manifest and its files
/// sorted by path.
pub fn verify_manifest(
    catalog_dir: &Path,
) -> Result<(Manifest, Vec<ManifestFile>), CatalogError> {
    let manifest_path = catalog_dir.join(MANIFEST_FILE);
    let contents = std::fs::read_to_string(&manifest_path)
        .map_err(|e| CatalogError::io(&manifest_path, e))?;
    let manifest: Manifest = toml::from_str(&contents).map_err(|e| CatalogError::Toml {
        path: manifest_path.clone(),
        source: e,
    })?;

    validate_manifest(&manifest, catalog_dir)?;

    let mut files = manifest.files.clone();
    files.sort_by(|a, b| a.path.cmp(&b.path));
    for file in &files {
        verify_file(catalog_dir, file)?;
        debug!(path = %file.path, role = %file.role, "verified catalog file");
    }

    Ok((manifest, files))
}

/// Absolute path of the file registered under `role`, if any.
pub fn role_path(catalog_dir: &Path, files: &[ManifestFile], role: &str) -> Option<PathBuf> {
    files
        .iter()
        .find(|f| f.role == role)
        .map(|f| catalog_dir.join(&f.path))
}

pub fn require_role_path(
    catalog_dir: &Path,
    files: &[ManifestFile],
    role: &str,
) -> Result<PathBuf, CatalogError> {
    role_path(catalog_dir, files, role).ok_or_else(|| CatalogError::MissingRole {
        role: role.to_string(),
    })
}

fn validate_manifest(manifest: &Manifest, catalog_dir: &Path) -> Result<(), CatalogError> {
    if manifest.catalog.schema != MANIFEST_SCHEMA {
        return Err(CatalogError::InvalidManifest {
            message: format!("unsupported schema: {}", manifest.catalog.schema),
        });
    }
    if manifest.catalog.schema_version != MANIFEST_SCHEMA_VERSION {
        return Err(CatalogError::InvalidManifest {
            message: format!(
                "unsupported schema_version: {}",
                manifest.catalog.schema_version
            ),
        });
    }
    if manifest.catalog.version.trim().is_empty() {
        return Err(CatalogError::InvalidManifest {
            message: "catalog version must not be empty".to_string(),
        });
    }

    let mut roles: BTreeSet<&str> = BTreeSet::new();
    let mut listed: BTreeSet<PathBuf> = BTreeSet::new();

    for file in &manifest.files {
        if !roles.insert(file.role.as_str()) {
            return Err(CatalogError::DuplicateRole {
                role: file.role.clone(),
            });
        }
        let spec = role_spec(&file.role).ok_or_else(|| CatalogError::InvalidManifest {
            message: format!("unknown role '{}' for {}", file.role, file.path),
        })?;
        if file.kind != spec.kind {
            return Err(CatalogError::InvalidKind {
                role: file.role.clone(),
                expected: spec.kind.to_string(),
                found: file.kind.clone(),
            });
        }
        validate_sha(&file.sha256, &file.path)?;
        listed.insert(normalize_path(&validate_path(&file.path)?));
    }

    if let Some(spec) = ROLES
        .iter()
        .find(|spec| spec.required && !roles.contains(spec.role))
    {
        return Err(CatalogError::MissingRole {
            role: spec.role.to_string(),
        });
    }

    for path in list_files_under(catalog_dir)? {
        if path == Path::new(MANIFEST_FILE) {
            continue;
        }
        if !listed.contains(&normalize_path(&path)) {
            return Err(CatalogError::UnexpectedFile {
                path: catalog_dir.join(path),
            });
        }
    }

    Ok(())
}

fn verify_file(catalog_dir: &Path, file: &ManifestFile) -> Result<(), CatalogError> {
    let full_path = catalog_dir.join(&file.path);
    let bytes = std::fs::read(&full_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CatalogError::MissingFile {
                path: full_path.clone(),
            }
        } else {
            CatalogError::io(full_path.clone(), e)
        }
    })?;

    let actual = sha256_hex(&bytes);
    let expected = file.sha256.to_ascii_lowercase();
    if actual != expected {
        return Err(CatalogError::Sha256Mismatch {
            path: full_path,
            expected,
            actual,
        });
    }
    Ok(())
}

fn validate_sha(sha: &str, path: &str) -> Result<(), CatalogError> {
    if sha.len() != 64 || !sha.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CatalogError::InvalidSha256 {
            path: PathBuf::from(path),
            message: "sha256 must be 64 hex characters".to_string(),
        });
    }
    Ok(())
}

fn validate_path(path: &str) -> Result<PathBuf, CatalogError> {
    let invalid = |message: &str| CatalogError::InvalidPath {
        path: PathBuf::from(path),
        message: message.to_string(),
    };
    if path.contains('\\') {
        return Err(invalid("manifest path must use '/' separators"));
    }
    let p = PathBuf::from(path);
    if p.is_absolute() {
        return Err(invalid("manifest path must be relative"));
    }
    if p.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(invalid("manifest path must stay inside the catalog directory"));
    }
    Ok(p)
}

fn list_files_under(root: &Path) -> Result<BTreeSet<PathBuf>, CatalogError> {
    let mut stack = vec![root.to_path_buf()];
    let mut files = BTreeSet::new();

    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir).map_err(|e| CatalogError::io(&dir, e))? {
            let entry = entry.map_err(|e| CatalogError::io(&dir, e))?;
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.is_file() {
                let rel = path
                    .strip_prefix(root)
                    .map_err(|e| CatalogError::InvalidPath {
                        path: path.clone(),
                        message: format!("failed to relativize path: {e}"),
                    })?
                    .to_path_buf();
                files.insert(rel);
            }
        }
    }

    Ok(files)
}

fn normalize_path(p: &Path) -> PathBuf {
    p.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_escaping_paths() {
        assert!(validate_path("rules/billing.toml").is_ok());
        assert!(validate_path("../billing.toml").is_err());
        assert!(validate_path("rules\\billing.toml").is_err());
        assert!(validate_path("/etc/billing.toml").is_err());
    }

    #[test]
    fn normalizes_current_dir_components() {
        assert_eq!(
            normalize_path(Path::new("./rules/./billing.toml")),
            PathBuf::from("rules/billing.toml")
        );
    }

    #[test]
    fn rejects_short_checksums() {
        assert!(validate_sha("abc", "x.csv").is_err());
        assert!(validate_sha(&"a".repeat(64), "x.csv").is_ok());
    }
}
