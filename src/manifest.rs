use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result, SkipReason};

pub const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Deserialize)]
struct PackageManifest {
    version: Option<String>,
}

/// Current version from `<dir>/package.json`.
///
/// A missing manifest is a benign skip: the directory is not a publishable
/// package and the run has nothing to do. A manifest that exists but
/// parses without a usable version field is fatal.
pub fn read_version(dir: &Path) -> Result<String> {
    let path = dir.join(MANIFEST_FILE);

    let data = match fs::read_to_string(&path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::Skip(SkipReason::ManifestMissing {
                path: path.display().to_string(),
            }));
        }
        Err(e) => return Err(e.into()),
    };

    let manifest: PackageManifest = serde_json::from_str(&data)
        .map_err(|e| Error::manifest(format!("cannot parse {}: {}", path.display(), e)))?;

    let version = manifest
        .version
        .ok_or_else(|| Error::manifest(format!("missing version field in {}", path.display())))?;

    // The field may carry the conventional leading prefix; what follows it
    // must be a semantic version.
    let bare = version.trim_start_matches('v').trim_start_matches('V');
    semver::Version::parse(bare).map_err(|e| {
        Error::manifest(format!(
            "unusable version {:?} in {}: {}",
            version,
            path.display(),
            e
        ))
    })?;

    Ok(version)
}
