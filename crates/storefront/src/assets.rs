//! Client asset manifest.
//!
//! `ap-cli assets build` content-hashes the stylesheet and script under
//! `static/` into `dist/public/assets/` and records the hashed names in
//! `dist/public/manifest.json` under the single entry key [`APP_ENTRY`].

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Manifest file name inside the dist directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// The one manifest entry the document shell reads.
pub const APP_ENTRY: &str = "app";

/// Source files bundled by `assets build`, relative to the static dir.
pub const APP_SCRIPT_SOURCE: &str = "js/app.js";
pub const APP_STYLE_SOURCE: &str = "css/main.css";

const HASH_CHARS: usize = 8;

/// Errors reading or building the asset manifest.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("manifest has no \"{0}\" entry")]
    MissingEntry(&'static str),
}

impl AssetError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// One manifest entry; paths are relative to the dist directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub file: String,
    #[serde(default)]
    pub css: Vec<String>,
}

/// Parsed `manifest.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetManifest {
    entries: BTreeMap<String, ManifestEntry>,
}

impl AssetManifest {
    /// Read the manifest from a dist directory.
    ///
    /// # Errors
    ///
    /// Returns error if the file is missing or is not a valid manifest.
    pub fn load(dist_dir: &Path) -> Result<Self, AssetError> {
        let path = dist_dir.join(MANIFEST_FILE);
        let raw = fs::read_to_string(&path).map_err(|e| AssetError::io(&path, e))?;
        serde_json::from_str(&raw).map_err(|source| AssetError::Parse { path, source })
    }

    #[must_use]
    pub fn entry(&self, key: &str) -> Option<&ManifestEntry> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: ManifestEntry) {
        self.entries.insert(key.into(), entry);
    }
}

/// URL paths of the script and stylesheets a document links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppAssets {
    pub script: String,
    pub styles: Vec<String>,
}

impl AppAssets {
    /// Asset paths from the manifest's [`APP_ENTRY`].
    ///
    /// # Errors
    ///
    /// Returns error if the entry is missing.
    pub fn from_manifest(manifest: &AssetManifest) -> Result<Self, AssetError> {
        let entry = manifest
            .entry(APP_ENTRY)
            .ok_or(AssetError::MissingEntry(APP_ENTRY))?;
        Ok(Self {
            script: url_path(&entry.file),
            styles: entry.css.iter().map(|css| url_path(css)).collect(),
        })
    }

    /// Load the manifest from `dist_dir` and resolve the app entry.
    ///
    /// # Errors
    ///
    /// Returns error if the manifest or its entry is missing.
    pub fn load(dist_dir: &Path) -> Result<Self, AssetError> {
        Self::from_manifest(&AssetManifest::load(dist_dir)?)
    }

    /// Unhashed sources served from `/static`, used when no build exists.
    #[must_use]
    pub fn unbundled() -> Self {
        Self {
            script: format!("/static/{APP_SCRIPT_SOURCE}"),
            styles: vec![format!("/static/{APP_STYLE_SOURCE}")],
        }
    }
}

fn url_path(file: &str) -> String {
    format!("/{}", file.trim_start_matches('/'))
}

/// Hash the app script and stylesheet into `dist_dir/assets/` and write the
/// manifest.
///
/// # Errors
///
/// Returns error if a source file cannot be read or an output cannot be written.
pub fn build_assets(static_dir: &Path, dist_dir: &Path) -> Result<AssetManifest, AssetError> {
    let out_dir = dist_dir.join("assets");
    fs::create_dir_all(&out_dir).map_err(|e| AssetError::io(&out_dir, e))?;

    let file = copy_hashed(&static_dir.join(APP_SCRIPT_SOURCE), &out_dir)?;
    let css = copy_hashed(&static_dir.join(APP_STYLE_SOURCE), &out_dir)?;

    let mut manifest = AssetManifest::default();
    manifest.insert(
        APP_ENTRY,
        ManifestEntry {
            file: format!("assets/{file}"),
            css: vec![format!("assets/{css}")],
        },
    );

    let path = dist_dir.join(MANIFEST_FILE);
    let json = serde_json::to_string_pretty(&manifest)
        .map_err(|source| AssetError::Parse { path: path.clone(), source })?;
    fs::write(&path, json).map_err(|e| AssetError::io(&path, e))?;

    tracing::info!(manifest = %path.display(), "Wrote asset manifest");
    Ok(manifest)
}

/// Copy `source` into `out_dir` as `<stem>.<hash>.<ext>`; returns the new name.
fn copy_hashed(source: &Path, out_dir: &Path) -> Result<String, AssetError> {
    let bytes = fs::read(source).map_err(|e| AssetError::io(source, e))?;
    let name = hashed_name(source, &bytes);
    let target = out_dir.join(&name);
    fs::write(&target, &bytes).map_err(|e| AssetError::io(&target, e))?;
    Ok(name)
}

fn hashed_name(source: &Path, bytes: &[u8]) -> String {
    let digest = hex::encode(Sha256::digest(bytes));
    let hash = &digest[..HASH_CHARS];
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("asset");
    match source.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}.{hash}.{ext}"),
        None => format!("{stem}.{hash}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn write_sources(dir: &Path) {
        fs::create_dir_all(dir.join("js")).unwrap();
        fs::create_dir_all(dir.join("css")).unwrap();
        fs::write(dir.join(APP_SCRIPT_SOURCE), "console.log(1);").unwrap();
        fs::write(dir.join(APP_STYLE_SOURCE), "body{margin:0}").unwrap();
    }

    #[test]
    fn test_hashed_name_is_stable() {
        let a = hashed_name(Path::new("js/app.js"), b"x");
        let b = hashed_name(Path::new("js/app.js"), b"x");
        let c = hashed_name(Path::new("js/app.js"), b"y");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("app.") && a.ends_with(".js"));
        assert_eq!(a.len(), "app..js".len() + HASH_CHARS);
    }

    #[test]
    fn test_build_then_load() {
        let static_dir = tempfile::tempdir().unwrap();
        let dist_dir = tempfile::tempdir().unwrap();
        write_sources(static_dir.path());

        let built = build_assets(static_dir.path(), dist_dir.path()).unwrap();
        let loaded = AssetManifest::load(dist_dir.path()).unwrap();
        assert_eq!(built, loaded);

        let assets = AppAssets::from_manifest(&loaded).unwrap();
        assert!(assets.script.starts_with("/assets/app."));
        assert_eq!(assets.styles.len(), 1);
        let on_disk = dist_dir.path().join(assets.script.trim_start_matches('/'));
        assert!(on_disk.exists());
    }

    #[test]
    fn test_missing_manifest() {
        let dist_dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            AppAssets::load(dist_dir.path()),
            Err(AssetError::Io { .. })
        ));
    }

    #[test]
    fn test_missing_app_entry() {
        let dist_dir = tempfile::tempdir().unwrap();
        fs::write(
            dist_dir.path().join(MANIFEST_FILE),
            r#"{"src/main.tsx": {"file": "assets/index.js", "css": []}}"#,
        )
        .unwrap();

        assert!(matches!(
            AppAssets::load(dist_dir.path()),
            Err(AssetError::MissingEntry("app"))
        ));
    }
}
