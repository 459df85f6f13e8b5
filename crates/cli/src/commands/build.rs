//! Client build steps: hashed assets and prerendered pages.
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DIST_DIR` - Output directory (default: dist/public)
//! - `STOREFRONT_BASE_URL` / `PUBLIC_BASE_URL` / `RENDER_EXTERNAL_HOSTNAME` -
//!   Origin for canonical URLs, the sitemap and robots.txt
//! - `STOREFRONT_PORT` - Only used for the `http://localhost:{port}` fallback

use std::path::Path;

use autoparts_storefront::STATIC_DIR;
use autoparts_storefront::assets::build_assets;
use autoparts_storefront::config::{dist_dir_from_env, resolve_base_url};

/// Content-hash the app script and stylesheet and write the manifest.
///
/// # Errors
///
/// Returns error if a source file is missing or the output cannot be written.
pub fn assets() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let dist_dir = dist_dir_from_env();

    let manifest = build_assets(Path::new(STATIC_DIR), &dist_dir)?;
    tracing::info!(
        dist = %dist_dir.display(),
        entries = ?manifest,
        "Assets built"
    );
    Ok(())
}

/// Prerender the public routes into the dist directory.
///
/// Needs the asset manifest, so `assets build` must run first.
///
/// # Errors
///
/// Returns error if the manifest is missing, writing fails, or no
/// `index.html` was produced.
pub fn prerender() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let dist_dir = dist_dir_from_env();
    let port = std::env::var("STOREFRONT_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);
    let base_url = resolve_base_url(port)?;

    let report = autoparts_storefront::prerender::prerender(&dist_dir, &base_url)?;
    tracing::info!(
        written = report.written.len(),
        skipped = ?report.skipped,
        base_url = %base_url,
        "Prerender complete"
    );
    Ok(())
}
