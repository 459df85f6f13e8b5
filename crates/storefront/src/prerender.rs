//! Static HTML generation for crawlers.
//!
//! Renders a fixed route list through [`crate::ssr::render_page`], wraps each
//! page in the document shell with the built asset paths and writes
//! `<dist>/<route>/index.html`, then `sitemap.xml` and `robots.txt`.
//!
//! Missing build output is fatal before anything is written; a single route
//! that fails to render is logged and skipped.

use std::fs;
use std::path::{Path, PathBuf};

use askama::Template;
use chrono::NaiveDate;
use thiserror::Error;

use crate::assets::{AppAssets, AssetError};
use crate::config::absolute_url;
use crate::i18n::Locale;
use crate::ssr::{RenderContext, RenderError, render_document, render_page};

/// Routes written by the prerender command.
pub const PRERENDER_ROUTES: &[&str] = &[
    "/",
    "/parts",
    "/contact",
    "/brands/bmw",
    "/brands/mercedes-benz",
    "/brands/toyota",
    "/brands/volkswagen",
    "/brands/haval",
];

/// Paths crawlers are asked to skip.
const DISALLOWED: &[&str] = &["/dashboard/", "/auth/", "/api/"];

/// Errors that abort prerendering.
#[derive(Debug, Error)]
pub enum PrerenderError {
    #[error("client build missing: {0}")]
    Assets(#[from] AssetError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render {file}: {source}")]
    Render {
        file: &'static str,
        #[source]
        source: askama::Error,
    },

    #[error("{0} is missing after generation")]
    MissingIndex(PathBuf),
}

/// What a run produced.
#[derive(Debug, Default)]
pub struct PrerenderReport {
    /// Routes written, in order.
    pub written: Vec<&'static str>,
    /// Routes skipped because they redirected or failed to render.
    pub skipped: Vec<&'static str>,
}

/// File a route is written to.
#[must_use]
pub fn route_output_path(dist_dir: &Path, route: &str) -> PathBuf {
    let trimmed = route.trim_matches('/');
    if trimmed.is_empty() {
        dist_dir.join("index.html")
    } else {
        dist_dir.join(trimmed).join("index.html")
    }
}

/// Sitemap priority: `1.0` at the root, minus `0.2` per path segment, never
/// below `0.1`.
#[must_use]
pub fn sitemap_priority(route: &str) -> String {
    let depth = route.split('/').filter(|s| !s.is_empty()).count();
    #[allow(clippy::cast_precision_loss)]
    let priority = (0.2f64.mul_add(-(depth as f64), 1.0)).max(0.1);
    format!("{priority:.1}")
}

struct SitemapUrl {
    loc: String,
    priority: String,
}

#[derive(Template)]
#[template(path = "sitemap.xml")]
struct SitemapTemplate {
    urls: Vec<SitemapUrl>,
    lastmod: String,
}

/// `sitemap.xml` for the given routes.
///
/// # Errors
///
/// Returns error if the sitemap template fails to render.
pub fn sitemap_xml(base_url: &str, routes: &[&str], today: NaiveDate) -> askama::Result<String> {
    SitemapTemplate {
        urls: routes
            .iter()
            .map(|route| SitemapUrl {
                loc: absolute_url(base_url, route),
                priority: sitemap_priority(route),
            })
            .collect(),
        lastmod: today.format("%Y-%m-%d").to_string(),
    }
    .render()
}

/// `robots.txt` allowing everything public and pointing at the sitemap.
#[must_use]
pub fn robots_txt(base_url: &str) -> String {
    let mut out = String::from("User-agent: *\nAllow: /\n");
    for path in DISALLOWED {
        out.push_str("Disallow: ");
        out.push_str(path);
        out.push('\n');
    }
    out.push_str(&format!("\nSitemap: {}\n", absolute_url(base_url, "/sitemap.xml")));
    out
}

fn write(path: &Path, contents: &str) -> Result<(), PrerenderError> {
    let io = |source| PrerenderError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io)?;
    }
    fs::write(path, contents).map_err(io)
}

fn render_route(
    route: &str,
    ctx: &RenderContext<'_>,
    assets: &AppAssets,
) -> Result<Option<String>, RenderError> {
    let page = render_page(route, ctx)?;
    if let Some(to) = &page.redirect {
        tracing::warn!(route, to = %to, "Route redirects, skipping");
        return Ok(None);
    }
    render_document(&page, assets, ctx.locale).map(Some)
}

/// Prerender [`PRERENDER_ROUTES`] into `dist_dir`.
///
/// # Errors
///
/// Returns error if the asset manifest or its `app` entry is missing (no files
/// are written), if a file cannot be written, or if `index.html` does not
/// exist afterwards.
pub fn prerender(dist_dir: &Path, base_url: &str) -> Result<PrerenderReport, PrerenderError> {
    prerender_routes(dist_dir, base_url, PRERENDER_ROUTES, chrono::Utc::now().date_naive())
}

/// [`prerender`] over an explicit route list and date.
///
/// # Errors
///
/// See [`prerender`].
pub fn prerender_routes(
    dist_dir: &Path,
    base_url: &str,
    routes: &[&'static str],
    today: NaiveDate,
) -> Result<PrerenderReport, PrerenderError> {
    let assets = AppAssets::load(dist_dir)?;
    let ctx = RenderContext {
        locale: Locale::default(),
        base_url,
        signed_in: false,
    };

    let mut report = PrerenderReport::default();
    for &route in routes {
        match render_route(route, &ctx, &assets) {
            Ok(Some(html)) => {
                let path = route_output_path(dist_dir, route);
                write(&path, &html)?;
                tracing::info!(route, file = %path.display(), "Prerendered");
                report.written.push(route);
            }
            Ok(None) => report.skipped.push(route),
            Err(e) => {
                tracing::error!(route, error = %e, "Failed to render route, skipping");
                report.skipped.push(route);
            }
        }
    }

    let sitemap = sitemap_xml(base_url, &report.written, today).map_err(|source| {
        PrerenderError::Render {
            file: "sitemap.xml",
            source,
        }
    })?;
    write(&dist_dir.join("sitemap.xml"), &sitemap)?;
    write(&dist_dir.join("robots.txt"), &robots_txt(base_url))?;

    let index = dist_dir.join("index.html");
    if !index.is_file() {
        return Err(PrerenderError::MissingIndex(index));
    }

    tracing::info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        "Prerender complete"
    );
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::assets::{APP_ENTRY, AssetManifest, MANIFEST_FILE, ManifestEntry};

    const BASE: &str = "https://zapchasti.ru";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn with_manifest() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let mut manifest = AssetManifest::default();
        manifest.insert(
            APP_ENTRY,
            ManifestEntry {
                file: "assets/app.0a1b2c3d.js".to_string(),
                css: vec!["assets/main.4e5f6a7b.css".to_string()],
            },
        );
        fs::write(
            dir.path().join(MANIFEST_FILE),
            serde_json::to_string(&manifest).unwrap(),
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_route_output_path() {
        let dist = Path::new("dist/public");
        assert_eq!(route_output_path(dist, "/"), dist.join("index.html"));
        assert_eq!(route_output_path(dist, "/parts"), dist.join("parts/index.html"));
        assert_eq!(
            route_output_path(dist, "/brands/bmw"),
            dist.join("brands/bmw/index.html")
        );
    }

    #[test]
    fn test_sitemap_priority() {
        assert_eq!(sitemap_priority("/"), "1.0");
        assert_eq!(sitemap_priority("/parts"), "0.8");
        assert_eq!(sitemap_priority("/brands/bmw"), "0.6");
        assert_eq!(sitemap_priority("/a/b/c/d/e/f"), "0.1");
    }

    #[test]
    fn test_sitemap_xml() {
        let xml = sitemap_xml(BASE, &["/", "/brands/bmw"], today()).unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert_eq!(xml.matches("<url>").count(), 2);
        assert!(xml.contains("<loc>https://zapchasti.ru/</loc>"));
        assert!(xml.contains("<loc>https://zapchasti.ru/brands/bmw</loc>"));
        assert!(xml.contains("<lastmod>2026-10-18</lastmod>"));
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
        assert!(xml.contains("<priority>0.6</priority>"));
    }

    #[test]
    fn test_robots_txt() {
        let robots = robots_txt(BASE);
        assert!(robots.contains("Allow: /\n"));
        for path in DISALLOWED {
            assert!(robots.contains(&format!("Disallow: {path}\n")));
        }
        assert!(robots.contains("Sitemap: https://zapchasti.ru/sitemap.xml"));
    }

    #[test]
    fn test_prerender_writes_every_route() {
        let dist = with_manifest();
        let report = prerender_routes(dist.path(), BASE, PRERENDER_ROUTES, today()).unwrap();

        assert_eq!(report.written, PRERENDER_ROUTES);
        assert!(report.skipped.is_empty());
        for route in PRERENDER_ROUTES {
            let html = fs::read_to_string(route_output_path(dist.path(), route)).unwrap();
            assert!(html.contains(r#"<script src="/assets/app.0a1b2c3d.js" defer></script>"#));
            assert!(html.contains(&format!(
                r#"<link rel="canonical" href="{}">"#,
                absolute_url(BASE, route)
            )));
        }

        let sitemap = fs::read_to_string(dist.path().join("sitemap.xml")).unwrap();
        assert_eq!(sitemap.matches("<url>").count(), PRERENDER_ROUTES.len());
        assert!(dist.path().join("robots.txt").is_file());
    }

    #[test]
    fn test_redirecting_route_is_skipped() {
        let dist = with_manifest();
        let report = prerender_routes(dist.path(), BASE, &["/", "/catalog"], today()).unwrap();

        assert_eq!(report.written, ["/"]);
        assert_eq!(report.skipped, ["/catalog"]);
        assert!(!dist.path().join("catalog").exists());
    }

    #[test]
    fn test_missing_manifest_writes_nothing() {
        let dist = tempfile::tempdir().unwrap();
        let err = prerender_routes(dist.path(), BASE, PRERENDER_ROUTES, today()).unwrap_err();

        assert!(matches!(err, PrerenderError::Assets(AssetError::Io { .. })));
        assert_eq!(fs::read_dir(dist.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_entry_writes_nothing() {
        let dist = tempfile::tempdir().unwrap();
        fs::write(dist.path().join(MANIFEST_FILE), "{}").unwrap();
        let err = prerender_routes(dist.path(), BASE, PRERENDER_ROUTES, today()).unwrap_err();

        assert!(matches!(err, PrerenderError::Assets(AssetError::MissingEntry(_))));
        assert_eq!(fs::read_dir(dist.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_index_fails() {
        let dist = with_manifest();
        let err = prerender_routes(dist.path(), BASE, &["/contact"], today()).unwrap_err();
        assert!(matches!(err, PrerenderError::MissingIndex(_)));
    }
}
