//! Application state shared across handlers.

use std::path::Path;
use std::sync::Arc;

use sqlx::PgPool;

use crate::assets::AppAssets;
use crate::config::StorefrontConfig;
use crate::i18n::Locale;
use crate::services::email::Mailer;
use crate::ssr::RenderContext;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    mailer: Mailer,
    assets: AppAssets,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `pool` - `PostgreSQL` connection pool
    /// * `mailer` - Handle to the running mail worker
    /// * `assets` - Script and stylesheet paths for the document shell
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool, mailer: Mailer, assets: AppAssets) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                mailer,
                assets,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn mailer(&self) -> &Mailer {
        &self.inner.mailer
    }

    #[must_use]
    pub fn assets(&self) -> &AppAssets {
        &self.inner.assets
    }

    /// Render inputs for one request.
    #[must_use]
    pub fn render_context(&self, locale: Locale, signed_in: bool) -> RenderContext<'_> {
        RenderContext {
            locale,
            base_url: &self.inner.config.base_url,
            signed_in,
        }
    }
}

/// Asset paths from the build manifest in `dist_dir`, or the unbundled
/// sources when no build has been run.
#[must_use]
pub fn load_assets(dist_dir: &Path) -> AppAssets {
    match AppAssets::load(dist_dir) {
        Ok(assets) => {
            tracing::info!(script = %assets.script, "Loaded asset manifest");
            assets
        }
        Err(e) => {
            tracing::warn!(error = %e, "No asset manifest, serving unbundled assets");
            AppAssets::unbundled()
        }
    }
}
