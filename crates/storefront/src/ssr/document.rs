//! The HTML document shell around rendered pages.

use askama::Template;
use askama_web::WebTemplate;

use super::{RenderError, RenderedPage};
use crate::assets::AppAssets;
use crate::i18n::Locale;

/// A complete HTML document. Renders to a string for the prerender command
/// and responds directly on the live server.
#[derive(Template, WebTemplate)]
#[template(path = "document.html")]
pub struct Document<'a> {
    lang: &'static str,
    head: &'a str,
    body: &'a str,
    assets: &'a AppAssets,
}

impl<'a> Document<'a> {
    #[must_use]
    pub fn new(page: &'a RenderedPage, assets: &'a AppAssets, locale: Locale) -> Self {
        Self {
            lang: locale.code(),
            head: &page.head,
            body: &page.html,
            assets,
        }
    }
}

/// Splice a rendered page into the document with the app's assets.
///
/// # Errors
///
/// Returns error if the document template fails to render.
pub fn render_document(
    page: &RenderedPage,
    assets: &AppAssets,
    locale: Locale,
) -> Result<String, RenderError> {
    Ok(Document::new(page, assets, locale).render()?)
}
