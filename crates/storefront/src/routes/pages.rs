//! Public page tree served live.
//!
//! Every `GET` that no other route claims is rendered by
//! [`render_page`](crate::ssr::render_page), the same function the prerender
//! command uses, and wrapped in the document shell.

use axum::{
    extract::State,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::error::Result;
use crate::i18n::Locale;
use crate::middleware::{OptionalAuth, RequestLocale};
use crate::ssr::{Document, RenderedPage, render_page};
use crate::state::AppState;

/// Render the page for the request URL.
#[instrument(skip_all, fields(path = %uri.path()))]
pub async fn page(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    OptionalAuth(user): OptionalAuth,
    uri: Uri,
) -> Result<Response> {
    let ctx = state.render_context(locale, user.is_some());
    let url = uri.path_and_query().map_or("/", |pq| pq.as_str());
    let page = render_page(url, &ctx)?;
    Ok(respond(&state, &page, locale))
}

/// Turn a rendered page into a response: a redirect, or the full document
/// with the page's status.
pub fn respond(state: &AppState, page: &RenderedPage, locale: Locale) -> Response {
    if let Some(to) = &page.redirect {
        return (StatusCode::FOUND, [(header::LOCATION, to.clone())]).into_response();
    }
    (page.status, Document::new(page, state.assets(), locale)).into_response()
}
