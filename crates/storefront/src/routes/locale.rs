//! `GET /lang/{code}`: switch the interface language.

use axum::{
    extract::{Path, Query},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::i18n::Locale;
use crate::middleware::store_locale;

#[derive(Debug, Deserialize)]
pub struct SwitchQuery {
    #[serde(default)]
    pub next: Option<String>,
}

/// Local path to return to; anything else (absolute or protocol-relative
/// URLs) falls back to `/`.
#[must_use]
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

/// Store the language in the session and go back.
#[instrument(skip(session, query))]
pub async fn switch(
    session: Session,
    Path(code): Path<String>,
    Query(query): Query<SwitchQuery>,
) -> Result<Redirect> {
    let locale = Locale::from_code(&code)
        .ok_or_else(|| AppError::NotFound(format!("Unknown language: {code}")))?;
    store_locale(&session, locale).await?;
    Ok(Redirect::to(safe_next(query.next.as_deref())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next() {
        assert_eq!(safe_next(Some("/brands/bmw")), "/brands/bmw");
        assert_eq!(safe_next(Some("/parts?x=1")), "/parts?x=1");
        assert_eq!(safe_next(None), "/");
        assert_eq!(safe_next(Some("")), "/");
        assert_eq!(safe_next(Some("https://evil.example")), "/");
        assert_eq!(safe_next(Some("//evil.example")), "/");
        assert_eq!(safe_next(Some("/\\evil.example")), "/");
    }
}
