//! Interface language chosen by the visitor.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::i18n::Locale;
use crate::models::session_keys;

/// The visitor's language from the session; Russian when unset.
#[derive(Debug, Clone, Copy)]
pub struct RequestLocale(pub Locale);

impl<S> FromRequestParts<S> for RequestLocale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let locale = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<Locale>(session_keys::LOCALE)
                .await
                .ok()
                .flatten()
                .unwrap_or_default(),
            None => Locale::default(),
        };
        Ok(Self(locale))
    }
}

/// Remember the visitor's language.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn store_locale(
    session: &Session,
    locale: Locale,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::LOCALE, locale).await
}
