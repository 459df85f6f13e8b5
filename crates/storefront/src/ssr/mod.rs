//! Server-side rendering of the page tree.
//!
//! [`render_page`] turns a URL into body markup plus collected head tags. It
//! holds no state between calls, so the live server and the prerender command
//! share it: the server wraps the result in the document shell per request,
//! the prerender command writes it to disk.

pub mod dashboard;
pub mod document;
pub mod head;
pub mod pages;

use askama::Template;
use axum::http::StatusCode;
use thiserror::Error;

use autoparts_core::VehicleType;

use crate::catalog::{self, Brand};
use crate::i18n::Locale;

pub use document::{Document, render_document};
pub use head::{HeadCollector, NOINDEX};
use pages::{
    BrandPage, ContactPage, ForgotPasswordPage, Frame, HomePage, LoginPage, NotFoundPage,
    OrderPage, PartsPage, PartsTypePage, RegisterPage, ResetPasswordPage,
};

/// Where signed-out visitors of private pages are sent.
pub const LOGIN_PATH: &str = "/auth/login";

/// Landing page after sign-in.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Render failures.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template render failed: {0}")]
    Template(#[from] askama::Error),
}

/// Per-render inputs.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub locale: Locale,
    /// Public origin used for canonical and Open Graph URLs.
    pub base_url: &'a str,
    pub signed_in: bool,
}

/// Output of one render.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Body markup; empty for redirects.
    pub html: String,
    /// Collected `<head>` tags; empty for redirects.
    pub head: String,
    pub redirect: Option<String>,
    pub status: StatusCode,
}

impl RenderedPage {
    fn redirect(to: &str) -> Self {
        Self {
            html: String::new(),
            head: String::new(),
            redirect: Some(to.to_string()),
            status: StatusCode::FOUND,
        }
    }
}

/// A page of the public tree.
#[derive(Debug, Clone, Copy)]
pub enum Route {
    Home,
    Parts,
    PartsType(VehicleType),
    Brand(&'static Brand),
    Contact,
    Order,
    Login,
    Register,
    ForgotPassword,
    ResetPassword,
}

/// Result of matching a path against the page tree.
#[derive(Debug, Clone, Copy)]
pub enum Resolution {
    Page(Route),
    Redirect(&'static str),
    NotFound,
}

/// Reduce a URL to its path: no query, no fragment, no trailing slash.
#[must_use]
pub fn normalize_path(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Match a normalized path.
#[must_use]
pub fn resolve(path: &str) -> Resolution {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [] => Resolution::Page(Route::Home),
        ["parts"] => Resolution::Page(Route::Parts),
        ["parts", kind] => kind
            .parse()
            .map_or(Resolution::NotFound, |kind| Resolution::Page(Route::PartsType(kind))),
        ["brands", slug] => catalog::find_brand(slug)
            .map_or(Resolution::NotFound, |brand| Resolution::Page(Route::Brand(brand))),
        ["contact"] => Resolution::Page(Route::Contact),
        ["order"] => Resolution::Page(Route::Order),
        ["auth", "login"] => Resolution::Page(Route::Login),
        ["auth", "register"] => Resolution::Page(Route::Register),
        ["auth", "forgot-password"] => Resolution::Page(Route::ForgotPassword),
        ["auth", "reset-password"] => Resolution::Page(Route::ResetPassword),
        ["dashboard", ..] | ["login"] => Resolution::Redirect(LOGIN_PATH),
        ["catalog"] | ["brands"] => Resolution::Redirect("/parts"),
        _ => Resolution::NotFound,
    }
}

/// Render the page for `url`.
///
/// # Errors
///
/// Returns error if a template fails to render.
pub fn render_page(url: &str, ctx: &RenderContext<'_>) -> Result<RenderedPage, RenderError> {
    let path = normalize_path(url);
    let frame = Frame::new(ctx.locale, &path, ctx.signed_in);
    let mut head = HeadCollector::new(ctx.base_url, ctx.locale);

    let route = match resolve(&path) {
        Resolution::Redirect(to) => return Ok(RenderedPage::redirect(to)),
        Resolution::NotFound => return not_found(frame, head),
        Resolution::Page(Route::Login | Route::Register) if ctx.signed_in => {
            return Ok(RenderedPage::redirect(DASHBOARD_PATH));
        }
        Resolution::Page(route) => route,
    };

    head.canonical(&path);
    let html = render_route(route, frame, &mut head)?;
    Ok(RenderedPage {
        html,
        head: head.render()?,
        redirect: None,
        status: StatusCode::OK,
    })
}

/// The not-found page for `path`, status 404.
///
/// # Errors
///
/// Returns error if a template fails to render.
pub fn render_not_found(path: &str, ctx: &RenderContext<'_>) -> Result<RenderedPage, RenderError> {
    not_found(
        Frame::new(ctx.locale, path, ctx.signed_in),
        HeadCollector::new(ctx.base_url, ctx.locale),
    )
}

fn not_found(frame: Frame, mut head: HeadCollector) -> Result<RenderedPage, RenderError> {
    let t = frame.t;
    head.title(t.not_found_title).robots(NOINDEX);
    let html = NotFoundPage { frame, t }.render()?;
    Ok(RenderedPage {
        html,
        head: head.render()?,
        redirect: None,
        status: StatusCode::NOT_FOUND,
    })
}

fn render_route(route: Route, frame: Frame, head: &mut HeadCollector) -> askama::Result<String> {
    let t = frame.t;
    let locale = frame.locale;
    match route {
        Route::Home => {
            head.title(t.home_title).description(t.home_description);
            HomePage::new(frame).render()
        }
        Route::Parts => {
            head.title(t.parts_title).description(t.parts_description);
            PartsPage::new(frame).render()
        }
        Route::PartsType(kind) => {
            let page = PartsTypePage::new(frame, kind);
            head.title(page.heading.clone()).description(format!(
                "{} {}. {}",
                t.parts_for,
                locale.vehicle_type_for(kind),
                t.parts_description
            ));
            page.render()
        }
        Route::Brand(brand) => {
            let page = BrandPage::new(frame, brand);
            head.title(page.heading.clone())
                .description(brand.about(locale));
            page.render()
        }
        Route::Contact => {
            head.title(t.contact_title).description(t.contact_description);
            ContactPage { frame, t }.render()
        }
        Route::Order => {
            head.title(t.order_title).description(t.order_description);
            OrderPage::new(frame).render()
        }
        Route::Login => {
            head.title(t.login_title).robots(NOINDEX);
            LoginPage { frame, t }.render()
        }
        Route::Register => {
            head.title(t.register_title).robots(NOINDEX);
            RegisterPage {
                frame,
                t,
                min_password: autoparts_core::MIN_PASSWORD_LENGTH,
            }
            .render()
        }
        Route::ForgotPassword => {
            head.title(t.forgot_title).robots(NOINDEX);
            ForgotPasswordPage { frame, t }.render()
        }
        Route::ResetPassword => {
            head.title(t.reset_title).robots(NOINDEX);
            ResetPasswordPage {
                frame,
                t,
                min_password: autoparts_core::MIN_PASSWORD_LENGTH,
            }
            .render()
        }
    }
}
