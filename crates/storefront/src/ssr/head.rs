//! Per-render `<head>` collection.
//!
//! Each render builds a fresh [`HeadCollector`]; pages set what they know and
//! the collector fills Open Graph tags from the same values.

use askama::Template;

use crate::config::absolute_url;
use crate::i18n::Locale;

/// Robots directive for pages that must stay out of search results.
pub const NOINDEX: &str = "noindex, nofollow";

/// Head tags gathered while rendering one page.
#[derive(Debug, Clone)]
pub struct HeadCollector {
    site_name: &'static str,
    locale: Locale,
    base_url: String,
    title: Option<String>,
    description: Option<String>,
    canonical: Option<String>,
    robots: Option<&'static str>,
}

#[derive(Template)]
#[template(path = "head.html")]
struct HeadTemplate<'a> {
    title: &'a str,
    description: Option<&'a str>,
    canonical: Option<&'a str>,
    robots: Option<&'a str>,
    og: Vec<(&'static str, &'a str)>,
}

impl HeadCollector {
    #[must_use]
    pub fn new(base_url: &str, locale: Locale) -> Self {
        Self {
            site_name: locale.strings().site_name,
            locale,
            base_url: base_url.to_string(),
            title: None,
            description: None,
            canonical: None,
            robots: None,
        }
    }

    /// Page title; rendered as `"{title} | {site name}"`.
    pub fn title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    /// Canonical link for a site path.
    pub fn canonical(&mut self, path: &str) -> &mut Self {
        self.canonical = Some(absolute_url(&self.base_url, path));
        self
    }

    pub fn robots(&mut self, directive: &'static str) -> &mut Self {
        self.robots = Some(directive);
        self
    }

    /// Full `<title>` text.
    #[must_use]
    pub fn full_title(&self) -> String {
        match &self.title {
            Some(title) => format!("{title} | {}", self.site_name),
            None => self.site_name.to_string(),
        }
    }

    /// Render the collected tags.
    ///
    /// # Errors
    ///
    /// Returns error if the head template fails to render.
    pub fn render(&self) -> askama::Result<String> {
        let title = self.full_title();
        let mut og = vec![
            ("og:type", "website"),
            ("og:site_name", self.site_name),
            ("og:locale", self.locale.og_locale()),
            ("og:title", title.as_str()),
        ];
        if let Some(description) = &self.description {
            og.push(("og:description", description));
        }
        if let Some(canonical) = &self.canonical {
            og.push(("og:url", canonical));
        }

        HeadTemplate {
            title: &title,
            description: self.description.as_deref(),
            canonical: self.canonical.as_deref(),
            robots: self.robots,
            og,
        }
        .render()
    }
}
