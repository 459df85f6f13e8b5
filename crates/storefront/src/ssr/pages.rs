//! Page templates of the public page tree.

use askama::Template;
use chrono::Datelike;

use autoparts_core::{MAX_QUANTITY, MIN_YEAR, MIN_PASSWORD_LENGTH, VehicleType};

use crate::catalog::{self, BRANDS, Brand, CATEGORIES};
use crate::filters;
use crate::i18n::{Locale, Strings};

/// Layout data shared by every page: navigation, language switch, footer.
#[derive(Debug, Clone)]
pub struct Frame {
    pub t: &'static Strings,
    pub locale: Locale,
    /// Path being rendered, used for the language switch and active nav.
    pub path: String,
    pub signed_in: bool,
}

impl Frame {
    #[must_use]
    pub fn new(locale: Locale, path: &str, signed_in: bool) -> Self {
        Self {
            t: locale.strings(),
            locale,
            path: path.to_string(),
            signed_in,
        }
    }

    /// Link that switches to the other language and returns here.
    #[must_use]
    pub fn switch_href(&self) -> String {
        let next: String = url::form_urlencoded::byte_serialize(self.path.as_bytes()).collect();
        format!("/lang/{}?next={next}", self.locale.other().code())
    }

    #[must_use]
    pub const fn switch_label(&self) -> &'static str {
        self.locale.other().strings().language_name
    }

    /// Whether a nav link points at the current section.
    #[must_use]
    pub fn is_active(&self, href: &str) -> bool {
        if href == "/" {
            self.path == "/"
        } else {
            self.path == href || self.path.starts_with(&format!("{href}/"))
        }
    }
}

/// A link to a brand page.
#[derive(Debug, Clone)]
pub struct BrandLink {
    pub name: &'static str,
    pub href: String,
}

impl From<&Brand> for BrandLink {
    fn from(brand: &Brand) -> Self {
        Self {
            name: brand.name,
            href: brand.path(),
        }
    }
}

/// A vehicle type tile with its brands.
#[derive(Debug, Clone)]
pub struct TypeCard {
    pub label: &'static str,
    pub href: String,
    pub brands: Vec<BrandLink>,
}

impl TypeCard {
    fn new(kind: VehicleType, locale: Locale) -> Self {
        Self {
            label: locale.vehicle_type(kind),
            href: format!("/parts/{kind}"),
            brands: catalog::brands_for(kind).map(BrandLink::from).collect(),
        }
    }

    fn all(locale: Locale) -> Vec<Self> {
        VehicleType::ALL
            .into_iter()
            .map(|kind| Self::new(kind, locale))
            .collect()
    }
}

fn category_names(locale: Locale) -> Vec<&'static str> {
    CATEGORIES.iter().map(|c| c.name(locale)).collect()
}

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomePage {
    pub frame: Frame,
    pub t: &'static Strings,
    pub types: Vec<TypeCard>,
    pub brands: Vec<BrandLink>,
}

impl HomePage {
    #[must_use]
    pub fn new(frame: Frame) -> Self {
        let locale = frame.locale;
        Self {
            t: frame.t,
            frame,
            types: TypeCard::all(locale),
            brands: BRANDS.iter().map(BrandLink::from).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "pages/parts.html")]
pub struct PartsPage {
    pub frame: Frame,
    pub t: &'static Strings,
    pub types: Vec<TypeCard>,
    pub categories: Vec<&'static str>,
}

impl PartsPage {
    #[must_use]
    pub fn new(frame: Frame) -> Self {
        let locale = frame.locale;
        Self {
            t: frame.t,
            frame,
            types: TypeCard::all(locale),
            categories: category_names(locale),
        }
    }
}

#[derive(Template)]
#[template(path = "pages/parts_type.html")]
pub struct PartsTypePage {
    pub frame: Frame,
    pub t: &'static Strings,
    pub heading: String,
    pub brands: Vec<BrandLink>,
    pub categories: Vec<&'static str>,
}

impl PartsTypePage {
    #[must_use]
    pub fn new(frame: Frame, kind: VehicleType) -> Self {
        let locale = frame.locale;
        Self {
            t: frame.t,
            heading: format!("{} {}", frame.t.parts_for, locale.vehicle_type_for(kind)),
            frame,
            brands: catalog::brands_for(kind).map(BrandLink::from).collect(),
            categories: category_names(locale),
        }
    }
}

#[derive(Template)]
#[template(path = "pages/brand.html")]
pub struct BrandPage {
    pub frame: Frame,
    pub t: &'static Strings,
    pub brand: &'static Brand,
    pub heading: String,
    pub about: &'static str,
    pub country: &'static str,
    pub type_label: &'static str,
    pub type_href: String,
    pub categories: Vec<&'static str>,
}

impl BrandPage {
    #[must_use]
    pub fn new(frame: Frame, brand: &'static Brand) -> Self {
        let locale = frame.locale;
        Self {
            t: frame.t,
            heading: format!("{} {}", frame.t.parts_for, brand.name),
            frame,
            brand,
            about: brand.about(locale),
            country: brand.country(locale),
            type_label: locale.vehicle_type(brand.vehicle_type),
            type_href: format!("/parts/{}", brand.vehicle_type),
            categories: category_names(locale),
        }
    }
}

#[derive(Template)]
#[template(path = "pages/contact.html")]
pub struct ContactPage {
    pub frame: Frame,
    pub t: &'static Strings,
}

/// A `<select>` option.
#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Template)]
#[template(path = "pages/order.html")]
pub struct OrderPage {
    pub frame: Frame,
    pub t: &'static Strings,
    pub vehicle_types: Vec<SelectOption>,
    pub min_year: i32,
    pub max_year: i32,
    pub max_quantity: u32,
    pub min_password: usize,
}

impl OrderPage {
    #[must_use]
    pub fn new(frame: Frame) -> Self {
        let locale = frame.locale;
        Self {
            t: frame.t,
            frame,
            vehicle_types: VehicleType::ALL
                .into_iter()
                .map(|kind| SelectOption {
                    value: kind.as_str(),
                    label: locale.vehicle_type(kind),
                })
                .collect(),
            min_year: MIN_YEAR,
            max_year: chrono::Utc::now().year() + 1,
            max_quantity: MAX_QUANTITY,
            min_password: MIN_PASSWORD_LENGTH,
        }
    }
}

#[derive(Template)]
#[template(path = "pages/login.html")]
pub struct LoginPage {
    pub frame: Frame,
    pub t: &'static Strings,
}

#[derive(Template)]
#[template(path = "pages/register.html")]
pub struct RegisterPage {
    pub frame: Frame,
    pub t: &'static Strings,
    pub min_password: usize,
}

#[derive(Template)]
#[template(path = "pages/forgot_password.html")]
pub struct ForgotPasswordPage {
    pub frame: Frame,
    pub t: &'static Strings,
}

#[derive(Template)]
#[template(path = "pages/reset_password.html")]
pub struct ResetPasswordPage {
    pub frame: Frame,
    pub t: &'static Strings,
    pub min_password: usize,
}

#[derive(Template)]
#[template(path = "pages/not_found.html")]
pub struct NotFoundPage {
    pub frame: Frame,
    pub t: &'static Strings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_href_encodes_path() {
        let frame = Frame::new(Locale::Ru, "/brands/bmw", false);
        assert_eq!(frame.switch_href(), "/lang/en?next=%2Fbrands%2Fbmw");
        assert_eq!(frame.switch_label(), "English");
    }

    #[test]
    fn test_is_active() {
        let frame = Frame::new(Locale::Ru, "/parts/chinese", false);
        assert!(frame.is_active("/parts"));
        assert!(!frame.is_active("/"));
        assert!(!frame.is_active("/part"));
        assert!(Frame::new(Locale::Ru, "/", false).is_active("/"));
    }

    #[test]
    fn test_order_form_limits() {
        let page = OrderPage::new(Frame::new(Locale::En, "/order", false));
        assert_eq!(page.min_year, 1950);
        assert_eq!(page.max_quantity, 999);
        assert!(format!("{:?}", page.frame).contains("/order"));
    }
}
