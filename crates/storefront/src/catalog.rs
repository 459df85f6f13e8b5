//! Static catalogue content: vehicle makes and part categories.
//!
//! The store sells parts to order, so there is no product database. These
//! tables drive the catalogue and brand pages, and the brand slugs listed in
//! the prerender route list must exist here.

use autoparts_core::VehicleType;

use crate::i18n::Locale;

/// A vehicle make with its own landing page.
#[derive(Debug)]
pub struct Brand {
    /// URL segment under `/brands/`.
    pub slug: &'static str,
    pub name: &'static str,
    pub vehicle_type: VehicleType,
    pub country_ru: &'static str,
    pub country_en: &'static str,
    pub about_ru: &'static str,
    pub about_en: &'static str,
    pub popular_models: &'static [&'static str],
}

impl Brand {
    #[must_use]
    pub const fn country(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::Ru => self.country_ru,
            Locale::En => self.country_en,
        }
    }

    #[must_use]
    pub const fn about(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::Ru => self.about_ru,
            Locale::En => self.about_en,
        }
    }

    /// Site path of the brand page.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/brands/{}", self.slug)
    }
}

pub static BRANDS: &[Brand] = &[
    Brand {
        slug: "bmw",
        name: "BMW",
        vehicle_type: VehicleType::Passenger,
        country_ru: "Германия",
        country_en: "Germany",
        about_ru: "Оригинальные и аналоговые запчасти для BMW всех серий: ходовая, тормозная система, фильтры, электрика.",
        about_en: "OEM and aftermarket parts for every BMW series: suspension, brakes, filters, electrics.",
        popular_models: &["3 Series", "5 Series", "X3", "X5", "X6"],
    },
    Brand {
        slug: "mercedes-benz",
        name: "Mercedes-Benz",
        vehicle_type: VehicleType::Passenger,
        country_ru: "Германия",
        country_en: "Germany",
        about_ru: "Запчасти для легковых Mercedes-Benz и коммерческих Sprinter: двигатель, подвеска, кузов.",
        about_en: "Parts for Mercedes-Benz cars and Sprinter vans: engine, suspension, body.",
        popular_models: &["C-Class", "E-Class", "GLE", "S-Class", "Sprinter"],
    },
    Brand {
        slug: "toyota",
        name: "Toyota",
        vehicle_type: VehicleType::Passenger,
        country_ru: "Япония",
        country_en: "Japan",
        about_ru: "Расходники и ремонтные запчасти для Toyota: от Camry до Land Cruiser.",
        about_en: "Service and repair parts for Toyota, from Camry to Land Cruiser.",
        popular_models: &["Camry", "Corolla", "RAV4", "Land Cruiser", "Hilux"],
    },
    Brand {
        slug: "volkswagen",
        name: "Volkswagen",
        vehicle_type: VehicleType::Passenger,
        country_ru: "Германия",
        country_en: "Germany",
        about_ru: "Запчасти для Volkswagen Polo, Tiguan, Passat и коммерческих Crafter и Transporter.",
        about_en: "Parts for Volkswagen Polo, Tiguan, Passat and the Crafter and Transporter vans.",
        popular_models: &["Polo", "Tiguan", "Passat", "Transporter", "Crafter"],
    },
    Brand {
        slug: "haval",
        name: "Haval",
        vehicle_type: VehicleType::Chinese,
        country_ru: "Китай",
        country_en: "China",
        about_ru: "Запчасти для кроссоверов Haval напрямую от проверенных поставщиков.",
        about_en: "Parts for Haval crossovers sourced from trusted suppliers.",
        popular_models: &["Jolion", "F7", "H6", "Dargo"],
    },
    Brand {
        slug: "chery",
        name: "Chery",
        vehicle_type: VehicleType::Chinese,
        country_ru: "Китай",
        country_en: "China",
        about_ru: "Оригинальные запчасти Chery и Exeed с доставкой по России.",
        about_en: "Genuine Chery and Exeed parts delivered across Russia.",
        popular_models: &["Tiggo 4", "Tiggo 7 Pro", "Tiggo 8 Pro"],
    },
    Brand {
        slug: "geely",
        name: "Geely",
        vehicle_type: VehicleType::Chinese,
        country_ru: "Китай",
        country_en: "China",
        about_ru: "Запчасти для Geely Coolray, Atlas и Monjaro.",
        about_en: "Parts for Geely Coolray, Atlas and Monjaro.",
        popular_models: &["Coolray", "Atlas", "Monjaro"],
    },
    Brand {
        slug: "gaz",
        name: "ГАЗ",
        vehicle_type: VehicleType::Commercial,
        country_ru: "Россия",
        country_en: "Russia",
        about_ru: "Запчасти для ГАЗель Next, Business и Соболь.",
        about_en: "Parts for GAZelle Next, Business and Sobol.",
        popular_models: &["ГАЗель Next", "ГАЗель Business", "Соболь"],
    },
    Brand {
        slug: "man",
        name: "MAN",
        vehicle_type: VehicleType::Commercial,
        country_ru: "Германия",
        country_en: "Germany",
        about_ru: "Запчасти для грузовиков MAN TGS, TGX и TGL.",
        about_en: "Parts for MAN TGS, TGX and TGL trucks.",
        popular_models: &["TGS", "TGX", "TGL"],
    },
];

/// Find a brand by its URL slug.
#[must_use]
pub fn find_brand(slug: &str) -> Option<&'static Brand> {
    BRANDS.iter().find(|brand| brand.slug == slug)
}

/// Brands of one vehicle type, in catalogue order.
pub fn brands_for(kind: VehicleType) -> impl Iterator<Item = &'static Brand> {
    BRANDS.iter().filter(move |brand| brand.vehicle_type == kind)
}

/// A part category shown on catalogue pages.
#[derive(Debug)]
pub struct Category {
    pub name_ru: &'static str,
    pub name_en: &'static str,
}

impl Category {
    #[must_use]
    pub const fn name(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::Ru => self.name_ru,
            Locale::En => self.name_en,
        }
    }
}

pub static CATEGORIES: &[Category] = &[
    Category { name_ru: "Тормозная система", name_en: "Brakes" },
    Category { name_ru: "Фильтры и масла", name_en: "Filters and oils" },
    Category { name_ru: "Подвеска и рулевое", name_en: "Suspension and steering" },
    Category { name_ru: "Двигатель", name_en: "Engine" },
    Category { name_ru: "Трансмиссия", name_en: "Transmission" },
    Category { name_ru: "Электрика и освещение", name_en: "Electrics and lighting" },
    Category { name_ru: "Кузовные детали", name_en: "Body parts" },
    Category { name_ru: "Охлаждение и климат", name_en: "Cooling and climate" },
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_slugs_are_unique_and_url_safe() {
        let mut seen = HashSet::new();
        for brand in BRANDS {
            assert!(seen.insert(brand.slug), "duplicate slug {}", brand.slug);
            assert!(
                brand
                    .slug
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            );
        }
    }

    #[test]
    fn test_find_brand() {
        assert_eq!(find_brand("mercedes-benz").map(|b| b.name), Some("Mercedes-Benz"));
        assert!(find_brand("lada").is_none());
    }

    #[test]
    fn test_every_vehicle_type_has_brands() {
        for kind in VehicleType::ALL {
            assert!(brands_for(kind).next().is_some(), "no brands for {kind}");
        }
    }
}
