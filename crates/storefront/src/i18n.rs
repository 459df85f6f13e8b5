//! Interface languages.
//!
//! Russian is the default; English is offered for foreign customers. Every
//! user-visible string of the page tree lives in one [`Strings`] table per
//! language so a missing translation is a compile error.

use serde::{Deserialize, Serialize};

use autoparts_core::{OrderStatus, VehicleType};

/// Interface language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ru,
    En,
}

impl Locale {
    pub const ALL: [Self; 2] = [Self::Ru, Self::En];

    /// Parse a language code (`ru`, `en`), case-insensitively.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "ru" => Some(Self::Ru),
            "en" => Some(Self::En),
            _ => None,
        }
    }

    /// ISO 639-1 code, also used for `<html lang>`.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Ru => "ru",
            Self::En => "en",
        }
    }

    /// `og:locale` value.
    #[must_use]
    pub const fn og_locale(self) -> &'static str {
        match self {
            Self::Ru => "ru_RU",
            Self::En => "en_US",
        }
    }

    /// The language offered by the switcher.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Ru => Self::En,
            Self::En => Self::Ru,
        }
    }

    /// String table for this language.
    #[must_use]
    pub const fn strings(self) -> &'static Strings {
        match self {
            Self::Ru => &RU,
            Self::En => &EN,
        }
    }

    /// Short vehicle type label ("Легковые").
    #[must_use]
    pub const fn vehicle_type(self, kind: VehicleType) -> &'static str {
        match (self, kind) {
            (Self::Ru, VehicleType::Passenger) => "Легковые",
            (Self::Ru, VehicleType::Commercial) => "Коммерческие",
            (Self::Ru, VehicleType::Chinese) => "Китайские",
            (Self::En, VehicleType::Passenger) => "Passenger",
            (Self::En, VehicleType::Commercial) => "Commercial",
            (Self::En, VehicleType::Chinese) => "Chinese",
        }
    }

    /// Vehicle type as the object of "parts for ..." ("легковых автомобилей").
    #[must_use]
    pub const fn vehicle_type_for(self, kind: VehicleType) -> &'static str {
        match (self, kind) {
            (Self::Ru, VehicleType::Passenger) => "легковых автомобилей",
            (Self::Ru, VehicleType::Commercial) => "коммерческого транспорта",
            (Self::Ru, VehicleType::Chinese) => "китайских автомобилей",
            (Self::En, VehicleType::Passenger) => "passenger cars",
            (Self::En, VehicleType::Commercial) => "commercial vehicles",
            (Self::En, VehicleType::Chinese) => "Chinese cars",
        }
    }

    /// Order status label.
    #[must_use]
    pub const fn order_status(self, status: OrderStatus) -> &'static str {
        match (self, status) {
            (Self::Ru, OrderStatus::New) => "Новый",
            (Self::Ru, OrderStatus::Processing) => "В работе",
            (Self::Ru, OrderStatus::Shipped) => "Отправлен",
            (Self::Ru, OrderStatus::Delivered) => "Доставлен",
            (Self::Ru, OrderStatus::Cancelled) => "Отменён",
            (Self::En, OrderStatus::New) => "New",
            (Self::En, OrderStatus::Processing) => "Processing",
            (Self::En, OrderStatus::Shipped) => "Shipped",
            (Self::En, OrderStatus::Delivered) => "Delivered",
            (Self::En, OrderStatus::Cancelled) => "Cancelled",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Every user-visible string of the page tree.
#[derive(Debug)]
#[allow(clippy::struct_field_names)]
pub struct Strings {
    // Frame
    pub site_name: &'static str,
    pub tagline: &'static str,
    pub nav_home: &'static str,
    pub nav_parts: &'static str,
    pub nav_order: &'static str,
    pub nav_contact: &'static str,
    pub nav_login: &'static str,
    pub nav_dashboard: &'static str,
    pub nav_logout: &'static str,
    pub language_name: &'static str,
    pub footer_note: &'static str,

    // Home
    pub home_title: &'static str,
    pub home_description: &'static str,
    pub hero_title: &'static str,
    pub hero_text: &'static str,
    pub hero_cta: &'static str,
    pub how_title: &'static str,
    pub how_steps: [&'static str; 3],
    pub types_title: &'static str,
    pub brands_title: &'static str,

    // Catalogue
    pub parts_title: &'static str,
    pub parts_description: &'static str,
    pub parts_intro: &'static str,
    pub parts_for: &'static str,
    pub categories_title: &'static str,
    pub popular_models: &'static str,
    pub order_cta: &'static str,

    // Forms
    pub label_name: &'static str,
    pub label_full_name: &'static str,
    pub label_phone: &'static str,
    pub label_country_code: &'static str,
    pub label_email: &'static str,
    pub label_city: &'static str,
    pub label_message: &'static str,
    pub label_comments: &'static str,
    pub label_password: &'static str,
    pub optional: &'static str,

    // Contact
    pub contact_title: &'static str,
    pub contact_description: &'static str,
    pub contact_intro: &'static str,
    pub contact_submit: &'static str,
    pub contact_success: &'static str,

    // Order form
    pub order_title: &'static str,
    pub order_description: &'static str,
    pub vehicle_heading: &'static str,
    pub label_vehicle_type: &'static str,
    pub label_vin: &'static str,
    pub label_make: &'static str,
    pub label_model: &'static str,
    pub label_year: &'static str,
    pub label_engine: &'static str,
    pub label_fuel: &'static str,
    pub parts_heading: &'static str,
    pub label_part_name: &'static str,
    pub label_quantity: &'static str,
    pub label_sku: &'static str,
    pub label_brand: &'static str,
    pub add_part: &'static str,
    pub contact_heading: &'static str,
    pub create_account: &'static str,
    pub order_submit: &'static str,
    pub order_success: &'static str,

    // Auth
    pub login_title: &'static str,
    pub login_submit: &'static str,
    pub register_title: &'static str,
    pub register_submit: &'static str,
    pub have_account: &'static str,
    pub no_account: &'static str,
    pub forgot_link: &'static str,
    pub forgot_title: &'static str,
    pub forgot_intro: &'static str,
    pub forgot_submit: &'static str,
    pub reset_title: &'static str,
    pub reset_intro: &'static str,
    pub reset_submit: &'static str,
    pub reset_success: &'static str,

    // Not found
    pub not_found_title: &'static str,
    pub not_found_text: &'static str,
    pub back_home: &'static str,

    // Dashboard
    pub dashboard_title: &'static str,
    pub my_orders: &'static str,
    pub no_orders: &'static str,
    pub order_number: &'static str,
    pub order_date: &'static str,
    pub order_status: &'static str,
    pub order_items: &'static str,
    pub back_to_orders: &'static str,
    pub profile_title: &'static str,
    pub profile_submit: &'static str,
    pub profile_saved: &'static str,
}

static RU: Strings = Strings {
    site_name: "Автозапчасти",
    tagline: "Запчасти для любых автомобилей под заказ",
    nav_home: "Главная",
    nav_parts: "Каталог",
    nav_order: "Заказать",
    nav_contact: "Контакты",
    nav_login: "Войти",
    nav_dashboard: "Личный кабинет",
    nav_logout: "Выйти",
    language_name: "Русский",
    footer_note: "Подбор и доставка автозапчастей по всей России",

    home_title: "Автозапчасти под заказ",
    home_description: "Подберём оригинальные и неоригинальные запчасти для легковых, коммерческих и китайских автомобилей по VIN.",
    hero_title: "Запчасти для вашего автомобиля",
    hero_text: "Оставьте заявку с VIN или маркой и моделью, и мы подберём детали, согласуем цену и сроки.",
    hero_cta: "Оставить заявку",
    how_title: "Как это работает",
    how_steps: [
        "Вы оставляете заявку с данными автомобиля и списком запчастей",
        "Менеджер подбирает варианты и связывается с вами",
        "Мы доставляем заказ в ваш город",
    ],
    types_title: "Типы автомобилей",
    brands_title: "Популярные марки",

    parts_title: "Каталог запчастей",
    parts_description: "Запчасти для легковых, коммерческих и китайских автомобилей: тормоза, фильтры, подвеска, двигатель.",
    parts_intro: "Выберите тип автомобиля или марку. Если нужной детали нет в списке, просто опишите её в заявке.",
    parts_for: "Запчасти для",
    categories_title: "Категории",
    popular_models: "Популярные модели",
    order_cta: "Заказать запчасти",

    label_name: "Имя",
    label_full_name: "ФИО",
    label_phone: "Телефон",
    label_country_code: "Код страны",
    label_email: "Email",
    label_city: "Город",
    label_message: "Сообщение",
    label_comments: "Комментарий",
    label_password: "Пароль",
    optional: "необязательно",

    contact_title: "Контакты",
    contact_description: "Свяжитесь с нами: вопросы по подбору запчастей, заказам и доставке.",
    contact_intro: "Напишите нам, и мы ответим в течение рабочего дня.",
    contact_submit: "Отправить",
    contact_success: "Сообщение отправлено. Мы скоро свяжемся с вами.",

    order_title: "Заявка на запчасти",
    order_description: "Оформите заявку на подбор автозапчастей по VIN или марке автомобиля.",
    vehicle_heading: "Автомобиль",
    label_vehicle_type: "Тип автомобиля",
    label_vin: "VIN",
    label_make: "Марка",
    label_model: "Модель",
    label_year: "Год выпуска",
    label_engine: "Двигатель",
    label_fuel: "Топливо",
    parts_heading: "Запчасти",
    label_part_name: "Наименование",
    label_quantity: "Количество",
    label_sku: "Артикул",
    label_brand: "Производитель",
    add_part: "Добавить позицию",
    contact_heading: "Контактные данные",
    create_account: "Создать аккаунт, чтобы отслеживать заказ",
    order_submit: "Отправить заявку",
    order_success: "Заявка принята. Менеджер свяжется с вами.",

    login_title: "Вход",
    login_submit: "Войти",
    register_title: "Регистрация",
    register_submit: "Зарегистрироваться",
    have_account: "Уже есть аккаунт?",
    no_account: "Нет аккаунта?",
    forgot_link: "Забыли пароль?",
    forgot_title: "Восстановление пароля",
    forgot_intro: "Укажите email, и мы отправим ссылку для смены пароля.",
    forgot_submit: "Отправить ссылку",
    reset_title: "Новый пароль",
    reset_intro: "Придумайте новый пароль длиной не менее 6 символов.",
    reset_submit: "Сохранить пароль",
    reset_success: "Пароль изменён. Теперь вы можете войти.",

    not_found_title: "Страница не найдена",
    not_found_text: "Такой страницы нет. Возможно, она была перемещена.",
    back_home: "На главную",

    dashboard_title: "Личный кабинет",
    my_orders: "Мои заказы",
    no_orders: "У вас пока нет заказов.",
    order_number: "Заказ №",
    order_date: "Дата",
    order_status: "Статус",
    order_items: "Позиций",
    back_to_orders: "Все заказы",
    profile_title: "Профиль",
    profile_submit: "Сохранить",
    profile_saved: "Профиль сохранён",
};

static EN: Strings = Strings {
    site_name: "AutoParts",
    tagline: "Parts for any car, made to order",
    nav_home: "Home",
    nav_parts: "Catalogue",
    nav_order: "Order",
    nav_contact: "Contact",
    nav_login: "Sign in",
    nav_dashboard: "My account",
    nav_logout: "Sign out",
    language_name: "English",
    footer_note: "Auto parts sourcing and delivery across Russia",

    home_title: "Auto parts to order",
    home_description: "OEM and aftermarket parts for passenger, commercial and Chinese cars, matched by VIN.",
    hero_title: "Parts for your car",
    hero_text: "Send a request with your VIN or make and model; we will source the parts and confirm price and delivery time.",
    hero_cta: "Request parts",
    how_title: "How it works",
    how_steps: [
        "You send a request with your vehicle details and the parts you need",
        "A manager finds options and gets in touch",
        "We deliver the order to your city",
    ],
    types_title: "Vehicle types",
    brands_title: "Popular makes",

    parts_title: "Parts catalogue",
    parts_description: "Parts for passenger, commercial and Chinese cars: brakes, filters, suspension, engine.",
    parts_intro: "Pick a vehicle type or a make. If a part is not listed, just describe it in your request.",
    parts_for: "Parts for",
    categories_title: "Categories",
    popular_models: "Popular models",
    order_cta: "Order parts",

    label_name: "Name",
    label_full_name: "Full name",
    label_phone: "Phone",
    label_country_code: "Country code",
    label_email: "Email",
    label_city: "City",
    label_message: "Message",
    label_comments: "Comments",
    label_password: "Password",
    optional: "optional",

    contact_title: "Contact",
    contact_description: "Get in touch about part matching, orders and delivery.",
    contact_intro: "Write to us and we will reply within one business day.",
    contact_submit: "Send",
    contact_success: "Message sent. We will be in touch soon.",

    order_title: "Parts request",
    order_description: "Request auto parts matched by VIN or by make and model.",
    vehicle_heading: "Vehicle",
    label_vehicle_type: "Vehicle type",
    label_vin: "VIN",
    label_make: "Make",
    label_model: "Model",
    label_year: "Year",
    label_engine: "Engine",
    label_fuel: "Fuel",
    parts_heading: "Parts",
    label_part_name: "Part name",
    label_quantity: "Quantity",
    label_sku: "Part number",
    label_brand: "Manufacturer",
    add_part: "Add a line",
    contact_heading: "Contact details",
    create_account: "Create an account to track the order",
    order_submit: "Send request",
    order_success: "Request received. A manager will contact you.",

    login_title: "Sign in",
    login_submit: "Sign in",
    register_title: "Create account",
    register_submit: "Create account",
    have_account: "Already have an account?",
    no_account: "No account yet?",
    forgot_link: "Forgot password?",
    forgot_title: "Password recovery",
    forgot_intro: "Enter your email and we will send you a link to set a new password.",
    forgot_submit: "Send link",
    reset_title: "New password",
    reset_intro: "Choose a new password of at least 6 characters.",
    reset_submit: "Save password",
    reset_success: "Password changed. You can sign in now.",

    not_found_title: "Page not found",
    not_found_text: "This page does not exist. It may have been moved.",
    back_home: "Back to home",

    dashboard_title: "My account",
    my_orders: "My orders",
    no_orders: "You have no orders yet.",
    order_number: "Order #",
    order_date: "Date",
    order_status: "Status",
    order_items: "Items",
    back_to_orders: "All orders",
    profile_title: "Profile",
    profile_submit: "Save",
    profile_saved: "Profile saved",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(Locale::from_code("ru"), Some(Locale::Ru));
        assert_eq!(Locale::from_code(" EN "), Some(Locale::En));
        assert_eq!(Locale::from_code("de"), None);
    }

    #[test]
    fn test_default_is_russian() {
        assert_eq!(Locale::default(), Locale::Ru);
        assert_eq!(Locale::default().strings().nav_login, "Войти");
    }

    #[test]
    fn test_other_toggles() {
        for locale in Locale::ALL {
            assert_ne!(locale.other(), locale);
            assert_eq!(locale.other().other(), locale);
        }
    }

    #[test]
    fn test_status_labels_differ_by_language() {
        for status in OrderStatus::ALL {
            assert_ne!(
                Locale::Ru.order_status(status),
                Locale::En.order_status(status)
            );
        }
    }
}
