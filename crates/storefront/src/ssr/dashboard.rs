//! Customer dashboard pages, rendered per request with the session user's
//! rows. Never prerendered.

use askama::Template;
use axum::http::StatusCode;

use autoparts_core::{OrderId, Part};

use super::head::{HeadCollector, NOINDEX};
use super::pages::Frame;
use super::{RenderContext, RenderError, RenderedPage};
use crate::filters;
use crate::i18n::Strings;
use crate::models::{Order, User};

const DATE_FORMAT: &str = "%d.%m.%Y";

/// One row of the order list.
#[derive(Debug, Clone)]
pub struct OrderSummary {
    pub id: OrderId,
    pub href: String,
    pub date: String,
    pub vehicle: String,
    pub status: &'static str,
    pub items: u32,
}

#[derive(Template)]
#[template(path = "pages/dashboard.html")]
struct DashboardPage {
    frame: Frame,
    t: &'static Strings,
    greeting: String,
    orders: Vec<OrderSummary>,
}

#[derive(Template)]
#[template(path = "pages/order_detail.html")]
struct OrderDetailPage<'a> {
    frame: Frame,
    t: &'static Strings,
    order: &'a Order,
    parts: &'a [Part],
    date: String,
    status: &'static str,
    vehicle_type: &'static str,
}

#[derive(Template)]
#[template(path = "pages/profile.html")]
struct ProfilePage<'a> {
    frame: Frame,
    t: &'static Strings,
    user: &'a User,
    email: &'a str,
}

fn finish(head: &HeadCollector, html: String) -> Result<RenderedPage, RenderError> {
    Ok(RenderedPage {
        html,
        head: head.render()?,
        redirect: None,
        status: StatusCode::OK,
    })
}

fn private_head(ctx: &RenderContext<'_>, title: &str) -> HeadCollector {
    let mut head = HeadCollector::new(ctx.base_url, ctx.locale);
    head.title(title).robots(NOINDEX);
    head
}

/// `/dashboard`: the user's orders, newest first.
///
/// # Errors
///
/// Returns error if the template fails to render.
pub fn render_orders(
    ctx: &RenderContext<'_>,
    user: &User,
    orders: &[Order],
) -> Result<RenderedPage, RenderError> {
    let frame = Frame::new(ctx.locale, "/dashboard", true);
    let t = frame.t;
    let orders = orders
        .iter()
        .map(|order| OrderSummary {
            id: order.id,
            href: format!("/dashboard/orders/{}", order.id),
            date: order.created_at.format(DATE_FORMAT).to_string(),
            vehicle: order.vehicle.summary(),
            status: ctx.locale.order_status(order.status),
            items: order.total_quantity(),
        })
        .collect();

    let html = DashboardPage {
        greeting: user.full_name.clone(),
        frame,
        t,
        orders,
    }
    .render()?;
    finish(&private_head(ctx, t.dashboard_title), html)
}

/// `/dashboard/orders/{id}` for an order the caller owns.
///
/// # Errors
///
/// Returns error if the template fails to render.
pub fn render_order_detail(
    ctx: &RenderContext<'_>,
    order: &Order,
) -> Result<RenderedPage, RenderError> {
    let frame = Frame::new(ctx.locale, &format!("/dashboard/orders/{}", order.id), true);
    let t = frame.t;
    let title = format!("{}{}", t.order_number, order.id);

    let html = OrderDetailPage {
        frame,
        t,
        order,
        parts: &order.parts,
        date: order.created_at.format(DATE_FORMAT).to_string(),
        status: ctx.locale.order_status(order.status),
        vehicle_type: ctx.locale.vehicle_type(order.vehicle.vehicle_type),
    }
    .render()?;
    finish(&private_head(ctx, &title), html)
}

/// `/dashboard/profile`: profile form prefilled from the row.
///
/// # Errors
///
/// Returns error if the template fails to render.
pub fn render_profile(ctx: &RenderContext<'_>, user: &User) -> Result<RenderedPage, RenderError> {
    let frame = Frame::new(ctx.locale, "/dashboard/profile", true);
    let t = frame.t;

    let html = ProfilePage {
        frame,
        t,
        user,
        email: user.email.as_ref().map_or("", |e| e.as_str()),
    }
    .render()?;
    finish(&private_head(ctx, t.profile_title), html)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use autoparts_core::{
        ContactInfo, Email, OrderStatus, UserId, Vehicle, VehicleType,
    };

    use super::*;
    use crate::i18n::Locale;

    fn ctx() -> RenderContext<'static> {
        RenderContext {
            locale: Locale::Ru,
            base_url: "http://localhost:5000",
            signed_in: true,
        }
    }

    fn user() -> User {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        User {
            id: UserId::new(7),
            email: Some(Email::parse("ivan@example.ru").unwrap()),
            full_name: "Иван <Петров>".to_string(),
            phone: Some("9161234567".to_string()),
            country_code: Some("+7".to_string()),
            city: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn order() -> Order {
        let at = Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap();
        Order {
            id: OrderId::new(42),
            user_id: Some(UserId::new(7)),
            vehicle: Vehicle {
                vehicle_type: VehicleType::Chinese,
                vin: None,
                make: Some("Haval".to_string()),
                model: Some("Jolion".to_string()),
                year: Some(2023),
                engine: None,
                fuel: None,
            },
            parts: vec![Part {
                name: "Фильтр салона".to_string(),
                quantity: 2,
                sku: None,
                brand: None,
                description: None,
            }],
            contact_info: ContactInfo {
                name: "Иван".to_string(),
                phone: "9161234567".to_string(),
                country_code: "+7".to_string(),
                email: None,
                city: None,
                comments: None,
            },
            status: OrderStatus::Processing,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_order_list() {
        let page = render_orders(&ctx(), &user(), &[order()]).unwrap();

        assert!(page.head.contains(NOINDEX));
        assert!(page.html.contains("/dashboard/orders/42"));
        assert!(page.html.contains("02.03.2026"));
        assert!(page.html.contains("Haval Jolion 2023"));
        assert!(page.html.contains("В работе"));
        assert!(page.html.contains("Иван &#60;Петров&#62;"));
    }

    #[test]
    fn test_empty_order_list() {
        let page = render_orders(&ctx(), &user(), &[]).unwrap();
        assert!(page.html.contains(Locale::Ru.strings().no_orders));
    }

    #[test]
    fn test_order_detail() {
        let page = render_order_detail(&ctx(), &order()).unwrap();
        assert!(page.html.contains("Фильтр салона"));
        assert!(page.html.contains("Китайские"));
        assert!(page.head.contains("Заказ №42"));
    }

    #[test]
    fn test_profile_prefilled() {
        let page = render_profile(&ctx(), &user()).unwrap();
        assert!(page.html.contains(r#"value="9161234567""#));
        assert!(page.html.contains("ivan@example.ru"));
        assert!(page.html.contains(r#"data-api="/api/user/profile""#));
    }
}
