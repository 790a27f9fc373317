use maud::{Markup, html};

use crate::templates::layout::CurrentPage;

pub fn navbar(current_page: CurrentPage) -> Markup {
    html! {
        nav class="navbar mb-4" role="navigation" aria-label="main navigation" {
            div class="navbar-menu is-active" {
                div class="navbar-start" {
                    a href="/" class=(nav_item_class(current_page, CurrentPage::Overview)) { "Overview" }
                    a href="/about" class=(nav_item_class(current_page, CurrentPage::About)) { "About" }
                    a href="/help" class=(nav_item_class(current_page, CurrentPage::Help)) { "Help" }
                }
            }
        }
    }
}

fn nav_item_class(current: CurrentPage, page: CurrentPage) -> &'static str {
    if current == page {
        "navbar-item is-active"
    } else {
        "navbar-item"
    }
}

/// `26.85 °C`, or a dash when the upstream document had no temperature.
pub fn temperature(value: &str) -> String {
    if value.is_empty() { "-".to_string() } else { format!("{value} °C") }
}

pub fn percent(value: &str) -> String {
    if value.is_empty() { "-".to_string() } else { format!("{value}%") }
}

pub fn millimetres(value: f64) -> String {
    format!("{value:.2} mm")
}

pub fn metres_per_second(value: f64) -> String {
    format!("{value:.1} m/s")
}

/// Detail link for a location id, with the id percent-encoded as a query value.
pub fn detail_href(location_id: &str) -> String {
    format!("/detail?location={}", urlencoding::encode(location_id))
}
