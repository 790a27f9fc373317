pub mod components;
pub mod layout;
pub mod pages;

pub use layout::{CurrentPage, base};
pub use pages::{
    OverviewEntry, about_page, detail_page, error_page, help_page, overview_page,
};
