//! Shared UI crate for Benchview: query adapters, the aggregation core, chart
//! views and the Dioxus components both launchers render.

pub mod charts;
pub mod core;
pub mod dashboard;
pub mod i18n;
pub mod query;
pub mod views;

pub mod components {
    // Localized application navbar (components/app_navbar.rs)
    pub mod app_navbar;
    pub use app_navbar::register_nav;
    pub use app_navbar::AppNavbar;
    pub use app_navbar::NavBuilder;
}
