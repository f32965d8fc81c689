//! HTTP request handlers.

mod analytics;
mod health;
mod redirect;

pub use analytics::analytics_handler;
pub use health::health_handler;
pub use redirect::redirect_handler;
