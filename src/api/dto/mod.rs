//! Response DTOs for the HTTP surface.

pub mod analytics;
pub mod health;
