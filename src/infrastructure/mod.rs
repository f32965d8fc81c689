//! Infrastructure layer: cache and persistence backends.

pub mod cache;
pub mod persistence;
