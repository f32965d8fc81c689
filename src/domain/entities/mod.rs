//! Core business entities.

mod link;
mod visit;

pub use link::ShortLink;
pub use visit::{BrowserInfo, DeviceInfo, GeoInfo, NewVisit, OsInfo, Visit};
