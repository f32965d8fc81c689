//! Service orchestration.

mod resolver;

pub use resolver::Resolver;
