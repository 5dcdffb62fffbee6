//! Library catalog service.
//!
//! Book lookup, availability checks and updates, and search, served over
//! role-gated HTTP endpoints.

pub mod bootstrap;
pub mod modules;

pub use bootstrap::{build_registry, run};
pub use modules::books;
