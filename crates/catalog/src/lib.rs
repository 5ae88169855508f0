//! Catalog domain module.
//!
//! Product records as delivered by the storefront API, and the category
//! vocabulary they are grouped by. Pure data + rules (no IO, no HTTP, no storage).

pub mod category;
pub mod product;

pub use category::Category;
pub use product::Product;
