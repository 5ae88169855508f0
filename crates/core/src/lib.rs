//! `ecobazaar-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the catalog, sales
//! and eco-impact crates (no infrastructure concerns).

pub mod carbon;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use carbon::CarbonImpact;
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{OrderId, ProductId, UserId};
pub use value_object::ValueObject;
