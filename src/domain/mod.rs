//! Domain layer - Pure catalog abstractions
//!
//! This layer contains NO framework dependencies (no SeaORM, no Axum).
//! Only entity types, repository traits and domain error types.

pub mod errors;
pub mod repositories;

pub use errors::DomainError;
pub use repositories::*;
