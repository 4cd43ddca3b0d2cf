//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories translate between Diesel rows and domain types and map
//! database failures onto the port error enums; no matching logic lives
//! here. Row structs and the schema stay private to this module.
//!
//! # Example
//!
//! ```no_run
//! use marketplace::outbound::persistence::{DbPool, DieselProviderRepository, PoolConfig};
//!
//! # async fn connect() -> Result<(), marketplace::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/marketplace")).await?;
//! let providers = DieselProviderRepository::new(pool);
//! # let _ = providers;
//! # Ok(())
//! # }
//! ```

mod diesel_error_mapping;
mod diesel_provider_repository;
mod diesel_requester_repository;
mod diesel_review_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_provider_repository::DieselProviderRepository;
pub use diesel_requester_repository::DieselRequesterRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
