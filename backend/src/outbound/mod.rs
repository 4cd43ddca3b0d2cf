//! Outbound adapters implementing the driven ports.
//!
//! - **memory**: a mutex-guarded store for tests and database-less runs
//! - **persistence**: PostgreSQL repositories using Diesel
//!
//! Adapters translate between domain types and storage representations and
//! contain no matching or rating logic.

pub mod memory;
pub mod persistence;
