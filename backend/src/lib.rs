//! Proximity matching and rating aggregation for a local services
//! marketplace.
//!
//! - [`domain`]: value objects, services and the ports they depend on.
//! - [`outbound`]: in-memory and PostgreSQL implementations of the driven
//!   ports.
//! - [`app`]: settings, tracing and the builder that hands a transport layer
//!   its driving ports.

pub mod app;
pub mod domain;
pub mod outbound;
