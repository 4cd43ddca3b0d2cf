//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{providers, requesters, reviews};

/// Row struct for reading from the providers table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = providers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProviderRow {
    pub id: Uuid,
    pub name: String,
    pub mobile: String,
    pub profile_image: String,
    pub category: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub address: String,
    pub rating: f64,
    pub rating_revision: i32,
    pub price: f64,
    pub description: String,
    pub availability: bool,
}

/// Changeset for provider display fields and location.
///
/// Rating columns are absent; only the revision-checked rating write touches
/// them. An unlocated provider writes NULL for both coordinates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = providers)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ProviderDetailsUpdate<'a> {
    pub name: &'a str,
    pub mobile: &'a str,
    pub profile_image: &'a str,
    pub category: &'a str,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub address: &'a str,
    pub price: f64,
    pub description: &'a str,
    pub availability: bool,
}

/// Row struct for reading from the requesters table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = requesters)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RequesterRow {
    pub id: Uuid,
    pub name: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

/// Insertable struct for review upserts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow {
    pub provider_id: Uuid,
    pub requester_id: Uuid,
    pub rating: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
