//! PostgreSQL-backed `ProviderRepository` using Diesel.
//!
//! Candidate queries push the availability, category and text predicates
//! into SQL as `ILIKE` patterns and narrow by bounding box on the indexed
//! coordinate columns. Exact distances are left to the domain.

use async_trait::async_trait;
use diesel::dsl::now;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ProviderRepository, ProviderRepositoryError};
use crate::domain::{
    BoundingBox, GeoPoint, Provider, ProviderFilter, ProviderId, SearchText,
};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, pool_error_message};
use super::models::{ProviderDetailsUpdate, ProviderRow};
use super::pool::{DbPool, PoolError};
use super::schema::providers;

/// Diesel-backed implementation of the [`ProviderRepository`] port.
#[derive(Clone)]
pub struct DieselProviderRepository {
    pool: DbPool,
}

impl DieselProviderRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ProviderRepositoryError {
    ProviderRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> ProviderRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => ProviderRepositoryError::connection(message),
        StoreFailure::ForeignKey(message) | StoreFailure::Query(message) => {
            ProviderRepositoryError::query(message)
        }
    }
}

fn revision_from_db(revision: i32) -> Result<u32, ProviderRepositoryError> {
    u32::try_from(revision)
        .map_err(|_| ProviderRepositoryError::query(format!("negative rating revision {revision}")))
}

fn revision_for_db(revision: u32) -> Result<i32, ProviderRepositoryError> {
    i32::try_from(revision)
        .map_err(|_| ProviderRepositoryError::query(format!("rating revision {revision} overflows")))
}

/// Convert a database row into a domain provider.
fn row_to_provider(row: ProviderRow) -> Result<Provider, ProviderRepositoryError> {
    let location = GeoPoint::from_optional_pair(row.longitude, row.latitude).map_err(|err| {
        ProviderRepositoryError::invalid_position(format!("provider {}: {err}", row.id))
    })?;

    Ok(Provider {
        id: ProviderId::from_uuid(row.id),
        name: row.name,
        mobile: row.mobile,
        profile_image: row.profile_image,
        category: row.category,
        location,
        address: row.address,
        rating: row.rating,
        rating_revision: revision_from_db(row.rating_revision)?,
        price: row.price,
        description: row.description,
        availability: row.availability,
    })
}

fn rows_to_providers(rows: Vec<ProviderRow>) -> Result<Vec<Provider>, ProviderRepositoryError> {
    rows.into_iter().map(row_to_provider).collect()
}

/// Substring pattern for `ILIKE`, with the wildcard characters escaped.
fn contains_pattern(text: &SearchText) -> String {
    let mut pattern = String::with_capacity(text.as_str().len() + 2);
    pattern.push('%');
    for ch in text.as_str().chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn filtered<'a>(filter: &ProviderFilter) -> providers::BoxedQuery<'a, Pg> {
    let mut query = providers::table
        .filter(providers::availability.eq(true))
        .into_boxed();

    if let Some(category) = &filter.category {
        query = query.filter(providers::category.ilike(contains_pattern(category)));
    }
    if let Some(text) = &filter.text {
        let pattern = contains_pattern(text);
        query = query.filter(
            providers::name
                .ilike(pattern.clone())
                .or(providers::category.ilike(pattern.clone()))
                .or(providers::address.ilike(pattern)),
        );
    }

    query.order((providers::created_at.asc(), providers::id.asc()))
}

#[async_trait]
impl ProviderRepository for DieselProviderRepository {
    async fn find_by_id(
        &self,
        id: &ProviderId,
    ) -> Result<Option<Provider>, ProviderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ProviderRow> = providers::table
            .find(*id.as_uuid())
            .select(ProviderRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_provider).transpose()
    }

    async fn list_matching(
        &self,
        filter: &ProviderFilter,
    ) -> Result<Vec<Provider>, ProviderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ProviderRow> = filtered(filter)
            .select(ProviderRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_providers(rows)
    }

    async fn find_in_bounds(
        &self,
        bounds: &BoundingBox,
        filter: &ProviderFilter,
    ) -> Result<Vec<Provider>, ProviderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = filtered(filter).filter(
            providers::latitude.between(bounds.min_latitude(), bounds.max_latitude()),
        );
        query = if bounds.wraps_antimeridian() {
            query.filter(
                providers::longitude
                    .ge(bounds.min_longitude())
                    .or(providers::longitude.le(bounds.max_longitude())),
            )
        } else {
            query.filter(
                providers::longitude.between(bounds.min_longitude(), bounds.max_longitude()),
            )
        };

        let rows: Vec<ProviderRow> = query
            .select(ProviderRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_providers(rows)
    }

    async fn save_details(&self, provider: &Provider) -> Result<(), ProviderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = ProviderDetailsUpdate {
            name: &provider.name,
            mobile: &provider.mobile,
            profile_image: &provider.profile_image,
            category: &provider.category,
            longitude: provider.location.map(|point| point.longitude()),
            latitude: provider.location.map(|point| point.latitude()),
            address: &provider.address,
            price: provider.price,
            description: &provider.description,
            availability: provider.availability,
        };

        let updated = diesel::update(providers::table.find(*provider.id.as_uuid()))
            .set((&changes, providers::updated_at.eq(now)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if updated == 0 {
            return Err(ProviderRepositoryError::not_found(provider.id.to_string()));
        }
        Ok(())
    }

    async fn save_rating(
        &self,
        id: &ProviderId,
        rating: f64,
        expected_revision: u32,
    ) -> Result<u32, ProviderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let expected = revision_for_db(expected_revision)?;

        let written: Option<i32> = diesel::update(
            providers::table
                .find(*id.as_uuid())
                .filter(providers::rating_revision.eq(expected)),
        )
        .set((
            providers::rating.eq(rating),
            providers::rating_revision.eq(providers::rating_revision + 1),
            providers::updated_at.eq(now),
        ))
        .returning(providers::rating_revision)
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        if let Some(revision) = written {
            return revision_from_db(revision);
        }

        let current: Option<i32> = providers::table
            .find(*id.as_uuid())
            .select(providers::rating_revision)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        match current {
            Some(actual) => Err(ProviderRepositoryError::revision_mismatch(
                expected_revision,
                revision_from_db(actual)?,
            )),
            None => Err(ProviderRepositoryError::not_found(id.to_string())),
        }
    }
}
