//! PostgreSQL-backed `RequesterRepository` using Diesel.

use async_trait::async_trait;
use diesel::dsl::now;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RequesterRepository, RequesterRepositoryError};
use crate::domain::{GeoPoint, Requester, RequesterId};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, pool_error_message};
use super::models::RequesterRow;
use super::pool::{DbPool, PoolError};
use super::schema::requesters;

/// Diesel-backed implementation of the [`RequesterRepository`] port.
#[derive(Clone)]
pub struct DieselRequesterRepository {
    pool: DbPool,
}

impl DieselRequesterRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RequesterRepositoryError {
    RequesterRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> RequesterRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => RequesterRepositoryError::connection(message),
        StoreFailure::ForeignKey(message) | StoreFailure::Query(message) => {
            RequesterRepositoryError::query(message)
        }
    }
}

fn row_to_requester(row: RequesterRow) -> Result<Requester, RequesterRepositoryError> {
    let position = GeoPoint::from_optional_pair(row.longitude, row.latitude).map_err(|err| {
        RequesterRepositoryError::invalid_position(format!("requester {}: {err}", row.id))
    })?;

    let mut requester = Requester::new(RequesterId::from_uuid(row.id), row.name);
    requester.position = position;
    Ok(requester)
}

#[async_trait]
impl RequesterRepository for DieselRequesterRepository {
    async fn find_by_id(
        &self,
        id: &RequesterId,
    ) -> Result<Option<Requester>, RequesterRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<RequesterRow> = requesters::table
            .find(*id.as_uuid())
            .select(RequesterRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_requester).transpose()
    }

    async fn save_position(
        &self,
        id: &RequesterId,
        position: GeoPoint,
    ) -> Result<(), RequesterRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(requesters::table.find(*id.as_uuid()))
            .set((
                requesters::longitude.eq(Some(position.longitude())),
                requesters::latitude.eq(Some(position.latitude())),
                requesters::updated_at.eq(now),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if updated == 0 {
            return Err(RequesterRepositoryError::not_found(id.to_string()));
        }
        Ok(())
    }
}
