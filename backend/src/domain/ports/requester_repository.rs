//! Port for requester position storage.

use async_trait::async_trait;

use crate::domain::{GeoPoint, Requester, RequesterId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by requester repository adapters.
    pub enum RequesterRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "requester repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "requester repository query failed: {message}",
        /// A stored position is malformed or out of range.
        InvalidPosition { message: String } =>
            "stored requester position is invalid: {message}",
        /// The requester addressed by a write does not exist.
        NotFound { id: String } =>
            "requester {id} not found",
    }
}

/// Port for reading and updating a requester's stored position.
///
/// Requesters are created by the identity collaborator; this port never
/// inserts them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequesterRepository: Send + Sync {
    /// Fetch a requester, including their last saved position.
    async fn find_by_id(
        &self,
        id: &RequesterId,
    ) -> Result<Option<Requester>, RequesterRepositoryError>;

    /// Replace the requester's position.
    ///
    /// Fails with [`RequesterRepositoryError::NotFound`] for unknown ids.
    async fn save_position(
        &self,
        id: &RequesterId,
        position: GeoPoint,
    ) -> Result<(), RequesterRepositoryError>;
}
