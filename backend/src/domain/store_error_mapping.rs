//! Translation of driven-port failures into domain errors.
//!
//! Connection and query failures both surface as `store_unavailable`; no
//! mapping here turns a failure into an empty result.

use serde_json::json;

use crate::domain::Error;
use crate::domain::ports::{
    ProviderRepositoryError, RequesterRepositoryError, ReviewRepositoryError,
};

pub(crate) fn map_provider_error(error: ProviderRepositoryError) -> Error {
    match error {
        ProviderRepositoryError::Connection { message } => {
            Error::store_unavailable(format!("provider store unavailable: {message}"))
        }
        ProviderRepositoryError::Query { message } => {
            Error::store_unavailable(format!("provider store query failed: {message}"))
        }
        ProviderRepositoryError::InvalidPosition { message } => {
            Error::invalid_location(format!("stored provider position is invalid: {message}"))
        }
        ProviderRepositoryError::NotFound { id } => {
            Error::provider_not_found(format!("provider {id} not found"))
                .with_details(json!({ "providerId": id }))
        }
        ProviderRepositoryError::RevisionMismatch { expected, actual } => {
            Error::conflict("rating revision mismatch").with_details(json!({
                "expectedRevision": expected,
                "actualRevision": actual,
            }))
        }
    }
}

pub(crate) fn map_requester_error(error: RequesterRepositoryError) -> Error {
    match error {
        RequesterRepositoryError::Connection { message } => {
            Error::store_unavailable(format!("requester store unavailable: {message}"))
        }
        RequesterRepositoryError::Query { message } => {
            Error::store_unavailable(format!("requester store query failed: {message}"))
        }
        RequesterRepositoryError::InvalidPosition { message } => {
            Error::invalid_location(format!("stored requester position is invalid: {message}"))
        }
        RequesterRepositoryError::NotFound { id } => {
            Error::requester_not_found(format!("requester {id} not found"))
                .with_details(json!({ "requesterId": id }))
        }
    }
}

pub(crate) fn map_review_error(error: ReviewRepositoryError) -> Error {
    match error {
        ReviewRepositoryError::Connection { message } => {
            Error::store_unavailable(format!("review store unavailable: {message}"))
        }
        ReviewRepositoryError::Query { message } => {
            Error::store_unavailable(format!("review store query failed: {message}"))
        }
        ReviewRepositoryError::MissingParty { message } => {
            Error::invalid_request(format!("review references an unknown party: {message}"))
        }
    }
}
