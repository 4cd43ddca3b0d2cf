//! Domain primitives, services and ports.
//!
//! Purpose: model providers, requesters and reviews as validated types, and
//! implement proximity matching and rating aggregation against the driven
//! ports in [`ports`]. Types document their invariants and serialisation
//! contracts (serde) in their Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode — transport-agnostic failure payload.
//! - GeoPoint, SearchRadius, BoundingBox — geographic value objects.
//! - Provider, Requester, Review, RatingValue — entities and values.
//! - ProximityEngine — bounding-box candidates, exact radius, distance order.
//! - MatchingService, RatingService, LocationService, ProfileService — the
//!   driving port implementations.

pub mod error;
pub mod ports;

mod category_counts;
mod geo;
mod location_service;
mod matching_service;
mod profile_service;
mod provider;
mod proximity;
mod rating_service;
mod requester;
mod review;
mod search;
mod store_error_mapping;
mod views;

pub use self::category_counts::tally_categories;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::geo::{
    BoundingBox, DEFAULT_RADIUS_METERS, EARTH_RADIUS_METERS, GeoPoint, GeoValidationError,
    SearchRadius,
};
pub use self::location_service::LocationService;
pub use self::matching_service::MatchingService;
pub use self::profile_service::ProfileService;
pub use self::provider::{Provider, ProviderId, ProviderProfileUpdate, ProviderValidationError};
pub use self::proximity::{ProximityEngine, RankedProvider};
pub use self::rating_service::{DEFAULT_RATING_MAX_ATTEMPTS, RatingService};
pub use self::requester::{Requester, RequesterId, RequesterValidationError};
pub use self::review::{
    RATING_MAX, RATING_MIN, RatingValidationError, RatingValue, Review, mean_rating,
    round_for_display,
};
pub use self::search::{ProviderFilter, SearchText};
pub use self::views::{CategoryCount, ProviderView, RatingSubmitted};

/// Result alias for domain operations.
///
/// # Examples
/// ```
/// use marketplace::domain::{DomainResult, Error};
///
/// fn lookup() -> DomainResult<()> {
///     Err(Error::provider_not_found("nope"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
