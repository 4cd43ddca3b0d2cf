//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports are the use cases the excluded HTTP layer calls; driven
//! ports are the storage capabilities the domain consumes.

mod macros;
pub(crate) use macros::define_port_error;

mod location_command;
mod provider_discovery_query;
mod provider_profile_command;
mod provider_rating_command;
mod provider_repository;
mod requester_repository;
mod review_repository;

pub use location_command::{
    LocationCommand, ProviderLocationUpdated, SetProviderLocationRequest,
    SetRequesterLocationRequest,
};
pub use provider_discovery_query::{
    CategoryCountsRequest, ProviderDiscoveryQuery, ProvidersByCategoryRequest,
    SearchProvidersRequest,
};
pub use provider_profile_command::{ProviderProfileCommand, UpdateProviderProfileRequest};
pub use provider_rating_command::{ProviderRatingCommand, SubmitRatingRequest};
#[cfg(test)]
pub use provider_repository::MockProviderRepository;
pub use provider_repository::{ProviderRepository, ProviderRepositoryError};
#[cfg(test)]
pub use requester_repository::MockRequesterRepository;
pub use requester_repository::{RequesterRepository, RequesterRepositoryError};
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{ReviewRepository, ReviewRepositoryError};
