//! Wiring of domain services to storage adapters.
//!
//! The transport layer receives a [`MarketplacePorts`] bundle of driving
//! ports and never sees the adapters behind it.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::info;

use crate::domain::ports::{
    LocationCommand, ProviderDiscoveryQuery, ProviderProfileCommand, ProviderRatingCommand,
    ProviderRepository, RequesterRepository, ReviewRepository,
};
use crate::domain::{
    GeoValidationError, LocationService, MatchingService, ProfileService, RatingService,
};
use crate::outbound::memory::InMemoryMarketplaceStore;
use crate::outbound::persistence::{
    DbPool, DieselProviderRepository, DieselRequesterRepository, DieselReviewRepository,
    MigrationError, PoolError, run_pending_migrations,
};

use super::MarketplaceSettings;

/// Failures while assembling the service bundle.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A setting holds an unusable value.
    #[error("invalid setting {name}: {source}")]
    InvalidSetting {
        /// Setting name.
        name: &'static str,
        /// Validation failure.
        #[source]
        source: GeoValidationError,
    },
    /// The connection pool could not be created.
    #[error(transparent)]
    Pool(#[from] PoolError),
    /// Migrations failed to apply.
    #[error(transparent)]
    Migration(#[from] MigrationError),
}

/// Driving ports handed to the transport layer.
#[derive(Clone)]
pub struct MarketplacePorts {
    /// Provider listing, search and category queries.
    pub discovery: Arc<dyn ProviderDiscoveryQuery>,
    /// Rating submission.
    pub ratings: Arc<dyn ProviderRatingCommand>,
    /// Requester and provider position updates.
    pub locations: Arc<dyn LocationCommand>,
    /// Provider profile reads and edits.
    pub profiles: Arc<dyn ProviderProfileCommand>,
}

fn wire<P, Q, R>(
    providers: Arc<P>,
    requesters: Arc<Q>,
    reviews: Arc<R>,
    settings: &MarketplaceSettings,
    clock: Arc<dyn Clock>,
) -> Result<MarketplacePorts, BuildError>
where
    P: ProviderRepository + 'static,
    Q: RequesterRepository + 'static,
    R: ReviewRepository + 'static,
{
    let default_radius = settings
        .default_radius()
        .map_err(|source| BuildError::InvalidSetting {
            name: "default_radius_km",
            source,
        })?;

    let discovery = MatchingService::new(Arc::clone(&providers), Arc::clone(&requesters))
        .with_default_radius(default_radius);
    let ratings = RatingService::new(
        Arc::clone(&providers),
        Arc::clone(&requesters),
        reviews,
        clock,
    )
    .with_max_attempts(settings.rating_max_attempts());
    let locations = LocationService::new(Arc::clone(&providers), requesters);
    let profiles = ProfileService::new(providers);

    Ok(MarketplacePorts {
        discovery: Arc::new(discovery),
        ratings: Arc::new(ratings),
        locations: Arc::new(locations),
        profiles: Arc::new(profiles),
    })
}

/// Build the ports over an existing in-memory store.
///
/// # Errors
///
/// Returns [`BuildError::InvalidSetting`] for an unusable default radius.
pub fn ports_for_store(
    store: Arc<InMemoryMarketplaceStore>,
    settings: &MarketplaceSettings,
) -> Result<MarketplacePorts, BuildError> {
    wire(
        Arc::clone(&store),
        Arc::clone(&store),
        store,
        settings,
        Arc::new(DefaultClock),
    )
}

/// Build the ports selected by `settings`.
///
/// With a database URL the Diesel adapters are used, after applying pending
/// migrations unless `run_migrations` is `false`. Without one, every port shares a
/// fresh in-memory store.
///
/// # Errors
///
/// Returns [`BuildError`] when a setting is invalid, migrations fail or the
/// pool cannot be built.
pub async fn build_ports(settings: &MarketplaceSettings) -> Result<MarketplacePorts, BuildError> {
    let Some(config) = settings.pool_config() else {
        info!("no database configured, using the in-memory store");
        return ports_for_store(Arc::new(InMemoryMarketplaceStore::new()), settings);
    };

    if settings.run_migrations() {
        run_pending_migrations(config.database_url()).await?;
    }
    let pool = DbPool::new(config).await?;
    info!("database pool ready");

    wire(
        Arc::new(DieselProviderRepository::new(pool.clone())),
        Arc::new(DieselRequesterRepository::new(pool.clone())),
        Arc::new(DieselReviewRepository::new(pool)),
        settings,
        Arc::new(DefaultClock),
    )
}
