//! Proximity query engine.
//!
//! The store answers bounding-box candidate queries; this engine applies the
//! exact great-circle radius, then orders by ascending distance. Sorting is
//! stable, so equidistant providers keep the store's order.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::ports::ProviderRepository;
use crate::domain::store_error_mapping::map_provider_error;
use crate::domain::{BoundingBox, Error, GeoPoint, Provider, ProviderFilter, SearchRadius};

/// A provider paired with its distance from the query origin.
///
/// `distance_meters` is `None` for text-only fallback results.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedProvider {
    pub provider: Provider,
    pub distance_meters: Option<f64>,
}

/// Proximity queries over a [`ProviderRepository`].
#[derive(Clone)]
pub struct ProximityEngine<P> {
    providers: Arc<P>,
}

impl<P> ProximityEngine<P> {
    /// Create an engine reading candidates from `providers`.
    pub fn new(providers: Arc<P>) -> Self {
        Self { providers }
    }
}

impl<P> ProximityEngine<P>
where
    P: ProviderRepository,
{
    /// Available providers within `radius` of `origin` satisfying `filter`,
    /// nearest first.
    #[instrument(skip_all, fields(origin = %origin, radius_m = radius.meters()))]
    pub async fn find_near(
        &self,
        origin: GeoPoint,
        radius: SearchRadius,
        filter: &ProviderFilter,
    ) -> Result<Vec<RankedProvider>, Error> {
        let bounds = BoundingBox::around(origin, radius);
        let candidates = self
            .providers
            .find_in_bounds(&bounds, filter)
            .await
            .map_err(map_provider_error)?;
        let candidate_count = candidates.len();
        let ranked = rank_by_distance(origin, radius, filter, candidates);
        debug!(candidate_count, matched = ranked.len(), "proximity query resolved");
        Ok(ranked)
    }

    /// Proximity search with the text-only degraded mode.
    ///
    /// With an origin this is [`Self::find_near`]. Without one, a filter
    /// carrying text returns every text match unordered; a filter without
    /// text fails with `location_required`.
    pub async fn search(
        &self,
        origin: Option<GeoPoint>,
        radius: SearchRadius,
        filter: &ProviderFilter,
    ) -> Result<Vec<RankedProvider>, Error> {
        match origin {
            Some(origin) => self.find_near(origin, radius, filter).await,
            None if filter.text.is_some() => {
                debug!("no origin on file; falling back to text-only search");
                self.list_matching(filter).await
            }
            None => Err(Error::location_required(
                "a stored location is required for a proximity query",
            )),
        }
    }

    /// Every provider satisfying `filter`, without distance information.
    pub async fn list_matching(&self, filter: &ProviderFilter) -> Result<Vec<RankedProvider>, Error> {
        let providers = self
            .providers
            .list_matching(filter)
            .await
            .map_err(map_provider_error)?;
        Ok(providers
            .into_iter()
            .filter(|provider| filter.matches(provider))
            .map(|provider| RankedProvider {
                provider,
                distance_meters: None,
            })
            .collect())
    }
}

fn rank_by_distance(
    origin: GeoPoint,
    radius: SearchRadius,
    filter: &ProviderFilter,
    candidates: Vec<Provider>,
) -> Vec<RankedProvider> {
    let mut in_range: Vec<(f64, Provider)> = candidates
        .into_iter()
        .filter(|provider| filter.matches(provider))
        .filter_map(|provider| {
            let location = provider.location?;
            let distance = origin.distance_meters(&location);
            radius.contains(distance).then_some((distance, provider))
        })
        .collect();
    in_range.sort_by(|(left, _), (right, _)| left.total_cmp(right));
    in_range
        .into_iter()
        .map(|(distance, provider)| RankedProvider {
            provider,
            distance_meters: Some(distance),
        })
        .collect()
}

#[cfg(test)]
#[path = "proximity_tests.rs"]
mod tests;
