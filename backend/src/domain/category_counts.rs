//! Category distribution of in-range providers.

use std::collections::BTreeMap;

use tracing::instrument;

use crate::domain::ports::ProviderRepository;
use crate::domain::{
    CategoryCount, Error, GeoPoint, ProviderFilter, ProximityEngine, RankedProvider, SearchRadius,
};

impl<P> ProximityEngine<P>
where
    P: ProviderRepository,
{
    /// Count available providers within `radius` of `origin` per category.
    ///
    /// Category and text predicates do not apply; every available provider in
    /// range is grouped under its own category label.
    #[instrument(skip_all, fields(origin = %origin, radius_m = radius.meters()))]
    pub async fn count_by_category(
        &self,
        origin: GeoPoint,
        radius: SearchRadius,
    ) -> Result<Vec<CategoryCount>, Error> {
        let ranked = self
            .find_near(origin, radius, &ProviderFilter::available())
            .await?;
        Ok(tally_categories(&ranked))
    }
}

/// Group providers by category, largest bucket first.
///
/// Equal counts are ordered by category name. Categories without providers
/// never appear.
pub fn tally_categories(ranked: &[RankedProvider]) -> Vec<CategoryCount> {
    let mut buckets: BTreeMap<&str, u64> = BTreeMap::new();
    for entry in ranked {
        *buckets.entry(entry.provider.category.as_str()).or_default() += 1;
    }
    let mut counts: Vec<CategoryCount> = buckets
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_owned(),
            count,
        })
        .collect();
    counts.sort_by(|left, right| right.count.cmp(&left.count));
    counts
}
