//! Transport-ready shapes returned by the driving ports.

use serde::{Deserialize, Serialize};

use super::{GeoPoint, Provider, ProviderId, round_for_display};

/// Display fields of a provider.
///
/// `rating` is rounded to one decimal place; the stored aggregate keeps full
/// precision. `distance_meters` is only present on proximity results.
///
/// # Examples
/// ```
/// use marketplace::domain::{Provider, ProviderId, ProviderView};
///
/// let mut provider = Provider::new(ProviderId::random());
/// provider.rating = 13.0 / 3.0;
/// let view = ProviderView::from_provider(&provider);
/// assert_eq!(view.rating, 4.3);
/// assert!(view.distance_meters.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderView {
    pub id: ProviderId,
    pub name: String,
    pub profile_image: String,
    pub mobile: String,
    pub category: String,
    pub location: Option<GeoPoint>,
    pub address: String,
    pub rating: f64,
    pub price: f64,
    pub description: String,
    pub availability: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
}

impl ProviderView {
    /// Shape a provider without distance information.
    pub fn from_provider(provider: &Provider) -> Self {
        Self {
            id: provider.id,
            name: provider.name.clone(),
            profile_image: provider.profile_image.clone(),
            mobile: provider.mobile.clone(),
            category: provider.category.clone(),
            location: provider.location,
            address: provider.address.clone(),
            rating: round_for_display(provider.rating),
            price: provider.price,
            description: provider.description.clone(),
            availability: provider.availability,
            distance_meters: None,
        }
    }

    /// Attach the distance from the query origin.
    #[must_use]
    pub fn with_distance(mut self, distance_meters: f64) -> Self {
        self.distance_meters = Some(distance_meters);
        self
    }
}

/// Number of in-range available providers sharing a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

/// Outcome of a rating submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSubmitted {
    pub provider_id: ProviderId,
    /// Recomputed mean, rounded to one decimal place.
    pub average_rating: f64,
    pub review_count: u64,
}
