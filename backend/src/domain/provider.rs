//! Service provider entity and identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::GeoPoint;

/// Validation errors raised by provider constructors and updates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderValidationError {
    #[error("provider id must be a valid UUID")]
    InvalidId,
    #[error("price must be a finite, non-negative amount (got {value})")]
    InvalidPrice { value: f64 },
    #[error("address must not be blank")]
    BlankAddress,
}

/// Stable provider identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProviderId(Uuid);

impl ProviderId {
    /// Validate and construct a [`ProviderId`] from its string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ProviderValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(ProviderValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| ProviderValidationError::InvalidId)
    }

    /// Wrap an already-parsed UUID, e.g. one read from storage.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`ProviderId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<ProviderId> for String {
    fn from(value: ProviderId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for ProviderId {
    type Error = ProviderValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A provider offering a service at a location.
///
/// ## Invariants
/// - `location` is `None` until the provider explicitly sets a position; no
///   sentinel coordinate stands in for "unset".
/// - `rating` is derived from the provider's reviews and only changes through
///   the rating aggregator. `rating_revision` increments on every aggregate
///   write and guards those writes against concurrent recomputes.
#[derive(Debug, Clone, PartialEq)]
pub struct Provider {
    pub id: ProviderId,
    pub name: String,
    pub mobile: String,
    pub profile_image: String,
    pub category: String,
    pub location: Option<GeoPoint>,
    pub address: String,
    pub rating: f64,
    pub rating_revision: u32,
    pub price: f64,
    pub description: String,
    pub availability: bool,
}

impl Provider {
    /// A freshly registered provider: no position, no reviews, available.
    pub fn new(id: ProviderId) -> Self {
        Self {
            id,
            name: String::new(),
            mobile: String::new(),
            profile_image: String::new(),
            category: String::new(),
            location: None,
            address: String::new(),
            rating: 0.0,
            rating_revision: 0,
            price: 0.0,
            description: String::new(),
            availability: true,
        }
    }
}

/// Partial profile update; only supplied, non-blank fields are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderProfileUpdate {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
}

impl ProviderProfileUpdate {
    /// Check the update before any field is applied.
    pub fn validate(&self) -> Result<(), ProviderValidationError> {
        match self.price {
            Some(value) if !value.is_finite() || value < 0.0 => {
                Err(ProviderValidationError::InvalidPrice { value })
            }
            _ => Ok(()),
        }
    }

    /// Apply the supplied fields to `provider`.
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::{Provider, ProviderId, ProviderProfileUpdate};
    ///
    /// let mut provider = Provider::new(ProviderId::random());
    /// provider.name = "Ada".to_owned();
    /// let update = ProviderProfileUpdate {
    ///     name: Some("  ".to_owned()),
    ///     category: Some("tutor".to_owned()),
    ///     ..ProviderProfileUpdate::default()
    /// };
    /// update.apply_to(&mut provider);
    /// assert_eq!(provider.name, "Ada");
    /// assert_eq!(provider.category, "tutor");
    /// ```
    pub fn apply_to(&self, provider: &mut Provider) {
        assign_if_present(&mut provider.name, self.name.as_deref());
        assign_if_present(&mut provider.mobile, self.mobile.as_deref());
        assign_if_present(&mut provider.category, self.category.as_deref());
        assign_if_present(&mut provider.description, self.description.as_deref());
        if let Some(price) = self.price {
            provider.price = price;
        }
    }
}

fn assign_if_present(target: &mut String, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) {
        value.clone_into(target);
    }
}
