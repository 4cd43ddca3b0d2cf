//! Geographic value objects used by proximity matching.
//!
//! Positions follow GeoJSON ordering: longitude first, then latitude, both in
//! WGS84 decimal degrees. Distances are great-circle (haversine) metres.

use std::f64::consts::PI;
use std::fmt;

use geo::HaversineDistance;
use serde::{Deserialize, Serialize};

/// Mean earth radius in metres, matching the radius used by `geo`'s
/// haversine implementation.
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Default search radius when callers do not supply one (10 km).
pub const DEFAULT_RADIUS_METERS: f64 = 10_000.0;

/// Validation errors raised by geographic constructors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeoValidationError {
    #[error("longitude must be a finite value within [-180, 180] (got {value})")]
    LongitudeOutOfRange { value: f64 },
    #[error("latitude must be a finite value within [-90, 90] (got {value})")]
    LatitudeOutOfRange { value: f64 },
    #[error("coordinate pair must carry both longitude and latitude")]
    IncompletePair,
    #[error("search radius must be a finite positive distance (got {value})")]
    InvalidRadius { value: f64 },
}

/// A validated WGS84 position.
///
/// ## Invariants
/// - `longitude` is finite and within `[-180, 180]`.
/// - `latitude` is finite and within `[-90, 90]`.
///
/// Serialises as a GeoJSON point: `{"type":"Point","coordinates":[lng,lat]}`.
///
/// # Examples
/// ```
/// use marketplace::domain::GeoPoint;
///
/// let point = GeoPoint::new(-0.1276, 51.5072).expect("valid point");
/// assert_eq!(point.coordinates(), [-0.1276, 51.5072]);
/// assert!(GeoPoint::new(0.0, 91.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeoJsonPoint", into = "GeoJsonPoint")]
pub struct GeoPoint {
    longitude: f64,
    latitude: f64,
}

impl GeoPoint {
    /// Validate and construct a point from `(longitude, latitude)`.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, GeoValidationError> {
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoValidationError::LongitudeOutOfRange { value: longitude });
        }
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoValidationError::LatitudeOutOfRange { value: latitude });
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    /// Construct a point from a stored nullable pair.
    ///
    /// Returns `Ok(None)` when both halves are missing and an error when only
    /// one half is present or the values are out of range.
    pub fn from_optional_pair(
        longitude: Option<f64>,
        latitude: Option<f64>,
    ) -> Result<Option<Self>, GeoValidationError> {
        match (longitude, latitude) {
            (Some(lng), Some(lat)) => Self::new(lng, lat).map(Some),
            (None, None) => Ok(None),
            (Some(_), None) | (None, Some(_)) => Err(GeoValidationError::IncompletePair),
        }
    }

    /// Longitude in decimal degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Latitude in decimal degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Coordinates in GeoJSON order: `[longitude, latitude]`.
    pub fn coordinates(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    /// Great-circle distance to `other` in metres.
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::GeoPoint;
    ///
    /// let origin = GeoPoint::new(0.0, 0.0).expect("origin");
    /// let north = GeoPoint::new(0.0, 0.05).expect("north");
    /// let meters = origin.distance_meters(&north);
    /// assert!((meters - 5_559.7).abs() < 1.0);
    /// ```
    pub fn distance_meters(&self, other: &Self) -> f64 {
        let here = geo::Point::new(self.longitude, self.latitude);
        let there = geo::Point::new(other.longitude, other.latitude);
        here.haversine_distance(&there)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.longitude, self.latitude)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeoJsonPoint {
    #[serde(rename = "type")]
    kind: GeoJsonKind,
    coordinates: [f64; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum GeoJsonKind {
    Point,
}

impl From<GeoPoint> for GeoJsonPoint {
    fn from(value: GeoPoint) -> Self {
        Self {
            kind: GeoJsonKind::Point,
            coordinates: value.coordinates(),
        }
    }
}

impl TryFrom<GeoJsonPoint> for GeoPoint {
    type Error = GeoValidationError;

    fn try_from(value: GeoJsonPoint) -> Result<Self, Self::Error> {
        let [longitude, latitude] = value.coordinates;
        Self::new(longitude, latitude)
    }
}

/// Maximum distance for a proximity query, in metres.
///
/// The boundary is inclusive: a provider exactly `meters()` away matches.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SearchRadius(f64);

impl SearchRadius {
    /// Validate a radius expressed in metres.
    pub fn from_meters(meters: f64) -> Result<Self, GeoValidationError> {
        if !meters.is_finite() || meters <= 0.0 {
            return Err(GeoValidationError::InvalidRadius { value: meters });
        }
        Ok(Self(meters))
    }

    /// Validate a radius expressed in kilometres.
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::SearchRadius;
    ///
    /// let radius = SearchRadius::from_km(2.5).expect("valid radius");
    /// assert_eq!(radius.meters(), 2_500.0);
    /// assert!(SearchRadius::from_km(0.0).is_err());
    /// ```
    pub fn from_km(km: f64) -> Result<Self, GeoValidationError> {
        if !km.is_finite() || km <= 0.0 {
            return Err(GeoValidationError::InvalidRadius { value: km });
        }
        Self::from_meters(km * 1_000.0)
    }

    /// Radius in metres.
    pub fn meters(self) -> f64 {
        self.0
    }

    /// Whether a distance in metres falls inside this radius (inclusive).
    pub fn contains(self, distance_meters: f64) -> bool {
        distance_meters <= self.0
    }
}

impl Default for SearchRadius {
    fn default() -> Self {
        Self(DEFAULT_RADIUS_METERS)
    }
}

/// Latitude/longitude box used to pre-filter candidates before exact
/// distance checks.
///
/// When `min_longitude > max_longitude` the box wraps across the
/// antimeridian and covers `[min_longitude, 180] ∪ [-180, max_longitude]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min_longitude: f64,
    min_latitude: f64,
    max_longitude: f64,
    max_latitude: f64,
}

impl BoundingBox {
    /// Smallest box enclosing the spherical cap of `radius` around `center`.
    ///
    /// The box is padded slightly so points sitting exactly on the radius
    /// survive the pre-filter; exact filtering happens afterwards.
    pub fn around(center: GeoPoint, radius: SearchRadius) -> Self {
        let angular = radius.meters() * (1.0 + 1e-9) / EARTH_RADIUS_METERS;
        let lat = center.latitude.to_radians();
        let min_lat = lat - angular;
        let max_lat = lat + angular;

        let half_pi = PI / 2.0;
        if min_lat <= -half_pi || max_lat >= half_pi || angular >= PI {
            return Self {
                min_longitude: -180.0,
                min_latitude: min_lat.max(-half_pi).to_degrees(),
                max_longitude: 180.0,
                max_latitude: max_lat.min(half_pi).to_degrees(),
            };
        }

        let delta_lng = (angular.sin() / lat.cos()).clamp(-1.0, 1.0).asin().to_degrees();
        let mut min_lng = center.longitude - delta_lng;
        let mut max_lng = center.longitude + delta_lng;
        if delta_lng >= 180.0 {
            min_lng = -180.0;
            max_lng = 180.0;
        } else {
            if min_lng < -180.0 {
                min_lng += 360.0;
            }
            if max_lng > 180.0 {
                max_lng -= 360.0;
            }
        }

        Self {
            min_longitude: min_lng,
            min_latitude: min_lat.to_degrees(),
            max_longitude: max_lng,
            max_latitude: max_lat.to_degrees(),
        }
    }

    /// Western edge in degrees.
    pub fn min_longitude(&self) -> f64 {
        self.min_longitude
    }

    /// Southern edge in degrees.
    pub fn min_latitude(&self) -> f64 {
        self.min_latitude
    }

    /// Eastern edge in degrees.
    pub fn max_longitude(&self) -> f64 {
        self.max_longitude
    }

    /// Northern edge in degrees.
    pub fn max_latitude(&self) -> f64 {
        self.max_latitude
    }

    /// Whether the box crosses the antimeridian.
    pub fn wraps_antimeridian(&self) -> bool {
        self.min_longitude > self.max_longitude
    }

    /// Whether `point` lies inside the box (edges inclusive).
    pub fn contains(&self, point: &GeoPoint) -> bool {
        let lat_ok = (self.min_latitude..=self.max_latitude).contains(&point.latitude);
        let lng_ok = if self.wraps_antimeridian() {
            point.longitude >= self.min_longitude || point.longitude <= self.max_longitude
        } else {
            (self.min_longitude..=self.max_longitude).contains(&point.longitude)
        };
        lat_ok && lng_ok
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn point(lng: f64, lat: f64) -> GeoPoint {
        GeoPoint::new(lng, lat).expect("valid point")
    }

    #[rstest]
    #[case(-180.0, -90.0)]
    #[case(180.0, 90.0)]
    #[case(0.0, 0.0)]
    fn accepts_boundary_coordinates(#[case] lng: f64, #[case] lat: f64) {
        assert!(GeoPoint::new(lng, lat).is_ok());
    }

    #[rstest]
    #[case(180.5, 0.0)]
    #[case(f64::NAN, 0.0)]
    #[case(0.0, -90.1)]
    #[case(0.0, f64::INFINITY)]
    fn rejects_out_of_range_coordinates(#[case] lng: f64, #[case] lat: f64) {
        assert!(GeoPoint::new(lng, lat).is_err());
    }

    #[rstest]
    fn partial_pairs_are_rejected() {
        assert_eq!(
            GeoPoint::from_optional_pair(Some(1.0), None),
            Err(GeoValidationError::IncompletePair)
        );
        assert!(GeoPoint::from_optional_pair(None, Some(1.0)).is_err());
        assert_eq!(GeoPoint::from_optional_pair(None, None), Ok(None));
        assert_eq!(
            GeoPoint::from_optional_pair(Some(1.0), Some(2.0)),
            Ok(Some(point(1.0, 2.0)))
        );
    }

    #[rstest]
    fn serialises_as_geojson_point() {
        let value = serde_json::to_value(point(12.5, -3.25)).expect("serialise point");
        assert_eq!(value, json!({ "type": "Point", "coordinates": [12.5, -3.25] }));
    }

    #[rstest]
    fn deserialising_validates_ranges() {
        let result: Result<GeoPoint, _> =
            serde_json::from_value(json!({ "type": "Point", "coordinates": [200.0, 0.0] }));
        assert!(result.is_err());
    }

    #[rstest]
    fn five_hundredths_of_a_degree_is_about_five_and_a_half_km() {
        let meters = point(0.0, 0.0).distance_meters(&point(0.0, 0.05));
        assert!((meters - 5_559.75).abs() < 1.0, "got {meters}");
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f64::NAN)]
    fn radius_must_be_positive(#[case] km: f64) {
        assert!(SearchRadius::from_km(km).is_err());
    }

    #[rstest]
    fn default_radius_is_ten_km() {
        assert_eq!(SearchRadius::default().meters(), 10_000.0);
    }

    #[rstest]
    fn radius_boundary_is_inclusive() {
        let radius = SearchRadius::from_meters(250.0).expect("radius");
        assert!(radius.contains(250.0));
        assert!(!radius.contains(250.000_001));
    }

    #[rstest]
    fn bounding_box_contains_points_on_the_radius() {
        let origin = point(-3.19, 55.95);
        let radius = SearchRadius::from_km(10.0).expect("radius");
        let bounds = BoundingBox::around(origin, radius);

        let north = point(-3.19, 55.95 + (10_000.0 / EARTH_RADIUS_METERS).to_degrees());
        assert!(bounds.contains(&north));
        assert!(!bounds.contains(&point(-3.19, 56.2)));
        assert!(!bounds.wraps_antimeridian());
    }

    #[rstest]
    fn bounding_box_wraps_across_the_antimeridian() {
        let origin = point(179.99, 0.0);
        let bounds = BoundingBox::around(origin, SearchRadius::default());

        assert!(bounds.wraps_antimeridian());
        assert!(bounds.contains(&point(-179.99, 0.0)));
        assert!(bounds.contains(&point(179.95, 0.01)));
        assert!(!bounds.contains(&point(0.0, 0.0)));
    }

    #[rstest]
    fn bounding_box_near_a_pole_spans_all_longitudes() {
        let origin = point(10.0, 89.99);
        let bounds = BoundingBox::around(origin, SearchRadius::default());

        assert_eq!(bounds.min_longitude(), -180.0);
        assert_eq!(bounds.max_longitude(), 180.0);
        assert!(bounds.contains(&point(-170.0, 89.95)));
    }
}
