//! Reviews and the derived aggregate rating.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ProviderId, RequesterId};

/// Lowest accepted rating.
pub const RATING_MIN: u8 = 1;
/// Highest accepted rating.
pub const RATING_MAX: u8 = 5;

/// Validation errors raised when parsing a rating value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RatingValidationError {
    #[error("rating must be a whole number (got {value})")]
    NotAnInteger { value: f64 },
    #[error("rating must be between 1 and 5 (got {value})")]
    OutOfRange { value: f64 },
}

/// A single review score in `1..=5`.
///
/// # Examples
/// ```
/// use marketplace::domain::RatingValue;
///
/// assert_eq!(RatingValue::from_number(4.0).map(RatingValue::get), Ok(4));
/// assert!(RatingValue::from_number(4.5).is_err());
/// assert!(RatingValue::from_number(6.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RatingValue(u8);

impl RatingValue {
    /// Validate an integral rating.
    pub fn new(value: u8) -> Result<Self, RatingValidationError> {
        if (RATING_MIN..=RATING_MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingValidationError::OutOfRange {
                value: f64::from(value),
            })
        }
    }

    /// Validate a rating supplied as a JSON number.
    pub fn from_number(value: f64) -> Result<Self, RatingValidationError> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(RatingValidationError::NotAnInteger { value });
        }
        if value < f64::from(RATING_MIN) || value > f64::from(RATING_MAX) {
            return Err(RatingValidationError::OutOfRange { value });
        }
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "value is a whole number already checked to lie within 1..=5"
        )]
        let whole = value as u8;
        Self::new(whole)
    }

    /// The rating as an integer.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl From<RatingValue> for u8 {
    fn from(value: RatingValue) -> Self {
        value.0
    }
}

impl TryFrom<u8> for RatingValue {
    type Error = RatingValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// One requester's rating of one provider.
///
/// `(provider_id, requester_id)` identifies a review; a later submission by
/// the same requester overwrites `rating` instead of adding a second review.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub provider_id: ProviderId,
    pub requester_id: RequesterId,
    pub rating: RatingValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Arithmetic mean of `ratings`, or `0.0` when there are none.
///
/// # Examples
/// ```
/// use marketplace::domain::{RatingValue, mean_rating};
///
/// let ratings = [4, 2].map(|v| RatingValue::new(v).expect("valid rating"));
/// assert_eq!(mean_rating(&ratings), 3.0);
/// assert_eq!(mean_rating(&[]), 0.0);
/// ```
pub fn mean_rating(ratings: &[RatingValue]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: u64 = ratings.iter().map(|rating| u64::from(rating.get())).sum();
    mean_of(sum, ratings.len())
}

fn mean_of(sum: u64, count: usize) -> f64 {
    #[expect(
        clippy::cast_precision_loss,
        reason = "review sums and counts stay far below 2^52"
    )]
    let (total, count) = (sum as f64, count as f64);
    total / count
}

/// Round an aggregate rating to one decimal place for display.
///
/// # Examples
/// ```
/// use marketplace::domain::round_for_display;
///
/// assert_eq!(round_for_display(3.666_666), 3.7);
/// assert_eq!(round_for_display(2.0), 2.0);
/// ```
pub fn round_for_display(rating: f64) -> f64 {
    (rating * 10.0).round() / 10.0
}
