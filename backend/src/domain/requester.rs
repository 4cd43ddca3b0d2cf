//! Requesters: identities looking for a nearby provider.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::GeoPoint;

/// Validation errors returned by [`RequesterId::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequesterValidationError {
    #[error("requester id must be a valid UUID")]
    InvalidId,
}

/// Stable requester identifier issued by the identity collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RequesterId(Uuid);

impl RequesterId {
    /// Validate and construct a [`RequesterId`] from its string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, RequesterValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(RequesterValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| RequesterValidationError::InvalidId)
    }

    /// Wrap an already-parsed UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`RequesterId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RequesterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<RequesterId> for String {
    fn from(value: RequesterId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for RequesterId {
    type Error = RequesterValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A requester and their last saved position.
///
/// `position` is either absent or a complete, validated point.
#[derive(Debug, Clone, PartialEq)]
pub struct Requester {
    pub id: RequesterId,
    pub name: String,
    pub position: Option<GeoPoint>,
}

impl Requester {
    /// A requester with no saved position.
    pub fn new(id: RequesterId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            position: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn parses_canonical_uuid() {
        let id = RequesterId::new("11111111-1111-1111-1111-111111111111").expect("valid id");
        assert_eq!(id.to_string(), "11111111-1111-1111-1111-111111111111");
    }

    #[rstest]
    fn rejects_padded_input() {
        assert_eq!(
            RequesterId::new("11111111-1111-1111-1111-111111111111 "),
            Err(RequesterValidationError::InvalidId)
        );
    }

    #[rstest]
    fn new_requester_has_no_position() {
        assert!(Requester::new(RequesterId::random(), "Grace").position.is_none());
    }
}
