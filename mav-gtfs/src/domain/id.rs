//! Upstream identifier types.

use std::fmt;

/// Error returned when an upstream identifier is unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier {value:?}: {reason}")]
pub struct InvalidId {
    value: String,
    reason: &'static str,
}

/// Shared validation for identifiers that end up inside canonical keys.
///
/// Control characters are reserved as key separators.
fn validate(s: &str) -> Result<(), InvalidId> {
    if s.is_empty() {
        return Err(InvalidId {
            value: s.to_string(),
            reason: "cannot be empty",
        });
    }
    if s.chars().any(char::is_control) {
        return Err(InvalidId {
            value: s.to_string(),
            reason: "cannot contain control characters",
        });
    }
    Ok(())
}

/// An upstream train identifier.
///
/// Train IDs are opaque: the same train number running on two different
/// days usually carries two different IDs.
///
/// # Examples
///
/// ```
/// use mav_gtfs::domain::TrainId;
///
/// let id = TrainId::new("556321_261020").unwrap();
/// assert_eq!(id.as_str(), "556321_261020");
///
/// assert!(TrainId::new("").is_err());
/// assert!(TrainId::new("a\u{1e}b").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrainId(String);

impl TrainId {
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidId> {
        let s = s.into();
        validate(&s)?;
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrainId({})", self.0)
    }
}

impl fmt::Display for TrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An upstream stop (station) identifier.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopId(String);

impl StopId {
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidId> {
        let s = s.into();
        validate(&s)?;
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
