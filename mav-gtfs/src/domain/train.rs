//! Train references discovered from departure boards.

use super::TrainId;

/// A train seen on some departure board.
///
/// The number is what passengers see ("IC 560"); when the upstream source
/// omits it the ID stands in as the display key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrainRef {
    pub id: TrainId,
    pub number: Option<String>,
}

impl TrainRef {
    pub fn new(id: TrainId, number: Option<String>) -> Self {
        Self { id, number }
    }

    /// The number if known, else the ID.
    ///
    /// Used for routes, trip IDs and canonical keys.
    pub fn display_key(&self) -> &str {
        display_key(&self.id, self.number.as_deref())
    }
}

/// One entry of a station departure board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub train: TrainRef,
}

/// Display key rule shared by train refs and timetables.
pub(crate) fn display_key<'a>(id: &'a TrainId, number: Option<&'a str>) -> &'a str {
    match number {
        Some(n) if !n.is_empty() => n,
        _ => id.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> TrainId {
        TrainId::new(s).unwrap()
    }

    #[test]
    fn display_key_prefers_number() {
        let train = TrainRef::new(id("556321"), Some("IC 560".to_string()));
        assert_eq!(train.display_key(), "IC 560");
    }

    #[test]
    fn display_key_falls_back_to_id() {
        let train = TrainRef::new(id("556321"), None);
        assert_eq!(train.display_key(), "556321");

        let blank = TrainRef::new(id("556321"), Some(String::new()));
        assert_eq!(blank.display_key(), "556321");
    }
}
