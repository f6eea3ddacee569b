//! Station identity and category types.

use std::fmt;

use super::geo::LatLng;

/// Error returned when parsing an invalid station id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station id: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// Stable external key of a station.
///
/// Ids come from the backend and are opaque; the only constraint is that
/// they are non-empty once surrounding whitespace is removed.
///
/// # Examples
///
/// ```
/// use transit_map::domain::StationId;
///
/// let id = StationId::parse(" E001 ").unwrap();
/// assert_eq!(id.as_str(), "E001");
///
/// assert!(StationId::parse("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(String);

impl StationId {
    /// Parse a station id, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidStationId {
                reason: "must not be empty",
            });
        }
        Ok(StationId(trimmed.to_string()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of transit stop.
///
/// The backend speaks a handful of historical spellings for the same
/// categories (`tm` for bus-rapid, `sitp` for feeder). Anything else is kept
/// in lowercase so it can still be displayed and compared, and is styled with
/// the fallback color.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Metro,
    Portal,
    BusRapid,
    Feeder,
    Intermodal,
    Other(String),
}

impl Category {
    /// Map a backend `tipo` value to a category. Matching is case-insensitive.
    pub fn from_wire(s: &str) -> Self {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "metro" => Category::Metro,
            "portal" => Category::Portal,
            "tm" | "bus-rapid" | "transmilenio" => Category::BusRapid,
            "sitp" | "feeder" | "alimentador" => Category::Feeder,
            "intermodal" => Category::Intermodal,
            _ => Category::Other(normalized),
        }
    }

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &str {
        match self {
            Category::Metro => "metro",
            Category::Portal => "portal",
            Category::BusRapid => "bus-rapid",
            Category::Feeder => "feeder",
            Category::Intermodal => "intermodal",
            Category::Other(raw) => raw,
        }
    }

    /// Uppercase label used in selector lists and stop lists.
    pub fn label(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transit stop.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub category: Category,
    pub position: LatLng,
    /// Estimated passenger capacity.
    pub capacity: u32,
}

impl Station {
    /// Label shown in selector lists, e.g. `"Portal Norte (PORTAL)"`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.category.label())
    }
}
