//! Business records as served by the catalog, before and after normalization.
//!
//! A [`Record`] is the raw JSON object returned by the API. A
//! [`CanonicalRecord`] keeps every original field and adds the canonical keys
//! listed in [`keys`], plus an optional coordinate pair.

use serde::Serialize;
use serde_json::{Map, Value};

/// One raw row from the catalog API.
pub type Record = Map<String, Value>;

/// All canonical records of one fetch cycle, in API return order.
pub type Dataset = Vec<CanonicalRecord>;

/// Canonical field names shared by the normalizer and downstream views.
pub mod keys {
    pub const TYPE_COMMERCE: &str = "type_commerce";
    pub const NOM_COMMERCE: &str = "nom_commerce";
    pub const JOUR_FERMETURE: &str = "jour_fermeture";
    pub const RUE: &str = "rue";
    pub const CODE_POSTAL: &str = "code_postal";
    pub const COMMUNE: &str = "commune";
    pub const COORDONNEES: &str = "coordonnees";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const DATE_CREATION: &str = "date_creation";
    pub const DATE: &str = "date";

    /// Date fields used for time-based counts, in order of preference.
    pub const DATE_FIELDS: &[&str] = &[DATE_CREATION, DATE];
}

/// A finite latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Returns `None` unless both components are finite.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        (latitude.is_finite() && longitude.is_finite()).then_some(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// A catalog record with canonical field names overlaid.
///
/// Serializes as a flat JSON object: the original fields, the canonical
/// aliases, and `latitude`/`longitude` only when the record is located.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRecord {
    #[serde(flatten)]
    fields: Record,
    #[serde(flatten)]
    coordinates: Option<Coordinates>,
}

impl CanonicalRecord {
    /// Builds a canonical record from already-reconciled fields.
    ///
    /// Any raw `latitude`/`longitude` keys are dropped from `fields`: the
    /// location is carried only by `coordinates`, so a record never exposes
    /// half a coordinate pair.
    #[must_use]
    pub fn new(mut fields: Record, coordinates: Option<Coordinates>) -> Self {
        fields.remove(keys::LATITUDE);
        fields.remove(keys::LONGITUDE);
        Self {
            fields,
            coordinates,
        }
    }

    /// All non-coordinate fields, original and canonical.
    #[must_use]
    pub fn fields(&self) -> &Record {
        &self.fields
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns the field as display text.
    ///
    /// Strings are trimmed; numbers and booleans are rendered with their JSON
    /// representation. Missing, `null`, empty, and structured values yield
    /// `None`.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_owned())
            }
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    #[must_use]
    pub fn type_commerce(&self) -> Option<String> {
        self.text(keys::TYPE_COMMERCE)
    }

    #[must_use]
    pub fn nom_commerce(&self) -> Option<String> {
        self.text(keys::NOM_COMMERCE)
    }

    #[must_use]
    pub fn jour_fermeture(&self) -> Option<String> {
        self.text(keys::JOUR_FERMETURE)
    }

    #[must_use]
    pub fn rue(&self) -> Option<String> {
        self.text(keys::RUE)
    }

    #[must_use]
    pub fn code_postal(&self) -> Option<String> {
        self.text(keys::CODE_POSTAL)
    }

    #[must_use]
    pub fn commune(&self) -> Option<String> {
        self.text(keys::COMMUNE)
    }

    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    #[must_use]
    pub fn is_located(&self) -> bool {
        self.coordinates.is_some()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object fixture, got {other}"),
        }
    }

    #[test]
    fn coordinates_reject_non_finite_components() {
        assert!(Coordinates::new(f64::NAN, 2.35).is_none());
        assert!(Coordinates::new(48.85, f64::INFINITY).is_none());
        assert!(Coordinates::new(48.85, 2.35).is_some());
    }

    #[test]
    fn new_drops_raw_coordinate_keys() {
        let fields = record(json!({"latitude": "48.85", "commune": "Paris"}));
        let rec = CanonicalRecord::new(fields, None);
        assert!(rec.get("latitude").is_none());
        assert!(rec.get("longitude").is_none());
        assert_eq!(rec.commune().as_deref(), Some("Paris"));
    }

    #[test]
    fn text_renders_numbers_and_skips_blank_strings() {
        let fields = record(json!({
            "code_postal": 75012,
            "rue": "   ",
            "nom_commerce": "  Chez Paul ",
            "geocodage_ban": {"lat": 1, "lon": 2},
            "jour_fermeture": null
        }));
        let rec = CanonicalRecord::new(fields, None);
        assert_eq!(rec.code_postal().as_deref(), Some("75012"));
        assert_eq!(rec.rue(), None);
        assert_eq!(rec.nom_commerce().as_deref(), Some("Chez Paul"));
        assert_eq!(rec.text("geocodage_ban"), None);
        assert_eq!(rec.jour_fermeture(), None);
    }

    #[test]
    fn serializes_coordinates_only_when_located() {
        let located = CanonicalRecord::new(
            record(json!({"commune": "Paris"})),
            Coordinates::new(48.85, 2.35),
        );
        let value = serde_json::to_value(&located).unwrap();
        assert_eq!(value["latitude"], json!(48.85));
        assert_eq!(value["longitude"], json!(2.35));
        assert_eq!(value["commune"], json!("Paris"));

        let unlocated = CanonicalRecord::new(record(json!({"commune": "Paris"})), None);
        let value = serde_json::to_value(&unlocated).unwrap();
        assert!(value.get("latitude").is_none());
        assert!(value.get("longitude").is_none());
    }
}
