//! Coordinate extraction from the encodings the catalog has used over time.
//!
//! Strategies are tried in order and the first one that yields a finite
//! pair wins:
//!
//! 1. structured: `{"lat": .., "lon": ..}` object (`geocodage_ban`, `geo_point_2d`)
//! 2. delimited: `"<lat>,<lon>"` string or `[lat, lon]` array
//!    (`coordonnees`, `geo_point_2d`, `geolocation`)
//! 3. separate: independent latitude/longitude fields under known aliases
//!
//! A strategy that cannot parse its input simply yields `None`.

use commerces_core::{Coordinates, Record};
use serde_json::Value;

type Strategy = fn(&Record) -> Option<Coordinates>;

const STRATEGIES: &[(&str, Strategy)] = &[
    ("structured", from_structured),
    ("delimited", from_delimited),
    ("separate", from_separate_fields),
];

const STRUCTURED_FIELDS: &[&str] = &["geocodage_ban", "geo_point_2d"];
const DELIMITED_FIELDS: &[&str] = &["coordonnees", "geo_point_2d", "geolocation"];
const LATITUDE_ALIASES: &[&str] = &["latitude", "lat"];
const LONGITUDE_ALIASES: &[&str] = &["longitude", "lon", "lng"];

/// Resolves a coordinate pair from `fields`, or `None` if no strategy applies.
#[must_use]
pub fn extract_coordinates(fields: &Record) -> Option<Coordinates> {
    STRATEGIES.iter().find_map(|(name, strategy)| {
        let coordinates = strategy(fields)?;
        tracing::trace!(strategy = *name, "resolved record coordinates");
        Some(coordinates)
    })
}

fn from_structured(fields: &Record) -> Option<Coordinates> {
    STRUCTURED_FIELDS.iter().find_map(|key| {
        let Value::Object(point) = fields.get(*key)? else {
            return None;
        };
        Coordinates::new(parse_number(point.get("lat")?)?, parse_number(point.get("lon")?)?)
    })
}

fn from_delimited(fields: &Record) -> Option<Coordinates> {
    DELIMITED_FIELDS.iter().find_map(|key| match fields.get(*key)? {
        Value::String(raw) => parse_delimited(raw),
        Value::Array(parts) => match parts.as_slice() {
            [lat, lon] => Coordinates::new(parse_number(lat)?, parse_number(lon)?),
            _ => None,
        },
        _ => None,
    })
}

fn from_separate_fields(fields: &Record) -> Option<Coordinates> {
    let latitude = first_number(fields, LATITUDE_ALIASES)?;
    let longitude = first_number(fields, LONGITUDE_ALIASES)?;
    Coordinates::new(latitude, longitude)
}

/// Parses `"<lat>,<lon>"`. Anything other than exactly two numeric parts fails.
fn parse_delimited(raw: &str) -> Option<Coordinates> {
    let mut parts = raw.split(',');
    let (lat, lon) = (parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    Coordinates::new(parse_str(lat)?, parse_str(lon)?)
}

fn first_number(fields: &Record, aliases: &[&str]) -> Option<f64> {
    aliases
        .iter()
        .find_map(|key| fields.get(*key).and_then(parse_number))
}

/// Accepts JSON numbers and numeric strings.
fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_str(s),
        _ => None,
    }
}

fn parse_str(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
