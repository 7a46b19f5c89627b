//! Normalization from raw catalog records to [`CanonicalRecord`]s.
//!
//! Field names are reconciled through a fixed alias table; coordinate
//! extraction lives in [`coordinates`].

pub mod coordinates;

use std::borrow::Cow;

use commerces_core::record::keys;
use commerces_core::{CanonicalRecord, Dataset, Record};

pub use coordinates::extract_coordinates;

/// `(source field, canonical field)` pairs, applied in order as
/// "fill if absent". Earlier rules win when two sources map to the same
/// canonical field, so `tco_libelle` is preferred over `commerce`.
pub const FIELD_ALIASES: &[(&str, &str)] = &[
    ("tco_libelle", keys::TYPE_COMMERCE),
    ("commerce", keys::TYPE_COMMERCE),
    ("dea_nom_commerce", keys::NOM_COMMERCE),
    ("dea_jour_fermeture", keys::JOUR_FERMETURE),
    ("dea_rue_livraison", keys::RUE),
    ("dea_cp_livraison", keys::CODE_POSTAL),
    ("dea_commune_livraison", keys::COMMUNE),
    ("geocodage_ban", keys::COORDONNEES),
];

/// Normalizes one raw record.
///
/// Never fails: a record whose coordinates cannot be resolved is returned
/// without a location.
#[must_use]
pub fn normalize(record: Record) -> CanonicalRecord {
    let mut fields = fold_keys(record);
    apply_aliases(&mut fields);
    let coordinates = extract_coordinates(&fields);
    CanonicalRecord::new(fields, coordinates)
}

/// Normalizes every record, preserving order.
#[must_use]
pub fn normalize_all(records: Vec<Record>) -> Dataset {
    let dataset: Dataset = records.into_iter().map(normalize).collect();
    tracing::debug!(
        records = dataset.len(),
        located = dataset.iter().filter(|r| r.is_located()).count(),
        "normalized catalog records"
    );
    dataset
}

/// Copies each alias source into its canonical field when the canonical
/// field is not already present.
fn apply_aliases(fields: &mut Record) {
    for (source, canonical) in FIELD_ALIASES {
        if fields.contains_key(*canonical) {
            continue;
        }
        if let Some(value) = fields.get(*source).cloned() {
            fields.insert((*canonical).to_owned(), value);
        }
    }
}

/// Lowercases field names and replaces spaces with `_`.
///
/// When several raw names fold to the same key, a name that was already in
/// folded form wins; otherwise the first one in map order is kept.
fn fold_keys(record: Record) -> Record {
    let (folded, unfolded): (Vec<_>, Vec<_>) = record
        .into_iter()
        .partition(|(key, _)| matches!(fold_key(key), Cow::Borrowed(_)));

    let mut out = Record::new();
    for (key, value) in folded {
        out.insert(key, value);
    }
    for (key, value) in unfolded {
        out.entry(fold_key(&key).into_owned()).or_insert(value);
    }
    out
}

fn fold_key(key: &str) -> Cow<'_, str> {
    if key.chars().any(|c| c.is_uppercase() || c == ' ') {
        Cow::Owned(key.to_lowercase().replace(' ', "_"))
    } else {
        Cow::Borrowed(key)
    }
}

#[cfg(test)]
#[path = "../normalize_test.rs"]
mod tests;
