//! Text and JSON renderings of a filtered dataset.
//!
//! Every renderer writes to a caller-supplied writer so output can be
//! captured in tests.

use std::collections::BTreeSet;
use std::io::{self, Write};

use chrono::{DateTime, Utc};
use commerces_core::{CanonicalRecord, DatasetView};
use serde_json::{json, Value};

const NOT_AVAILABLE: &str = "n/a";

pub(crate) fn write_summary(out: &mut impl Write, view: &DatasetView<'_>) -> io::Result<()> {
    let summary = view.summary();
    writeln!(out, "{:<24}{}", "businesses", summary.total)?;
    writeln!(out, "{:<24}{}", "commerce types", summary.distinct_types)?;
    writeln!(out, "{:<24}{}", "communes", summary.distinct_communes)?;
    writeln!(out, "{:<24}{}", "valid coordinates", summary.located)?;
    Ok(())
}

/// Writes value counts as a two-column table, `top` rows at most.
pub(crate) fn write_counts(
    out: &mut impl Write,
    label: &str,
    counts: &[commerces_core::ValueCount],
    top: usize,
) -> io::Result<()> {
    if counts.is_empty() {
        writeln!(out, "no {label} values to display")?;
        return Ok(());
    }
    let width = counts
        .iter()
        .take(top)
        .map(|vc| vc.value.chars().count())
        .max()
        .unwrap_or(0)
        .max(label.len())
        + 2;
    writeln!(out, "{:<width$}COUNT", label.to_uppercase())?;
    for vc in counts.iter().take(top) {
        writeln!(out, "{:<width$}{}", vc.value, vc.count)?;
    }
    Ok(())
}

pub(crate) fn write_crosstab(
    out: &mut impl Write,
    view: &DatasetView<'_>,
    top_communes: usize,
) -> io::Result<()> {
    let tab = view.crosstab(top_communes);
    if tab.types.is_empty() {
        writeln!(out, "no commerce type / commune pairs to display")?;
        return Ok(());
    }
    write!(out, "TYPE")?;
    for commune in &tab.communes {
        write!(out, "\t{commune}")?;
    }
    writeln!(out)?;
    for (kind, row) in tab.types.iter().zip(&tab.counts) {
        write!(out, "{kind}")?;
        for count in row {
            write!(out, "\t{count}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// One detail block per business, in dataset order.
pub(crate) fn write_details(
    out: &mut impl Write,
    view: &DatasetView<'_>,
    limit: Option<usize>,
) -> io::Result<()> {
    if view.is_empty() {
        writeln!(out, "no businesses to display")?;
        return Ok(());
    }
    for record in view.iter().take(limit.unwrap_or(usize::MAX)) {
        write_detail(out, record)?;
    }
    Ok(())
}

fn write_detail(out: &mut impl Write, record: &CanonicalRecord) -> io::Result<()> {
    let or_na = |value: Option<String>| value.unwrap_or_else(|| NOT_AVAILABLE.to_owned());

    writeln!(
        out,
        "{} - {}",
        or_na(record.nom_commerce()),
        or_na(record.type_commerce())
    )?;
    writeln!(out, "  commune:      {}", or_na(record.commune()))?;
    writeln!(out, "  street:       {}", or_na(record.rue()))?;
    writeln!(out, "  postcode:     {}", or_na(record.code_postal()))?;
    writeln!(out, "  closing day:  {}", or_na(record.jour_fermeture()))?;
    match record.coordinates() {
        Some(c) => writeln!(out, "  coordinates:  {}, {}", c.latitude(), c.longitude())?,
        None => writeln!(out, "  coordinates:  {NOT_AVAILABLE}")?,
    }
    Ok(())
}

/// Number of located businesses and of the communes they cover.
pub(crate) fn write_map_stats(out: &mut impl Write, view: &DatasetView<'_>) -> io::Result<()> {
    let located = view.located().count();
    let communes = view
        .located()
        .filter_map(|(record, _)| record.commune())
        .collect::<BTreeSet<_>>()
        .len();
    writeln!(out, "{located} located businesses in {communes} communes")
}

/// Businesses per month, oldest first.
///
/// Without an explicit `field`, the first date field present in the view is
/// used.
pub(crate) fn write_timeline(
    out: &mut impl Write,
    view: &DatasetView<'_>,
    field: Option<&str>,
) -> io::Result<()> {
    let Some(field) = field.or_else(|| view.date_field()) else {
        writeln!(out, "no date field to display")?;
        return Ok(());
    };
    let counts = view.monthly_counts(field);
    if counts.is_empty() {
        writeln!(out, "no valid {field} values to display")?;
        return Ok(());
    }
    writeln!(out, "{:<10}COUNT", "MONTH")?;
    for vc in &counts {
        writeln!(out, "{:<10}{}", vc.value, vc.count)?;
    }
    Ok(())
}

/// Located businesses as a GeoJSON `FeatureCollection`.
pub(crate) fn geojson(view: &DatasetView<'_>) -> Value {
    let features: Vec<Value> = view
        .located()
        .map(|(record, c)| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [c.longitude(), c.latitude()]
                },
                "properties": record.fields()
            })
        })
        .collect();
    json!({"type": "FeatureCollection", "features": features})
}

/// Data-source description with the time the dataset was loaded.
pub(crate) fn write_source(
    out: &mut impl Write,
    api_url: &str,
    records: usize,
    loaded_at: DateTime<Utc>,
) -> io::Result<()> {
    writeln!(out, "dataset:       RATP approved local businesses")?;
    writeln!(out, "format:        JSON over REST")?;
    writeln!(out, "api url:       {api_url}")?;
    writeln!(out, "page limit:    {} records per request", commerces_catalog::PAGE_SIZE)?;
    writeln!(out, "records:       {records}")?;
    writeln!(out, "last sync:     {}", loaded_at.format("%d/%m/%Y %H:%M:%S UTC"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use commerces_core::{Coordinates, Record};
    use serde_json::json;

    use super::*;

    fn rec(value: Value, coords: Option<(f64, f64)>) -> CanonicalRecord {
        let Value::Object(fields) = value else {
            unreachable!()
        };
        CanonicalRecord::new(fields, coords.and_then(|(lat, lon)| Coordinates::new(lat, lon)))
    }

    fn fixture() -> Vec<CanonicalRecord> {
        vec![
            rec(
                json!({
                    "nom_commerce": "Relais H",
                    "type_commerce": "Presse",
                    "commune": "Paris",
                    "rue": "12 rue de Lyon",
                    "code_postal": "75012",
                    "jour_fermeture": "Dimanche"
                }),
                Some((48.85, 2.35)),
            ),
            rec(json!({"type_commerce": "Fleuriste", "commune": "Vincennes"}), None),
        ]
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).expect("writing to a Vec cannot fail");
        String::from_utf8(buf).expect("output is utf-8")
    }

    #[test]
    fn summary_lists_all_metrics() {
        let data = fixture();
        let view = DatasetView::new(&data);
        let text = render(|out| write_summary(out, &view));
        assert!(text.contains("businesses              2"));
        assert!(text.contains("valid coordinates       1"));
    }

    #[test]
    fn counts_respect_top_limit() {
        let data = fixture();
        let view = DatasetView::new(&data);
        let text = render(|out| write_counts(out, "type", &view.type_counts(), 1));
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("TYPE"));
    }

    #[test]
    fn counts_on_empty_dataset_print_placeholder() {
        let text = render(|out| write_counts(out, "commune", &[], 10));
        assert_eq!(text, "no commune values to display\n");
    }

    #[test]
    fn details_use_placeholders_for_missing_fields() {
        let data = fixture();
        let view = DatasetView::new(&data);
        let text = render(|out| write_details(out, &view, None));
        assert!(text.contains("Relais H - Presse"));
        assert!(text.contains("coordinates:  48.85, 2.35"));
        assert!(text.contains("n/a - Fleuriste"));
        assert!(text.contains("coordinates:  n/a"));
    }

    #[test]
    fn details_on_empty_view() {
        let data: Vec<CanonicalRecord> = Vec::new();
        let view = DatasetView::new(&data);
        let text = render(|out| write_details(out, &view, Some(5)));
        assert_eq!(text, "no businesses to display\n");
    }

    #[test]
    fn crosstab_renders_header_and_rows() {
        let data = fixture();
        let view = DatasetView::new(&data);
        let text = render(|out| write_crosstab(out, &view, 10));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "TYPE\tParis\tVincennes");
        assert_eq!(lines[1], "Fleuriste\t0\t1");
        assert_eq!(lines[2], "Presse\t1\t0");
    }

    #[test]
    fn geojson_contains_only_located_records_in_lon_lat_order() {
        let data = fixture();
        let view = DatasetView::new(&data);
        let value = geojson(&view);
        let features = value["features"].as_array().expect("features array");
        assert_eq!(features.len(), 1);
        assert_eq!(features[0]["geometry"]["coordinates"], json!([2.35, 48.85]));
        assert_eq!(features[0]["properties"]["commune"], json!("Paris"));
    }

    #[test]
    fn geojson_of_empty_dataset_is_empty_collection() {
        let data = vec![CanonicalRecord::new(Record::new(), None)];
        let value = geojson(&DatasetView::new(&data));
        assert_eq!(value["features"], json!([]));
    }

    #[test]
    fn source_mentions_page_limit() {
        let loaded_at = DateTime::parse_from_rfc3339("2024-05-01T08:30:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc);
        let text = render(|out| write_source(out, "https://data.example/records", 412, loaded_at));
        assert!(text.contains("page limit:    100 records per request"));
        assert!(text.contains("records:       412"));
        assert!(text.contains("last sync:     01/05/2024 08:30:00 UTC"));
    }

    #[test]
    fn map_stats_count_located_records_and_their_communes() {
        let mut data = fixture();
        data.push(rec(json!({"commune": "Paris"}), Some((48.86, 2.34))));
        let view = DatasetView::new(&data);
        let text = render(|out| write_map_stats(out, &view));
        assert_eq!(text, "2 located businesses in 1 communes\n");
    }

    #[test]
    fn timeline_groups_by_month_and_skips_bad_dates() {
        let data = vec![
            rec(json!({"date_creation": "2022-05-10"}), None),
            rec(json!({"date_creation": "2022-05-31"}), None),
            rec(json!({"date_creation": "2021-12-01"}), None),
            rec(json!({"date_creation": "soon"}), None),
            rec(json!({"commune": "Paris"}), None),
        ];
        let view = DatasetView::new(&data);
        let text = render(|out| write_timeline(out, &view, None));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["MONTH     COUNT", "2021-12   1", "2022-05   2"]);
    }

    #[test]
    fn timeline_without_date_field() {
        let data = fixture();
        let view = DatasetView::new(&data);
        let text = render(|out| write_timeline(out, &view, None));
        assert_eq!(text, "no date field to display\n");

        let text = render(|out| write_timeline(out, &view, Some("date")));
        assert_eq!(text, "no valid date values to display\n");
    }
}
