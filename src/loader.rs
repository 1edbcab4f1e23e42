use crate::error::{AuditError, Result};
use crate::types::{RawTripRow, TripRecord};
use crate::util::json_scalar_text;
use csv::{ReaderBuilder, Trim};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
    pub with_precomputed: usize,
}

/// Load a trip export, choosing the reader by file extension.
pub fn load_trips(path: impl AsRef<Path>) -> Result<(Vec<TripRecord>, LoadReport)> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    let file = BufReader::new(File::open(path)?);
    let loaded = match ext.as_str() {
        "csv" => read_csv(file)?,
        "json" => read_json(file)?,
        other => return Err(AuditError::UnsupportedFormat(format!(".{} ({})", other, path.display()))),
    };
    tracing::info!(
        path = %path.display(),
        total = loaded.1.total_rows,
        loaded = loaded.1.loaded_rows,
        errors = loaded.1.parse_errors,
        "trip export loaded"
    );
    Ok(loaded)
}

pub fn read_csv<R: Read>(reader: R) -> Result<(Vec<TripRecord>, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).trim(Trim::All).from_reader(reader);
    let rows = rdr.deserialize::<RawTripRow>().map(|r| r.map_err(AuditError::from));
    Ok(collect_rows(rows))
}

/// Accepts a bare array of trip objects, or an object wrapping one under
/// `data` or `trips`.
pub fn read_json<R: Read>(reader: R) -> Result<(Vec<TripRecord>, LoadReport)> {
    let doc: Value = serde_json::from_reader(reader)?;
    let items = match doc {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("data").or_else(|| obj.remove("trips")) {
            Some(Value::Array(items)) => items,
            _ => return Err(AuditError::UnsupportedFormat("JSON object without a trip array".into())),
        },
        _ => return Err(AuditError::UnsupportedFormat("JSON document is not an array".into())),
    };
    let rows = items
        .into_iter()
        .map(coerce_text_fields)
        .map(|v| serde_json::from_value::<RawTripRow>(v).map_err(AuditError::from));
    Ok(collect_rows(rows))
}

// CSV fields already arrive as raw text, so only JSON needs this; a
// type-inferring serde adapter would turn a CSV id like "007" into "7".
fn coerce_text_fields(mut item: Value) -> Value {
    if let Value::Object(obj) = &mut item {
        for field in RawTripRow::TEXT_FIELDS {
            if let Some(v) = obj.get_mut(field) {
                *v = json_scalar_text(v.take());
            }
        }
    }
    item
}

fn collect_rows<I>(rows: I) -> (Vec<TripRecord>, LoadReport)
where
    I: Iterator<Item = Result<RawTripRow>>,
{
    let mut report = LoadReport::default();
    let mut trips = Vec::new();

    for result in rows {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(row = report.total_rows, error = %e, "skipping unreadable row");
                report.parse_errors += 1;
                continue;
            }
        };
        // A trip without an id cannot be reconciled or searched.
        let Some(trip) = row.into_record() else {
            tracing::debug!(row = report.total_rows, "skipping row without trip_id");
            report.parse_errors += 1;
            continue;
        };
        if trip.has_precomputed_variance() {
            report.with_precomputed += 1;
        }
        trips.push(trip);
    }

    report.loaded_rows = trips.len();
    (trips, report)
}
