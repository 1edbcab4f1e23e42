use crate::error::Result;
use crate::output::{write_csv, write_json};
use crate::reconcile::reconcile;
use crate::summary::summarize;
use crate::types::{
    FleetSummary, Metric, MetricVariance, ReconciledMetric, StatusCountRow, SummaryCardRow,
    TripAuditRow, TripReconciliation, TripRecord, VarianceRow,
};
use crate::util::{format_currency, format_distance, format_int, format_metric_value, format_number};
use std::path::{Path, PathBuf};

pub const AUDIT_FILE_NAME: &str = "trip_audit.csv";
pub const SUMMARY_FILE_NAME: &str = "fleet_summary.json";

pub fn assessment(is_favorable: Option<bool>) -> &'static str {
    match is_favorable {
        Some(true) => "Favorable",
        Some(false) => "Unfavorable",
        None => "Neutral",
    }
}

pub fn summary_rows(summary: &FleetSummary) -> Vec<SummaryCardRow> {
    let card = |metric: &str, value: String| SummaryCardRow { metric: metric.to_string(), value };
    vec![
        card("Trips", format_int(summary.trip_count)),
        card("Total Cost", format_currency(summary.total_cost)),
        card("Total Distance", format_distance(summary.total_distance)),
        card("Avg Cost / Trip", format_currency(summary.avg_cost_per_trip)),
        card("Avg Cost / km", format_number(summary.avg_cost_per_km, 2)),
    ]
}

pub fn status_rows(summary: &FleetSummary) -> Vec<StatusCountRow> {
    summary
        .counts_by_status
        .iter()
        .map(|(status, trips)| StatusCountRow { status: status.to_string(), trips: *trips })
        .collect()
}

/// Detail table for one trip: time group first, then cost group, with the
/// total row emphasized.
pub fn variance_rows(rec: &TripReconciliation) -> Vec<VarianceRow> {
    rec.time_metrics
        .iter()
        .chain(rec.cost_metrics.iter())
        .map(|m| {
            let v = &m.variance;
            let metric = if m.is_total { format!("**{}**", m.label) } else { m.label.to_string() };
            VarianceRow {
                metric,
                planned: format_metric_value(v.kind, v.planned.as_ref()),
                actual: format_metric_value(v.kind, v.actual.as_ref()),
                variance: v.display_text.clone(),
                assessment: assessment(v.is_favorable).to_string(),
            }
        })
        .collect()
}

/// One export row per trip with the headline variances.
pub fn audit_rows(trips: &[TripRecord]) -> Vec<TripAuditRow> {
    trips
        .iter()
        .map(|trip| {
            let rec = reconcile(trip);
            let total = find(&rec.cost_metrics, Metric::TotalCost);
            TripAuditRow {
                trip_id: trip.trip_id.clone(),
                status: trip.status.to_string(),
                origin: trip.origin.clone().unwrap_or_default(),
                destination: trip.destination.clone().unwrap_or_default(),
                client: trip.client.clone().unwrap_or_default(),
                planned_total: total
                    .map(|v| format_metric_value(v.kind, v.planned.as_ref()))
                    .unwrap_or_default(),
                actual_total: total
                    .map(|v| format_metric_value(v.kind, v.actual.as_ref()))
                    .unwrap_or_default(),
                cost_variance: text(total),
                finish_variance: text(find(&rec.time_metrics, Metric::FinishTime)),
                distance_variance: text(find(&rec.time_metrics, Metric::Distance)),
            }
        })
        .collect()
}

fn find(rows: &[ReconciledMetric], metric: Metric) -> Option<&MetricVariance> {
    rows.iter().find(|m| m.metric == metric).map(|m| &m.variance)
}

fn text(v: Option<&MetricVariance>) -> String {
    v.map(|v| v.display_text.clone()).unwrap_or_default()
}

/// Write the per-trip audit CSV and the fleet summary JSON into `dir`.
/// Stops at the first failed write.
pub fn export_audit(dir: &Path, trips: &[TripRecord]) -> Result<(PathBuf, PathBuf)> {
    let audit_file = dir.join(AUDIT_FILE_NAME);
    write_csv(&audit_file, &audit_rows(trips))?;
    let summary_file = dir.join(SUMMARY_FILE_NAME);
    write_json(&summary_file, &summarize(trips))?;
    Ok((audit_file, summary_file))
}
