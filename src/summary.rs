use crate::types::{FleetSummary, TripRecord};
use crate::util::safe_ratio;
use std::collections::BTreeMap;

/// Reduce an already filtered set of trips to the fleet summary cards.
///
/// Missing actual cost or distance counts as zero. An empty slice yields
/// an all-zero summary.
pub fn summarize(trips: &[TripRecord]) -> FleetSummary {
    let total_cost: f64 = trips.iter().map(|t| finite_or_zero(t.actual_total_cost)).sum();
    let total_distance: f64 = trips.iter().map(|t| finite_or_zero(t.actual_distance)).sum();
    let trip_count = trips.len();

    let mut counts_by_status: BTreeMap<_, usize> = BTreeMap::new();
    for t in trips {
        *counts_by_status.entry(t.status).or_default() += 1;
    }

    FleetSummary {
        trip_count,
        total_cost,
        total_distance,
        avg_cost_per_trip: safe_ratio(total_cost, trip_count as f64),
        avg_cost_per_km: safe_ratio(total_cost, total_distance),
        counts_by_status,
    }
}

fn finite_or_zero(v: Option<f64>) -> f64 {
    v.filter(|v| v.is_finite()).unwrap_or(0.0)
}
