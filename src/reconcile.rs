use crate::types::{
    Metric, MetricKind, MetricValue, ReconciledMetric, TripReconciliation, TripRecord,
};
use crate::util::{format_duration_hms, parse_timestamp_safe};
use crate::variance::{compute_cost_variance, compute_variance};

/// Compute every tracked variance for one trip.
///
/// The time group and cost group always have four rows each. A value that
/// cannot be read only turns its own row into "N/A".
pub fn reconcile(trip: &TripRecord) -> TripReconciliation {
    let time_metrics = Metric::TIME_GROUP
        .iter()
        .map(|m| reconcile_metric(trip, *m))
        .collect();
    let cost_metrics = Metric::COST_GROUP
        .iter()
        .map(|m| reconcile_metric(trip, *m))
        .collect();

    let actual_elapsed = match (
        timestamp(trip, Metric::StartTime, trip.actual_start_time.as_deref()),
        timestamp(trip, Metric::FinishTime, trip.actual_finish_time.as_deref()),
    ) {
        (Some(MetricValue::Timestamp(start)), Some(MetricValue::Timestamp(finish))) => {
            Some(format_duration_hms((finish - start).num_seconds()))
        }
        _ => None,
    };

    TripReconciliation {
        trip_id: trip.trip_id.clone(),
        time_metrics,
        cost_metrics,
        actual_elapsed,
    }
}

fn reconcile_metric(trip: &TripRecord, metric: Metric) -> ReconciledMetric {
    let variance = match metric {
        Metric::StartTime => compute_variance(
            MetricKind::Time,
            timestamp(trip, metric, trip.planned_start_time.as_deref()),
            timestamp(trip, metric, trip.actual_start_time.as_deref()),
            number(trip, metric, trip.start_time_variance_minutes),
        ),
        Metric::FinishTime => compute_variance(
            MetricKind::Time,
            timestamp(trip, metric, trip.planned_finish_time.as_deref()),
            timestamp(trip, metric, trip.actual_finish_time.as_deref()),
            number(trip, metric, trip.finish_time_variance_minutes),
        ),
        Metric::Distance => compute_variance(
            MetricKind::Distance,
            number(trip, metric, trip.planned_distance).map(MetricValue::Number),
            number(trip, metric, trip.actual_distance).map(MetricValue::Number),
            number(trip, metric, trip.distance_variance),
        ),
        Metric::Duration => compute_variance(
            MetricKind::Duration,
            number(trip, metric, trip.planned_duration_minutes).map(MetricValue::Number),
            number(trip, metric, trip.actual_duration_minutes).map(MetricValue::Number),
            number(trip, metric, trip.duration_variance_minutes),
        ),
        Metric::FuelCost => compute_cost_variance(trip.planned_fuel_cost, trip.actual_fuel_cost),
        Metric::VehicleCost => {
            compute_cost_variance(trip.planned_vehicle_cost, trip.actual_vehicle_cost)
        }
        Metric::DriverCost => {
            compute_cost_variance(trip.planned_driver_cost, trip.actual_driver_cost)
        }
        Metric::TotalCost => compute_cost_variance(trip.planned_total_cost, trip.actual_total_cost),
    };

    ReconciledMetric {
        metric,
        label: metric.label(),
        is_total: metric == Metric::TotalCost,
        variance,
    }
}

fn timestamp(trip: &TripRecord, metric: Metric, raw: Option<&str>) -> Option<MetricValue> {
    let raw = raw?;
    let parsed = parse_timestamp_safe(Some(raw));
    if parsed.is_none() {
        tracing::debug!(trip_id = %trip.trip_id, metric = ?metric, value = raw, "unparseable timestamp");
    }
    parsed.map(MetricValue::Timestamp)
}

fn number(trip: &TripRecord, metric: Metric, value: Option<f64>) -> Option<f64> {
    match value {
        Some(v) if !v.is_finite() => {
            tracing::debug!(trip_id = %trip.trip_id, metric = ?metric, "non-finite value");
            None
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_needs_both_actual_timestamps() {
        let mut trip = TripRecord {
            trip_id: "t-1".into(),
            actual_start_time: Some("2024-01-01T08:00:00Z".into()),
            actual_finish_time: Some("2024-01-01T10:30:15Z".into()),
            ..Default::default()
        };
        assert_eq!(reconcile(&trip).actual_elapsed.as_deref(), Some("02:30:15"));

        trip.actual_finish_time = Some("not a time".into());
        assert_eq!(reconcile(&trip).actual_elapsed, None);
    }
}
