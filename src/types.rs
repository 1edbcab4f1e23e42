use crate::util::lenient_f64;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tabled::Tabled;

/// One row of a trip export as it arrives from the datastore, before
/// aliases are coalesced. Every field is optional; numeric fields accept
/// either numbers or numeric text.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawTripRow {
    pub trip_id: Option<String>,
    pub order_number: Option<String>,
    pub status: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub selectedclient: Option<String>,
    pub selected_client: Option<String>,
    pub cargo: Option<String>,
    pub vehicle_type: Option<String>,

    pub planned_start_time: Option<String>,
    pub actual_start_time: Option<String>,
    pub planned_finish_time: Option<String>,
    pub actual_finish_time: Option<String>,

    #[serde(deserialize_with = "lenient_f64")]
    pub planned_distance: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub actual_distance: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub distance: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub planned_duration_minutes: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub actual_duration_minutes: Option<f64>,

    #[serde(deserialize_with = "lenient_f64")]
    pub planned_fuel_cost: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub actual_fuel_cost: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub planned_vehicle_cost: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub actual_vehicle_cost: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub planned_driver_cost: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub actual_driver_cost: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub planned_total_cost: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub actual_total_cost: Option<f64>,

    #[serde(deserialize_with = "lenient_f64")]
    pub start_time_variance_minutes: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub finish_time_variance_minutes: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub distance_variance: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub duration_variance_minutes: Option<f64>,

    #[serde(deserialize_with = "lenient_f64")]
    pub fuel_price_used: Option<f64>,
}

impl RawTripRow {
    /// Fields read as text. JSON exports may carry numbers in these.
    pub const TEXT_FIELDS: [&'static str; 13] = [
        "trip_id",
        "order_number",
        "status",
        "origin",
        "destination",
        "selectedclient",
        "selected_client",
        "cargo",
        "vehicle_type",
        "planned_start_time",
        "actual_start_time",
        "planned_finish_time",
        "actual_finish_time",
    ];

    /// Convert into an engine snapshot. Rows without a trip id have no
    /// identity and are rejected.
    pub fn into_record(self) -> Option<TripRecord> {
        let trip_id = non_blank(self.trip_id)?;
        Some(TripRecord {
            trip_id,
            order_number: non_blank(self.order_number),
            status: self
                .status
                .as_deref()
                .map(TripStatus::from_label)
                .unwrap_or_default(),
            origin: non_blank(self.origin),
            destination: non_blank(self.destination),
            client: non_blank(self.selectedclient).or_else(|| non_blank(self.selected_client)),
            cargo: non_blank(self.cargo),
            vehicle_type: non_blank(self.vehicle_type),
            planned_start_time: non_blank(self.planned_start_time),
            actual_start_time: non_blank(self.actual_start_time),
            planned_finish_time: non_blank(self.planned_finish_time),
            actual_finish_time: non_blank(self.actual_finish_time),
            planned_distance: self.planned_distance,
            actual_distance: self.actual_distance.or(self.distance),
            planned_duration_minutes: self.planned_duration_minutes,
            actual_duration_minutes: self.actual_duration_minutes,
            planned_fuel_cost: self.planned_fuel_cost,
            actual_fuel_cost: self.actual_fuel_cost,
            planned_vehicle_cost: self.planned_vehicle_cost,
            actual_vehicle_cost: self.actual_vehicle_cost,
            planned_driver_cost: self.planned_driver_cost,
            actual_driver_cost: self.actual_driver_cost,
            planned_total_cost: self.planned_total_cost,
            actual_total_cost: self.actual_total_cost,
            start_time_variance_minutes: self.start_time_variance_minutes,
            finish_time_variance_minutes: self.finish_time_variance_minutes,
            distance_variance: self.distance_variance,
            duration_variance_minutes: self.duration_variance_minutes,
            fuel_price_used: self.fuel_price_used,
        })
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Pending,
    Assigned,
    Accepted,
    InTransit,
    Delivered,
    Completed,
    Cancelled,
    #[default]
    Unknown,
}

impl TripStatus {
    pub const ALL: [TripStatus; 8] = [
        TripStatus::Pending,
        TripStatus::Assigned,
        TripStatus::Accepted,
        TripStatus::InTransit,
        TripStatus::Delivered,
        TripStatus::Completed,
        TripStatus::Cancelled,
        TripStatus::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Pending => "pending",
            TripStatus::Assigned => "assigned",
            TripStatus::Accepted => "accepted",
            TripStatus::InTransit => "in_transit",
            TripStatus::Delivered => "delivered",
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
            TripStatus::Unknown => "unknown",
        }
    }

    /// Lenient parse of datastore status text: case-insensitive, with `-`
    /// and spaces treated as `_`. Unrecognized text maps to `Unknown`.
    pub fn from_label(label: &str) -> TripStatus {
        Self::parse(label).unwrap_or(TripStatus::Unknown)
    }

    /// Strict parse; `None` when the text names no known status.
    pub fn parse(label: &str) -> Option<TripStatus> {
        let norm = label.trim().to_lowercase().replace(['-', ' '], "_");
        let norm = if norm == "canceled" { "cancelled".to_string() } else { norm };
        Self::ALL.into_iter().find(|s| s.as_str() == norm)
    }

    /// Delivered and completed trips are the ones audited by default.
    pub fn is_closed(&self) -> bool {
        matches!(self, TripStatus::Delivered | TripStatus::Completed)
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable snapshot of a trip as consumed by the engine.
///
/// Timestamps are kept as the text the datastore supplied; they are parsed
/// per metric during reconciliation so one bad value only affects its own row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TripRecord {
    pub trip_id: String,
    pub order_number: Option<String>,
    pub status: TripStatus,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub client: Option<String>,
    pub cargo: Option<String>,
    pub vehicle_type: Option<String>,

    pub planned_start_time: Option<String>,
    pub actual_start_time: Option<String>,
    pub planned_finish_time: Option<String>,
    pub actual_finish_time: Option<String>,

    pub planned_distance: Option<f64>,
    pub actual_distance: Option<f64>,
    pub planned_duration_minutes: Option<f64>,
    pub actual_duration_minutes: Option<f64>,

    pub planned_fuel_cost: Option<f64>,
    pub actual_fuel_cost: Option<f64>,
    pub planned_vehicle_cost: Option<f64>,
    pub actual_vehicle_cost: Option<f64>,
    pub planned_driver_cost: Option<f64>,
    pub actual_driver_cost: Option<f64>,
    pub planned_total_cost: Option<f64>,
    pub actual_total_cost: Option<f64>,

    pub start_time_variance_minutes: Option<f64>,
    pub finish_time_variance_minutes: Option<f64>,
    pub distance_variance: Option<f64>,
    pub duration_variance_minutes: Option<f64>,

    pub fuel_price_used: Option<f64>,
}

impl TripRecord {
    pub fn has_precomputed_variance(&self) -> bool {
        self.start_time_variance_minutes.is_some()
            || self.finish_time_variance_minutes.is_some()
            || self.distance_variance.is_some()
            || self.duration_variance_minutes.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Time,
    Duration,
    Distance,
    Currency,
}

/// The fixed set of tracked metrics, in reconciliation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    StartTime,
    FinishTime,
    Distance,
    Duration,
    FuelCost,
    VehicleCost,
    DriverCost,
    TotalCost,
}

impl Metric {
    pub const TIME_GROUP: [Metric; 4] =
        [Metric::StartTime, Metric::FinishTime, Metric::Distance, Metric::Duration];
    pub const COST_GROUP: [Metric; 4] =
        [Metric::FuelCost, Metric::VehicleCost, Metric::DriverCost, Metric::TotalCost];

    pub fn kind(&self) -> MetricKind {
        match self {
            Metric::StartTime | Metric::FinishTime => MetricKind::Time,
            Metric::Distance => MetricKind::Distance,
            Metric::Duration => MetricKind::Duration,
            Metric::FuelCost | Metric::VehicleCost | Metric::DriverCost | Metric::TotalCost => {
                MetricKind::Currency
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::StartTime => "Start Time",
            Metric::FinishTime => "Finish Time",
            Metric::Distance => "Distance",
            Metric::Duration => "Duration",
            Metric::FuelCost => "Fuel Cost",
            Metric::VehicleCost => "Vehicle Cost",
            Metric::DriverCost => "Driver Cost",
            Metric::TotalCost => "Total Cost",
        }
    }
}

/// A planned or actual side of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Timestamp(DateTime<Utc>),
    Number(f64),
}

impl MetricValue {
    /// Signed `self - planned`, in minutes for timestamps. `None` when the
    /// two sides are not comparable.
    pub fn delta_from(&self, planned: &MetricValue) -> Option<f64> {
        match (planned, self) {
            (MetricValue::Timestamp(p), MetricValue::Timestamp(a)) => {
                Some((*a - *p).num_seconds() as f64 / 60.0)
            }
            (MetricValue::Number(p), MetricValue::Number(a)) => Some(a - p),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            MetricValue::Timestamp(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricVariance {
    pub kind: MetricKind,
    pub planned: Option<MetricValue>,
    pub actual: Option<MetricValue>,
    /// Always `actual - planned`, or the upstream precomputed variance.
    pub delta: Option<f64>,
    /// `None` when a side is missing or the comparison is neutral.
    pub is_favorable: Option<bool>,
    pub display_text: String,
}

/// A variance placed in its row of a trip's reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledMetric {
    pub metric: Metric,
    pub label: &'static str,
    pub is_total: bool,
    pub variance: MetricVariance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripReconciliation {
    pub trip_id: String,
    pub time_metrics: Vec<ReconciledMetric>,
    pub cost_metrics: Vec<ReconciledMetric>,
    /// Actual start to actual finish as `hh:mm:ss`.
    pub actual_elapsed: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FleetSummary {
    pub trip_count: usize,
    pub total_cost: f64,
    pub total_distance: f64,
    pub avg_cost_per_trip: f64,
    pub avg_cost_per_km: f64,
    pub counts_by_status: BTreeMap<TripStatus, usize>,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct SummaryCardRow {
    #[serde(rename = "Metric")]
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct StatusCountRow {
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: String,
    #[serde(rename = "Trips")]
    #[tabled(rename = "Trips")]
    pub trips: usize,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct VarianceRow {
    #[serde(rename = "Metric")]
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[serde(rename = "Planned")]
    #[tabled(rename = "Planned")]
    pub planned: String,
    #[serde(rename = "Actual")]
    #[tabled(rename = "Actual")]
    pub actual: String,
    #[serde(rename = "Variance")]
    #[tabled(rename = "Variance")]
    pub variance: String,
    #[serde(rename = "Assessment")]
    #[tabled(rename = "Assessment")]
    pub assessment: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TripAuditRow {
    #[serde(rename = "TripId")]
    #[tabled(rename = "TripId")]
    pub trip_id: String,
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: String,
    #[serde(rename = "Origin")]
    #[tabled(rename = "Origin")]
    pub origin: String,
    #[serde(rename = "Destination")]
    #[tabled(rename = "Destination")]
    pub destination: String,
    #[serde(rename = "Client")]
    #[tabled(rename = "Client")]
    pub client: String,
    #[serde(rename = "PlannedTotal")]
    #[tabled(rename = "PlannedTotal")]
    pub planned_total: String,
    #[serde(rename = "ActualTotal")]
    #[tabled(rename = "ActualTotal")]
    pub actual_total: String,
    #[serde(rename = "CostVariance")]
    #[tabled(rename = "CostVariance")]
    pub cost_variance: String,
    #[serde(rename = "FinishVariance")]
    #[tabled(rename = "FinishVariance")]
    pub finish_variance: String,
    #[serde(rename = "DistanceVariance")]
    #[tabled(rename = "DistanceVariance")]
    pub distance_variance: String,
}
