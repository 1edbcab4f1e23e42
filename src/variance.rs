// Planned-vs-actual variance for a single metric.
//
// Each metric kind is described by a `MetricPolicy` row: its unit, how a
// delta magnitude is rendered, the words used for negative and positive
// deltas, and whether a higher actual value is good. The generic path only
// reads the table, so new kinds are added by adding a row.
//
// Currency is the exception. Cost rows follow the budget rules in
// `compute_cost_variance`, where an absent figure means zero spend.

use crate::types::{MetricKind, MetricValue, MetricVariance};
use crate::util::{format_currency, format_distance, format_minutes, NOT_AVAILABLE};

pub const NO_VARIANCE: &str = "No variance";

#[derive(Debug, Clone, Copy)]
pub struct MetricPolicy {
    pub kind: MetricKind,
    pub unit: &'static str,
    pub higher_is_better: bool,
    /// Direction word for `delta < 0`.
    pub below: &'static str,
    /// Direction word for `delta > 0`.
    pub above: &'static str,
    /// Renders the absolute delta, without direction.
    pub formatter: fn(f64) -> String,
    /// Deltas derived from planned/actual are rounded to whole units.
    pub whole_units: bool,
}

fn minutes_magnitude(v: f64) -> String {
    format_minutes(v, None)
}

static POLICIES: [MetricPolicy; 4] = [
    MetricPolicy {
        kind: MetricKind::Time,
        unit: "min",
        higher_is_better: false,
        below: "early",
        above: "late",
        formatter: minutes_magnitude,
        whole_units: true,
    },
    MetricPolicy {
        kind: MetricKind::Duration,
        unit: "min",
        higher_is_better: false,
        below: "faster",
        above: "slower",
        formatter: minutes_magnitude,
        whole_units: true,
    },
    MetricPolicy {
        kind: MetricKind::Distance,
        unit: "km",
        higher_is_better: false,
        below: "shorter",
        above: "longer",
        formatter: format_distance,
        whole_units: false,
    },
    MetricPolicy {
        kind: MetricKind::Currency,
        unit: "currency",
        higher_is_better: false,
        below: "under budget",
        above: "over budget",
        formatter: format_currency,
        whole_units: false,
    },
];

impl MetricPolicy {
    pub fn for_kind(kind: MetricKind) -> &'static MetricPolicy {
        // POLICIES has one row per MetricKind variant.
        match kind {
            MetricKind::Time => &POLICIES[0],
            MetricKind::Duration => &POLICIES[1],
            MetricKind::Distance => &POLICIES[2],
            MetricKind::Currency => &POLICIES[3],
        }
    }

    pub fn with_higher_is_better(mut self, higher_is_better: bool) -> Self {
        self.higher_is_better = higher_is_better;
        self
    }

    /// True when the delta renders the same as no delta at all, e.g. a
    /// precomputed 0.3 minutes shown as "0m".
    pub fn reads_as_zero(&self, delta: f64) -> bool {
        delta == 0.0 || (self.formatter)(delta.abs()) == (self.formatter)(0.0)
    }

    /// A zero delta is always favorable.
    pub fn is_favorable(&self, delta: f64) -> bool {
        if self.reads_as_zero(delta) {
            true
        } else if self.higher_is_better {
            delta >= 0.0
        } else {
            delta <= 0.0
        }
    }

    pub fn describe(&self, delta: f64) -> String {
        if self.reads_as_zero(delta) {
            return NO_VARIANCE.to_string();
        }
        let word = if delta < 0.0 { self.below } else { self.above };
        format!("{} {}", (self.formatter)(delta.abs()), word)
    }
}

/// Compare one metric using the default policy for its kind.
pub fn compute_variance(
    kind: MetricKind,
    planned: Option<MetricValue>,
    actual: Option<MetricValue>,
    precomputed: Option<f64>,
) -> MetricVariance {
    compute_variance_with(MetricPolicy::for_kind(kind), planned, actual, precomputed)
}

/// Compare one metric under an explicit policy.
///
/// A finite `precomputed` delta from the source record wins over anything
/// derived from `planned`/`actual`. Currency ignores it and uses the budget
/// rules.
pub fn compute_variance_with(
    policy: &MetricPolicy,
    planned: Option<MetricValue>,
    actual: Option<MetricValue>,
    precomputed: Option<f64>,
) -> MetricVariance {
    if policy.kind == MetricKind::Currency {
        let mut v = compute_cost_variance(
            planned.and_then(|p| p.as_number()),
            actual.and_then(|a| a.as_number()),
        );
        if policy.higher_is_better {
            v.is_favorable = v.is_favorable.map(|f| !f);
        }
        return v;
    }

    let delta = match precomputed.filter(|d| d.is_finite()) {
        Some(d) => Some(d),
        None => match (&planned, &actual) {
            (Some(p), Some(a)) => a
                .delta_from(p)
                .filter(|d| d.is_finite())
                .map(|d| if policy.whole_units { d.round() + 0.0 } else { d }),
            _ => None,
        },
    };

    match delta {
        Some(delta) => MetricVariance {
            kind: policy.kind,
            planned,
            actual,
            delta: Some(delta),
            is_favorable: Some(policy.is_favorable(delta)),
            display_text: policy.describe(delta),
        },
        None => not_available(policy.kind, planned, actual),
    }
}

pub fn not_available(
    kind: MetricKind,
    planned: Option<MetricValue>,
    actual: Option<MetricValue>,
) -> MetricVariance {
    MetricVariance {
        kind,
        planned,
        actual,
        delta: None,
        is_favorable: None,
        display_text: NOT_AVAILABLE.to_string(),
    }
}

/// Budget comparison for a cost figure.
///
/// A missing or non-finite side counts as zero spend; only when both sides
/// are absent is the row "N/A". Zero planned with non-zero actual is
/// unplanned spend and reads as the full actual over budget.
pub fn compute_cost_variance(planned: Option<f64>, actual: Option<f64>) -> MetricVariance {
    let planned = planned.filter(|v| v.is_finite());
    let actual = actual.filter(|v| v.is_finite());
    if planned.is_none() && actual.is_none() {
        return not_available(MetricKind::Currency, None, None);
    }

    let p = planned.unwrap_or(0.0);
    let a = actual.unwrap_or(0.0);
    let delta = a - p;

    let (display_text, is_favorable) = if p == 0.0 && a == 0.0 {
        (NO_VARIANCE.to_string(), None)
    } else if p > 0.0 && a == 0.0 {
        (format!("{} under budget", format_currency(p)), Some(true))
    } else if p == 0.0 && a > 0.0 {
        (format!("{} over budget", format_currency(a)), Some(false))
    } else if delta == 0.0 {
        (NO_VARIANCE.to_string(), None)
    } else if delta > 0.0 {
        (format!("{} over budget", format_currency(delta)), Some(false))
    } else {
        (format!("{} under budget", format_currency(delta.abs())), Some(true))
    };

    MetricVariance {
        kind: MetricKind::Currency,
        planned: Some(MetricValue::Number(p)),
        actual: Some(MetricValue::Number(a)),
        delta: Some(delta),
        is_favorable,
        display_text,
    }
}
