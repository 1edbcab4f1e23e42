use crate::error::AuditError;
use crate::types::{TripRecord, TripStatus};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// Delivered and completed trips only.
    #[default]
    All,
    /// Exactly one status, including ones excluded from the default view.
    Only(TripStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: TripStatus) -> bool {
        match self {
            StatusFilter::All => status.is_closed(),
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        TripStatus::parse(trimmed)
            .map(StatusFilter::Only)
            .ok_or_else(|| AuditError::UnknownStatus(trimmed.to_string()))
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => write!(f, "{}", status),
        }
    }
}

/// Apply the status filter and the free-text search, in that order, keeping
/// the input order of whatever survives.
///
/// The search is a case-insensitive substring match over trip id, order
/// number, origin and destination. The term is trimmed first, so leading
/// and trailing spaces never take part in the match, and a blank or
/// whitespace-only search matches every trip.
pub fn filter(trips: &[TripRecord], status: &StatusFilter, search: &str) -> Vec<TripRecord> {
    let needle = search.trim().to_lowercase();
    trips
        .iter()
        .filter(|t| status.matches(t.status))
        .filter(|t| needle.is_empty() || matches_search(t, &needle))
        .cloned()
        .collect()
}

fn matches_search(trip: &TripRecord, needle: &str) -> bool {
    [
        Some(trip.trip_id.as_str()),
        trip.order_number.as_deref(),
        trip.origin.as_deref(),
        trip.destination.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}
