// Plan-vs-actual reconciliation for completed fleet trips.
//
// The engine modules (`filter`, `summary`, `reconcile`, `variance`)
// are pure functions over `types::TripRecord` snapshots. `loader`,
// `reports` and `output` wrap them for the console tool.

pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod logging;
pub mod output;
pub mod reconcile;
pub mod reports;
pub mod summary;
pub mod types;
pub mod util;
pub mod variance;

pub use error::AuditError;
pub use filter::{filter, StatusFilter};
pub use reconcile::reconcile;
pub use summary::summarize;
pub use variance::{compute_cost_variance, compute_variance};
