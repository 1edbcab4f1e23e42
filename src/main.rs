// Entry point and interactive console flow.
//
// - Option [1] loads a trip export and prints load diagnostics.
// - Option [2] changes the status filter and search term.
// - Option [3] prints the fleet summary cards for the current filter.
// - Option [4] prints the plan-vs-actual table for one trip.
// - Option [5] writes the audit CSV and summary JSON.
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};
use trip_audit::config::AppConfig;
use trip_audit::types::TripRecord;
use trip_audit::{filter, loader, logging, output, reconcile, reports, summarize, util, StatusFilter};

// Session state: the loaded snapshot and the active filters. Every report
// recomputes from this, nothing derived is kept.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState::default()));

#[derive(Default)]
struct AppState {
    data: Option<Vec<TripRecord>>,
    status: StatusFilter,
    search: String,
}

fn state() -> MutexGuard<'static, AppState> {
    APP_STATE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn prompt(label: &str) -> String {
    print!("{}", label);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

fn read_choice() -> String {
    prompt("Enter choice: ")
}

/// Snapshot of the trips matching the active filters, or `None` with a
/// message if nothing is loaded yet.
fn filtered_trips() -> Option<Vec<TripRecord>> {
    let state = state();
    let Some(data) = state.data.as_ref() else {
        println!("Error: No trips loaded. Please load a trip export first (option 1).\n");
        return None;
    };
    Some(filter(data, &state.status, &state.search))
}

fn handle_load(config: &AppConfig) {
    let entered = prompt(&format!("Trip export path [{}]: ", config.input_path.display()));
    let path = if entered.is_empty() { config.input_path.clone() } else { entered.into() };
    match loader::load_trips(&path) {
        Ok((data, load_report)) => {
            println!(
                "Processing trips... ({} rows read, {} loaded)",
                util::format_int(load_report.total_rows),
                util::format_int(load_report.loaded_rows)
            );
            if load_report.parse_errors > 0 {
                println!(
                    "Note: {} rows skipped due to parse/validation errors.",
                    util::format_int(load_report.parse_errors)
                );
            }
            if load_report.with_precomputed > 0 {
                println!(
                    "Info: {} trips carry precomputed variances; those are used as supplied.",
                    util::format_int(load_report.with_precomputed)
                );
            }
            println!();
            state().data = Some(data);
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "load failed");
            eprintln!("Failed to load file: {}\n", e);
        }
    }
}

fn handle_set_filters() {
    let current = {
        let state = state();
        (state.status, state.search.clone())
    };
    let status_in = prompt(&format!("Status filter (all, delivered, in_transit, ...) [{}]: ", current.0));
    let status = if status_in.is_empty() {
        current.0
    } else {
        match status_in.parse::<StatusFilter>() {
            Ok(s) => s,
            Err(e) => {
                println!("{}. Keeping '{}'.", e, current.0);
                current.0
            }
        }
    };
    let search = prompt("Search trip id / order / origin / destination (blank for none): ");

    let mut state = state();
    state.status = status;
    state.search = search;
    println!("Filters: status={}, search='{}'\n", state.status, state.search);
}

fn handle_summary(config: &AppConfig) {
    let Some(trips) = filtered_trips() else { return };
    let summary = summarize(&trips);
    output::preview_table("Fleet Summary", None, &reports::summary_rows(&summary), usize::MAX);
    output::preview_table("Trips by Status", None, &reports::status_rows(&summary), usize::MAX);
    let note = format!("first {} trips", config.preview_rows);
    output::preview_table(
        "Trip Audit",
        Some(note.as_str()),
        &reports::audit_rows(&trips),
        config.preview_rows,
    );
}

fn handle_reconcile() {
    let Some(trips) = filtered_trips() else { return };
    let trip_id = prompt("Trip id: ");
    let Some(trip) = trips.iter().find(|t| t.trip_id.eq_ignore_ascii_case(&trip_id)) else {
        println!("{}\n", trip_audit::AuditError::TripNotFound(trip_id));
        return;
    };

    let rec = reconcile(trip);
    let note = rec.actual_elapsed.as_ref().map(|e| format!("actual elapsed {}", e));
    output::preview_table(
        &format!("Plan vs Actual: {}", rec.trip_id),
        note.as_deref(),
        &reports::variance_rows(&rec),
        usize::MAX,
    );
}

fn handle_export(config: &AppConfig) {
    let Some(trips) = filtered_trips() else { return };
    if trips.is_empty() {
        println!("{}\n", trip_audit::AuditError::NoData);
        return;
    }

    match reports::export_audit(&config.output_dir, &trips) {
        Ok((audit_file, summary_file)) => println!(
            "Exported {} trips to {} and {}\n",
            util::format_int(trips.len()),
            audit_file.display(),
            summary_file.display()
        ),
        Err(e) => {
            tracing::error!(dir = %config.output_dir.display(), error = %e, "export failed");
            eprintln!("Write error: {}\n", e);
        }
    }
}

fn main() {
    let config = match AppConfig::read() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid configuration, using defaults: {}", e);
            AppConfig::default()
        }
    };
    logging::init(&config.log_filter);

    {
        let mut state = state();
        state.status = config.status_filter().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring configured status filter");
            StatusFilter::All
        });
        state.search = config.default_search.clone();
    }

    loop {
        println!("Trip Reconciliation");
        println!("[1] Load trips");
        println!("[2] Set filters");
        println!("[3] Fleet summary");
        println!("[4] Reconcile a trip");
        println!("[5] Export audit");
        println!("[0] Exit\n");
        match read_choice().as_str() {
            "1" => handle_load(&config),
            "2" => handle_set_filters(),
            "3" => handle_summary(&config),
            "4" => handle_reconcile(),
            "5" => handle_export(&config),
            "0" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 0-5.\n"),
        }
    }
}
