#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use trip_audit::output::{render_table, write_csv, write_json};
    use trip_audit::reports::{
        assessment, audit_rows, export_audit, status_rows, summary_rows, variance_rows,
    };
    use trip_audit::types::{TripRecord, TripStatus};
    use trip_audit::{reconcile, summarize, AuditError};

    fn trips() -> Vec<TripRecord> {
        vec![
            TripRecord {
                trip_id: "TRP-1".into(),
                status: TripStatus::Delivered,
                origin: Some("Durban".into()),
                destination: Some("Cape Town".into()),
                client: Some("Acme".into()),
                planned_finish_time: Some("2024-03-01T16:00:00Z".into()),
                actual_finish_time: Some("2024-03-01T17:30:00Z".into()),
                planned_distance: Some(1600.0),
                actual_distance: Some(1650.0),
                planned_total_cost: Some(20000.0),
                actual_total_cost: Some(21250.0),
                ..Default::default()
            },
            TripRecord {
                trip_id: "TRP-2".into(),
                status: TripStatus::Completed,
                actual_total_cost: Some(3750.0),
                actual_distance: Some(350.0),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_summary_cards() {
        let rows = summary_rows(&summarize(&trips()));
        let values: Vec<(&str, &str)> =
            rows.iter().map(|r| (r.metric.as_str(), r.value.as_str())).collect();
        assert_eq!(
            values,
            vec![
                ("Trips", "2"),
                ("Total Cost", "25,000.00"),
                ("Total Distance", "2,000.00 km"),
                ("Avg Cost / Trip", "12,500.00"),
                ("Avg Cost / km", "12.50"),
            ]
        );
    }

    #[test]
    fn test_status_rows() {
        let rows = status_rows(&summarize(&trips()));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].status, "delivered");
        assert_eq!(rows[1].status, "completed");
        assert!(rows.iter().all(|r| r.trips == 1));
    }

    #[test]
    fn test_variance_rows() {
        let rows = variance_rows(&reconcile(&trips()[0]));
        assert_eq!(rows.len(), 8);

        let finish = &rows[1];
        assert_eq!(finish.metric, "Finish Time");
        assert_eq!(finish.planned, "2024-03-01 16:00");
        assert_eq!(finish.actual, "2024-03-01 17:30");
        assert_eq!(finish.variance, "1h 30m late");
        assert_eq!(finish.assessment, "Unfavorable");

        assert_eq!(rows[0].planned, "N/A");
        assert_eq!(rows[0].assessment, "Neutral");

        let total = &rows[7];
        assert_eq!(total.metric, "**Total Cost**");
        assert_eq!(total.variance, "1,250.00 over budget");
    }

    #[test]
    fn test_audit_rows() {
        let rows = audit_rows(&trips());
        assert_eq!(rows[0].trip_id, "TRP-1");
        assert_eq!(rows[0].cost_variance, "1,250.00 over budget");
        assert_eq!(rows[0].finish_variance, "1h 30m late");
        assert_eq!(rows[0].distance_variance, "50.00 km longer");
        assert_eq!(rows[1].planned_total, "0.00");
        assert_eq!(rows[1].cost_variance, "3,750.00 over budget");
        assert_eq!(rows[1].finish_variance, "N/A");
        assert_eq!(rows[1].origin, "");
    }

    #[test]
    fn test_assessment_labels() {
        assert_eq!(assessment(Some(true)), "Favorable");
        assert_eq!(assessment(Some(false)), "Unfavorable");
        assert_eq!(assessment(None), "Neutral");
    }

    #[test]
    fn test_render_table_limits_rows() {
        let rows = audit_rows(&trips());
        let table = render_table(&rows, 1).unwrap();
        assert!(table.contains("TRP-1"));
        assert!(!table.contains("TRP-2"));
        assert!(render_table::<trip_audit::types::TripAuditRow>(&[], 5).is_none());
    }

    #[test]
    fn test_export_files() {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("trip_audit.csv");
        let json_path = dir.path().join("fleet_summary.json");

        write_csv(&csv_path, &audit_rows(&trips())).unwrap();
        write_json(&json_path, &summarize(&trips())).unwrap();

        let csv = std::fs::read_to_string(&csv_path).unwrap();
        assert!(csv.starts_with("TripId,Status,Origin,Destination,Client"));
        assert_eq!(csv.lines().count(), 3);

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(json["trip_count"], 2);
        assert_eq!(json["total_cost"], 25000.0);
        assert_eq!(json["counts_by_status"]["delivered"], 1);
    }

    #[test]
    fn test_export_audit_writes_both_files() {
        let dir = TempDir::new().unwrap();
        let (audit_file, summary_file) = export_audit(dir.path(), &trips()).unwrap();
        assert!(audit_file.exists());
        assert!(summary_file.exists());
    }

    #[test]
    fn test_export_audit_fails_on_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("no_such_dir");
        let result = export_audit(&missing, &trips());
        assert!(matches!(result, Err(AuditError::Csv(_)) | Err(AuditError::Io(_))));
        assert!(!missing.join("fleet_summary.json").exists());
    }
}
