#[cfg(test)]
mod tests {
    use trip_audit::reconcile;
    use trip_audit::types::{Metric, TripRecord, TripStatus};

    fn full_trip() -> TripRecord {
        TripRecord {
            trip_id: "TRP-ABC-001".into(),
            status: TripStatus::Delivered,
            planned_start_time: Some("2024-01-01T10:00:00Z".into()),
            actual_start_time: Some("2024-01-01T10:15:00Z".into()),
            planned_finish_time: Some("2024-01-01T14:00:00Z".into()),
            actual_finish_time: Some("2024-01-01T13:50:00Z".into()),
            planned_distance: Some(200.0),
            actual_distance: Some(210.0),
            planned_duration_minutes: Some(240.0),
            actual_duration_minutes: Some(215.0),
            planned_fuel_cost: Some(1200.0),
            actual_fuel_cost: Some(1350.0),
            planned_vehicle_cost: Some(400.0),
            actual_vehicle_cost: Some(400.0),
            planned_driver_cost: Some(300.0),
            actual_driver_cost: Some(0.0),
            planned_total_cost: Some(1900.0),
            actual_total_cost: Some(1750.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_rows_are_in_fixed_order() {
        let rec = reconcile(&full_trip());
        let time: Vec<Metric> = rec.time_metrics.iter().map(|m| m.metric).collect();
        let cost: Vec<Metric> = rec.cost_metrics.iter().map(|m| m.metric).collect();
        assert_eq!(time, Metric::TIME_GROUP.to_vec());
        assert_eq!(cost, Metric::COST_GROUP.to_vec());
    }

    #[test]
    fn test_full_trip_classifications() {
        let rec = reconcile(&full_trip());
        let t = &rec.time_metrics;
        assert_eq!(t[0].variance.display_text, "15m late");
        assert_eq!(t[1].variance.display_text, "10m early");
        assert_eq!(t[2].variance.display_text, "10.00 km longer");
        assert_eq!(t[3].variance.display_text, "25m faster");

        let c = &rec.cost_metrics;
        assert_eq!(c[0].variance.display_text, "150.00 over budget");
        assert_eq!(c[1].variance.display_text, "No variance");
        assert_eq!(c[2].variance.display_text, "300.00 under budget");
        assert_eq!(c[3].variance.display_text, "150.00 under budget");
        assert_eq!(c[3].variance.is_favorable, Some(true));
        assert_eq!(rec.actual_elapsed.as_deref(), Some("03:35:00"));
    }

    #[test]
    fn test_only_total_row_is_flagged() {
        let rec = reconcile(&full_trip());
        let flagged: Vec<Metric> =
            rec.cost_metrics.iter().filter(|m| m.is_total).map(|m| m.metric).collect();
        assert_eq!(flagged, vec![Metric::TotalCost]);
        assert!(rec.time_metrics.iter().all(|m| !m.is_total));
    }

    #[test]
    fn test_cost_group_always_has_four_rows() {
        let bare = TripRecord { trip_id: "bare".into(), ..Default::default() };
        let rec = reconcile(&bare);
        assert_eq!(rec.cost_metrics.len(), 4);
        assert_eq!(rec.time_metrics.len(), 4);
        assert!(rec.cost_metrics.iter().all(|m| m.variance.display_text == "N/A"));
        assert!(rec.time_metrics.iter().all(|m| m.variance.is_favorable.is_none()));
    }

    #[test]
    fn test_malformed_timestamp_only_affects_its_row() {
        let mut trip = full_trip();
        trip.actual_start_time = Some("31/31/2024 25:61".into());
        let rec = reconcile(&trip);

        assert_eq!(rec.time_metrics[0].variance.display_text, "N/A");
        assert_eq!(rec.time_metrics[0].variance.is_favorable, None);
        assert_eq!(rec.time_metrics[1].variance.display_text, "10m early");
        assert_eq!(rec.cost_metrics[3].variance.display_text, "150.00 under budget");
        assert_eq!(rec.actual_elapsed, None);
    }

    #[test]
    fn test_non_finite_number_degrades_to_not_available() {
        let mut trip = full_trip();
        trip.actual_distance = Some(f64::INFINITY);
        let rec = reconcile(&trip);
        assert_eq!(rec.time_metrics[2].variance.display_text, "N/A");
        assert_eq!(rec.time_metrics[3].variance.display_text, "25m faster");
    }

    #[test]
    fn test_precomputed_fields_win() {
        let mut trip = full_trip();
        trip.distance_variance = Some(-5.0);
        trip.start_time_variance_minutes = Some(0.0);
        let rec = reconcile(&trip);

        assert_eq!(rec.time_metrics[2].variance.delta, Some(-5.0));
        assert_eq!(rec.time_metrics[2].variance.display_text, "5.00 km shorter");
        assert_eq!(rec.time_metrics[0].variance.display_text, "No variance");
    }

    #[test]
    fn test_source_record_is_untouched() {
        let trip = full_trip();
        let before = trip.clone();
        let _ = reconcile(&trip);
        assert_eq!(trip, before);
    }
}
