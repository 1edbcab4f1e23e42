#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use trip_audit::types::{MetricKind, MetricValue};
    use trip_audit::util::{
        format_duration_hms, format_int, format_metric_value, format_minutes, format_timestamp,
    };

    #[test]
    fn test_duration_hms() {
        assert_eq!(format_duration_hms(0), "00:00:00");
        assert_eq!(format_duration_hms(59), "00:00:59");
        assert_eq!(format_duration_hms(3_725), "01:02:05");
        assert_eq!(format_duration_hms(100 * 3600), "100:00:00");
        assert_eq!(format_duration_hms(-90), "-00:01:30");
    }

    #[test]
    fn test_minutes_with_and_without_suffix() {
        assert_eq!(format_minutes(0.0, None), "0m");
        assert_eq!(format_minutes(45.0, None), "45m");
        assert_eq!(format_minutes(60.0, None), "1h 0m");
        assert_eq!(format_minutes(135.0, Some("late")), "2h 15m late");
        assert_eq!(format_minutes(-135.0, Some("early")), "2h 15m early");
        assert_eq!(format_minutes(14.6, Some("")), "15m");
    }

    #[test]
    fn test_metric_value_display() {
        let ts = MetricValue::Timestamp(Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap());
        assert_eq!(format_metric_value(MetricKind::Time, Some(&ts)), "2024-05-06 07:08");
        assert_eq!(format_metric_value(MetricKind::Time, None), "N/A");
        assert_eq!(
            format_metric_value(MetricKind::Duration, Some(&MetricValue::Number(90.0))),
            "1h 30m"
        );
        assert_eq!(
            format_metric_value(MetricKind::Distance, Some(&MetricValue::Number(1234.5))),
            "1,234.50 km"
        );
        assert_eq!(
            format_metric_value(MetricKind::Currency, Some(&MetricValue::Number(99.999))),
            "100.00"
        );
    }

    #[test]
    fn test_timestamp_and_counts() {
        let dt = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 0).unwrap();
        assert_eq!(format_timestamp(&dt), "2024-12-31 23:59");
        assert_eq!(format_int(9_855usize), "9,855");
    }
}
