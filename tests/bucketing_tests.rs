use chrono::{Datelike, FixedOffset, NaiveDate, TimeDelta, Weekday};
use ticket_chart::core::{BucketKey, Bucketizer, Granularity, Record, bucketize};
use ticket_chart::telemetry::{CollectingSink, DiagnosticEvent};

fn kst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).expect("valid offset")
}

fn record(created_at: &str) -> Record {
    Record::new().with_field("created_at", created_at)
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[test]
fn daily_buckets_fill_gaps_between_populated_days() {
    let records = vec![
        record("2025-01-30 10:00:00"),
        record("2025-02-02 09:00:00"),
        record("2025-02-02 18:30:00"),
    ];
    let bucketed = bucketize(&records, Granularity::Daily, "created_at", &kst());

    assert_eq!(bucketed.labels(), vec!["01/30", "01/31", "02/01", "02/02"]);
    assert_eq!(bucketed.members(0), &[0]);
    assert!(bucketed.members(1).is_empty());
    assert!(bucketed.members(2).is_empty());
    assert_eq!(bucketed.members(3), &[1, 2]);
    assert!(bucketed.members(99).is_empty());
    assert_eq!(bucketed.dropped(), 0);
    assert_eq!(bucketed.total(), 3);
}

#[test]
fn daily_month_labels_mark_each_new_month() {
    let records = vec![record("2025-01-30"), record("2025-02-02")];
    let bucketed = bucketize(&records, Granularity::Daily, "created_at", &kst());

    let month_labels: Vec<Option<&str>> = bucketed
        .buckets()
        .iter()
        .map(|bucket| bucket.month_label.as_deref())
        .collect();
    assert_eq!(month_labels, vec![Some("1월"), None, Some("2월"), None]);
}

#[test]
fn gap_filling_can_be_disabled() {
    let records = vec![record("2025-01-30"), record("2025-02-02")];
    let bucketed = Bucketizer::new(Granularity::Daily, "created_at")
        .with_gap_filling(false)
        .bucketize(&records, &kst(), &CollectingSink::new());

    assert_eq!(bucketed.labels(), vec!["01/30", "02/02"]);
}

#[test]
fn gap_filling_falls_back_to_populated_buckets_past_the_bound() {
    let records = vec![record("2000-01-01"), record("2025-01-01")];
    let bucketed = bucketize(&records, Granularity::Daily, "created_at", &kst());

    assert_eq!(bucketed.len(), 2);
    assert_eq!(bucketed.members(0), &[0]);
    assert_eq!(bucketed.members(1), &[1]);
}

#[test]
fn weekly_buckets_start_on_monday_and_span_seven_days() {
    let records = vec![
        record("2025-01-01 12:00:00"),
        record("2025-01-19 23:59:59"),
        record("2025-01-20 00:00:00"),
    ];
    let bucketed = bucketize(&records, Granularity::Weekly, "created_at", &kst());

    assert_eq!(
        bucketed.labels(),
        vec!["12/30~01/05", "01/06~01/12", "01/13~01/19", "01/20~01/26"]
    );
    for bucket in bucketed.buckets() {
        assert_eq!(bucket.start.weekday(), Weekday::Mon);
        assert_eq!(bucket.end - bucket.start, TimeDelta::days(7));
    }
    assert_eq!(bucketed.members(2), &[1]);
    assert_eq!(bucketed.members(3), &[2]);
    assert_eq!(
        bucketed.buckets()[0].key,
        BucketKey::Week(date(2024, 12, 30))
    );
}

#[test]
fn weekly_month_label_follows_the_month_the_week_opens() {
    let records = vec![record("2025-01-27"), record("2025-02-10")];
    let bucketed = bucketize(&records, Granularity::Weekly, "created_at", &kst());

    // 01/27~02/02 contains Feb 1st, so February starts there.
    let month_labels: Vec<Option<&str>> = bucketed
        .buckets()
        .iter()
        .map(|bucket| bucket.month_label.as_deref())
        .collect();
    assert_eq!(month_labels, vec![Some("2월"), None, None]);
}

#[test]
fn monthly_buckets_use_month_names_without_month_captions() {
    let records = vec![record("2024-12-15"), record("2025-02-03")];
    let bucketed = bucketize(&records, Granularity::Monthly, "created_at", &kst());

    assert_eq!(bucketed.labels(), vec!["12월", "1월", "2월"]);
    assert!(bucketed.buckets().iter().all(|bucket| bucket.month_label.is_none()));
    assert_eq!(bucketed.buckets()[1].start.date(), date(2025, 1, 1));
    assert_eq!(bucketed.buckets()[1].end.date(), date(2025, 2, 1));
}

#[test]
fn offset_timestamps_are_bucketed_in_the_target_zone() {
    let records = vec![record("2025-01-31T20:00:00Z")];
    let bucketed = bucketize(&records, Granularity::Daily, "created_at", &kst());

    assert_eq!(bucketed.labels(), vec!["02/01"]);
    let time = date(2025, 2, 1).and_hms_opt(5, 0, 0).expect("valid time");
    assert_eq!(bucketed.bucket_index_of(time), Some(0));
    assert_eq!(bucketed.bucket_index_of(time + TimeDelta::days(1)), None);
}

#[test]
fn unparseable_timestamps_are_dropped_and_reported() {
    let records = vec![
        record("2025-01-01"),
        record("yesterday"),
        Record::new().with_field("title", "no timestamp"),
    ];
    let sink = CollectingSink::new();
    let bucketed = Bucketizer::new(Granularity::Daily, "created_at").bucketize(&records, &kst(), &sink);

    assert_eq!(bucketed.len(), 1);
    assert_eq!(bucketed.dropped(), 2);
    assert_eq!(bucketed.total(), 3);
    assert!(sink.events().contains(&DiagnosticEvent::RecordsDropped {
        field: "created_at".to_owned(),
        dropped: 2,
        total: 3,
    }));
    assert!(sink.events().contains(&DiagnosticEvent::SeriesBucketed {
        granularity: Granularity::Daily,
        buckets: 1,
        records: 1,
    }));
}

#[test]
fn empty_input_yields_no_buckets() {
    let bucketed = bucketize(&[], Granularity::Weekly, "created_at", &kst());
    assert!(bucketed.is_empty());
    assert_eq!(bucketed.dropped(), 0);
    assert!(bucketed.labels().is_empty());
}

#[test]
fn epoch_millis_and_seconds_land_in_the_same_bucket() {
    let records = vec![
        Record::new().with_field("created_at", 1_735_689_600.0),
        Record::new().with_field("created_at", 1_735_689_600_000.0),
    ];
    let bucketed = bucketize(&records, Granularity::Daily, "created_at", &kst());

    assert_eq!(bucketed.labels(), vec!["01/01"]);
    assert_eq!(bucketed.members(0), &[0, 1]);
}

#[test]
fn daily_labels_carry_the_year_once_dates_would_repeat() {
    let records = vec![record("2024-03-01 10:00:00"), record("2025-03-01 10:00:00")];
    let bucketed = bucketize(&records, Granularity::Daily, "created_at", &kst());

    let labels = bucketed.labels();
    assert_eq!(labels.len(), 366);
    assert_eq!(labels[0], "2024/03/01");
    assert_eq!(labels[365], "2025/03/01");
    let unique: std::collections::HashSet<&String> = labels.iter().collect();
    assert_eq!(unique.len(), labels.len());
}

#[test]
fn short_runs_across_new_year_keep_month_day_labels() {
    let records = vec![record("2024-12-30 10:00:00"), record("2025-01-02 10:00:00")];
    let bucketed = bucketize(&records, Granularity::Daily, "created_at", &kst());
    assert_eq!(bucketed.labels(), vec!["12/30", "12/31", "01/01", "01/02"]);
}
