use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::primitives::parse_timestamp;
use crate::core::types::{Granularity, Record};
use crate::telemetry::{DiagnosticEvent, DiagnosticsSink, TracingSink};

/// Upper bound on buckets synthesized by gap filling.
///
/// A single far-off timestamp would otherwise expand a daily chart into tens
/// of thousands of empty buckets; past this bound only populated buckets are
/// emitted.
pub const MAX_GAP_FILLED_BUCKETS: usize = 4_000;

/// Sortable identity of one time bucket.
///
/// Ordering follows bucket start time for keys of the same granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BucketKey {
    Day(NaiveDate),
    /// Monday that starts the week.
    Week(NaiveDate),
    Month { year: i32, month: u32 },
}

impl BucketKey {
    /// Classifies a wall-clock time into its bucket.
    #[must_use]
    pub fn for_time(time: NaiveDateTime, granularity: Granularity) -> Self {
        let date = time.date();
        match granularity {
            Granularity::Daily => Self::Day(date),
            Granularity::Weekly => {
                let offset = u64::from(date.weekday().num_days_from_monday());
                Self::Week(date.checked_sub_days(Days::new(offset)).unwrap_or(date))
            }
            Granularity::Monthly => Self::Month {
                year: date.year(),
                month: date.month(),
            },
        }
    }

    #[must_use]
    pub fn granularity(self) -> Granularity {
        match self {
            Self::Day(_) => Granularity::Daily,
            Self::Week(_) => Granularity::Weekly,
            Self::Month { .. } => Granularity::Monthly,
        }
    }

    /// First calendar day covered by the bucket.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        match self {
            Self::Day(date) | Self::Week(date) => date,
            Self::Month { year, month } => {
                NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
            }
        }
    }

    /// Last calendar day covered by the bucket (inclusive).
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        self.next()
            .map(|next| next.first_day().pred_opt().unwrap_or(NaiveDate::MAX))
            .unwrap_or(NaiveDate::MAX)
    }

    /// The bucket immediately after this one, if representable.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Day(date) => date.succ_opt().map(Self::Day),
            Self::Week(date) => date.checked_add_days(Days::new(7)).map(Self::Week),
            Self::Month { .. } => self
                .first_day()
                .checked_add_months(Months::new(1))
                .map(|date| Self::Month {
                    year: date.year(),
                    month: date.month(),
                }),
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day(date) | Self::Week(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Month { year, month } => write!(f, "{year}-{month}"),
        }
    }
}

/// Time window aggregating many records.
///
/// `end` is exclusive. Weekly buckets start on Monday 00:00 and span exactly
/// seven days; monthly buckets span one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub key: BucketKey,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub label: String,
    /// Set on the first bucket overlapping each new calendar month.
    pub month_label: Option<String>,
}

impl Bucket {
    fn from_key(key: BucketKey) -> Self {
        let start = key.first_day().and_time(NaiveTime::MIN);
        let end = key
            .next()
            .map(|next| next.first_day().and_time(NaiveTime::MIN))
            .unwrap_or(NaiveDateTime::MAX);
        Self {
            key,
            start,
            end,
            label: bucket_label(key),
            month_label: None,
        }
    }

    #[must_use]
    pub fn contains(&self, time: NaiveDateTime) -> bool {
        time >= self.start && time < self.end
    }
}

fn bucket_label(key: BucketKey) -> String {
    match key {
        BucketKey::Day(date) => date.format("%m/%d").to_string(),
        BucketKey::Week(monday) => format!(
            "{}~{}",
            monday.format("%m/%d"),
            key.last_day().format("%m/%d")
        ),
        BucketKey::Month { month, .. } => month_text(month),
    }
}

/// Daily and weekly label carrying the year of its first day.
fn dated_label(key: BucketKey) -> Option<String> {
    match key {
        BucketKey::Day(date) => Some(date.format("%Y/%m/%d").to_string()),
        BucketKey::Week(monday) => Some(format!(
            "{}~{}",
            monday.format("%Y/%m/%d"),
            key.last_day().format("%m/%d")
        )),
        BucketKey::Month { .. } => None,
    }
}

/// Switches daily and weekly labels to their dated form once a run spans
/// long enough for `MM/DD` to repeat.
fn qualify_repeated_labels(buckets: &mut [Bucket]) {
    let repeats = {
        let mut seen = HashSet::with_capacity(buckets.len());
        buckets.iter().any(|bucket| !seen.insert(bucket.label.as_str()))
    };
    if !repeats {
        return;
    }
    for bucket in buckets.iter_mut() {
        if let Some(label) = dated_label(bucket.key) {
            bucket.label = label;
        }
    }
}

pub(crate) fn month_text(month: u32) -> String {
    format!("{month}월")
}

/// Calendar month a bucket represents on a sparse month axis.
///
/// A bucket that contains the 1st of a month stands for that month; any other
/// bucket stands for the month it starts in.
fn axis_month(key: BucketKey) -> (i32, u32) {
    let first = key.first_day();
    let last = key.last_day();
    let contains_first_of_month = first.day() == 1 || last.month() != first.month();
    let date = if contains_first_of_month && first.day() != 1 {
        last
    } else {
        first
    };
    (date.year(), date.month())
}

fn assign_month_labels(buckets: &mut [Bucket]) {
    let mut previous: Option<(i32, u32)> = None;
    for bucket in buckets.iter_mut() {
        if bucket.key.granularity() == Granularity::Monthly {
            continue;
        }
        let month = axis_month(bucket.key);
        if previous != Some(month) {
            bucket.month_label = Some(month_text(month.1));
        }
        previous = Some(month);
    }
}

/// Records grouped into ordered buckets.
///
/// `members[i]` lists indices into the source record slice for `buckets[i]`,
/// in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketedRecords {
    granularity: Granularity,
    buckets: Vec<Bucket>,
    members: Vec<Vec<usize>>,
    dropped: usize,
    total: usize,
}

impl BucketedRecords {
    #[must_use]
    pub fn empty(granularity: Granularity) -> Self {
        Self {
            granularity,
            buckets: Vec::new(),
            members: Vec::new(),
            dropped: 0,
            total: 0,
        }
    }

    #[must_use]
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    #[must_use]
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Record indices assigned to bucket `index`. Out-of-range yields empty.
    #[must_use]
    pub fn members(&self, index: usize) -> &[usize] {
        self.members.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.buckets
            .iter()
            .map(|bucket| bucket.label.clone())
            .collect()
    }

    /// Number of records excluded because their timestamp did not parse.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Number of records seen, including dropped ones.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Index of the bucket containing `time`, if any.
    #[must_use]
    pub fn bucket_index_of(&self, time: NaiveDateTime) -> Option<usize> {
        let key = BucketKey::for_time(time, self.granularity);
        self.buckets
            .binary_search_by(|bucket| bucket.key.cmp(&key))
            .ok()
    }
}

/// Classifies records into daily, weekly or monthly buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucketizer {
    granularity: Granularity,
    timestamp_field: String,
    fill_gaps: bool,
}

impl Bucketizer {
    #[must_use]
    pub fn new(granularity: Granularity, timestamp_field: impl Into<String>) -> Self {
        Self {
            granularity,
            timestamp_field: timestamp_field.into(),
            fill_gaps: true,
        }
    }

    /// Emits empty buckets between populated ones (default `true`).
    #[must_use]
    pub fn with_gap_filling(mut self, fill_gaps: bool) -> Self {
        self.fill_gaps = fill_gaps;
        self
    }

    #[must_use]
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    #[must_use]
    pub fn timestamp_field(&self) -> &str {
        &self.timestamp_field
    }

    /// Groups `records` by the bucket of their timestamp in `tz`.
    ///
    /// Records whose timestamp is missing or unparseable are counted in
    /// [`BucketedRecords::dropped`] and otherwise ignored.
    #[must_use]
    pub fn bucketize<Tz: TimeZone>(
        &self,
        records: &[Record],
        tz: &Tz,
        sink: &dyn DiagnosticsSink,
    ) -> BucketedRecords {
        let mut grouped: BTreeMap<BucketKey, Vec<usize>> = BTreeMap::new();
        let mut dropped = 0_usize;

        for (index, record) in records.iter().enumerate() {
            let Some(raw) = record.get(&self.timestamp_field) else {
                dropped += 1;
                continue;
            };
            match parse_timestamp(raw, &self.timestamp_field, tz) {
                Ok(time) => grouped
                    .entry(BucketKey::for_time(time, self.granularity))
                    .or_default()
                    .push(index),
                Err(err) => {
                    trace!(index, error = %err, "dropping record");
                    dropped += 1;
                }
            }
        }

        if dropped > 0 {
            sink.record(&DiagnosticEvent::RecordsDropped {
                field: self.timestamp_field.clone(),
                dropped,
                total: records.len(),
            });
        }

        let keys = self.bucket_keys(&grouped);
        let mut buckets: Vec<Bucket> = keys.iter().copied().map(Bucket::from_key).collect();
        assign_month_labels(&mut buckets);
        qualify_repeated_labels(&mut buckets);
        let members = keys
            .iter()
            .map(|key| grouped.remove(key).unwrap_or_default())
            .collect();

        sink.record(&DiagnosticEvent::SeriesBucketed {
            granularity: self.granularity,
            buckets: buckets.len(),
            records: records.len() - dropped,
        });

        BucketedRecords {
            granularity: self.granularity,
            buckets,
            members,
            dropped,
            total: records.len(),
        }
    }

    fn bucket_keys(&self, grouped: &BTreeMap<BucketKey, Vec<usize>>) -> Vec<BucketKey> {
        let populated: Vec<BucketKey> = grouped.keys().copied().collect();
        if !self.fill_gaps {
            return populated;
        }
        let (Some(&first), Some(&last)) = (populated.first(), populated.last()) else {
            return populated;
        };

        let mut keys = Vec::new();
        let mut cursor = Some(first);
        while let Some(key) = cursor {
            if key > last {
                break;
            }
            if keys.len() >= MAX_GAP_FILLED_BUCKETS {
                trace!(
                    populated = populated.len(),
                    "gap filling exceeded bucket bound, emitting populated buckets only"
                );
                return populated;
            }
            keys.push(key);
            cursor = key.next();
        }
        keys
    }
}

/// Buckets `records` with gap filling and logs diagnostics through `tracing`.
#[must_use]
pub fn bucketize<Tz: TimeZone>(
    records: &[Record],
    granularity: Granularity,
    timestamp_field: &str,
    tz: &Tz,
) -> BucketedRecords {
    Bucketizer::new(granularity, timestamp_field).bucketize(records, tz, &TracingSink)
}
