use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::bucket::BucketedRecords;
use crate::core::duration::duration_value;
use crate::core::types::{FieldValue, Record};

/// How a record field is read into a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FieldReader {
    /// Numbers, numeric strings and booleans (`1`/`0`).
    #[default]
    Numeric,
    /// Duration cells normalized to minutes.
    DurationMinutes,
}

impl FieldReader {
    /// Reads `value`; `None` means unknown and is excluded from aggregates.
    #[must_use]
    pub fn read(self, value: Option<&FieldValue>) -> Option<f64> {
        match self {
            Self::Numeric => match value? {
                FieldValue::Number(number) => Some(*number).filter(|v| v.is_finite()),
                FieldValue::Text(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
                FieldValue::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
                FieldValue::Null | FieldValue::List(_) => None,
            },
            Self::DurationMinutes => duration_value(value),
        }
    }
}

/// Per-bucket reduction producing one series value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Aggregation {
    Count,
    /// Records carrying a tag that equals `tag` or starts with `tag/`.
    CountTagged { field: String, tag: String },
    Sum { field: String, reader: FieldReader },
    /// Mean over known values; buckets without known values yield `0`.
    Mean { field: String, reader: FieldReader },
    Max { field: String, reader: FieldReader },
}

impl Aggregation {
    #[must_use]
    pub fn mean_minutes(field: impl Into<String>) -> Self {
        Self::Mean {
            field: field.into(),
            reader: FieldReader::DurationMinutes,
        }
    }

    #[must_use]
    pub fn sum(field: impl Into<String>) -> Self {
        Self::Sum {
            field: field.into(),
            reader: FieldReader::Numeric,
        }
    }

    #[must_use]
    pub fn count_tagged(field: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::CountTagged {
            field: field.into(),
            tag: tag.into(),
        }
    }

    fn reduce<'a>(&self, members: impl Iterator<Item = &'a Record>) -> f64 {
        match self {
            Self::Count => members.count() as f64,
            Self::CountTagged { field, tag } => members
                .filter(|record| {
                    record
                        .tags(field)
                        .into_iter()
                        .any(|candidate| TagPath::parse(candidate).matches_prefix(tag))
                })
                .count() as f64,
            Self::Sum { field, reader } => members
                .filter_map(|record| reader.read(record.get(field)))
                .sum(),
            Self::Mean { field, reader } => {
                let (sum, count) = members
                    .filter_map(|record| reader.read(record.get(field)))
                    .fold((0.0, 0_usize), |(sum, count), value| (sum + value, count + 1));
                if count == 0 { 0.0 } else { sum / count as f64 }
            }
            Self::Max { field, reader } => members
                .filter_map(|record| reader.read(record.get(field)))
                .fold(0.0, f64::max),
        }
    }
}

/// One bucket value of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub index: usize,
    pub label: String,
    pub value: f64,
}

/// Ordered bucket values for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    /// Builds a series from pre-aggregated `(label, value)` pairs.
    ///
    /// Non-finite values are stored as `0`.
    #[must_use]
    pub fn from_pairs<L: AsRef<str>>(name: impl Into<String>, pairs: &[(L, f64)]) -> Self {
        let points = pairs
            .iter()
            .enumerate()
            .map(|(index, (label, value))| SeriesPoint {
                index,
                label: label.as_ref().to_owned(),
                value: if value.is_finite() { *value } else { 0.0 },
            })
            .collect();
        Self {
            name: name.into(),
            points,
        }
    }

    /// Reduces each bucket of `bucketed` with `aggregation`.
    #[must_use]
    pub fn aggregate(
        name: impl Into<String>,
        bucketed: &BucketedRecords,
        records: &[Record],
        aggregation: &Aggregation,
    ) -> Self {
        let points = bucketed
            .buckets()
            .iter()
            .enumerate()
            .map(|(index, bucket)| {
                let members = bucketed
                    .members(index)
                    .iter()
                    .filter_map(|&record_index| records.get(record_index));
                let value = aggregation.reduce(members);
                SeriesPoint {
                    index,
                    label: bucket.label.clone(),
                    value: if value.is_finite() { value } else { 0.0 },
                }
            })
            .collect();
        Self {
            name: name.into(),
            points,
        }
    }

    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.value).collect()
    }

    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.points.iter().map(|point| point.value).fold(0.0, f64::max)
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.points.iter().map(|point| point.value).sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Named metric for [`SeriesSet::from_bucketed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSpec {
    pub name: String,
    pub aggregation: Aggregation,
}

impl MetricSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, aggregation: Aggregation) -> Self {
        Self {
            name: name.into(),
            aggregation,
        }
    }
}

/// Pre-aggregated row: `{label, metricA, metricB, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub label: String,
    #[serde(flatten)]
    pub values: IndexMap<String, f64>,
}

/// Series sharing one bucket axis.
///
/// Every series holds exactly one point per label, in label order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSet {
    labels: Vec<String>,
    series: Vec<Series>,
}

impl SeriesSet {
    #[must_use]
    pub fn from_bucketed(
        bucketed: &BucketedRecords,
        records: &[Record],
        metrics: &[MetricSpec],
    ) -> Self {
        Self {
            labels: bucketed.labels(),
            series: metrics
                .iter()
                .map(|metric| {
                    Series::aggregate(&metric.name, bucketed, records, &metric.aggregation)
                })
                .collect(),
        }
    }

    /// Builds aligned series from pre-aggregated rows. Missing metric cells
    /// read as `0`.
    #[must_use]
    pub fn from_rows(rows: &[AggregateRow], metrics: &[&str]) -> Self {
        let labels: Vec<String> = rows.iter().map(|row| row.label.clone()).collect();
        let series = metrics
            .iter()
            .map(|metric| {
                let pairs: Vec<(&str, f64)> = rows
                    .iter()
                    .map(|row| {
                        (
                            row.label.as_str(),
                            row.values.get(*metric).copied().unwrap_or(0.0),
                        )
                    })
                    .collect();
                Series::from_pairs(*metric, &pairs)
            })
            .collect();
        Self { labels, series }
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|series| series.name == name)
    }

    /// Largest value across all series, `0` when empty.
    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.series.iter().map(Series::max_value).fold(0.0, f64::max)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Parsed `category/value[/detail]` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagPath<'a> {
    pub raw: &'a str,
    pub category: &'a str,
    pub value: Option<&'a str>,
    pub detail: Option<&'a str>,
}

impl<'a> TagPath<'a> {
    #[must_use]
    pub fn parse(raw: &'a str) -> Self {
        let raw = raw.trim();
        let mut parts = raw.splitn(3, '/').map(str::trim);
        let category = parts.next().unwrap_or("");
        let value = parts.next().filter(|part| !part.is_empty());
        let detail = parts.next().filter(|part| !part.is_empty());
        Self {
            raw,
            category,
            value,
            detail,
        }
    }

    /// True when this tag equals `prefix` or continues it past a `/`.
    #[must_use]
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        let prefix = prefix.trim().trim_end_matches('/');
        self.raw == prefix
            || (self.raw.starts_with(prefix) && self.raw[prefix.len()..].starts_with('/'))
    }
}

/// Counts records per tag value within `category`.
///
/// Each record counts at most once per value. Output is sorted by count
/// descending, then by value name.
#[must_use]
pub fn tag_value_counts(records: &[Record], field: &str, category: &str) -> Vec<(String, f64)> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for record in records {
        let mut seen: Vec<&str> = Vec::new();
        for raw in record.tags(field) {
            let tag = TagPath::parse(raw);
            let Some(value) = tag.value else { continue };
            if tag.category != category || seen.contains(&value) {
                continue;
            }
            seen.push(value);
            *counts.entry(value.to_owned()).or_default() += 1;
        }
    }

    let mut sorted: Vec<(String, f64)> = counts
        .into_iter()
        .map(|(value, count)| (value, count as f64))
        .collect();
    sorted.sort_by(|left, right| right.1.total_cmp(&left.1).then_with(|| left.0.cmp(&right.0)));
    sorted
}

/// Groups known values of `value_field` by the tag value each record carries
/// within `category`. Groups keep first-seen order.
#[must_use]
pub fn samples_by_tag(
    records: &[Record],
    tag_field: &str,
    category: &str,
    value_field: &str,
    reader: FieldReader,
) -> IndexMap<String, Vec<f64>> {
    let mut groups: IndexMap<String, Vec<f64>> = IndexMap::new();
    for record in records {
        let Some(sample) = reader.read(record.get(value_field)) else {
            continue;
        };
        let value = record
            .tags(tag_field)
            .into_iter()
            .map(TagPath::parse)
            .find(|tag| tag.category == category)
            .and_then(|tag| tag.value);
        if let Some(value) = value {
            groups.entry(value.to_owned()).or_default().push(sample);
        }
    }
    groups
}
