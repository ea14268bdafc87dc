//! Pure queries over an immutable [`Dataset`].
//!
//! Every function takes the dataset (or a [`Subset`] of it) and returns a new
//! value. Nothing here mutates the dataset or keeps state between calls.

pub mod aggregate;
pub mod leaderboard;

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::NaiveDate;

use crate::dataset::Dataset;
use crate::dataset::models::{EnrichedRecord, FilterCriteria, Summary};

pub use aggregate::{
    DAILY_BUCKET_MAX_SPAN_DAYS, aggregate_sentiment_by_category, aggregate_trend_over_time,
    aggregate_trend_with_threshold, trend_granularity,
};
pub use leaderboard::{build_leaderboard, min_ranks};

/// Filter criteria with date defaults filled in from the full dataset.
/// Reusable against any subset of that dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub categories: BTreeSet<String>,
}

impl ResolvedFilter {
    /// Missing bounds default to the dataset's earliest/latest date, not the subset's.
    pub fn resolve(dataset: &Dataset, criteria: &FilterCriteria) -> Self {
        let bounds = dataset.date_range();
        Self {
            start: criteria.start_date.or(bounds.map(|(lo, _)| lo)),
            end: criteria.end_date.or(bounds.map(|(_, hi)| hi)),
            categories: criteria.categories.clone(),
        }
    }

    /// Both date bounds are inclusive.
    pub fn matches(&self, r: &EnrichedRecord) -> bool {
        let d = r.video.trending_date;
        self.start.is_none_or(|s| s <= d)
            && self.end.is_none_or(|e| d <= e)
            && (self.categories.is_empty() || self.categories.contains(&r.video.category_id))
    }
}

/// Rows of a dataset selected by a filter, in dataset order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subset<'a> {
    rows: Vec<&'a EnrichedRecord>,
}

impl<'a> Subset<'a> {
    /// Every row of the dataset.
    pub fn all(dataset: &'a Dataset) -> Self {
        Self {
            rows: dataset.records().iter().collect(),
        }
    }

    /// Apply a resolved filter to this subset.
    pub fn refine(&self, filter: &ResolvedFilter) -> Subset<'a> {
        Subset {
            rows: self.rows.iter().copied().filter(|r| filter.matches(r)).collect(),
        }
    }

    pub fn rows(&self) -> &[&'a EnrichedRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Earliest and latest trending date within the subset.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.rows.iter().map(|r| r.video.trending_date).min()?;
        let last = self.rows.iter().map(|r| r.video.trending_date).max()?;
        Some((first, last))
    }
}

/// Select rows whose date lies in `[start, end]` and whose category is selected.
pub fn filter_by_criteria<'a>(dataset: &'a Dataset, criteria: &FilterCriteria) -> Subset<'a> {
    let filter = ResolvedFilter::resolve(dataset, criteria);
    let subset = Subset::all(dataset).refine(&filter);
    log::debug!(
        "Filter {:?}..{:?} categories={:?}: {} of {} rows",
        filter.start,
        filter.end,
        filter.categories,
        subset.len(),
        dataset.len()
    );
    subset
}

pub fn count_distinct_videos(subset: &Subset<'_>) -> usize {
    subset
        .rows()
        .iter()
        .map(|r| r.video.video_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

pub fn count_distinct_channels(subset: &Subset<'_>) -> usize {
    subset
        .rows()
        .iter()
        .map(|r| r.video.channel_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

pub fn summarize(subset: &Subset<'_>) -> Summary {
    let span = subset.date_span();
    Summary {
        rows: subset.len(),
        videos: count_distinct_videos(subset),
        channels: count_distinct_channels(subset),
        first_date: span.map(|(lo, _)| lo),
        last_date: span.map(|(_, hi)| hi),
    }
}

/// One row per video: the one with the latest trending date. When a video has
/// several rows on that date, the first in dataset order wins.
/// Returned in `video_id` order.
pub fn latest_per_video<'a>(subset: &Subset<'a>) -> Vec<&'a EnrichedRecord> {
    let mut latest: BTreeMap<&'a str, &'a EnrichedRecord> = BTreeMap::new();
    for &r in subset.rows() {
        latest
            .entry(r.video.video_id.as_str())
            .and_modify(|kept| {
                if r.video.trending_date > kept.video.trending_date {
                    *kept = r;
                }
            })
            .or_insert(r);
    }
    latest.into_values().collect()
}
