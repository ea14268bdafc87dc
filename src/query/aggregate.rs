use std::collections::BTreeMap;

use super::{Subset, latest_per_video};
use crate::dataset::models::{CategorySentiment, TimeBucket, TrendGranularity, TrendPoint};

/// Subsets spanning fewer days than this are bucketed by day, longer ones by month.
pub const DAILY_BUCKET_MAX_SPAN_DAYS: i64 = 75;

/// Mean tag sentiment and video count per category, over the latest row of each
/// video. Ordered by category.
pub fn aggregate_sentiment_by_category(subset: &Subset<'_>) -> Vec<CategorySentiment> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for r in latest_per_video(subset) {
        let entry = groups.entry(r.video.category_id.as_str()).or_insert((0.0, 0));
        entry.0 += r.features.vader_sentiment;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(category, (sum, count))| CategorySentiment {
            category_id: category.to_string(),
            mean_sentiment: (sum / count as f64).clamp(-1.0, 1.0),
            video_count: count,
        })
        .collect()
}

/// Bucket size for a subset, `None` when it is empty.
pub fn trend_granularity(subset: &Subset<'_>, max_daily_span_days: i64) -> Option<TrendGranularity> {
    let (first, last) = subset.date_span()?;
    if (last - first).num_days() < max_daily_span_days {
        Some(TrendGranularity::Daily)
    } else {
        Some(TrendGranularity::Monthly)
    }
}

/// Trending observations per (bucket, category) using the default threshold.
pub fn aggregate_trend_over_time(subset: &Subset<'_>) -> Vec<TrendPoint> {
    aggregate_trend_with_threshold(subset, DAILY_BUCKET_MAX_SPAN_DAYS)
}

/// Trending observations per (bucket, category). Every row counts, so a video
/// trending on three days contributes three. Ordered by bucket, then category.
pub fn aggregate_trend_with_threshold(subset: &Subset<'_>, max_daily_span_days: i64) -> Vec<TrendPoint> {
    let Some(granularity) = trend_granularity(subset, max_daily_span_days) else {
        return Vec::new();
    };

    let mut counts: BTreeMap<(TimeBucket, &str), usize> = BTreeMap::new();
    for r in subset.rows() {
        let day = r.video.trending_date;
        let bucket = match granularity {
            TrendGranularity::Daily => TimeBucket::Day(day),
            TrendGranularity::Monthly => TimeBucket::month_of(day),
        };
        *counts.entry((bucket, r.video.category_id.as_str())).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|((bucket, category), video_count)| TrendPoint {
            bucket,
            category_id: category.to_string(),
            video_count,
        })
        .collect()
}
