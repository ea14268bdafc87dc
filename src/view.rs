//! Everything one dashboard interaction hands to the rendering layer: two
//! counts, two chart specifications and the leaderboard table.
//!
//! Charts are Vega-Lite JSON documents with their data inlined, so any
//! front end that embeds Vega can draw them without calling back into us.

use serde::Serialize;
use serde_json::{Value, json};

use crate::dataset::Dataset;
use crate::dataset::models::{
    CategorySentiment, FilterCriteria, LEADERBOARD_COLUMNS, LeaderboardRow, TrendGranularity,
    TrendPoint,
};
use crate::query::{self, DAILY_BUCKET_MAX_SPAN_DAYS};

const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Knobs that shape the view but are not part of the user's filter.
#[derive(Debug, Clone, Copy)]
pub struct ViewSettings {
    pub max_daily_span_days: i64,
    /// Leaderboard rows to include; `None` keeps all.
    pub table_limit: Option<usize>,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            max_daily_span_days: DAILY_BUCKET_MAX_SPAN_DAYS,
            table_limit: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Table {
    pub columns: Vec<&'static str>,
    pub rows: Vec<LeaderboardRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub video_count: usize,
    pub channel_count: usize,
    pub polarity_chart: Value,
    pub trend_chart: Value,
    pub table: Table,
}

impl DashboardView {
    pub fn build(dataset: &Dataset, criteria: &FilterCriteria, settings: &ViewSettings) -> Self {
        let subset = query::filter_by_criteria(dataset, criteria);

        let sentiment = query::aggregate_sentiment_by_category(&subset);
        let granularity = query::trend_granularity(&subset, settings.max_daily_span_days)
            .unwrap_or(TrendGranularity::Daily);
        let trend = query::aggregate_trend_with_threshold(&subset, settings.max_daily_span_days);

        let mut rows = query::build_leaderboard(&subset, criteria.rank_metric);
        if let Some(limit) = settings.table_limit {
            rows.truncate(limit);
        }

        Self {
            video_count: query::count_distinct_videos(&subset),
            channel_count: query::count_distinct_channels(&subset),
            polarity_chart: polarity_chart(&sentiment),
            trend_chart: trend_chart(&trend, granularity),
            table: Table {
                columns: LEADERBOARD_COLUMNS.to_vec(),
                rows,
            },
        }
    }
}

/// Horizontal bars of mean polarity per category, coloured on a fixed [-1, 1] scale.
pub fn polarity_chart(sentiment: &[CategorySentiment]) -> Value {
    json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": "Polarity of Tags by Category",
        "width": "container",
        "data": { "values": sentiment },
        "mark": "bar",
        "encoding": {
            "x": {
                "field": "mean_sentiment",
                "type": "quantitative",
                "title": "Average Polarity Score"
            },
            "y": {
                "field": "category_id",
                "type": "nominal",
                "sort": "x",
                "title": "Category"
            },
            "color": {
                "field": "mean_sentiment",
                "type": "quantitative",
                "title": "Sentiment",
                "scale": { "scheme": "redyellowgreen", "domain": [-1, 1] }
            },
            "tooltip": [
                { "field": "category_id", "type": "nominal", "title": "Category" },
                { "field": "mean_sentiment", "type": "quantitative", "format": ".3f" },
                { "field": "video_count", "type": "quantitative", "title": "Videos" }
            ]
        }
    })
}

/// Lines of trending-video counts per category over time.
pub fn trend_chart(trend: &[TrendPoint], granularity: TrendGranularity) -> Value {
    let x = match granularity {
        TrendGranularity::Daily => json!({
            "field": "bucket",
            "type": "temporal",
            "title": "Date"
        }),
        TrendGranularity::Monthly => json!({
            "field": "bucket",
            "type": "ordinal",
            "timeUnit": "yearmonth",
            "title": "Date"
        }),
    };

    json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": "Trending Videos over Time",
        "width": "container",
        "data": { "values": trend },
        "mark": "line",
        "encoding": {
            "x": x,
            "y": {
                "field": "video_count",
                "type": "quantitative",
                "title": "Number of Videos"
            },
            "color": { "field": "category_id", "type": "nominal", "title": "Category" }
        }
    })
}
