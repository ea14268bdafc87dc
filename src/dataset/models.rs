use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};

/// One observation of a video on the trending list on a given day.
/// A video appears once per day it trends, so `video_id` repeats across rows.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VideoTrendingRecord {
    pub video_id: String,
    #[serde(with = "trending_date")]
    pub trending_date: NaiveDate,
    pub title: String,
    #[serde(rename = "channelTitle", alias = "channel_title")]
    pub channel_title: String,
    #[serde(rename = "channelId", alias = "channel_id")]
    pub channel_id: String,
    #[serde(rename = "categoryId", alias = "category_id")]
    pub category_id: String,
    /// Free-text tags. Missing values are read as `None` and enriched as empty text.
    pub tags: Option<String>,
    pub view_count: u64,
    pub likes: u64,
    pub dislikes: u64,
    pub comment_count: u64,
}

/// Features derived from a record's tags during enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TagFeatures {
    /// Cleaned tag length relative to the platform tag allowance. Not clamped.
    pub rel_char_len: f64,
    pub n_words: usize,
    /// Compound polarity in [-1, 1].
    pub vader_sentiment: f64,
}

/// A trending record plus its tag features. The record's `tags` hold the cleaned text.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub video: VideoTrendingRecord,
    pub features: TagFeatures,
}

/// Flat CSV layout of an enriched record. The unnamed leading column is a
/// positional row index with no meaning beyond row order.
#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct EnrichedRow {
    #[serde(rename = "", default)]
    pub index: Option<usize>,
    pub video_id: String,
    #[serde(with = "trending_date")]
    pub trending_date: NaiveDate,
    pub title: String,
    #[serde(rename = "channelTitle", alias = "channel_title")]
    pub channel_title: String,
    #[serde(rename = "channelId", alias = "channel_id")]
    pub channel_id: String,
    #[serde(rename = "categoryId", alias = "category_id")]
    pub category_id: String,
    pub tags: Option<String>,
    pub view_count: u64,
    pub likes: u64,
    pub dislikes: u64,
    pub comment_count: u64,
    pub rel_char_len: f64,
    pub n_words: usize,
    pub vader_sentiment: f64,
}

impl EnrichedRow {
    pub(crate) fn new(index: usize, r: &EnrichedRecord) -> Self {
        let v = &r.video;
        Self {
            index: Some(index),
            video_id: v.video_id.clone(),
            trending_date: v.trending_date,
            title: v.title.clone(),
            channel_title: v.channel_title.clone(),
            channel_id: v.channel_id.clone(),
            category_id: v.category_id.clone(),
            tags: v.tags.clone(),
            view_count: v.view_count,
            likes: v.likes,
            dislikes: v.dislikes,
            comment_count: v.comment_count,
            rel_char_len: r.features.rel_char_len,
            n_words: r.features.n_words,
            vader_sentiment: r.features.vader_sentiment,
        }
    }
}

impl From<EnrichedRow> for EnrichedRecord {
    fn from(row: EnrichedRow) -> Self {
        Self {
            video: VideoTrendingRecord {
                video_id: row.video_id,
                trending_date: row.trending_date,
                title: row.title,
                channel_title: row.channel_title,
                channel_id: row.channel_id,
                category_id: row.category_id,
                tags: row.tags,
                view_count: row.view_count,
                likes: row.likes,
                dislikes: row.dislikes,
                comment_count: row.comment_count,
            },
            features: TagFeatures {
                rel_char_len: row.rel_char_len,
                n_words: row.n_words,
                vader_sentiment: row.vader_sentiment,
            },
        }
    }
}

/// Metric the leaderboard ranks by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankMetric {
    Comments,
    Dislikes,
    Likes,
    #[default]
    Views,
}

impl RankMetric {
    pub fn value(&self, v: &VideoTrendingRecord) -> u64 {
        match self {
            Self::Comments => v.comment_count,
            Self::Dislikes => v.dislikes,
            Self::Likes => v.likes,
            Self::Views => v.view_count,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Comments => "comments",
            Self::Dislikes => "dislikes",
            Self::Likes => "likes",
            Self::Views => "views",
        }
    }
}

impl FromStr for RankMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "comments" | "comment_count" => Ok(Self::Comments),
            "dislikes" => Ok(Self::Dislikes),
            "likes" => Ok(Self::Likes),
            "views" | "view_count" => Ok(Self::Views),
            other => Err(format!("unknown rank metric `{other}`")),
        }
    }
}

/// Parameters of one dashboard interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Inclusive; defaults to the earliest date in the full dataset.
    pub start_date: Option<NaiveDate>,
    /// Inclusive; defaults to the latest date in the full dataset.
    pub end_date: Option<NaiveDate>,
    /// Empty means every category.
    pub categories: BTreeSet<String>,
    pub rank_metric: RankMetric,
}

/// Headline numbers for a filtered subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub rows: usize,
    pub videos: usize,
    pub channels: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

/// Mean tag polarity of one category, over one row per video.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySentiment {
    pub category_id: String,
    pub mean_sentiment: f64,
    pub video_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendGranularity {
    Daily,
    Monthly,
}

/// Time bucket of the trend aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeBucket {
    Day(NaiveDate),
    Month { year: i32, month: u32 },
}

impl TimeBucket {
    pub fn month_of(date: NaiveDate) -> Self {
        Self::Month {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn granularity(&self) -> TrendGranularity {
        match self {
            Self::Day(_) => TrendGranularity::Daily,
            Self::Month { .. } => TrendGranularity::Monthly,
        }
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Month { year, month } => write!(f, "{year:04}-{month:02}"),
        }
    }
}

impl Serialize for TimeBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Number of trending observations of one category in one bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub bucket: TimeBucket,
    pub category_id: String,
    pub video_count: usize,
}

/// Column labels of the leaderboard table, in display order.
pub const LEADERBOARD_COLUMNS: [&str; 8] = [
    "Rank",
    "Title",
    "Channel Name",
    "Category",
    "Views",
    "Likes",
    "Dislikes",
    "Comments",
];

/// One leaderboard row. Serialized keys are the display labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    #[serde(rename = "Rank")]
    pub rank: usize,
    #[serde(skip_serializing)]
    pub video_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Channel Name")]
    pub channel_name: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Views")]
    pub views: u64,
    #[serde(rename = "Likes")]
    pub likes: u64,
    #[serde(rename = "Dislikes")]
    pub dislikes: u64,
    #[serde(rename = "Comments")]
    pub comments: u64,
}

impl LeaderboardRow {
    pub fn new(rank: usize, v: &VideoTrendingRecord) -> Self {
        Self {
            rank,
            video_id: v.video_id.clone(),
            title: v.title.clone(),
            channel_name: v.channel_title.clone(),
            category: v.category_id.clone(),
            views: v.view_count,
            likes: v.likes,
            dislikes: v.dislikes,
            comments: v.comment_count,
        }
    }
}

/// `trending_date` column codec. Accepts `YYYY-MM-DD`, timestamps starting with
/// one (`2020-08-12T00:00:00Z`), and the legacy `yy.dd.mm` form. Writes `YYYY-MM-DD`.
pub mod trending_date {
    use chrono::NaiveDate;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";
    const LEGACY_FORMAT: &str = "%y.%d.%m";

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if let Some(day) = raw.get(..10) {
            if let Ok(date) = NaiveDate::parse_from_str(day, FORMAT) {
                return Some(date);
            }
        }
        NaiveDate::parse_from_str(raw, LEGACY_FORMAT).ok()
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("unrecognized trending_date `{raw}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_trending_date_forms() {
        assert_eq!(trending_date::parse("2020-08-12"), Some(ymd(2020, 8, 12)));
        assert_eq!(trending_date::parse("2020-08-12T00:00:00Z"), Some(ymd(2020, 8, 12)));
        assert_eq!(trending_date::parse(" 2021-01-03 "), Some(ymd(2021, 1, 3)));
        // Legacy Kaggle form: yy.dd.mm
        assert_eq!(trending_date::parse("17.14.11"), Some(ymd(2017, 11, 14)));
        assert_eq!(trending_date::parse("not a date"), None);
        assert_eq!(trending_date::parse(""), None);
    }

    #[test]
    fn test_rank_metric_from_str() {
        assert_eq!("views".parse::<RankMetric>(), Ok(RankMetric::Views));
        assert_eq!("Comments".parse::<RankMetric>(), Ok(RankMetric::Comments));
        assert_eq!("view_count".parse::<RankMetric>(), Ok(RankMetric::Views));
        assert!("shares".parse::<RankMetric>().is_err());
        assert_eq!(RankMetric::default(), RankMetric::Views);
    }

    #[test]
    fn test_time_bucket_ordering_and_display() {
        let a = TimeBucket::Day(ymd(2020, 8, 11));
        let b = TimeBucket::Day(ymd(2020, 8, 15));
        assert!(a < b);
        assert_eq!(a.to_string(), "2020-08-11");

        let m1 = TimeBucket::month_of(ymd(2020, 12, 31));
        let m2 = TimeBucket::month_of(ymd(2021, 1, 1));
        assert!(m1 < m2);
        assert_eq!(m1.to_string(), "2020-12");
        assert_eq!(m2.granularity(), TrendGranularity::Monthly);
    }

    #[test]
    fn test_leaderboard_row_serializes_with_labels() {
        let row = LeaderboardRow {
            rank: 1,
            video_id: "abc".into(),
            title: "Title".into(),
            channel_name: "Channel".into(),
            category: "Music".into(),
            views: 10,
            likes: 2,
            dislikes: 0,
            comments: 1,
        };
        let value = serde_json::to_value(&row).unwrap();
        let obj = value.as_object().unwrap();
        for label in LEADERBOARD_COLUMNS {
            assert!(obj.contains_key(label), "missing {label}");
        }
        assert!(!obj.contains_key("video_id"));
        assert_eq!(obj.len(), LEADERBOARD_COLUMNS.len());
    }
}
