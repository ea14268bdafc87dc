pub mod text;

use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use thiserror::Error;

use crate::dataset::models::{EnrichedRecord, TagFeatures, VideoTrendingRecord};
use crate::dataset::{self, DatasetError};
use crate::sentiment::SentimentScorer;

pub use text::{TAG_CHAR_ALLOWANCE, clean_tags, relative_char_len, word_count};

#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),
    #[error("Worker pool error: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

pub struct EnrichResult {
    pub rows: usize,
    pub empty_tags: usize,
    pub mean_sentiment: f64,
}

/// Derive tag features from raw tags. Returns the cleaned text alongside them.
/// Missing tags behave like empty text.
pub fn derive_features(tags: Option<&str>, scorer: &dyn SentimentScorer) -> (String, TagFeatures) {
    let cleaned = clean_tags(tags.unwrap_or(""));
    let vader_sentiment = if cleaned.is_empty() {
        0.0
    } else {
        scorer.score(&cleaned)
    };
    let features = TagFeatures {
        rel_char_len: relative_char_len(&cleaned),
        n_words: word_count(&cleaned),
        vader_sentiment,
    };
    (cleaned, features)
}

/// Enrich one record. Its tags are replaced by the cleaned text.
pub fn enrich_record(mut video: VideoTrendingRecord, scorer: &dyn SentimentScorer) -> EnrichedRecord {
    let (cleaned, features) = derive_features(video.tags.as_deref(), scorer);
    video.tags = Some(cleaned);
    EnrichedRecord { video, features }
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} rows ({per_sec}) ({eta}) {msg}",
    )
    .map(|s| s.progress_chars("#>-"))
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

/// Enrich records in parallel. Output order matches input order.
pub fn enrich_records(
    records: Vec<VideoTrendingRecord>,
    scorer: &dyn SentimentScorer,
    jobs: usize,
) -> Result<Vec<EnrichedRecord>, EnrichError> {
    if records.is_empty() {
        return Ok(Vec::new());
    }

    log::info!("Enriching {} rows with {} workers", records.len(), jobs);

    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
    let pb = progress_bar(records.len());
    pb.set_message("Scoring tags...");

    let enriched: Vec<EnrichedRecord> = pool.install(|| {
        records
            .into_par_iter()
            .map(|video| {
                let record = enrich_record(video, scorer);
                pb.inc(1);
                record
            })
            .collect()
    });

    pb.finish_with_message("Done");
    Ok(enriched)
}

/// Batch step: read raw CSVs, enrich every row, write one enriched CSV.
pub fn enrich_files(
    inputs: &[PathBuf],
    output: &Path,
    scorer: &dyn SentimentScorer,
    jobs: usize,
) -> Result<EnrichResult, EnrichError> {
    let raw = dataset::io::load_raw(inputs)?;
    let empty_tags = raw
        .iter()
        .filter(|r| r.tags.as_deref().is_none_or(|t| t.trim().is_empty()))
        .count();

    let enriched = enrich_records(raw, scorer, jobs)?;
    dataset::io::save_enriched(output, &enriched)?;
    log::info!("Wrote {} rows to {}", enriched.len(), output.display());

    let mean_sentiment = if enriched.is_empty() {
        0.0
    } else {
        enriched.iter().map(|r| r.features.vader_sentiment).sum::<f64>() / enriched.len() as f64
    };

    Ok(EnrichResult {
        rows: enriched.len(),
        empty_tags,
        mean_sentiment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::sentiment::StandardVaderScorer;
    use chrono::NaiveDate;

    /// Scores by text length so tests can see which text reached the scorer.
    struct LengthScorer;

    impl SentimentScorer for LengthScorer {
        fn score(&self, text: &str) -> f64 {
            (text.len() as f64 / 100.0).min(1.0)
        }
    }

    fn video(id: &str, tags: Option<&str>) -> VideoTrendingRecord {
        VideoTrendingRecord {
            video_id: id.to_string(),
            trending_date: NaiveDate::from_ymd_opt(2020, 8, 11).unwrap(),
            title: "t".into(),
            channel_title: "c".into(),
            channel_id: "UCc".into(),
            category_id: "Music".into(),
            tags: tags.map(str::to_string),
            view_count: 1,
            likes: 0,
            dislikes: 0,
            comment_count: 0,
        }
    }

    #[test]
    fn test_derive_features_example() {
        let scorer = StandardVaderScorer::new();
        let (cleaned, f) = derive_features(Some("cat|dog, fun!!"), &scorer);
        assert_eq!(cleaned, "cat dog fun");
        assert_eq!(f.n_words, 3);
        assert_eq!(f.rel_char_len, 11.0 / 500.0);
        assert!((-1.0..=1.0).contains(&f.vader_sentiment));
    }

    #[test]
    fn test_scorer_sees_cleaned_text() {
        let (_, f) = derive_features(Some("ab|cd"), &LengthScorer);
        assert_eq!(f.vader_sentiment, 0.05);
    }

    #[test]
    fn test_missing_tags_are_neutral() {
        for tags in [None, Some(""), Some("|||")] {
            let r = enrich_record(video("x", tags), &LengthScorer);
            assert_eq!(r.features, TagFeatures::default());
            assert_eq!(r.video.tags.as_deref(), Some(""));
        }
    }

    #[test]
    fn test_enrich_records_preserves_order_and_count() {
        let input: Vec<_> = (0..200)
            .map(|i| video(&format!("v{i}"), Some("tag|".repeat(i % 7).as_str())))
            .collect();
        let expected_ids: Vec<String> = input.iter().map(|v| v.video_id.clone()).collect();

        let out = enrich_records(input, &StandardVaderScorer::new(), 4).unwrap();
        let ids: Vec<String> = out.iter().map(|r| r.video.video_id.clone()).collect();
        assert_eq!(ids, expected_ids);
        assert_eq!(out[3].features.n_words, 3);
    }

    #[test]
    fn test_enrichment_is_deterministic() {
        let input = vec![video("a", Some("love|win|epic")), video("b", Some("sad, crash"))];
        let first = enrich_records(input.clone(), &StandardVaderScorer::new(), 2).unwrap();
        let second = enrich_records(input, &StandardVaderScorer::new(), 1).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_enrich_files_writes_loadable_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("raw.csv");
        std::fs::write(
            &input,
            "\
video_id,trending_date,title,channelTitle,channelId,categoryId,tags,view_count,likes,dislikes,comment_count
a,2020-08-11,A,Ca,UCa,Music,cat|dog,100,1,0,1
b,2020-08-12,B,Cb,UCb,Gaming,,50,1,0,1
",
        )
        .unwrap();
        let output = dir.path().join("enriched.csv");

        let result = enrich_files(&[input], &output, &StandardVaderScorer::new(), 2).unwrap();
        assert_eq!(result.rows, 2);
        assert_eq!(result.empty_tags, 1);

        let ds = Dataset::open(&output).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].video.tags.as_deref(), Some("cat dog"));
        assert_eq!(ds.records()[0].features.n_words, 2);
        assert_eq!(ds.records()[1].features, TagFeatures::default());
    }
}
