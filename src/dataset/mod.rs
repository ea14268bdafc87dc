pub mod io;
pub mod models;

use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;

use models::EnrichedRecord;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("{input}: missing required column `{column}`")]
    MissingColumn { input: String, column: String },
    #[error("Input not found: {0}")]
    NotFound(String),
    #[error("No CSV files found under {0}")]
    NoInput(String),
}

pub type Result<T> = std::result::Result<T, DatasetError>;

/// The enriched trending dataset, loaded once and never mutated afterwards.
/// Queries borrow it; every filtered view is a separate [`crate::query::Subset`].
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<EnrichedRecord>,
    date_range: Option<(NaiveDate, NaiveDate)>,
}

impl Dataset {
    /// Load an enriched CSV. Missing files and missing columns fail here,
    /// before any query runs.
    pub fn open(path: &Path) -> Result<Self> {
        let source = path.display().to_string();
        let file = File::open(path).map_err(|_| DatasetError::NotFound(source.clone()))?;
        let records = io::read_enriched(file, &source)?;
        let dataset = Self::from_records(records);

        match dataset.date_range {
            Some((first, last)) => log::info!(
                "Loaded {} rows from {} ({} to {})",
                dataset.len(),
                source,
                first,
                last
            ),
            None => log::warn!("{} has no rows", source),
        }
        Ok(dataset)
    }

    pub fn from_records(records: Vec<EnrichedRecord>) -> Self {
        let date_range = records
            .iter()
            .map(|r| r.video.trending_date)
            .fold(None, |acc: Option<(NaiveDate, NaiveDate)>, d| match acc {
                None => Some((d, d)),
                Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
            });
        Self {
            records,
            date_range,
        }
    }

    pub fn records(&self) -> &[EnrichedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest trending date, `None` for an empty dataset.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.date_range
    }

    /// Distinct category codes, sorted.
    pub fn categories(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| r.video.category_id.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
