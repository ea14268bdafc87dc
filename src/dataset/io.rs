use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use walkdir::WalkDir;

use super::models::{EnrichedRecord, EnrichedRow, VideoTrendingRecord};
use super::{DatasetError, Result};
use crate::SUPPORTED_EXTENSIONS;

/// Columns every trending CSV must carry. Each entry lists accepted spellings.
const RECORD_COLUMNS: &[&[&str]] = &[
    &["video_id"],
    &["trending_date"],
    &["title"],
    &["channelTitle", "channel_title"],
    &["channelId", "channel_id"],
    &["categoryId", "category_id"],
    &["tags"],
    &["view_count"],
    &["likes"],
    &["dislikes"],
    &["comment_count"],
];

/// Columns added by enrichment.
const FEATURE_COLUMNS: &[&[&str]] = &[&["rel_char_len"], &["n_words"], &["vader_sentiment"]];

fn check_columns(headers: &StringRecord, required: &[&[&str]], source: &str) -> Result<()> {
    for spellings in required {
        if !spellings.iter().any(|name| headers.iter().any(|h| h == *name)) {
            return Err(DatasetError::MissingColumn {
                input: source.to_string(),
                column: spellings[0].to_string(),
            });
        }
    }
    Ok(())
}

/// Read raw trending records from CSV. `source` names the input in errors.
pub fn read_raw<R: Read>(reader: R, source: &str) -> Result<Vec<VideoTrendingRecord>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::Headers).from_reader(reader);
    let headers = rdr.headers()?.clone();
    check_columns(&headers, RECORD_COLUMNS, source)?;

    let records = rdr
        .deserialize::<VideoTrendingRecord>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    log::debug!("{}: {} rows", source, records.len());
    Ok(records)
}

/// Read an enriched CSV (record columns plus the three feature columns).
pub fn read_enriched<R: Read>(reader: R, source: &str) -> Result<Vec<EnrichedRecord>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::Headers).from_reader(reader);
    let headers = rdr.headers()?.clone();
    check_columns(&headers, RECORD_COLUMNS, source)?;
    check_columns(&headers, FEATURE_COLUMNS, source)?;

    let records = rdr
        .deserialize::<EnrichedRow>()
        .map(|row| row.map(EnrichedRecord::from))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    log::debug!("{}: {} enriched rows", source, records.len());
    Ok(records)
}

/// Write enriched records with a leading positional index column.
pub fn write_enriched<W: Write>(writer: W, records: &[EnrichedRecord]) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    for (i, record) in records.iter().enumerate() {
        wtr.serialize(EnrichedRow::new(i, record))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write enriched records to a file, creating parent directories as needed.
pub fn save_enriched(path: &Path, records: &[EnrichedRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    write_enriched(file, records)
}

/// Expand files and directories into the CSV files they name, in a stable order.
/// Directories are walked recursively; their files are sorted by path.
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.exists() {
            return Err(DatasetError::NotFound(path.display().to_string()));
        }

        let mut found: Vec<PathBuf> = WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                let ext = e
                    .path()
                    .extension()
                    .and_then(|x| x.to_str())
                    .unwrap_or("")
                    .to_lowercase();
                SUPPORTED_EXTENSIONS.contains(&ext.as_str())
            })
            .map(|e| e.into_path())
            .collect();
        found.sort();

        if found.is_empty() {
            return Err(DatasetError::NoInput(path.display().to_string()));
        }
        files.extend(found);
    }

    Ok(files)
}

/// Load raw records from every CSV named by `paths`, concatenated in input order.
pub fn load_raw(paths: &[PathBuf]) -> Result<Vec<VideoTrendingRecord>> {
    let mut records = Vec::new();
    for file in collect_inputs(paths)? {
        let source = file.display().to_string();
        let handle = File::open(&file)
            .map_err(|_| DatasetError::NotFound(source.clone()))?;
        let rows = read_raw(handle, &source)?;
        log::info!("Loaded {} rows from {}", rows.len(), source);
        records.extend(rows);
    }
    Ok(records)
}
