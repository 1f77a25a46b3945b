
use chrono::{DateTime, Local};
use csv::StringRecord;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

use super::FaqRecord;
use crate::{FaqError, Result};

/// Header accepted for the link column besides `url`
const SOURCE_COLUMN_ALIAS: &str = "source";

/// Flat CSV copy of the last successful scrape
#[derive(Debug, Clone)]
pub struct CacheFile {
    path: PathBuf,
}

/// Snapshot of the cache file for status reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStatus {
    pub path: PathBuf,
    pub exists: bool,
    pub modified: Option<DateTime<Local>>,
    pub rows: Option<usize>,
}

impl CacheFile {
    #[inline]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Whether the cache should be used instead of scraping.
    ///
    /// Without a TTL an existing file is always fresh.
    #[inline]
    pub fn is_fresh(&self, ttl: Option<Duration>) -> Result<bool> {
        if !self.exists() {
            return Ok(false);
        }

        let Some(ttl) = ttl else {
            return Ok(true);
        };

        let modified = fs::metadata(&self.path)?.modified()?;
        let fresh = SystemTime::now()
            .duration_since(modified)
            .map_or(true, |age| age <= ttl);

        if !fresh {
            info!("FAQ cache {} is older than {:?}", self.path.display(), ttl);
        }
        Ok(fresh)
    }

    /// Read every record, normalizing header names first.
    ///
    /// `question` is required. `answer` is optional and the link column may be
    /// named `url` or `source`.
    #[inline]
    pub fn load(&self) -> Result<Vec<FaqRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| cache_error(&self.path, &e))?;

        let headers = reader
            .headers()
            .map_err(|e| cache_error(&self.path, &e))?
            .clone();
        if headers.is_empty() {
            debug!("FAQ cache {} is empty", self.path.display());
            return Ok(Vec::new());
        }
        let columns = CacheColumns::resolve(&headers)?;

        let mut records = Vec::new();
        let mut skipped = 0usize;

        for row in reader.records() {
            let row = row.map_err(|e| cache_error(&self.path, &e))?;
            let question = row.get(columns.question).unwrap_or_default().trim();
            if question.is_empty() {
                skipped += 1;
                continue;
            }

            let field = |index: Option<usize>| {
                index
                    .and_then(|i| row.get(i))
                    .unwrap_or_default()
                    .to_string()
            };
            records.push(FaqRecord::new(
                question,
                field(columns.answer),
                field(columns.url),
            ));
        }

        if skipped > 0 {
            warn!(
                "Skipped {} cache rows without a question in {}",
                skipped,
                self.path.display()
            );
        }
        debug!("Loaded {} FAQs from {}", records.len(), self.path.display());
        Ok(records)
    }

    /// Overwrite the cache with `records`
    #[inline]
    pub fn save(&self, records: &[FaqRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut writer =
            csv::Writer::from_path(&self.path).map_err(|e| cache_error(&self.path, &e))?;
        for record in records {
            writer
                .serialize(record)
                .map_err(|e| cache_error(&self.path, &e))?;
        }
        writer.flush()?;

        info!("Cached {} FAQs to {}", records.len(), self.path.display());
        Ok(())
    }

    #[inline]
    pub fn status(&self) -> CacheStatus {
        let exists = self.exists();
        let modified = exists
            .then(|| fs::metadata(&self.path).and_then(|m| m.modified()).ok())
            .flatten()
            .map(DateTime::<Local>::from);
        let rows = exists.then(|| self.load().ok().map(|r| r.len())).flatten();

        CacheStatus {
            path: self.path.clone(),
            exists,
            modified,
            rows,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheColumns {
    question: usize,
    answer: Option<usize>,
    url: Option<usize>,
}

impl CacheColumns {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let normalized: Vec<String> = headers
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();
        let position = |name: &str| normalized.iter().position(|h| h == name);

        let question = position("question")
            .ok_or_else(|| FaqError::MissingColumn("question".to_string()))?;

        Ok(Self {
            question,
            answer: position("answer"),
            url: position("url").or_else(|| position(SOURCE_COLUMN_ALIAS)),
        })
    }
}

fn cache_error(path: &Path, error: &csv::Error) -> FaqError {
    FaqError::Cache(format!("{}: {}", path.display(), error))
}
