//! Crawl state persistence
//!
//! The crawl file is the single source of truth across process restarts: a
//! pretty-printed JSON object holding the two phase-completion flags and the
//! event list. It is written after each completed phase, never mid-phase, so
//! a crash costs at most one phase's worth of work.

use crate::event::IcoEvent;
use crate::{HarvestError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// The two phase-completion flags, serialized as `{"getList": ..,
/// "getTraffic": ..}` to match the persisted format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlerStatus {
    #[serde(rename = "getList")]
    pub get_list: bool,

    #[serde(rename = "getTraffic")]
    pub get_traffic: bool,
}

impl CrawlerStatus {
    /// Derives the crawl phase from the flag pair.
    ///
    /// `getTraffic` without `getList` is unreachable through normal
    /// operation and yields `None`; `load` rejects such files.
    pub fn phase(&self) -> Option<CrawlPhase> {
        match (self.get_list, self.get_traffic) {
            (false, false) => Some(CrawlPhase::Fresh),
            (true, false) => Some(CrawlPhase::ListDone),
            (true, true) => Some(CrawlPhase::TrafficDone),
            (false, true) => None,
        }
    }
}

/// Where a crawl file stands in the two-phase lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    Fresh,
    ListDone,
    TrafficDone,
}

/// The persisted unit of work: status flags plus the ordered event list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlFile {
    #[serde(rename = "crawlerStatus")]
    pub crawler_status: CrawlerStatus,

    pub data: Vec<IcoEvent>,

    #[serde(skip)]
    path: PathBuf,
}

impl CrawlFile {
    /// Creates a FRESH crawl file: empty data, both flags false.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            crawler_status: CrawlerStatus::default(),
            data: Vec::new(),
            path: path.into(),
        }
    }

    /// The path this file is persisted at.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The CSV report path: the state file path with `.csv` appended.
    pub fn report_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".csv");
        PathBuf::from(name)
    }

    /// Writes the file as pretty-printed JSON, creating parent directories
    /// as needed.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Attempts to load a persisted crawl file.
///
/// Absence is not an error: `Ok(None)` signals that a FRESH file must be
/// initialized. Malformed JSON or a corrupt flag pair is an error, so a
/// half-written file is never silently recreated over.
pub fn load(path: &Path) -> Result<Option<CrawlFile>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut file: CrawlFile = serde_json::from_str(&content)?;
    if file.crawler_status.phase().is_none() {
        return Err(HarvestError::CorruptState {
            path: path.display().to_string(),
            reason: "getTraffic is set without getList".to_string(),
        });
    }
    file.path = path.to_path_buf();
    Ok(Some(file))
}

/// Builds the crawl file path for an output name: `<dir>/icoEvent(<name>).json`.
pub fn data_file_path(data_dir: &Path, name: &str) -> PathBuf {
    data_dir.join(format!("icoEvent({}).json", name))
}
