//! Run coordinator - two-phase crawl orchestration
//!
//! Drives a single invocation end to end:
//! - Load the persisted crawl file, or initialize a FRESH one
//! - Run the list phase if the event list has not been crawled yet
//! - Run the traffic enrichment phase if any event still lacks a metric
//! - Finalize: write the CSV report, or report that work remains
//!
//! State is persisted after each phase, so an interrupted run resumes from
//! the last completed phase on the next invocation. Phase-fatal errors are
//! tagged with the phase they killed; the binary maps each to a distinct
//! exit code for the scheduler that re-invokes this tool.

use crate::config::Config;
use crate::crawler::icodrops::{self, ICODROPS_SOURCE};
use crate::output::write_report;
use crate::page::PageReader;
use crate::state::{self, CrawlFile};
use crate::traffic::{all_traffic_success, enrich_traffic, TrafficSource};
use crate::HarvestError;
use chrono::{Datelike, Local};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// How a completed (non-fatal) invocation ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// Both phases done; the CSV report was written.
    Complete { report_path: PathBuf },

    /// Some work remains (typically failed traffic lookups); no report was
    /// written and the caller should re-invoke later.
    Incomplete,
}

/// A fatal error tagged with the phase it occurred in.
#[derive(Debug, Error)]
pub enum PhaseFailure {
    #[error("list phase failed: {0}")]
    List(#[source] HarvestError),

    #[error("traffic phase failed: {0}")]
    Traffic(#[source] HarvestError),

    #[error("report output failed: {0}")]
    Report(#[source] HarvestError),

    #[error("setup failed: {0}")]
    Setup(#[source] HarvestError),
}

impl PhaseFailure {
    /// The process exit code contract: 1 = list phase, 2 = traffic phase,
    /// 3 = report write. Setup failures use 10 so they can never be
    /// mistaken for a phase outcome (4 is taken by "incomplete").
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::List(_) => 1,
            Self::Traffic(_) => 2,
            Self::Report(_) => 3,
            Self::Setup(_) => 10,
        }
    }
}

/// Runs one full invocation of the harvest against the given collaborators.
pub async fn run_harvest<R, T>(
    reader: &R,
    traffic_source: &T,
    config: &Config,
) -> Result<RunOutcome, PhaseFailure>
where
    R: PageReader,
    T: TrafficSource,
{
    let path = state::data_file_path(Path::new(&config.output.data_dir), &config.crawl.name);
    let deadline = config
        .crawl
        .deadline_date()
        .map_err(|e| PhaseFailure::Setup(e.into()))?;

    let mut file = match state::load(&path).map_err(PhaseFailure::Setup)? {
        Some(file) => {
            tracing::info!("Resuming crawl from {}", path.display());
            file
        }
        None => {
            tracing::info!("No crawl file at {}, initializing", path.display());
            let file = CrawlFile::new(&path);
            file.save().map_err(PhaseFailure::Setup)?;
            file
        }
    };

    if !file.crawler_status.get_list {
        tracing::info!("Event list not crawled yet, starting list phase");
        let data = match config.crawl.source.as_str() {
            ICODROPS_SOURCE => {
                icodrops::crawl_event_list(reader, deadline, Local::now().year()).await
            }
            other => Err(HarvestError::UnknownSource(other.to_string())),
        }
        .map_err(PhaseFailure::List)?;

        file.data = data;
        file.crawler_status.get_list = true;
        file.save().map_err(PhaseFailure::List)?;
        tracing::info!("List phase complete: {} events", file.data.len());
    }

    if !file.crawler_status.get_traffic {
        tracing::info!("Traffic enrichment not complete yet, starting traffic phase");
        let interval = Duration::from_millis(config.crawl.interval_ms);
        enrich_traffic(&mut file.data, traffic_source, interval)
            .await
            .map_err(|e| PhaseFailure::Traffic(e.into()))?;

        if all_traffic_success(&file.data) {
            file.crawler_status.get_traffic = true;
        }
        // Persisted regardless of per-item outcomes, so a retry pass only
        // touches what actually failed.
        file.save().map_err(PhaseFailure::Traffic)?;
        tracing::info!("Traffic phase pass done (some items may have failed)");
    }

    if file.crawler_status.get_list && file.crawler_status.get_traffic {
        tracing::info!("All phases complete, writing report");
        let report_path = write_report(&file).map_err(PhaseFailure::Report)?;
        tracing::info!("Report written to {}", report_path.display());
        Ok(RunOutcome::Complete { report_path })
    } else {
        tracing::info!("Some work is still not done; re-run to finish it");
        Ok(RunOutcome::Incomplete)
    }
}
