//! Crawler module for event scraping and run orchestration
//!
//! This module contains the core crawling logic, including:
//! - The icodrops.com listing and detail-page extractor
//! - Deadline truncation of the event list
//! - The two-phase run coordinator and its resumption logic

mod coordinator;
mod icodrops;

pub use coordinator::{run_harvest, PhaseFailure, RunOutcome};
pub use icodrops::{crawl_event_list, ICODROPS_SOURCE};
