//! Report emitter
//!
//! Serializes a finalized crawl file to CSV: a header row from the event
//! field names plus one row per event. Quoting is minimal, applied only when
//! a field embeds the separator, quotes, or line breaks.

use crate::event::IcoEvent;
use crate::state::CrawlFile;
use crate::Result;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

/// Column order of the report, fixed and documented here.
pub const CSV_HEADER: &str =
    "name,status,icoUrl,url,raised,endDate,trafficSuccess,monthlyVisits,globalRank";

/// Formats the event list as CSV text (header + one row per event).
///
/// Absent optional fields serialize as empty cells. The traffic object is
/// flattened into its success flag and metric columns.
pub fn events_to_csv(events: &[IcoEvent]) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');

    for event in events {
        let (traffic_success, monthly_visits, global_rank) = match &event.traffic {
            Some(traffic) => (
                traffic.success.to_string(),
                traffic.monthly_visits.map(|v| v.to_string()).unwrap_or_default(),
                traffic.global_rank.map(|r| r.to_string()).unwrap_or_default(),
            ),
            None => (String::new(), String::new(), String::new()),
        };

        let fields = [
            escape(event.name.as_deref().unwrap_or("")),
            event.status.to_string(),
            escape(event.ico_url.as_deref().unwrap_or("")),
            escape(event.url.as_deref().unwrap_or("")),
            escape(event.raised.as_deref().unwrap_or("")),
            escape(event.end_date.as_deref().unwrap_or("")),
            traffic_success,
            monthly_visits,
            global_rank,
        ];
        csv.push_str(&fields.join(","));
        csv.push('\n');
    }

    csv
}

/// Quotes a field only when the CSV convention requires it.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Writes the CSV report next to the crawl file (state path + `.csv`).
pub fn write_report(crawl_file: &CrawlFile) -> Result<PathBuf> {
    let path = crawl_file.report_path();
    let mut file = File::create(&path)?;
    file.write_all(events_to_csv(&crawl_file.data).as_bytes())?;
    Ok(path)
}
