//! Output formatting and persistence for station summaries.
//!
//! Supports console lines, JSON logging, and CSV append.

use anyhow::Result;
use tracing::{debug, info};

use crate::stats::StationSummary;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Printed after every station line.
pub const SEPARATOR: &str = "---------------------------------------------------------------------------------------------------------";

/// The console line for one station.
pub fn summary_line(summary: &StationSummary) -> String {
    if summary.data_available {
        format!(
            "{} Mean wait time: {:.2} Minutes, Median wait time: {:.2} Minutes, Standard Deviation: {:.2}",
            summary.station, summary.mean_wait, summary.median_wait, summary.std_dev
        )
    } else {
        format!(
            "No valid wait time data (fewer than 2 predictions) for {}.",
            summary.station
        )
    }
}

/// Prints each station's line and a separator to stdout.
pub fn print_summaries(summaries: &[StationSummary]) {
    for summary in summaries {
        println!("{}", summary_line(summary));
        println!("{SEPARATOR}");
    }
}

/// Logs station summaries as pretty-printed JSON.
pub fn print_json(summaries: &[StationSummary]) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(summaries)?);
    Ok(())
}

/// Appends [`StationSummary`] records as rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_records(path: &str, summaries: &[StationSummary]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = summaries.len(), "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    for summary in summaries {
        writer.serialize(summary)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn kenmore(available: bool) -> StationSummary {
        StationSummary {
            station_id: "place-kencl".into(),
            station: "Kenmore".into(),
            mean_wait: if available { 4.5 } else { 0.0 },
            median_wait: if available { 4.0 } else { 0.0 },
            std_dev: if available { 1.118 } else { 0.0 },
            data_available: available,
            ..Default::default()
        }
    }

    #[test]
    fn test_summary_line_with_data() {
        assert_eq!(
            summary_line(&kenmore(true)),
            "Kenmore Mean wait time: 4.50 Minutes, Median wait time: 4.00 Minutes, Standard Deviation: 1.12"
        );
    }

    #[test]
    fn test_summary_line_without_data() {
        assert_eq!(
            summary_line(&kenmore(false)),
            "No valid wait time data (fewer than 2 predictions) for Kenmore."
        );
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&[kenmore(true), kenmore(false)]).unwrap();
    }

    #[test]
    fn test_append_records_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summaries.csv");
        let path = path.to_str().unwrap();

        append_records(path, &[kenmore(true)]).unwrap();
        append_records(path, &[kenmore(false)]).unwrap();

        let content = fs::read_to_string(path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("timestamp,route_id,direction_id,station_id,station"));
        assert_eq!(
            content.lines().filter(|l| l.contains("data_available")).count(),
            1
        );
    }

    #[test]
    fn test_append_records_empty_slice_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        let path = path.to_str().unwrap();

        append_records(path, &[]).unwrap();

        assert!(Path::new(path).exists());
    }
}
