//! Migration report export functionality

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use super::MigrationReport;

/// Metadata about the migration run
#[derive(Serialize)]
pub struct ReportMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    /// Songport version
    pub songport_version: String,
    /// Activated reader adapter
    pub reader: String,
    /// Activated writer adapter
    pub writer: String,
}

/// Counters of the migration run
#[derive(Serialize)]
pub struct ReportCounts {
    pub read: usize,
    pub written: usize,
    pub skipped: usize,
    pub filtered: usize,
    pub elapsed_ms: u128,
}

/// Complete migration report export
#[derive(Serialize)]
pub struct MigrationExport {
    pub metadata: ReportMetadata,
    pub counts: ReportCounts,
}

/// Write the migration report as pretty-printed JSON.
pub fn export_report(report: &MigrationReport, path: &Path) -> Result<()> {
    let export = MigrationExport {
        metadata: ReportMetadata {
            timestamp: Utc::now().to_rfc3339(),
            songport_version: env!("CARGO_PKG_VERSION").to_string(),
            reader: report.reader.clone(),
            writer: report.writer.clone(),
        },
        counts: ReportCounts {
            read: report.read,
            written: report.written,
            skipped: report.skipped,
            filtered: report.filtered,
            elapsed_ms: report.elapsed.as_millis(),
        },
    };
    let body = serde_json::to_string_pretty(&export)
        .context("Failed to serialize migration report")?;
    fs::write(path, body)
        .with_context(|| format!("Failed to write report file: {}", path.display()))?;
    Ok(())
}
