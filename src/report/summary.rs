//! Migration summary report generation

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

/// Counters for one migration run.
#[derive(Debug, Clone)]
pub struct MigrationReport {
    pub reader: String,
    pub writer: String,
    /// Records the reader produced, including skipped ones.
    pub read: usize,
    /// Records the writer accepted.
    pub written: usize,
    /// Records dropped because a required field failed normalization.
    pub skipped: usize,
    /// Records dropped by the match-fields filter.
    pub filtered: usize,
    pub elapsed: Duration,
}

impl MigrationReport {
    pub fn new(reader: String, writer: String) -> Self {
        Self {
            reader,
            writer,
            read: 0,
            written: 0,
            skipped: 0,
            filtered: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("MIGRATION SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📖 Source"),
            Cell::new(&self.reader),
        ]);
        table.add_row(vec![
            Cell::new("💾 Destination"),
            Cell::new(&self.writer),
        ]);
        table.add_row(vec![Cell::new("🎵 Songs read"), Cell::new(self.read)]);
        table.add_row(vec![
            Cell::new("✅ Songs written"),
            Cell::new(self.written)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("🚫 Skipped (normalization)"),
            Cell::new(self.skipped).fg(if self.skipped == 0 {
                Color::White
            } else {
                Color::Red
            }),
        ]);
        table.add_row(vec![
            Cell::new("🔍 Filtered (match-fields)"),
            Cell::new(self.filtered).fg(if self.filtered == 0 {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);
        table.add_row(vec![
            Cell::new("⏱️  Elapsed"),
            Cell::new(format!("{:.2}s", self.elapsed.as_secs_f64())),
        ]);

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_report_starts_at_zero() {
        let report = MigrationReport::new("xml-library".into(), "json-store-out".into());
        assert_eq!(report.read, 0);
        assert_eq!(report.written, 0);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.filtered, 0);
    }
}
