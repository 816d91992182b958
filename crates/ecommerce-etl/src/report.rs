//! Summaries of what a stage produced, printable or serializable as JSON.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

/// Which stage produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Extract,
    Transform,
    Load,
}

impl Stage {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Extract => "Extract",
            Self::Transform => "Transform",
            Self::Load => "Load",
        }
    }
}

/// One table written (snapshot or database table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    pub name: String,
    pub rows: usize,
    pub columns: usize,
    /// File read or written.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageReport {
    pub stage: Stage,
    pub tables: Vec<TableSummary>,
    pub duration_ms: u64,
    pub finished_at: String,
}

impl StageReport {
    pub fn new(stage: Stage, tables: Vec<TableSummary>, started: Instant) -> Self {
        Self {
            stage,
            tables,
            duration_ms: started.elapsed().as_millis() as u64,
            finished_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    pub fn table(&self, name: &str) -> Option<&TableSummary> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows).sum()
    }
}

impl fmt::Display for StageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} complete in {}ms ({})",
            self.stage.display_name(),
            self.duration_ms,
            self.finished_at
        )?;
        writeln!(f, "{:<22} {:>10} {:>8}  {}", "Table", "Rows", "Columns", "File")?;
        writeln!(f, "{}", "-".repeat(70))?;
        for table in &self.tables {
            writeln!(
                f,
                "{:<22} {:>10} {:>8}  {}",
                table.name,
                table.rows,
                table.columns,
                table.path.display()
            )?;
        }
        writeln!(f, "{}", "-".repeat(70))?;
        writeln!(f, "{:<22} {:>10}", "Total", self.total_rows())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str, rows: usize) -> TableSummary {
        TableSummary {
            name: name.to_string(),
            rows,
            columns: 3,
            path: PathBuf::from(format!("data/processed/{}.parquet", name)),
        }
    }

    #[test]
    fn test_report_lookup_and_totals() {
        let report = StageReport::new(
            Stage::Load,
            vec![summary("fact_order_details", 3), summary("fact_orders", 2)],
            Instant::now(),
        );
        assert_eq!(report.table("fact_orders").unwrap().rows, 2);
        assert!(report.table("dim_products").is_none());
        assert_eq!(report.total_rows(), 5);
    }

    #[test]
    fn test_report_serialization() {
        let report = StageReport::new(Stage::Transform, vec![summary("dim_customers", 2)], Instant::now());
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"stage\":\"transform\""));
        assert!(json.contains("dim_customers"));
    }

    #[test]
    fn test_report_display_lists_tables() {
        let report = StageReport::new(Stage::Transform, vec![summary("dim_products", 2)], Instant::now());
        let text = report.to_string();
        assert!(text.starts_with("Transform complete"));
        assert!(text.contains("dim_products"));
        assert!(text.lines().last().unwrap().ends_with(" 2"));
    }
}
