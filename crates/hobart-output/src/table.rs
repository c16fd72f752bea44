//! Earnings tables in ASCII and Markdown.

use hobart_earnings::{EarningsError, EarningsSeries, SeriesRow, SeriesStatus};
use serde::{Deserialize, Serialize};

const TABLE_WIDTH: usize = 48;

/// Text for an absent value.
const ABSENT: &str = "-";

/// Format a reported value with two decimals, or `-`.
pub fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| ABSENT.to_string(), |v| format!("{:.2}", v))
}

/// Format a percentage with sign and two decimals, or `-`.
pub fn format_percent(value: Option<f64>) -> String {
    value.map_or_else(|| ABSENT.to_string(), |v| format!("{:+.2}%", v))
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Quarter label, or `-` for a placeholder
    pub label: String,
    /// Reported value
    pub value: Option<f64>,
    /// Year-over-year change in percent
    pub yoy_change_percent: Option<f64>,
    /// Reason shown on a placeholder row
    pub note: Option<String>,
}

impl TableRow {
    /// Placeholder row for a failed source.
    pub fn placeholder(reason: impl Into<String>) -> Self {
        Self {
            label: ABSENT.to_string(),
            value: None,
            yoy_change_percent: None,
            note: Some(reason.into()),
        }
    }

    /// Whether this row stands in for missing data.
    pub const fn is_placeholder(&self) -> bool {
        self.note.is_some()
    }
}

impl From<&SeriesRow> for TableRow {
    fn from(row: &SeriesRow) -> Self {
        Self {
            label: row.label.clone(),
            value: row.value,
            yoy_change_percent: row.yoy_change_percent,
            note: None,
        }
    }
}

/// What the table can say about its data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableStatus {
    /// Status of a successfully built series
    Series(SeriesStatus),
    /// The data source failed
    Unavailable(String),
}

impl TableStatus {
    /// Status line printed under the table.
    pub fn line(&self) -> String {
        match self {
            Self::Series(SeriesStatus::Complete) => "Status: complete".to_string(),
            Self::Series(SeriesStatus::NoQualifyingRecords) => {
                "No data found: no quarterly filings".to_string()
            }
            Self::Series(SeriesStatus::InsufficientHistory) => {
                "Insufficient history: no prior-year quarter to compare".to_string()
            }
            Self::Unavailable(reason) => format!("Source unavailable: {}", reason),
        }
    }
}

/// Tabular view of an earnings series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsTable {
    /// Ticker
    pub ticker: String,
    /// Metric name
    pub concept: String,
    /// Rows, newest first
    pub rows: Vec<TableRow>,
    /// Data status
    pub status: TableStatus,
}

impl EarningsTable {
    /// Table for a built series.
    pub fn from_series(series: &EarningsSeries) -> Self {
        Self {
            ticker: series.ticker.clone(),
            concept: series.concept.clone(),
            rows: series.rows().iter().map(TableRow::from).collect(),
            status: TableStatus::Series(series.status()),
        }
    }

    /// Table with a single placeholder row for a failed source.
    pub fn unavailable(ticker: &str, concept: &str, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            ticker: ticker.to_string(),
            concept: concept.to_string(),
            rows: vec![TableRow::placeholder(reason.clone())],
            status: TableStatus::Unavailable(reason),
        }
    }

    /// Table for a pipeline outcome.
    pub fn from_result(
        ticker: &str,
        concept: &str,
        result: &Result<EarningsSeries, EarningsError>,
    ) -> Self {
        match result {
            Ok(series) => Self::from_series(series),
            Err(e) => Self::unavailable(
                ticker,
                concept,
                e.reason().map_or_else(|| e.to_string(), str::to_string),
            ),
        }
    }

    /// Render as a fixed-width ASCII table.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nEarnings: {} ({})\n", self.ticker, self.concept));
        output.push_str(&"=".repeat(TABLE_WIDTH));
        output.push('\n');

        output.push_str(&format!("{:<12} {:>14} {:>14}\n", "Quarter", "Value", "YoY %"));
        output.push_str(&"-".repeat(TABLE_WIDTH));
        output.push('\n');

        for row in &self.rows {
            match &row.note {
                Some(note) => {
                    output.push_str(&format!(
                        "{:<12} {:>14} {:>14}  {}\n",
                        row.label, ABSENT, ABSENT, note
                    ));
                }
                None => {
                    output.push_str(&format!(
                        "{:<12} {:>14} {:>14}\n",
                        row.label,
                        format_value(row.value),
                        format_percent(row.yoy_change_percent)
                    ));
                }
            }
        }

        output.push_str(&"-".repeat(TABLE_WIDTH));
        output.push('\n');
        output.push_str(&self.status.line());
        output.push('\n');

        output
    }

    /// Render as a Markdown table.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();
        let with_notes = self.rows.iter().any(TableRow::is_placeholder);

        output.push_str(&format!("### Earnings: {} ({})\n\n", self.ticker, self.concept));
        if with_notes {
            output.push_str("| Quarter | Value | YoY % | Note |\n");
            output.push_str("|---|---:|---:|---|\n");
        } else {
            output.push_str("| Quarter | Value | YoY % |\n");
            output.push_str("|---|---:|---:|\n");
        }

        for row in &self.rows {
            output.push_str(&format!(
                "| {} | {} | {} |",
                row.label,
                format_value(row.value),
                format_percent(row.yoy_change_percent)
            ));
            if with_notes {
                output.push_str(&format!(" {} |", row.note.as_deref().unwrap_or("")));
            }
            output.push('\n');
        }

        output.push_str(&format!("\n_{}_\n", self.status.line()));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hobart_earnings::{EarningsPipeline, ProviderRecord};
    use rstest::rstest;

    fn series() -> EarningsSeries {
        EarningsPipeline::default().run(
            "ACME",
            "EPS",
            vec![
                ProviderRecord::new("2024-03-31", 2.10, "Q1", "10-Q"),
                ProviderRecord::new("2023-03-31", 1.75, "Q1", "10-Q"),
            ],
        )
    }

    #[rstest]
    #[case(Some(2.1), "2.10")]
    #[case(Some(-0.456), "-0.46")]
    #[case(None, "-")]
    fn test_format_value(#[case] value: Option<f64>, #[case] expected: &str) {
        assert_eq!(format_value(value), expected);
    }

    #[rstest]
    #[case(Some(20.0), "+20.00%")]
    #[case(Some(-7.13), "-7.13%")]
    #[case(Some(0.0), "+0.00%")]
    #[case(None, "-")]
    fn test_format_percent(#[case] value: Option<f64>, #[case] expected: &str) {
        assert_eq!(format_percent(value), expected);
    }

    #[test]
    fn test_ascii_table() {
        let table = EarningsTable::from_series(&series());
        let text = table.to_ascii_table();

        assert!(text.starts_with(&format!("\nEarnings: ACME (EPS)\n{}\n", "=".repeat(48))));
        assert!(text.ends_with("Status: complete\n"));
        assert!(text.contains("Q1 2024"));
        assert!(text.contains("2.10"));
        assert!(text.contains("+20.00%"));
        assert!(text.contains("Status: complete"));

        // The oldest quarter has no comparison
        let last_row = text.lines().find(|l| l.starts_with("Q1 2023")).unwrap();
        assert!(last_row.trim_end().ends_with('-'));
    }

    #[test]
    fn test_markdown_table() {
        let table = EarningsTable::from_series(&series());
        let md = table.to_markdown();

        assert!(md.contains("| Quarter | Value | YoY % |"));
        assert!(md.contains("| Q1 2024 | 2.10 | +20.00% |"));
        assert!(md.contains("| Q1 2023 | 1.75 | - |"));
        assert!(!md.contains("Note"));
    }

    #[test]
    fn test_placeholder_row() {
        let err = EarningsError::source_unavailable("ACME", "ticker not found");
        let table = EarningsTable::from_result("ACME", "EPS", &Err(err));

        assert_eq!(table.rows.len(), 1);
        assert!(table.rows[0].is_placeholder());
        assert_eq!(table.rows[0].label, "-");
        assert_eq!(table.status, TableStatus::Unavailable("ticker not found".into()));

        let text = table.to_ascii_table();
        assert!(text.contains("ticker not found"));
        assert!(text.contains("Source unavailable: ticker not found"));

        let md = table.to_markdown();
        assert!(md.contains("| - | - | - | ticker not found |"));
    }

    #[test]
    fn test_status_lines_distinguish_empty_and_short_history() {
        let empty = EarningsPipeline::default().run("ACME", "EPS", Vec::<ProviderRecord>::new());
        let short = EarningsPipeline::default().run(
            "ACME",
            "EPS",
            vec![ProviderRecord::new("2024-03-31", 1.0, "Q1", "10-Q")],
        );

        let empty_line = EarningsTable::from_series(&empty).status.line();
        let short_line = EarningsTable::from_series(&short).status.line();

        assert!(empty_line.starts_with("No data found"));
        assert!(short_line.starts_with("Insufficient history"));
    }
}
