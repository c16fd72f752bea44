//! Demonstration of tables, charts and exports in hobart-output.

use hobart_earnings::{EarningsPipeline, ProviderRecord};
use hobart_output::{DEFAULT_CHART_QUARTERS, EarningsTable, ExportFormat, Exporter, YoyChart};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Hobart Export Demo ===\n");

    let records = vec![
        ProviderRecord::new("2024-06-30", 1.62, "Q2", "10-Q"),
        ProviderRecord::new("2024-03-31", 2.10, "Q1", "10-Q"),
        ProviderRecord::new("2023-12-31", 2.40, "Q4", "10-K"),
        ProviderRecord::new("2023-09-30", 1.90, "Q3", "10-Q"),
        ProviderRecord::new("2023-06-30", 1.80, "Q2", "10-Q"),
        ProviderRecord::new("2023-03-31", 1.75, "Q1", "10-Q"),
        ProviderRecord::new("2022-12-31", 2.00, "Q4", "10-K"),
        ProviderRecord::new("2022-09-30", 1.60, "Q3", "10-Q"),
    ];
    let series = EarningsPipeline::default().run("ACME", "EPS", records);

    // 1. Tables
    let table = EarningsTable::from_series(&series);
    println!("{}", table.to_ascii_table());
    println!("{}", table.to_markdown());

    // 2. Chart
    match YoyChart::from_series(&series, DEFAULT_CHART_QUARTERS) {
        Some(chart) => println!("{}", chart.render()),
        None => println!("YoY data not available"),
    }

    // 3. Exports
    println!("CSV:\n{}", series.export_to_string(ExportFormat::Csv)?);
    println!("JSON:\n{}", series.export_to_string(ExportFormat::PrettyJson)?);

    // 4. A failed source renders as a single placeholder row
    let unavailable = EarningsTable::unavailable("ZZZZ", "EPS", "ticker not found");
    println!("{}", unavailable.to_ascii_table());

    Ok(())
}
