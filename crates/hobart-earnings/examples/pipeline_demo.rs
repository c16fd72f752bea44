//! Demonstration of the earnings pipeline on hand-written provider records.

use hobart_earnings::{EarningsPipeline, FactIngestor, ProviderRecord};

fn main() {
    println!("Hobart Earnings Pipeline Demo\n");

    // Quarterly EPS with an amended filing, an 8-K press release and a
    // record with an unreadable date
    let records = vec![
        ProviderRecord::new("2024-03-31", 2.10, "Q1", "10-Q"),
        ProviderRecord::new("2024-03-31", 2.05, "Q1", "10-Q/A"),
        ProviderRecord::new("2024-03-31", 2.00, "Q1", "8-K"),
        ProviderRecord::new("2023-12-31", 2.40, "Q4", "10-K"),
        ProviderRecord::new("2023-03-31", 1.75, "Q1", "10-Q"),
        ProviderRecord::new("2022-12-31", 2.00, "Q4", "10-K"),
        ProviderRecord::new("not-a-date", 9.99, "Q2", "10-Q"),
    ];

    let (_, stats) = FactIngestor::new().ingest_with_stats(&records);
    println!(
        "Ingested {} records: {} retained, {} filtered, {} unparseable\n",
        stats.seen, stats.retained, stats.filtered, stats.unparseable
    );

    let series = EarningsPipeline::default().run("ACME", "EPS", &records);

    println!("{:<10} {:>8} {:>10}", "Quarter", "EPS", "YoY %");
    for row in series.rows() {
        let value = row.value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v));
        let yoy = row
            .yoy_change_percent
            .map_or_else(|| "-".to_string(), |v| format!("{:+.2}", v));
        println!("{:<10} {:>8} {:>10}", row.label, value, yoy);
    }

    println!("\nStatus: {}", series.status());
}
