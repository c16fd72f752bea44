//! Fetch SEC company facts for a ticker and list recent quarterly EPS.
//!
//! Run with: `cargo run -p hobart-data --example edgar_facts_demo -- AAPL`

use hobart_data::edgar::{EdgarClient, EdgarConfig, concepts};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let ticker = std::env::args().nth(1).unwrap_or_else(|| "AAPL".to_string());

    let config = std::env::var("HOBART_USER_AGENT")
        .map_or_else(|_| EdgarConfig::default(), EdgarConfig::with_user_agent);
    let client = EdgarClient::with_config(config)?;

    let info = client.get_company_info(&ticker).await?;
    println!("{} ({}) CIK {}", info.title, info.ticker, info.cik());

    let facts = client.get_company_facts(&info.cik()).await?;
    let entries = facts.concept_entries(concepts::EPS_BASIC)?;

    println!("\n{:<12} {:<6} {:<8} {:>8}", "Period end", "FP", "Form", "EPS");
    for entry in entries.iter().rev().take(12) {
        println!(
            "{:<12} {:<6} {:<8} {:>8}",
            entry.end,
            entry.fp.as_deref().unwrap_or("-"),
            entry.form.as_deref().unwrap_or("-"),
            entry.val.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
        );
    }

    Ok(())
}
