//! SEC EDGAR data fetching and parsing.
//!
//! This module provides access to SEC EDGAR data including:
//! - Company CIK lookup from ticker symbols
//! - XBRL company facts retrieval
//! - Concept lookup with unit selection
//!
//! # Example
//!
//! ```no_run
//! use hobart_data::edgar::{EdgarClient, concepts};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EdgarClient::new()?;
//!     let cik = client.get_company_cik("AAPL").await?;
//!     let facts = client.get_company_facts(&cik).await?;
//!
//!     for entry in facts.concept_entries(concepts::EPS_BASIC)?.iter().take(4) {
//!         println!("{} {:?} {:?}", entry.end, entry.fp, entry.val);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod facts;

pub use client::{CompanyInfo, DEFAULT_USER_AGENT, EdgarClient, EdgarConfig};
pub use facts::{CompanyFacts, ConceptFacts, FactEntry, concepts};
