//! Hobart CLI binary.
//!
//! Provides command-line access to quarterly earnings, the market trend light
//! and the combined dashboard.

mod integration;

use clap::{Parser, Subcommand, ValueEnum};
use hobart::{
    DEFAULT_CONCEPT, Dashboard, EdgarSource, FetchConfig, TickerContext, TrendSettings,
    evaluate_trend,
};
use hobart_data::DataError;
use hobart_data::edgar::{EdgarClient, EdgarConfig};
use hobart_data::yahoo::YahooQuoteProvider;
use hobart_earnings::{EarningsSeries, NormalizerConfig, QuarterDerivation};
use hobart_output::{
    DEFAULT_CHART_QUARTERS, EarningsOutcome, EarningsTable, ExportFormat, Exporter, YoyChart,
};
use hobart_signals::{DEFAULT_LOOKBACK_DAYS, DEFAULT_SYMBOL};
use indicatif::{ProgressBar, ProgressStyle};
use integration::batch::{DEFAULT_CONCURRENCY, run_batch};
use integration::cache_manager;
use std::path::PathBuf;
use std::process;
use std::time::Duration as StdDuration;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "hobart")]
#[command(about = "Hobart: quarterly earnings and year-over-year tracking", long_about = None)]
#[command(version)]
struct Cli {
    /// User-Agent sent to SEC EDGAR (name and contact email)
    #[arg(long, global = true, env = "HOBART_USER_AGENT")]
    user_agent: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show quarterly earnings with year-over-year change
    Earnings {
        /// Ticker symbol
        ticker: String,

        #[command(flatten)]
        series: SeriesArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write JSON or CSV to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show the market trend light
    Trend {
        /// Benchmark symbol
        #[arg(long, default_value = DEFAULT_SYMBOL)]
        symbol: String,

        /// Calendar days of history
        #[arg(long, default_value_t = DEFAULT_LOOKBACK_DAYS)]
        days: i64,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show trend light, earnings table and YoY chart for one ticker
    Dashboard {
        /// Ticker symbol
        ticker: String,

        #[command(flatten)]
        series: SeriesArgs,

        /// Benchmark symbol for the trend light
        #[arg(long, default_value = DEFAULT_SYMBOL)]
        symbol: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Build earnings for many tickers concurrently
    Batch {
        /// Ticker symbols
        #[arg(required = true)]
        tickers: Vec<String>,

        #[command(flatten)]
        series: SeriesArgs,

        /// Tickers fetched at once
        #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Inspect or clear the local cache
    Cache {
        /// Show cache statistics
        #[arg(long)]
        stats: bool,

        /// Clear cached data
        #[arg(long)]
        clear: bool,

        /// Restrict --clear to one ticker
        #[arg(long, requires = "clear")]
        symbol: Option<String>,
    },
}

/// Options shared by every command that builds an earnings series.
#[derive(clap::Args)]
struct SeriesArgs {
    /// XBRL concept, e.g. us-gaap:NetIncomeLoss
    #[arg(long, default_value = DEFAULT_CONCEPT)]
    concept: String,

    /// Group by calendar quarter of the period end instead of the fiscal marker
    #[arg(long)]
    calendar_quarters: bool,

    /// Disable caching (always fetch fresh data)
    #[arg(long)]
    no_cache: bool,

    /// Force refresh cached data
    #[arg(long)]
    refresh: bool,
}

impl SeriesArgs {
    fn normalizer(&self) -> NormalizerConfig {
        NormalizerConfig {
            derivation: if self.calendar_quarters {
                QuarterDerivation::CalendarDate
            } else {
                QuarterDerivation::FiscalMarker
            },
        }
    }

    fn context(&self, ticker: &str) -> TickerContext {
        TickerContext::new(ticker)
            .with_concept(self.concept.as_str())
            .with_normalizer(self.normalizer())
    }

    fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            use_cache: !self.no_cache,
            force_refresh: self.refresh,
            ..FetchConfig::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Markdown,
    Json,
    Csv,
}

impl OutputFormat {
    const fn export_format(self) -> Option<ExportFormat> {
        match self {
            Self::Json => Some(ExportFormat::PrettyJson),
            Self::Csv => Some(ExportFormat::Csv),
            Self::Text | Self::Markdown => None,
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Logs go to stderr so exported data on stdout stays clean.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("RUST_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let user_agent = cli.user_agent;

    match cli.command {
        Commands::Earnings {
            ticker,
            series,
            format,
            output,
        } => {
            let source = edgar_source(user_agent, &series)?;
            show_earnings(&source, &series.context(&ticker), format, output).await?;
        }
        Commands::Trend { symbol, days, json } => {
            show_trend(symbol, days, json).await?;
        }
        Commands::Dashboard {
            ticker,
            series,
            symbol,
            json,
        } => {
            let source = edgar_source(user_agent, &series)?;
            let settings = TrendSettings {
                symbol,
                ..TrendSettings::default()
            };
            show_dashboard(&source, &series.context(&ticker), &settings, json).await?;
        }
        Commands::Batch {
            tickers,
            series,
            concurrency,
            format,
        } => {
            let source = edgar_source(user_agent, &series)?;
            batch_earnings(&source, &tickers, &series, concurrency, format).await?;
        }
        Commands::Cache {
            stats,
            clear,
            symbol,
        } => {
            manage_cache(stats, clear, symbol.as_deref())?;
        }
    }

    Ok(())
}

/// EDGAR source honoring the cache flags.
///
/// An unusable cache is reported and skipped rather than failing the command.
fn edgar_source(user_agent: Option<String>, args: &SeriesArgs) -> Result<EdgarSource, DataError> {
    let config = user_agent.map_or_else(EdgarConfig::default, EdgarConfig::with_user_agent);
    let client = EdgarClient::with_config(config)?;

    if args.no_cache {
        return Ok(EdgarSource::new(client));
    }

    match cache_manager::open_cache() {
        Ok(cache) => Ok(EdgarSource::with_cache(client, cache, args.fetch_config())),
        Err(e) => {
            tracing::warn!(error = %e, "cache unavailable, fetching without it");
            Ok(EdgarSource::new(client))
        }
    }
}

async fn show_earnings(
    source: &EdgarSource,
    ctx: &TickerContext,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = ctx.earnings(source).await;

    match format.export_format() {
        Some(export) => {
            let (outcome, failure) = match result {
                Ok(series) => (EarningsOutcome::Series(series), None),
                Err(e) => (
                    EarningsOutcome::unavailable(ctx.ticker(), ctx.concept(), &e),
                    Some(e),
                ),
            };
            match output {
                Some(path) => {
                    outcome.export_to_file(&path, export)?;
                    match &outcome {
                        EarningsOutcome::Series(series) => {
                            println!("Wrote {} quarters to {}", series.len(), path.display());
                        }
                        EarningsOutcome::Unavailable { .. } => {
                            println!("Wrote placeholder to {}", path.display());
                        }
                    }
                }
                None => println!("{}", outcome.export_to_string(export)?),
            }
            // Placeholder is exported, the failure still sets the exit code
            if let Some(e) = failure {
                return Err(e.into());
            }
        }
        None => {
            let table = EarningsTable::from_result(ctx.ticker(), ctx.concept(), &result);
            if format == OutputFormat::Markdown {
                print!("{}", table.to_markdown());
            } else {
                print!("{}", table.to_ascii_table());
                if let Ok(series) = &result {
                    print_chart(series);
                }
            }
            // Placeholder table is printed, the failure still sets the exit code
            result?;
        }
    }

    Ok(())
}

fn print_chart(series: &EarningsSeries) {
    match YoyChart::from_series(series, DEFAULT_CHART_QUARTERS) {
        Some(chart) => print!("\n{}", chart.render()),
        None => println!("\nYoY data not available"),
    }
}

async fn show_trend(
    symbol: String,
    days: i64,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let provider = YahooQuoteProvider::new()?;
    let settings = TrendSettings {
        symbol,
        days,
        ..TrendSettings::default()
    };

    let signal = evaluate_trend(&provider, &settings).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&signal)?);
        return Ok(());
    }

    println!("Market trend ({}): {}", settings.symbol, signal.summary());
    if let (Some(fast), Some(slow)) = (signal.fast_ema, signal.slow_ema) {
        println!(
            "  {} EMA: {:.2}  {} EMA: {:.2}  ({} closes)",
            settings.config.fast_span, fast, settings.config.slow_span, slow, signal.observations
        );
    }

    Ok(())
}

async fn show_dashboard(
    source: &EdgarSource,
    ctx: &TickerContext,
    settings: &TrendSettings,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let quotes = YahooQuoteProvider::new()?;
    let dashboard = Dashboard::assemble(ctx, source, &quotes, settings).await;
    let report = dashboard.into_report()?;

    if json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_text(ctx.concept()));
    }

    Ok(())
}

async fn batch_earnings(
    source: &EdgarSource,
    tickers: &[String],
    args: &SeriesArgs,
    concurrency: usize,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(tickers.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(StdDuration::from_millis(100));
    pb.set_message("Fetching company facts...");

    let outcomes = run_batch(
        source,
        tickers,
        &args.concept,
        args.normalizer(),
        concurrency,
        Some(&pb),
    )
    .await;

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    pb.finish_with_message(format!(
        "Built {} of {} series",
        outcomes.len() - failed,
        outcomes.len()
    ));

    match format.export_format() {
        Some(export) => {
            let exported: Vec<EarningsOutcome> = outcomes
                .into_iter()
                .map(|o| EarningsOutcome::from_result(&o.ticker, &args.concept, o.result))
                .collect();
            println!("{}", exported.export_to_string(export)?);
        }
        None => {
            for outcome in &outcomes {
                let table =
                    EarningsTable::from_result(&outcome.ticker, &args.concept, &outcome.result);
                if format == OutputFormat::Markdown {
                    println!("{}", table.to_markdown());
                } else {
                    print!("{}", table.to_ascii_table());
                }
            }
        }
    }

    if failed == tickers.len() {
        return Err(format!("no earnings data for any of {} tickers", tickers.len()).into());
    }

    Ok(())
}

fn manage_cache(
    stats: bool,
    clear: bool,
    symbol: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = cache_manager::get_cache_path();

    if !stats && !clear {
        println!("Nothing to do. Use --stats or --clear");
        return Ok(());
    }

    let cache = cache_manager::open_cache()?;

    if clear {
        match symbol {
            Some(symbol) => {
                cache.clear_symbol(symbol)?;
                println!("Cleared cached data for {}", symbol.to_uppercase());
            }
            None => {
                cache.clear_all()?;
                println!("Cleared cache at {}", path.display());
            }
        }
    }

    if stats {
        let stats = cache.get_stats()?;
        println!("Cache: {}", path.display());
        println!("  CIK mappings:   {}", stats.cik_mappings);
        println!(
            "  Company facts:  {} ({:.1} KiB)",
            stats.company_facts,
            stats.company_facts_bytes as f64 / 1024.0
        );
    }

    Ok(())
}
