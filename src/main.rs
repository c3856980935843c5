use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use price_rank::config::{self, EmailSettings};
use price_rank::ingest::feeds;
use price_rank::notify::{DisabledNotifier, LogNotifier, Notifier, SendGridNotifier};
use price_rank::{PriceMonitor, PriceRankError, Result, RunOutcome};

#[derive(Parser)]
#[command(version, about = "Track competitor prices and e-mail daily rank reports")]
struct Cli {
    /// DuckDB database file
    #[arg(long, env = "PRICE_RANK_DB", global = true)]
    db: Option<PathBuf>,

    /// Directory for the generated PDF report
    #[arg(long, env = "PRICE_RANK_REPORT_DIR", default_value = ".", global = true)]
    report_dir: PathBuf,

    /// Amount subtracted from our price before ranking
    #[arg(long, env = "PRICE_RANK_DISCOUNT", default_value_t = config::DEFAULT_DISCOUNT, global = true)]
    discount: f64,

    /// Seller name of our own listings
    #[arg(long, default_value = config::OUR_SELLER, global = true)]
    seller: String,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Args)]
struct FeedArgs {
    /// CSV with a `urls` column
    #[arg(long, value_name = "FILE", default_value = "urls.csv")]
    urls: PathBuf,

    /// CSV with `Product Name` and `G7 Price` columns
    #[arg(long, value_name = "FILE", default_value = "products.csv")]
    products: PathBuf,
}

#[derive(Subcommand)]
enum Cmd {
    /// Scrape product pages and store today's prices
    Ingest(FeedArgs),
    /// Build the PDF report and e-mail it
    Report {
        /// Log the e-mail instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// Ingest, then report
    Run {
        #[command(flatten)]
        feeds: FeedArgs,
        #[arg(long)]
        dry_run: bool,
    },
    /// List stored products with row counts and date span
    Products,
    /// Print stored rows for one product
    History {
        #[arg(long)]
        product: String,
        #[arg(long, value_name = "YYYY-MM-DD")]
        from: Option<NaiveDate>,
        #[arg(long, value_name = "YYYY-MM-DD")]
        to: Option<NaiveDate>,
    },
}

fn main() -> ExitCode {
    config::load_env(None);

    tracing_subscriber::registry()
        .with(config::log_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!(error = %e, "run aborted");
    }
    // Failures are reported through the log only
    ExitCode::SUCCESS
}

fn run(cli: Cli) -> Result<()> {
    let mut builder = PriceMonitor::builder()
        .report_dir(&cli.report_dir)
        .discount(cli.discount)
        .our_seller(&cli.seller);
    if let Some(db) = &cli.db {
        builder = builder.db_path(db);
    }
    let monitor = builder.build()?;
    info!("{}", monitor);

    let today = Local::now().date_naive();

    match cli.cmd {
        Cmd::Ingest(feeds) => ingest(&monitor, &feeds, today),
        Cmd::Report { dry_run } => report(&monitor, dry_run, today),
        Cmd::Run { feeds, dry_run } => {
            ingest(&monitor, &feeds, today)?;
            report(&monitor, dry_run, today)
        }
        Cmd::Products => {
            let placeholders: Vec<&str> = monitor.options().placeholders.iter().map(String::as_str).collect();
            for stats in monitor.observations().product_overview(&placeholders)? {
                println!("{}", stats);
            }
            Ok(())
        }
        Cmd::History { product, from, to } => {
            let from = from.map(|d| d.format("%Y-%m-%d").to_string());
            let to = to.map(|d| d.format("%Y-%m-%d").to_string());
            let rows = monitor.observations().history(&product, from.as_deref(), to.as_deref())?;
            if rows.is_empty() {
                return Err(PriceRankError::NotFound(format!("no rows for product '{}'", product)));
            }
            for row in rows {
                println!("{}", serde_json::to_string(&row)?);
            }
            Ok(())
        }
    }
}

fn ingest(monitor: &PriceMonitor, args: &FeedArgs, today: NaiveDate) -> Result<()> {
    let urls = feeds::read_url_feed_file(&args.urls)?;
    let fallbacks = feeds::read_fallback_feed_file(&args.products)?;
    monitor.ingest(&urls, &fallbacks, today)?;
    Ok(())
}

fn report(monitor: &PriceMonitor, dry_run: bool, today: NaiveDate) -> Result<()> {
    let notifier: Box<dyn Notifier> = if dry_run {
        Box::new(LogNotifier)
    } else {
        match EmailSettings::from_env() {
            Ok(settings) => Box::new(SendGridNotifier::new(settings, monitor.timeout())?),
            Err(e) => {
                warn!(error = %e, "e-mail is not configured; the report will not be sent");
                Box::new(DisabledNotifier::new(&e.to_string()))
            }
        }
    };

    match monitor.generate_report(notifier.as_ref(), today)? {
        RunOutcome::NoData => info!("nothing to report"),
        RunOutcome::ReportFailed { .. } => info!("report not generated; no e-mail sent"),
        RunOutcome::Delivered { report, pages, changes } => info!(
            report = %report.display(),
            pages,
            changes = changes.len(),
            "report delivered"
        ),
        RunOutcome::NotificationFailed { report, .. } => {
            info!(report = %report.display(), "report kept on disk; e-mail failed")
        }
    }
    Ok(())
}
