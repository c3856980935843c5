//! One report run: load, rank, render, notify.
//!
//! Failures while building the document are logged and end the run without
//! an e-mail. A failed delivery is logged and leaves the document on disk.
//! Only a failure to read the store is returned as an error.

use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::config::{self, PLACEHOLDER_PRODUCTS};
use crate::error::Result;
use crate::loader::load_observations;
use crate::models::{Observation, ProductAnalysis, RankChangeEvent};
use crate::notify::{Attachment, Email, Notifier};
use crate::ranking::{process_product, products_in, RankPolicy};
use crate::report::ReportDocument;
use crate::store::PriceStore;

/// Settings for a report run.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub policy: RankPolicy,
    pub report_dir: PathBuf,
    /// Product titles never reported (unresolved scrapes).
    pub placeholders: Vec<String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            policy: RankPolicy::default(),
            report_dir: PathBuf::from("."),
            placeholders: PLACEHOLDER_PRODUCTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ReportOptions {
    pub fn report_path(&self, date: NaiveDate) -> PathBuf {
        self.report_dir.join(config::report_filename(date))
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Nothing to report; no document was written and nothing was sent.
    NoData,
    /// The document could not be generated; nothing was sent.
    ReportFailed { error: String },
    Delivered {
        report: PathBuf,
        pages: usize,
        changes: Vec<RankChangeEvent>,
    },
    /// The document exists but the e-mail could not be sent.
    NotificationFailed {
        report: PathBuf,
        pages: usize,
        changes: Vec<RankChangeEvent>,
        error: String,
    },
}

impl RunOutcome {
    pub fn changes(&self) -> &[RankChangeEvent] {
        match self {
            RunOutcome::Delivered { changes, .. } | RunOutcome::NotificationFailed { changes, .. } => changes,
            _ => &[],
        }
    }
}

/// Analyse every product in first-appearance order.
pub fn analyze_all(observations: &[Observation], policy: &RankPolicy) -> Vec<ProductAnalysis> {
    products_in(observations)
        .iter()
        .map(|product| process_product(observations, product, policy))
        .collect()
}

/// Run the full report pipeline for `date`.
pub fn generate_report(
    store: &dyn PriceStore,
    notifier: &dyn Notifier,
    options: &ReportOptions,
    date: NaiveDate,
) -> Result<RunOutcome> {
    let placeholders: Vec<&str> = options.placeholders.iter().map(String::as_str).collect();
    let observations = load_observations(store, &placeholders)?;

    if observations.is_empty() {
        warn!("no valid data found for report generation");
        return Ok(RunOutcome::NoData);
    }

    let path = options.report_path(date);
    let (pages, changes) = match build_report(&observations, &path, options, date) {
        Ok(built) => built,
        Err(e) => {
            error!(path = %path.display(), error = %e, "error generating report");
            return Ok(RunOutcome::ReportFailed { error: e.to_string() });
        }
    };

    if changes.is_empty() {
        info!("no rank changes detected");
    } else {
        info!(count = changes.len(), "rank changes detected");
    }

    match deliver(notifier, &changes, &path) {
        Ok(()) => Ok(RunOutcome::Delivered {
            report: path,
            pages,
            changes,
        }),
        Err(e) => {
            error!(error = %e, "error sending email");
            Ok(RunOutcome::NotificationFailed {
                report: path,
                pages,
                changes,
                error: e.to_string(),
            })
        }
    }
}

/// Render all product pages; returns the page count and the merged rank changes.
fn build_report(
    observations: &[Observation],
    path: &std::path::Path,
    options: &ReportOptions,
    date: NaiveDate,
) -> Result<(usize, Vec<RankChangeEvent>)> {
    let title = format!("Price Report {}", date.format("%Y-%m-%d"));
    let mut doc = ReportDocument::create(path, &title)?;
    let mut changes = Vec::new();

    for analysis in analyze_all(observations, &options.policy) {
        if doc.add_product(&analysis.product, &analysis.summaries)? {
            changes.extend(analysis.changes);
        }
    }

    let pages = doc.page_count();
    doc.finish()?;
    Ok((pages, changes))
}

fn deliver(notifier: &dyn Notifier, changes: &[RankChangeEvent], path: &std::path::Path) -> Result<()> {
    let email = Email::for_changes(changes).with_attachment(Attachment::pdf(path)?);
    notifier.send(&email)
}
