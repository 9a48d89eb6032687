//! The fetch, parse and write pipeline for one profile.
//!
//! A run has two independent steps, metrics and publications. A failing step
//! is reported and yields nothing; it never stops the other step. Only the
//! outputs of successful steps are written.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::models::MetricsRecord;
use crate::scholar::{
    Listing, MetricsExtractor, PageFetcher, ProfileUrls, PublicationExtractor, ScrapeError,
};
use crate::ui::{self, Status};
use crate::utils::write_json;

/// Outcome of one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Metrics that were extracted and written
    pub metrics: Option<MetricsRecord>,

    /// Number of publications extracted and written
    pub publications: Option<usize>,

    /// The listing filled the requested page size, so older entries may be
    /// missing
    pub truncated: bool,

    /// Files written during the run
    pub written: Vec<PathBuf>,

    /// One message per failed step
    pub failures: Vec<String>,
}

impl RunSummary {
    /// Whether every attempted step succeeded
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs the extraction steps for a single configured profile
#[derive(Debug)]
pub struct Runner<'a> {
    config: &'a Config,
    urls: ProfileUrls,
    metrics: MetricsExtractor,
    publications: PublicationExtractor,
}

impl<'a> Runner<'a> {
    pub fn new(config: &'a Config) -> Result<Self, ScrapeError> {
        let urls = ProfileUrls::new(&config.scholar)?;

        Ok(Self {
            config,
            metrics: MetricsExtractor::new(config.scholar.stat_lookup),
            publications: PublicationExtractor::new(urls.clone())?,
            urls,
        })
    }

    pub fn urls(&self) -> &ProfileUrls {
        &self.urls
    }

    /// Fetch both pages, pausing between the requests, and write the results.
    pub async fn run(&self, fetcher: &dyn PageFetcher) -> RunSummary {
        println!("Fetching data from Google Scholar...");
        println!("Scholar ID: {}", self.urls.user_id());
        println!();

        let mut failures = Vec::new();

        ui::print_step(1, "Fetching metrics...");
        let page = fetcher.fetch(&self.urls.profile()).await;
        let metrics = self.metrics_step(page, &mut failures);

        tracing::debug!(
            delay_ms = self.config.scholar.request_delay_ms,
            "Pausing between requests"
        );
        tokio::time::sleep(self.config.scholar.request_delay()).await;

        println!();
        ui::print_step(2, "Fetching publications...");
        let page = fetcher.fetch(&self.urls.listing()).await;
        let publications = self.publications_step(page, &mut failures);

        self.finish(metrics, publications, failures)
    }

    /// Parse saved copies of the profile and listing pages.
    ///
    /// A page that is not given is skipped and does not count as a failure.
    pub fn run_offline(&self, profile: Option<&Path>, listing: Option<&Path>) -> RunSummary {
        let mut failures = Vec::new();

        ui::print_step(1, "Parsing metrics...");
        let metrics = match profile {
            Some(path) => self.metrics_step(read_page(path), &mut failures),
            None => {
                ui::print_status(Status::Info, "No profile page given, skipping metrics");
                None
            }
        };

        println!();
        ui::print_step(2, "Parsing publications...");
        let publications = match listing {
            Some(path) => self.publications_step(read_page(path), &mut failures),
            None => {
                ui::print_status(Status::Info, "No listing page given, skipping publications");
                None
            }
        };

        self.finish(metrics, publications, failures)
    }

    fn metrics_step(
        &self,
        page: Result<String, ScrapeError>,
        failures: &mut Vec<String>,
    ) -> Option<MetricsRecord> {
        match page.and_then(|html| self.metrics.extract(&html)) {
            Ok(metrics) => {
                ui::print_status(Status::Success, &format!("Metrics parsed: {}", metrics));
                Some(metrics)
            }
            Err(e) => {
                tracing::error!(error = %e, "Metrics step failed");
                let message = format!("Error fetching metrics: {}", e);
                ui::print_status(Status::Error, &message);
                failures.push(message);
                None
            }
        }
    }

    fn publications_step(
        &self,
        page: Result<String, ScrapeError>,
        failures: &mut Vec<String>,
    ) -> Option<Listing> {
        match page.and_then(|html| self.publications.extract_listing(&html)) {
            Ok(listing) => {
                ui::print_status(
                    Status::Success,
                    &format!("Parsed {} publications", listing.publications.len()),
                );
                if self.is_truncated(&listing) {
                    ui::print_status(
                        Status::Warning,
                        &format!(
                            "Listing is capped at {} entries; older publications are not included",
                            self.config.scholar.page_size
                        ),
                    );
                }
                Some(listing)
            }
            Err(ScrapeError::NoPublications) => {
                tracing::error!("Publications step found no rows");
                let message = "No publications found".to_string();
                ui::print_status(Status::Error, &message);
                failures.push(message);
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "Publications step failed");
                let message = format!("Error fetching publications: {}", e);
                ui::print_status(Status::Error, &message);
                failures.push(message);
                None
            }
        }
    }

    /// Rows are counted before invalid ones are skipped
    fn is_truncated(&self, listing: &Listing) -> bool {
        listing.rows >= self.config.scholar.page_size as usize
    }

    fn finish(
        &self,
        metrics: Option<MetricsRecord>,
        listing: Option<Listing>,
        failures: Vec<String>,
    ) -> RunSummary {
        let mut summary = RunSummary {
            failures,
            ..RunSummary::default()
        };

        if let Some(metrics) = metrics {
            let path = self.config.output.metrics_path();
            if self.write_output(&path, &metrics, &mut summary) {
                summary.metrics = Some(metrics);
            }
        }

        if let Some(listing) = listing {
            summary.truncated = self.is_truncated(&listing);
            let path = self.config.output.publications_path();
            if self.write_output(&path, &listing.publications, &mut summary) {
                summary.publications = Some(listing.publications.len());
            }
        }

        print_summary(&summary);
        summary
    }

    fn write_output<T: serde::Serialize + ?Sized>(
        &self,
        path: &Path,
        value: &T,
        summary: &mut RunSummary,
    ) -> bool {
        match write_json(path, value) {
            Ok(()) => {
                ui::print_status(Status::Success, &format!("Saved {}", path.display()));
                summary.written.push(path.to_path_buf());
                true
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Could not write output");
                let message = format!("Could not write {}: {}", path.display(), e);
                ui::print_status(Status::Error, &message);
                summary.failures.push(message);
                false
            }
        }
    }
}

fn read_page(path: &Path) -> Result<String, ScrapeError> {
    tracing::debug!(path = %path.display(), "Reading saved page");
    Ok(std::fs::read_to_string(path)?)
}

fn print_summary(summary: &RunSummary) {
    println!();
    ui::print_divider();
    if summary.is_success() {
        ui::print_status(Status::Success, "SUCCESS! All data fetched and saved");
    } else {
        ui::print_status(Status::Error, "Some errors occurred. Check the messages above.");
    }
    if let (Some(metrics), Some(count)) = (&summary.metrics, summary.publications) {
        for line in ui::summary_details(metrics, count) {
            println!("{}", line);
        }
    }
    ui::print_divider();
}
