//! Scan orchestration: one user trigger, one request, one status narrative.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use tracing::{debug, error, info, instrument};

use super::feed::OpportunityFeed;
use super::query::{ScanForm, ScanQuery};
use super::render::render;
use super::status::Status;
use super::surface::Surface;
use crate::metrics;

/// How a scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Rendered this many cards.
    Found(usize),
    /// The service returned no opportunities.
    Empty,
    /// The request failed.
    Failed,
    /// A newer scan was dispatched before this one resolved; its result was
    /// dropped.
    Superseded,
}

/// Drives scans from a form, through a feed, onto a surface.
///
/// Overlapping scans are allowed. Each takes a ticket at dispatch and only the
/// most recently dispatched one may touch the surface when it resolves.
pub struct Scanner<F, S, I> {
    feed: F,
    surface: Mutex<S>,
    form: I,
    latest: AtomicU64,
}

impl<F, S, I> Scanner<F, S, I>
where
    F: OpportunityFeed,
    S: Surface,
    I: ScanForm,
{
    /// Create a scanner. The surface starts with an idle status.
    pub fn new(feed: F, mut surface: S, form: I) -> Self {
        surface.set_status(&Status::idle());
        Self {
            feed,
            surface: Mutex::new(surface),
            form,
            latest: AtomicU64::new(0),
        }
    }

    /// The form the scanner reads from.
    pub fn form(&self) -> &I {
        &self.form
    }

    /// Lock the surface for inspection.
    pub fn surface(&self) -> MutexGuard<'_, S> {
        self.surface.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Consume the scanner and return its surface.
    pub fn into_surface(self) -> S {
        self.surface.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    /// Run one scan.
    ///
    /// Status and cards are reset before the request goes out. Failures are
    /// logged and turned into a status message; nothing propagates.
    #[instrument(skip(self))]
    pub async fn run_scan(&self) -> ScanOutcome {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        metrics::inc_scans_dispatched();

        {
            let mut surface = self.surface();
            surface.set_status(&Status::scanning());
            surface.clear();
        }

        let query = ScanQuery::collect(&self.form);
        debug!(ticket, query = %query.to_query_string(), "Dispatching scan");

        let start = Instant::now();
        let result = self.feed.fetch(&query).await;
        metrics::record_scan_latency(start);

        let mut surface = self.surface();
        // Checked under the surface lock so a newer scan cannot start drawing
        // between the check and our writes.
        if self.latest.load(Ordering::SeqCst) != ticket {
            debug!(ticket, "Discarding response from superseded scan");
            metrics::inc_scans_superseded();
            return ScanOutcome::Superseded;
        }

        match result {
            Ok(opportunities) if opportunities.is_empty() => {
                info!("Scan returned no opportunities");
                surface.set_status(&Status::empty());
                ScanOutcome::Empty
            }
            Ok(opportunities) => {
                render(&mut *surface, &opportunities);
                surface.set_status(&Status::found(opportunities.len()));
                info!(count = opportunities.len(), "Scan complete");
                ScanOutcome::Found(opportunities.len())
            }
            Err(e) => {
                error!(error = %e, "Scan failed");
                metrics::inc_scans_failed();
                surface.set_status(&Status::failed());
                ScanOutcome::Failed
            }
        }
    }
}

impl<F, S, I> std::fmt::Debug for Scanner<F, S, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("latest", &self.latest.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
