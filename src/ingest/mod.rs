//! Feed ingestion: fetch → enrich → filter → persist.
//!
//! Runs synchronously, one row at a time. A failing row is skipped; only feed
//! rejections and database errors stop the run.

pub mod enrich;
pub mod filter;
pub mod sink;

use thiserror::Error;

use crate::api::{FeedError, FeedSource, PlaceLookup};
use crate::db::{DbError, StoreRepository};

pub use enrich::{EnrichOutcome, enrich_row};
pub use filter::retain_persistable;
pub use sink::{SinkOutcome, persist_new};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error("failed to persist stores: {0}")]
    Db(#[from] DbError),
}

/// Counters for one or more ingested pages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub pages: u32,
    /// Row count the feed reports as available in total
    pub total_available: u32,
    pub fetched: usize,
    pub enriched: usize,
    pub no_address_match: usize,
    pub category_rejected: usize,
    pub lookup_failed: usize,
    pub discarded: usize,
    pub inserted: usize,
    pub skipped_existing: usize,
}

impl IngestReport {
    fn record(&mut self, outcome: EnrichOutcome) {
        match outcome {
            EnrichOutcome::Enriched => self.enriched += 1,
            EnrichOutcome::NoAddressMatch => self.no_address_match += 1,
            EnrichOutcome::CategoryRejected => self.category_rejected += 1,
            EnrichOutcome::LookupFailed => self.lookup_failed += 1,
        }
    }

    fn merge(&mut self, other: &IngestReport) {
        self.pages += other.pages;
        self.total_available = self.total_available.max(other.total_available);
        self.fetched += other.fetched;
        self.enriched += other.enriched;
        self.no_address_match += other.no_address_match;
        self.category_rejected += other.category_rejected;
        self.lookup_failed += other.lookup_failed;
        self.discarded += other.discarded;
        self.inserted += other.inserted;
        self.skipped_existing += other.skipped_existing;
    }
}

/// Ingest the inclusive feed window `[start, end]`.
///
/// Returns `Ok(None)` when the feed gave no usable result.
pub fn ingest_page<F, L, R>(
    feed: &F,
    lookup: &L,
    repo: &R,
    start: u32,
    end: u32,
) -> Result<Option<IngestReport>, IngestError>
where
    F: FeedSource + ?Sized,
    L: PlaceLookup + ?Sized,
    R: StoreRepository + ?Sized,
{
    let Some(response) = feed.fetch_page(start, end)? else {
        return Ok(None);
    };

    let mut report = IngestReport {
        pages: 1,
        total_available: response.list_total_count,
        fetched: response.row.len(),
        ..IngestReport::default()
    };

    let mut rows = response.row;
    for row in rows.iter_mut() {
        report.record(enrich_row(lookup, row));
    }

    let (stores, discarded) = retain_persistable(&rows);
    report.discarded = discarded;

    let outcome = persist_new(repo, &stores)?;
    report.inserted = outcome.inserted;
    report.skipped_existing = outcome.skipped_existing;

    tracing::info!(
        start,
        end,
        fetched = report.fetched,
        inserted = report.inserted,
        skipped_existing = report.skipped_existing,
        discarded = report.discarded,
        "feed page ingested"
    );
    Ok(Some(report))
}

/// Resolve the inclusive window for a single-page run.
///
/// `end` defaults to a full page from `start` and never reaches past it, so the
/// window stays within what the feed accepts per request.
pub fn page_window(start: u32, end: Option<u32>, page_size: u32) -> (u32, u32) {
    let start = start.max(1);
    let widest = start.saturating_add(page_size.max(1) - 1);
    (start, end.map_or(widest, |end| end.min(widest)))
}

/// Ingest the feed from `start` onwards in windows of `page_size` rows until
/// the reported total is covered.
///
/// `on_page` sees the running totals after every page.
pub fn ingest_all<F, L, R>(
    feed: &F,
    lookup: &L,
    repo: &R,
    start: u32,
    page_size: u32,
    mut on_page: impl FnMut(&IngestReport),
) -> Result<IngestReport, IngestError>
where
    F: FeedSource + ?Sized,
    L: PlaceLookup + ?Sized,
    R: StoreRepository + ?Sized,
{
    let page_size = page_size.max(1);
    let mut total = IngestReport::default();
    let mut window_start = start.max(1);

    loop {
        let window_end = window_start.saturating_add(page_size - 1);
        let Some(page) = ingest_page(feed, lookup, repo, window_start, window_end)? else {
            if total.pages > 0 && window_start <= total.total_available {
                tracing::warn!(
                    start = window_start,
                    end = window_end,
                    total = total.total_available,
                    "feed gave no result mid-walk, remaining rows were not ingested"
                );
            }
            break;
        };

        total.merge(&page);
        on_page(&total);

        if page.fetched == 0 || window_end >= page.total_available {
            break;
        }
        window_start = window_end + 1;
    }

    Ok(total)
}
