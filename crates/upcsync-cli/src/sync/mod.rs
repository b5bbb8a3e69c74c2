//! Per-business-unit catalog traversal.
//!
//! For each unit: fetch the first page, commit its rows, then follow
//! `_links.next` until the first page's `totalPages` is reached. A page that
//! cannot be processed is written to the error log and ends that unit only;
//! a store failure ends the whole run.

mod error_log;
mod sink;

use thiserror::Error;
use upcsync_catalog::{
    catalog_url, flatten, CatalogClient, CatalogError, CatalogPage, PageCursor, RawResponse,
};
use upcsync_core::{BusinessUnit, SkuUpcRecord};
use upcsync_db::DbError;

pub(crate) use error_log::ErrorLog;
pub(crate) use sink::{DryRunSink, PageSink, PgSink};

#[derive(Debug, Error)]
pub(crate) enum SyncError {
    #[error("store error while syncing {unit}")]
    Store {
        unit: &'static str,
        #[source]
        source: DbError,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UnitStatus {
    Completed,
    /// Stopped at `url` because its response could not be processed.
    Abandoned { url: String },
}

#[derive(Debug, Clone)]
pub(crate) struct UnitOutcome {
    pub(crate) code: &'static str,
    pub(crate) pages_committed: u32,
    pub(crate) rows_affected: u64,
    pub(crate) status: UnitStatus,
}

#[derive(Debug, Default)]
pub(crate) struct SyncSummary {
    pub(crate) units: Vec<UnitOutcome>,
}

impl SyncSummary {
    pub(crate) fn rows_affected(&self) -> u64 {
        self.units.iter().map(|u| u.rows_affected).sum()
    }

    pub(crate) fn abandoned(&self) -> usize {
        self.units
            .iter()
            .filter(|u| matches!(u.status, UnitStatus::Abandoned { .. }))
            .count()
    }
}

struct LoadedPage {
    page: CatalogPage,
    records: Vec<SkuUpcRecord>,
}

struct MalformedPage {
    raw: RawResponse,
    error: CatalogError,
}

pub(crate) struct CatalogSync<'a, S> {
    client: &'a CatalogClient,
    sink: S,
    error_log: &'a ErrorLog,
    base_url: &'a str,
    page_size: u32,
}

impl<'a, S: PageSink> CatalogSync<'a, S> {
    pub(crate) fn new(
        client: &'a CatalogClient,
        sink: S,
        error_log: &'a ErrorLog,
        base_url: &'a str,
        page_size: u32,
    ) -> Self {
        Self {
            client,
            sink,
            error_log,
            base_url,
            page_size,
        }
    }

    pub(crate) fn into_sink(self) -> S {
        self.sink
    }

    /// Syncs `units` one after another.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Store`] on the first failed page write; units
    /// after it are not attempted.
    pub(crate) async fn run(
        &mut self,
        units: &[&'static BusinessUnit],
    ) -> Result<SyncSummary, SyncError> {
        let mut summary = SyncSummary::default();
        for unit in units {
            let outcome = self.sync_unit(unit).await?;
            match &outcome.status {
                UnitStatus::Completed => tracing::info!(
                    unit = outcome.code,
                    pages = outcome.pages_committed,
                    rows = outcome.rows_affected,
                    "business unit complete"
                ),
                UnitStatus::Abandoned { url } => tracing::warn!(
                    unit = outcome.code,
                    pages = outcome.pages_committed,
                    rows = outcome.rows_affected,
                    url = %url,
                    "business unit abandoned, moving on to next"
                ),
            }
            summary.units.push(outcome);
        }
        Ok(summary)
    }

    /// Walks every page of one unit's catalog.
    ///
    /// A malformed page stops the unit where it is; pages already committed
    /// stay committed and the remaining pages are never requested.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Store`] if a page cannot be written, or
    /// [`SyncError::Catalog`] if the first-page URL cannot be built.
    pub(crate) async fn sync_unit(
        &mut self,
        unit: &'static BusinessUnit,
    ) -> Result<UnitOutcome, SyncError> {
        let mut outcome = UnitOutcome {
            code: unit.code,
            pages_committed: 0,
            rows_affected: 0,
            status: UnitStatus::Completed,
        };

        let first_url = catalog_url(self.base_url, unit.code, self.page_size)?;
        let first = match self.load_page(unit, &first_url).await {
            Ok(loaded) => loaded,
            Err(malformed) => {
                self.abandon(unit, &mut outcome, malformed).await;
                return Ok(outcome);
            }
        };

        tracing::info!(
            unit = unit.code,
            total_pages = first.page.total_pages(),
            "total pages to process"
        );
        self.commit(unit, &mut outcome, &first.records).await?;

        let Some(mut cursor) = PageCursor::after_first_page(&first.page) else {
            return Ok(outcome);
        };

        while let Some(url) = cursor.next_url().map(str::to_owned) {
            let loaded = match self.load_page(unit, &url).await {
                Ok(loaded) => loaded,
                Err(malformed) => {
                    self.abandon(unit, &mut outcome, malformed).await;
                    return Ok(outcome);
                }
            };

            self.commit(unit, &mut outcome, &loaded.records).await?;
            cursor.advance(&loaded.page);
        }

        Ok(outcome)
    }

    async fn load_page(
        &self,
        unit: &BusinessUnit,
        url: &str,
    ) -> Result<LoadedPage, MalformedPage> {
        let raw = self.client.fetch(url).await;
        let loaded = CatalogPage::parse(&raw.body).and_then(|page| {
            let records = flatten(&page, unit)?;
            Ok(LoadedPage { page, records })
        });
        loaded.map_err(|error| MalformedPage { raw, error })
    }

    async fn commit(
        &mut self,
        unit: &'static BusinessUnit,
        outcome: &mut UnitOutcome,
        records: &[SkuUpcRecord],
    ) -> Result<(), SyncError> {
        let rows = self
            .sink
            .write_page(records)
            .await
            .map_err(|source| SyncError::Store {
                unit: unit.code,
                source,
            })?;

        outcome.pages_committed += 1;
        outcome.rows_affected += rows;
        tracing::info!(
            unit = unit.code,
            page = outcome.pages_committed,
            rows,
            "page of SKUs processed"
        );
        Ok(())
    }

    async fn abandon(
        &self,
        unit: &BusinessUnit,
        outcome: &mut UnitOutcome,
        malformed: MalformedPage,
    ) {
        tracing::warn!(
            unit = unit.code,
            url = %malformed.raw.url,
            error = %malformed.error,
            error_log = %self.error_log.path().display(),
            "could not process catalog response; body written to error log"
        );
        self.error_log
            .record_malformed(&malformed.raw.url, &malformed.error, &malformed.raw.body)
            .await;
        outcome.status = UnitStatus::Abandoned {
            url: malformed.raw.url,
        };
    }
}

#[cfg(test)]
#[path = "sync_test.rs"]
mod tests;
