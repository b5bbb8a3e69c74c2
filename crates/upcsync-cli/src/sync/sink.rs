//! Destinations for flattened catalog pages.

use upcsync_core::SkuUpcRecord;
use upcsync_db::DbError;

/// Where each page's rows go once they have been flattened.
///
/// Implementations commit one page per call; a returned error is fatal to
/// the whole run.
pub(crate) trait PageSink {
    async fn write_page(&mut self, records: &[SkuUpcRecord]) -> Result<u64, DbError>;
}

/// Writes pages to the `upc` table through the shared pool.
pub(crate) struct PgSink<'a> {
    pool: &'a sqlx::PgPool,
}

impl<'a> PgSink<'a> {
    pub(crate) fn new(pool: &'a sqlx::PgPool) -> Self {
        Self { pool }
    }
}

impl PageSink for PgSink<'_> {
    async fn write_page(&mut self, records: &[SkuUpcRecord]) -> Result<u64, DbError> {
        upcsync_db::upsert_sku_upcs(self.pool, records).await
    }
}

/// Counts what would have been written without touching the database.
#[derive(Debug, Default)]
pub(crate) struct DryRunSink {
    pub(crate) records_seen: u64,
}

impl PageSink for DryRunSink {
    async fn write_page(&mut self, records: &[SkuUpcRecord]) -> Result<u64, DbError> {
        let unique = upcsync_db::collapse_duplicate_keys(records).len() as u64;
        self.records_seen += unique;
        Ok(unique)
    }
}
