//! Database operations for the `upc` table.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use upcsync_core::SkuUpcRecord;

use crate::DbError;

/// Postgres allows at most 65 535 bind parameters per statement; each row
/// binds three.
const MAX_ROWS_PER_STATEMENT: usize = 10_000;
const _: () = assert!(MAX_ROWS_PER_STATEMENT * 3 <= 65_535);

/// A row from the `upc` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SkuUpcRow {
    pub sku: i64,
    pub upc: i64,
    pub brand: i32,
    pub updated_at: DateTime<Utc>,
}

/// Collapses rows that share a `(sku, brand)` key, keeping the last UPC seen.
///
/// Postgres refuses an `ON CONFLICT DO UPDATE` that touches the same row
/// twice in one statement, so the batch must be unique by key before it is
/// sent. Each surviving row keeps the position of its first occurrence.
#[must_use]
pub fn collapse_duplicate_keys(records: &[SkuUpcRecord]) -> Vec<SkuUpcRecord> {
    let mut positions: HashMap<(i64, i32), usize> = HashMap::with_capacity(records.len());
    let mut rows: Vec<SkuUpcRecord> = Vec::with_capacity(records.len());

    for record in records {
        match positions.entry(record.key()) {
            Entry::Occupied(slot) => rows[*slot.get()].upc = record.upc,
            Entry::Vacant(slot) => {
                slot.insert(rows.len());
                rows.push(*record);
            }
        }
    }

    rows
}

/// Upserts one page worth of rows in a single transaction.
///
/// Conflicts on `(sku, brand)` overwrite `upc` and bump `updated_at`.
/// An empty batch touches nothing and returns `0`. Otherwise returns the
/// number of rows inserted or updated.
///
/// On any failure the transaction is rolled back before the error is
/// returned, so a page is either fully written or not at all.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the transaction cannot be opened, any
/// statement fails, or the commit fails.
pub async fn upsert_sku_upcs(pool: &PgPool, records: &[SkuUpcRecord]) -> Result<u64, DbError> {
    if records.is_empty() {
        return Ok(0);
    }

    let rows = collapse_duplicate_keys(records);
    let mut tx = pool.begin().await?;

    match write_rows(&mut tx, &rows).await {
        Ok(affected) => {
            tx.commit().await?;
            Ok(affected)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(
                    error = %rollback_err,
                    "failed to roll back upc upsert"
                );
            }
            Err(err)
        }
    }
}

async fn write_rows(
    tx: &mut Transaction<'_, Postgres>,
    rows: &[SkuUpcRecord],
) -> Result<u64, DbError> {
    let mut affected = 0u64;
    for chunk in rows.chunks(MAX_ROWS_PER_STATEMENT) {
        let mut query = build_upsert(chunk);
        let result = query.build().execute(&mut **tx).await?;
        affected += result.rows_affected();
    }
    Ok(affected)
}

fn build_upsert(rows: &[SkuUpcRecord]) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("INSERT INTO upc (sku, upc, brand) ");
    query.push_values(rows, |mut row, record| {
        row.push_bind(record.sku)
            .push_bind(record.upc)
            .push_bind(record.brand);
    });
    query.push(
        " ON CONFLICT (sku, brand) DO UPDATE SET \
             upc        = EXCLUDED.upc, \
             updated_at = NOW()",
    );
    query
}

/// Returns the stored row for `(sku, brand)`, if any.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_sku_upc(
    pool: &PgPool,
    sku: i64,
    brand: i32,
) -> Result<Option<SkuUpcRow>, DbError> {
    let row = sqlx::query_as::<_, SkuUpcRow>(
        "SELECT sku, upc, brand, updated_at FROM upc WHERE sku = $1 AND brand = $2",
    )
    .bind(sku)
    .bind(brand)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
