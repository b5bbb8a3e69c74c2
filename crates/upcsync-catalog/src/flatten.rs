//! Flattens one catalog page into `(sku, upc, brand)` rows.

use upcsync_core::{BusinessUnit, SkuUpcRecord, Variant};

use crate::error::CatalogError;
use crate::types::CatalogPage;

/// Produces the rows to upsert for one page of `unit`'s catalog.
///
/// - [`Variant::Legacy`]: a SKU is kept only if it has a store UPC, and that
///   value is used. SKUs without one are dropped.
/// - [`Variant::SingleEntity`]: every SKU is kept, always with its online
///   UPC, even when a store UPC is also present.
///
/// Only the barcode the variant reads is converted; the other field may hold
/// anything. Rows come out in page order. Pagination fields are ignored.
///
/// # Errors
///
/// Returns [`CatalogError::MissingOnlineUpc`] when a single-entity SKU has
/// no online UPC to key on, and [`CatalogError::InvalidUpc`] when the barcode
/// the variant reads is not numeric.
pub fn flatten(
    page: &CatalogPage,
    unit: &BusinessUnit,
) -> Result<Vec<SkuUpcRecord>, CatalogError> {
    let mut records = Vec::new();

    for sku in page.skus() {
        let upc = match unit.variant {
            Variant::Legacy => match sku.store_upc()? {
                Some(upc) => upc,
                None => continue,
            },
            Variant::SingleEntity => sku.online_upc()?.ok_or(CatalogError::MissingOnlineUpc {
                business_id: sku.business_id,
            })?,
        };

        records.push(SkuUpcRecord {
            sku: sku.business_id,
            upc,
            brand: unit.brand_code,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn unit(code: &str) -> &'static BusinessUnit {
        BusinessUnit::lookup(code).expect("registered unit")
    }

    fn page(styles: &serde_json::Value) -> CatalogPage {
        let body = json!({
            "page": { "totalPages": 1 },
            "_embedded": { "styles": styles },
            "_links": {}
        });
        CatalogPage::parse(&body.to_string()).expect("valid page")
    }

    #[test]
    fn legacy_keeps_only_skus_with_store_upc() {
        // br/us, brand 2: one style, one color, two SKUs, only the first has a store UPC.
        let page = page(&json!([{ "styleColors": [{ "skus": [
            { "businessId": 1001, "storeUPC": 111 },
            { "businessId": 1002 }
        ] }] }]));

        let records = flatten(&page, unit("br/us")).unwrap();
        assert_eq!(
            records,
            vec![SkuUpcRecord {
                sku: 1001,
                upc: 111,
                brand: 2
            }]
        );
    }

    #[test]
    fn legacy_uses_store_upc_over_online_upc() {
        let page = page(&json!([{ "styleColors": [{ "skus": [
            { "businessId": 5, "storeUPC": 50, "onlineUPC": 500 }
        ] }] }]));

        let records = flatten(&page, unit("gp/us")).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].upc, 50);
        assert_eq!(records[0].brand, 1);
    }

    #[test]
    fn single_entity_always_uses_online_upc() {
        let page = page(&json!([{ "styleColors": [{ "skus": [
            { "businessId": 7, "storeUPC": 70, "onlineUPC": 700 },
            { "businessId": 8, "onlineUPC": 800 }
        ] }] }]));

        let records = flatten(&page, unit("at/us")).unwrap();
        assert_eq!(
            records,
            vec![
                SkuUpcRecord {
                    sku: 7,
                    upc: 700,
                    brand: 10
                },
                SkuUpcRecord {
                    sku: 8,
                    upc: 800,
                    brand: 10
                },
            ]
        );
    }

    #[test]
    fn single_entity_without_online_upc_is_an_error() {
        let page = page(&json!([{ "styleColors": [{ "skus": [
            { "businessId": 9, "storeUPC": 90 }
        ] }] }]));

        let err = flatten(&page, unit("brfs/us")).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MissingOnlineUpc { business_id: 9 }
        ));
        assert!(err.is_malformed_response());
    }

    #[test]
    fn single_entity_ignores_unusable_store_upc() {
        let page = page(&json!([{ "styleColors": [{ "skus": [
            { "businessId": 1, "storeUPC": "N/A", "onlineUPC": 700 }
        ] }] }]));

        let records = flatten(&page, unit("at/us")).unwrap();
        assert_eq!(
            records,
            vec![SkuUpcRecord {
                sku: 1,
                upc: 700,
                brand: 10
            }]
        );
    }

    #[test]
    fn legacy_ignores_unusable_online_upc() {
        let page = page(&json!([{ "styleColors": [{ "skus": [
            { "businessId": 1, "storeUPC": 111, "onlineUPC": 12.5 }
        ] }] }]));

        let records = flatten(&page, unit("br/us")).unwrap();
        assert_eq!(
            records,
            vec![SkuUpcRecord {
                sku: 1,
                upc: 111,
                brand: 2
            }]
        );
    }

    #[test]
    fn unusable_barcode_the_variant_reads_is_an_error() {
        let single = page(&json!([{ "styleColors": [{ "skus": [
            { "businessId": 3, "storeUPC": 30, "onlineUPC": "N/A" }
        ] }] }]));
        let err = flatten(&single, unit("gpfs/us")).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidUpc {
                business_id: 3,
                field: "onlineUPC",
                ..
            }
        ));
        assert!(err.is_malformed_response());

        let legacy = page(&json!([{ "styleColors": [{ "skus": [
            { "businessId": 4, "storeUPC": { "code": 1 }, "onlineUPC": 40 }
        ] }] }]));
        assert!(matches!(
            flatten(&legacy, unit("on/us")),
            Err(CatalogError::InvalidUpc {
                business_id: 4,
                field: "storeUPC",
                ..
            })
        ));
    }

    #[test]
    fn empty_page_yields_no_records() {
        let page = page(&json!([]));
        assert!(flatten(&page, unit("on/us")).unwrap().is_empty());
        assert!(flatten(&page, unit("gpfs/us")).unwrap().is_empty());
    }

    #[test]
    fn preserves_page_order_across_styles_and_colors() {
        let page = page(&json!([
            { "styleColors": [
                { "skus": [{ "businessId": 1, "onlineUPC": 10 }] },
                { "skus": [{ "businessId": 2, "onlineUPC": 20 }] }
            ] },
            { "styleColors": [
                { "skus": [{ "businessId": 3, "onlineUPC": 30 }] }
            ] }
        ]));

        let skus: Vec<i64> = flatten(&page, unit("gpfs/us"))
            .unwrap()
            .iter()
            .map(|r| r.sku)
            .collect();
        assert_eq!(skus, [1, 2, 3]);
    }
}
