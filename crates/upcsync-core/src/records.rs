/// One flattened catalog row: a SKU, the barcode that is authoritative for
/// its business unit, and the owning brand code.
///
/// `(sku, brand)` is the persisted key; `upc` is the value overwritten on
/// conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SkuUpcRecord {
    pub sku: i64,
    pub upc: i64,
    pub brand: i32,
}

impl SkuUpcRecord {
    #[must_use]
    pub fn key(&self) -> (i64, i32) {
        (self.sku, self.brand)
    }
}
