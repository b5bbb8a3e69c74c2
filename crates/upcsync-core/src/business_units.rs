//! Static registry of the catalog business units that are synchronized.
//!
//! Each unit owns a brand code (the `brand` column of every row it produces)
//! and a [`Variant`] that decides which barcode field is authoritative.
//! The table is fixed at compile time and never mutated.

use std::fmt;

use thiserror::Error;

/// Barcode policy for a business unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Only SKUs carrying a store-scoped barcode are kept; that barcode wins.
    Legacy,
    /// Every SKU is kept, keyed by its online-scoped barcode.
    SingleEntity,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Legacy => write!(f, "legacy"),
            Variant::SingleEntity => write!(f, "singleEntity"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessUnit {
    /// Catalog path segment, e.g. `br/us`.
    pub code: &'static str,
    pub brand_code: i32,
    pub variant: Variant,
}

/// Processing order matters only for log output; units are independent.
static BUSINESS_UNITS: &[BusinessUnit] = &[
    BusinessUnit {
        code: "br/us",
        brand_code: 2,
        variant: Variant::Legacy,
    },
    BusinessUnit {
        code: "gp/us",
        brand_code: 1,
        variant: Variant::Legacy,
    },
    BusinessUnit {
        code: "on/us",
        brand_code: 3,
        variant: Variant::Legacy,
    },
    BusinessUnit {
        code: "at/us",
        brand_code: 10,
        variant: Variant::SingleEntity,
    },
    BusinessUnit {
        code: "brfs/us",
        brand_code: 6,
        variant: Variant::SingleEntity,
    },
    BusinessUnit {
        code: "gpfs/us",
        brand_code: 5,
        variant: Variant::SingleEntity,
    },
];

#[derive(Debug, Error)]
#[error("unknown business unit: {0}")]
pub struct UnknownBusinessUnit(pub String);

impl BusinessUnit {
    /// All registered business units, in processing order.
    #[must_use]
    pub fn all() -> &'static [BusinessUnit] {
        BUSINESS_UNITS
    }

    #[must_use]
    pub fn lookup(code: &str) -> Option<&'static BusinessUnit> {
        BUSINESS_UNITS.iter().find(|unit| unit.code == code)
    }

    /// Resolves a caller-supplied subset of unit codes.
    ///
    /// An empty filter selects every unit. The result keeps registry order
    /// regardless of the order codes were given in, and a code listed twice
    /// is only returned once.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownBusinessUnit`] for the first code not in the registry.
    pub fn select<S: AsRef<str>>(
        codes: &[S],
    ) -> Result<Vec<&'static BusinessUnit>, UnknownBusinessUnit> {
        if codes.is_empty() {
            return Ok(BUSINESS_UNITS.iter().collect());
        }

        for code in codes {
            if Self::lookup(code.as_ref()).is_none() {
                return Err(UnknownBusinessUnit(code.as_ref().to_owned()));
            }
        }

        Ok(BUSINESS_UNITS
            .iter()
            .filter(|unit| codes.iter().any(|c| c.as_ref() == unit.code))
            .collect())
    }
}
