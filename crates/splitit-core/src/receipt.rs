//! Receipt output model
//!
//! The fixed shape returned to clients after normalizing a raw analysis
//! result. Built once, serialized, and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// One purchased item on the receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub price: f64,
}

/// One tax entry on the receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxLine {
    pub description: String,
    pub amount: f64,
}

/// Normalized receipt returned to the caller
///
/// Every numeric field is a finite number even when the source field was
/// absent or malformed; string fields are never null. Defaults are empty
/// string / empty list / 0.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptRecord {
    pub merchant_name: String,
    pub items: Vec<LineItem>,
    pub tax_details: Vec<TaxLine>,
    pub subtotal: f64,
    pub total: f64,
    pub total_tax: f64,
    pub tip: f64,
}

impl Default for ReceiptRecord {
    fn default() -> Self {
        Self {
            merchant_name: String::new(),
            items: Vec::new(),
            tax_details: Vec::new(),
            subtotal: 0.0,
            total: 0.0,
            total_tax: 0.0,
            tip: 0.0,
        }
    }
}
