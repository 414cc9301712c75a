//! Raw analysis result → ReceiptRecord
//!
//! The recognizer's field extraction is best-effort ML output, so missing
//! or malformed individual fields are expected and degrade to defaults.
//! The only input this mapping rejects is one without the document field
//! map itself, which means the response has a structurally different shape
//! than a receipt analysis.

use serde_json::Value;

use crate::error::NormalizeError;
use crate::fields;
use crate::receipt::{LineItem, ReceiptRecord, TaxLine};

const FIELD_MAP_POINTER: &str = "/analyzeResult/documents/0/fields";

/// Normalize a raw analyze result into a [`ReceiptRecord`].
///
/// Pure and deterministic; two calls on the same input produce identical
/// records. Fails only when `analyzeResult.documents[0].fields` is absent.
pub fn normalize(raw: &Value) -> Result<ReceiptRecord, NormalizeError> {
    let field_map = raw
        .pointer(FIELD_MAP_POINTER)
        .ok_or(NormalizeError::MissingFieldMap)?;

    let items = fields::array(field_map, "Items")
        .iter()
        .map(line_item)
        .collect();

    let tax_details = fields::array(field_map, "TaxDetails")
        .iter()
        .map(tax_line)
        .collect();

    Ok(ReceiptRecord {
        merchant_name: fields::text(field_map, "MerchantName", "").to_string(),
        items,
        tax_details,
        subtotal: fields::number(field_map, "Subtotal"),
        total: fields::number(field_map, "Total"),
        total_tax: fields::number(field_map, "TotalTax"),
        tip: fields::number(field_map, "Tip"),
    })
}

// One raw entry is one line item; a Quantity field on the entry does not
// fan out into repeated items (price-per-unit vs per-line is ambiguous in
// the source data, so expansion would corrupt totals).
fn line_item(entry: &Value) -> LineItem {
    match fields::object(entry) {
        Some(obj) => LineItem {
            description: fields::text(obj, "Description", "Unknown Item").to_string(),
            price: fields::number(obj, "TotalPrice"),
        },
        None => LineItem {
            description: "Unknown Item".to_string(),
            price: 0.0,
        },
    }
}

fn tax_line(entry: &Value) -> TaxLine {
    match fields::object(entry) {
        Some(obj) => TaxLine {
            description: fields::text(obj, "TaxType", "Tax").to_string(),
            amount: fields::number(obj, "Amount"),
        },
        None => TaxLine {
            description: "Tax".to_string(),
            amount: 0.0,
        },
    }
}
