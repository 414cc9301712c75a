//! Receipt field normalization
//!
//! Maps the raw analyze result produced by the document recognizer into the
//! fixed [`ReceiptRecord`] shape served to clients. The mapping is total
//! over any result that carries the document field map: individual missing
//! or malformed fields fall back to documented defaults instead of erroring.

pub mod error;
pub mod fields;
pub mod normalize;
pub mod receipt;

pub use error::NormalizeError;
pub use normalize::normalize;
pub use receipt::{LineItem, ReceiptRecord, TaxLine};
