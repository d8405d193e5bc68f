//! Product catalog import/export
//!
//! Rows from the `Products` sheet are decoded into candidates, validated and
//! upserted one by one. Export writes the same sheet layout back out.

pub mod decoder;
pub mod export;
pub mod product;
pub mod reconcile;
pub mod store;

pub use decoder::{HEADERS, SHEET_NAME, decode_products};
pub use export::{ExportFile, download_template, export_products, products_to_workbook};
pub use product::{Product, ProductRow};
pub use reconcile::{FailureKind, ReconcileSummary, RowFailure, RowOutcome, reconcile, validate};
pub use store::CatalogStore;
