//! Reconcile decoded rows against the catalog
//!
//! Rows are handled one at a time in file order. Row-level problems become
//! messages in the summary; only a store failure stops the run, and rows saved
//! before it stay saved.
//!
//! The name check before a create is a plain read followed by an insert. Two
//! imports running at the same time can both see a name as free and both
//! create it.

use anyhow::Result;

use super::{CatalogStore, Product, ProductRow};

/// Why a row was not imported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Missing or invalid field
    Validation,
    /// Duplicate name on create, or unknown id on update
    Conflict,
}

/// A row that was rejected
#[derive(Debug, Clone, PartialEq)]
pub struct RowFailure {
    /// Row number as shown in a spreadsheet (header is row 1)
    pub row: usize,
    pub kind: FailureKind,
    pub reason: String,
}

impl RowFailure {
    fn validation(row: usize, reason: impl Into<String>) -> Self {
        Self { row, kind: FailureKind::Validation, reason: reason.into() }
    }

    fn conflict(row: usize, reason: impl Into<String>) -> Self {
        Self { row, kind: FailureKind::Conflict, reason: reason.into() }
    }
}

impl std::fmt::Display for RowFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Row {}: {}", self.row, self.reason)
    }
}

/// What happened to an accepted row
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Created(Product),
    Updated(Product),
}

/// Aggregated result of one reconciliation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileSummary {
    pub total: usize,
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    /// Rejected rows in file order
    pub failures: Vec<RowFailure>,
}

impl ReconcileSummary {
    pub fn succeeded(&self) -> usize {
        self.created + self.updated
    }

    /// Rows that reached a verdict, successful or not
    pub fn processed(&self) -> usize {
        self.succeeded() + self.failed
    }

    /// Rows rejected by an upsert conflict rather than validation
    pub fn conflicts(&self) -> usize {
        self.failures
            .iter()
            .filter(|f| f.kind == FailureKind::Conflict)
            .count()
    }

    /// `Row {n}: {reason}` for every rejected row
    pub fn messages(&self) -> Vec<String> {
        self.failures.iter().map(ToString::to_string).collect()
    }

    fn record(&mut self, result: Result<RowOutcome, RowFailure>) {
        match result {
            Ok(RowOutcome::Created(_)) => self.created += 1,
            Ok(RowOutcome::Updated(_)) => self.updated += 1,
            Err(failure) => {
                self.failed += 1;
                self.failures.push(failure);
            }
        }
    }
}

/// Spreadsheet row number for a zero-based data index (header + 1-based)
pub fn row_number(index: usize) -> usize {
    index + 2
}

/// Check a candidate row and turn it into a product
pub fn validate(row: &ProductRow, row_number: usize) -> Result<Product, RowFailure> {
    let name = match row.name.as_deref() {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => return Err(RowFailure::validation(row_number, "Product name is required")),
    };

    let price = match row.price {
        Some(price) if price > 0.0 => price,
        _ => {
            return Err(RowFailure::validation(
                row_number,
                "Product price must be greater than 0",
            ));
        }
    };

    let quantity = match row.quantity {
        Some(quantity) if quantity >= 0 => quantity,
        _ => {
            return Err(RowFailure::validation(
                row_number,
                "Product quantity cannot be negative",
            ));
        }
    };

    Ok(Product {
        id: row.id,
        name,
        description: row.description.clone(),
        price,
        quantity,
    })
}

/// Validate and upsert every row, in order
///
/// Returns `Err` only when the store itself fails.
pub async fn reconcile(store: &dyn CatalogStore, rows: Vec<ProductRow>) -> Result<ReconcileSummary> {
    let mut summary = ReconcileSummary {
        total: rows.len(),
        ..Default::default()
    };

    for (index, row) in rows.iter().enumerate() {
        let row_number = row_number(index);

        let result = match validate(row, row_number) {
            Ok(product) => upsert(store, product, row_number).await?,
            Err(failure) => Err(failure),
        };

        match &result {
            Ok(RowOutcome::Created(p)) => log::debug!("Row {}: created product '{}'", row_number, p.name),
            Ok(RowOutcome::Updated(p)) => log::debug!("Row {}: updated product {:?}", row_number, p.id),
            Err(failure) => log::warn!("{}", failure),
        }

        summary.record(result);
    }

    Ok(summary)
}

async fn upsert(
    store: &dyn CatalogStore,
    product: Product,
    row_number: usize,
) -> Result<Result<RowOutcome, RowFailure>> {
    if let Some(id) = product.id {
        return match store.find_by_id(id).await? {
            Some(mut existing) => {
                existing.apply(&product);
                let saved = store.save(existing).await?;
                Ok(Ok(RowOutcome::Updated(saved)))
            }
            None => Ok(Err(RowFailure::conflict(
                row_number,
                format!("Product with ID {} not found for update", id),
            ))),
        };
    }

    if store.find_by_name(&product.name).await?.is_some() {
        return Ok(Err(RowFailure::conflict(
            row_number,
            format!("Product with name '{}' already exists", product.name),
        )));
    }

    let saved = store.save(product).await?;
    Ok(Ok(RowOutcome::Created(saved)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::repository::{SqliteCatalogStore, connect_in_memory};

    fn candidate(id: Option<i64>, name: &str, price: Option<f64>, quantity: Option<i64>) -> ProductRow {
        ProductRow {
            id,
            name: Some(name.to_string()),
            description: None,
            price,
            quantity,
        }
    }

    async fn store() -> SqliteCatalogStore {
        SqliteCatalogStore::new(connect_in_memory().await.unwrap())
    }

    #[test]
    fn test_validation_messages() {
        let blank = ProductRow { name: Some("  ".into()), ..Default::default() };
        assert_eq!(
            validate(&blank, 2).unwrap_err().to_string(),
            "Row 2: Product name is required"
        );

        let zero_price = candidate(None, "Widget", Some(0.0), Some(1));
        let failure = validate(&zero_price, 3).unwrap_err();
        assert_eq!(failure.kind, FailureKind::Validation);
        assert!(failure.to_string().contains("must be greater than 0"));

        let no_price = candidate(None, "Widget", None, Some(1));
        assert!(validate(&no_price, 3).is_err());

        let negative = candidate(None, "Widget", Some(1.0), Some(-1));
        assert_eq!(
            validate(&negative, 4).unwrap_err().to_string(),
            "Row 4: Product quantity cannot be negative"
        );

        let no_quantity = candidate(None, "Widget", Some(1.0), None);
        assert!(validate(&no_quantity, 4).is_err());

        let zero_quantity = candidate(None, "Widget", Some(1.0), Some(0));
        assert!(validate(&zero_quantity, 4).is_ok());
    }

    #[tokio::test]
    async fn test_creates_new_product() {
        let store = store().await;
        let rows = vec![candidate(None, "Widget", Some(9.99), Some(5))];

        let summary = reconcile(&store, rows).await.unwrap();
        assert_eq!(summary.total, 1);
        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.failed, 0);
        assert!(summary.failures.is_empty());

        let all = store.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Widget");
        assert_eq!(all[0].price, 9.99);
        assert_eq!(all[0].quantity, 5);
    }

    #[tokio::test]
    async fn test_invalid_row_not_persisted_and_batch_continues() {
        let store = store().await;
        let rows = vec![
            candidate(None, "Free", Some(0.0), Some(1)),
            candidate(None, "Paid", Some(1.5), Some(1)),
        ];

        let summary = reconcile(&store, rows).await.unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.messages(), vec!["Row 2: Product price must be greater than 0"]);
        assert!(store.find_by_name("Free").await.unwrap().is_none());
        assert!(store.find_by_name("Paid").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_duplicate_name_within_one_import() {
        let store = store().await;
        let rows = vec![
            candidate(None, "Widget", Some(1.0), Some(1)),
            candidate(None, "Widget", Some(2.0), Some(2)),
        ];

        let summary = reconcile(&store, rows).await.unwrap();
        assert_eq!(summary.created, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures.len(), 1);
        assert!(summary.messages()[0].starts_with("Row 3:"));
        assert!(summary.messages()[0].contains("already exists"));
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_updates_by_id() {
        let store = store().await;
        let existing = store.save(Product::new("Widget", 1.0, 1)).await.unwrap();
        let id = existing.id.unwrap();

        let mut row = candidate(Some(id), "Widget v2", Some(3.5), Some(8));
        row.description = Some("improved".into());

        let summary = reconcile(&store, vec![row]).await.unwrap();
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.failed, 0);

        let updated = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(updated.name, "Widget v2");
        assert_eq!(updated.description.as_deref(), Some("improved"));
        assert_eq!(updated.price, 3.5);
        assert_eq!(updated.quantity, 8);
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_id_is_a_failure() {
        let store = store().await;
        let rows = vec![candidate(Some(99), "Ghost", Some(1.0), Some(1))];

        let summary = reconcile(&store, rows).await.unwrap();
        assert_eq!(summary.succeeded(), 0);
        assert_eq!(summary.failed, 1);
        assert_eq!(
            summary.messages(),
            vec!["Row 2: Product with ID 99 not found for update"]
        );
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_counters_add_up() {
        let store = store().await;
        store.save(Product::new("Taken", 1.0, 1)).await.unwrap();

        let rows = vec![
            candidate(None, "A", Some(1.0), Some(1)),
            candidate(None, "Taken", Some(1.0), Some(1)),
            candidate(None, "", Some(1.0), Some(1)),
            candidate(Some(1234), "B", Some(1.0), Some(1)),
            candidate(None, "C", Some(2.0), Some(0)),
        ];

        let summary = reconcile(&store, rows).await.unwrap();
        assert_eq!(summary.total, 5);
        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.failed, 3);
        assert_eq!(summary.processed(), summary.total);

        let rows_in_messages: Vec<_> = summary
            .messages()
            .iter()
            .map(|m| m.split(':').next().unwrap().to_string())
            .collect();
        assert_eq!(rows_in_messages, vec!["Row 3", "Row 4", "Row 5"]);
        // "Taken" and the unknown id are conflicts, the blank name is not
        assert_eq!(summary.conflicts(), 2);
        let kinds: Vec<FailureKind> = summary.failures.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![FailureKind::Conflict, FailureKind::Validation, FailureKind::Conflict]
        );
    }
}
