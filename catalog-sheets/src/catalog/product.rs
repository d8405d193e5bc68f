//! Catalog product types

use serde::{Deserialize, Serialize};

/// A product as stored in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i64,
}

impl Product {
    /// Create a product that has not been persisted yet
    pub fn new(name: impl Into<String>, price: f64, quantity: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            price,
            quantity,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Overwrite the mutable fields with those of another product, keeping the id
    pub fn apply(&mut self, other: &Product) {
        self.name = other.name.clone();
        self.description = other.description.clone();
        self.price = other.price;
        self.quantity = other.quantity;
    }
}

/// Candidate decoded from one spreadsheet row, not yet validated
///
/// Every field is optional: a missing or wrongly-typed cell leaves it `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductRow {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}
