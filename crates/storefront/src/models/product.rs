//! Catalog models.

use orchard_core::{CategoryId, ProductId};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// A product category.
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    /// Category database ID.
    pub id: CategoryId,
    /// Unique category name.
    pub name: String,
}

/// A product in the catalog.
///
/// Prices are non-negative decimals; the database enforces this with a
/// CHECK constraint.
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    /// Product database ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Current catalog price.
    pub price: Decimal,
    /// Relative image path under the static media root, if any.
    pub image: Option<String>,
    /// Owning category.
    pub category_id: CategoryId,
}
