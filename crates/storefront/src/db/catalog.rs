//! Catalog repository for product and category reads.
//!
//! The catalog is read-mostly; rows are seeded out of band. Category
//! filtering happens in SQL, while free-text search and sorting are pure
//! functions in [`crate::services::catalog`].

use orchard_core::{CategoryId, ProductId};
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::{Category, Product};

/// Repository for catalog reads.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all categories ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            r"
            SELECT id, name
            FROM categories
            ORDER BY name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// List products, optionally restricted to one category.
    ///
    /// Rows come back in insertion order; callers apply search and sort.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_products(
        &self,
        category: Option<CategoryId>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = match category {
            Some(category_id) => {
                sqlx::query_as::<_, Product>(
                    r"
                    SELECT id, name, description, price, image, category_id
                    FROM products
                    WHERE category_id = $1
                    ORDER BY id
                    ",
                )
                .bind(category_id)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Product>(
                    r"
                    SELECT id, name, description, price, image, category_id
                    FROM products
                    ORDER BY id
                    ",
                )
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(products)
    }

    /// Get a single product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_product(
        &self,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, price, image, category_id
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }
}
