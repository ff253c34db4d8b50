//! Cart repository.
//!
//! Carts are created lazily on first add-to-cart. Cart lines keep a
//! UNIQUE(cart_id, product_id) constraint so the same product never
//! occupies two lines.

use orchard_core::{CartId, CartItemId, ProductId, UserId};
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::{Cart, CartLine};

/// Outcome of adding a product to a cart.
///
/// Callers branch on this to distinguish "first add" from "increment"
/// deterministically instead of relying on implicit get-or-create side
/// effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineUpsert {
    /// A new line was created with quantity 1.
    Created,
    /// An existing line had its quantity incremented by 1.
    Incremented {
        /// The quantity after the increment.
        quantity: i32,
    },
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the user's cart, creating it if it does not exist.
    ///
    /// A concurrent create by another request for the same user is absorbed
    /// by the UNIQUE(user_id) constraint: the insert is a no-op and the
    /// existing row is returned.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        let existing = sqlx::query_as::<_, Cart>(
            r"
            SELECT id, user_id
            FROM carts
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        if let Some(cart) = existing {
            return Ok(cart);
        }

        let inserted = sqlx::query_as::<_, Cart>(
            r"
            INSERT INTO carts (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO NOTHING
            RETURNING id, user_id
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        match inserted {
            Some(cart) => Ok(cart),
            // Lost the race to another request; the row exists now.
            None => {
                let cart = sqlx::query_as::<_, Cart>(
                    r"
                    SELECT id, user_id
                    FROM carts
                    WHERE user_id = $1
                    ",
                )
                .bind(user_id)
                .fetch_one(self.pool)
                .await?;
                Ok(cart)
            }
        }
    }

    /// Add one unit of a product to a cart.
    ///
    /// If the product already has a line, its quantity is incremented by 1;
    /// otherwise a new line is created at quantity 1.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn add_product(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<LineUpsert, RepositoryError> {
        let existing: Option<(CartItemId,)> = sqlx::query_as(
            r"
            SELECT id
            FROM cart_items
            WHERE cart_id = $1 AND product_id = $2
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .fetch_optional(self.pool)
        .await?;

        match existing {
            Some((item_id,)) => {
                let (quantity,): (i32,) = sqlx::query_as(
                    r"
                    UPDATE cart_items
                    SET quantity = quantity + 1
                    WHERE id = $1
                    RETURNING quantity
                    ",
                )
                .bind(item_id)
                .fetch_one(self.pool)
                .await?;

                Ok(LineUpsert::Incremented { quantity })
            }
            None => {
                sqlx::query(
                    r"
                    INSERT INTO cart_items (cart_id, product_id, quantity)
                    VALUES ($1, $2, 1)
                    ",
                )
                .bind(cart_id)
                .bind(product_id)
                .execute(self.pool)
                .await?;

                Ok(LineUpsert::Created)
            }
        }
    }

    /// Load the user's cart lines joined with current product data.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CartLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, CartLine>(
            r"
            SELECT ci.id, p.id AS product_id, p.name, p.price, p.image, ci.quantity
            FROM cart_items ci
            JOIN carts c ON c.id = ci.cart_id
            JOIN products p ON p.id = ci.product_id
            WHERE c.user_id = $1
            ORDER BY ci.id
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(lines)
    }

    /// Set a cart line's quantity, scoped to the requesting user's cart.
    ///
    /// A quantity of 0 deletes the line instead of retaining it. The user
    /// scope means a cart item ID belonging to another user's cart reports
    /// `NotFound` rather than mutating foreign state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line does not exist in
    /// this user's cart. Returns `RepositoryError::Database` for other
    /// database errors.
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let result = if quantity == 0 {
            sqlx::query(
                r"
                DELETE FROM cart_items ci
                USING carts c
                WHERE ci.id = $1 AND ci.cart_id = c.id AND c.user_id = $2
                ",
            )
            .bind(item_id)
            .bind(user_id)
            .execute(self.pool)
            .await?
        } else {
            sqlx::query(
                r"
                UPDATE cart_items ci
                SET quantity = $3
                FROM carts c
                WHERE ci.id = $1 AND ci.cart_id = c.id AND c.user_id = $2
                ",
            )
            .bind(item_id)
            .bind(user_id)
            .bind(quantity)
            .execute(self.pool)
            .await?
        };

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    use crate::db::test_support::{seed_product, seed_user};

    #[sqlx::test]
    async fn test_add_same_product_twice_merges_lines(pool: PgPool) {
        let user_id = seed_user(&pool, "shopper@example.com").await;
        let product_id = seed_product(&pool, "Red Shoe", dec!(100)).await;

        let repo = CartRepository::new(&pool);
        let cart = repo.get_or_create(user_id).await.expect("cart");

        let first = repo
            .add_product(cart.id, product_id)
            .await
            .expect("first add");
        assert_eq!(first, LineUpsert::Created);

        let second = repo
            .add_product(cart.id, product_id)
            .await
            .expect("second add");
        assert_eq!(second, LineUpsert::Incremented { quantity: 2 });

        let lines = repo.lines_for_user(user_id).await.expect("lines");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().map(|l| l.quantity), Some(2));
    }

    #[sqlx::test]
    async fn test_set_quantity_zero_deletes_line(pool: PgPool) {
        let user_id = seed_user(&pool, "shopper@example.com").await;
        let product_id = seed_product(&pool, "Red Shoe", dec!(100)).await;

        let repo = CartRepository::new(&pool);
        let cart = repo.get_or_create(user_id).await.expect("cart");
        repo.add_product(cart.id, product_id).await.expect("add");

        let lines = repo.lines_for_user(user_id).await.expect("lines");
        let item_id = lines.first().map(|l| l.id).expect("one line");

        repo.set_quantity(user_id, item_id, 0)
            .await
            .expect("quantity 0 deletes");

        let lines = repo.lines_for_user(user_id).await.expect("lines");
        assert!(lines.is_empty());
    }

    #[sqlx::test]
    async fn test_set_quantity_rejects_foreign_cart_line(pool: PgPool) {
        let owner_id = seed_user(&pool, "owner@example.com").await;
        let other_id = seed_user(&pool, "other@example.com").await;
        let product_id = seed_product(&pool, "Red Shoe", dec!(100)).await;

        let repo = CartRepository::new(&pool);
        let cart = repo.get_or_create(owner_id).await.expect("cart");
        repo.add_product(cart.id, product_id).await.expect("add");

        let lines = repo.lines_for_user(owner_id).await.expect("lines");
        let item_id = lines.first().map(|l| l.id).expect("one line");

        let result = repo.set_quantity(other_id, item_id, 5).await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));

        // The owner's line is untouched
        let lines = repo.lines_for_user(owner_id).await.expect("lines");
        assert_eq!(lines.first().map(|l| l.quantity), Some(1));
    }
}
