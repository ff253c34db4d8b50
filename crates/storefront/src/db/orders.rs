//! Order repository.
//!
//! The single write path converts a cart into an order inside one
//! transaction with a conditional cart-line delete, so two checkouts
//! racing on the same cart cannot both create an order for the same
//! lines: the loser's delete removes fewer rows than it read and the
//! whole transaction rolls back.

use orchard_core::{CartId, UserId};
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::Order;
use crate::services::checkout::OrderDraft;

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist an order from a draft and clear the cart, atomically.
    ///
    /// Inserts the order header and one row per draft line, then deletes
    /// the cart's lines. The delete must remove exactly as many rows as
    /// the draft contains; anything else means the cart changed between
    /// the read and this transaction, and the transaction rolls back.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the cart changed concurrently.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_from_draft(
        &self,
        user_id: UserId,
        cart_id: CartId,
        draft: &OrderDraft,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(
            r"
            INSERT INTO orders (user_id, total_amount)
            VALUES ($1, $2)
            RETURNING id, user_id, total_amount, created_at
            ",
        )
        .bind(user_id)
        .bind(draft.total_amount)
        .fetch_one(&mut *tx)
        .await?;

        for line in &draft.lines {
            sqlx::query(
                r"
                INSERT INTO order_items (order_id, product_id, quantity, total_price)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(order.id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.total_price)
            .execute(&mut *tx)
            .await?;
        }

        let deleted = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() != draft.lines.len() as u64 {
            tx.rollback().await?;
            return Err(RepositoryError::Conflict(
                "cart changed during checkout".to_owned(),
            ));
        }

        tx.commit().await?;

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    use crate::db::CartRepository;
    use crate::db::test_support::{seed_product, seed_user};

    #[sqlx::test]
    async fn test_create_from_draft_clears_cart(pool: PgPool) {
        let user_id = seed_user(&pool, "buyer@example.com").await;
        let shoe_id = seed_product(&pool, "Red Shoe", dec!(100)).await;
        let hat_id = seed_product(&pool, "Blue Hat", dec!(50)).await;

        let carts = CartRepository::new(&pool);
        let cart = carts.get_or_create(user_id).await.expect("cart");
        carts.add_product(cart.id, shoe_id).await.expect("add shoe");
        carts.add_product(cart.id, shoe_id).await.expect("add shoe again");
        carts.add_product(cart.id, hat_id).await.expect("add hat");

        let lines = carts.lines_for_user(user_id).await.expect("lines");
        let draft = OrderDraft::from_cart_lines(&lines).expect("draft");

        let order = OrderRepository::new(&pool)
            .create_from_draft(user_id, cart.id, &draft)
            .await
            .expect("order created");

        assert_eq!(order.user_id, user_id);
        assert_eq!(order.total_amount, dec!(250));

        let (items,): (i64,) = sqlx::query_as("SELECT count(*) FROM order_items")
            .fetch_one(&pool)
            .await
            .expect("count order items");
        assert_eq!(items, 2);

        let lines = carts.lines_for_user(user_id).await.expect("lines");
        assert!(lines.is_empty());
    }

    #[sqlx::test]
    async fn test_create_from_draft_rolls_back_when_cart_changed(pool: PgPool) {
        let user_id = seed_user(&pool, "buyer@example.com").await;
        let shoe_id = seed_product(&pool, "Red Shoe", dec!(100)).await;
        let hat_id = seed_product(&pool, "Blue Hat", dec!(50)).await;

        let carts = CartRepository::new(&pool);
        let cart = carts.get_or_create(user_id).await.expect("cart");
        carts.add_product(cart.id, shoe_id).await.expect("add shoe");

        let lines = carts.lines_for_user(user_id).await.expect("lines");
        let draft = OrderDraft::from_cart_lines(&lines).expect("draft");

        // A concurrent request grows the cart between the read and the
        // order transaction
        carts.add_product(cart.id, hat_id).await.expect("add hat");

        let result = OrderRepository::new(&pool)
            .create_from_draft(user_id, cart.id, &draft)
            .await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));

        // Nothing was persisted and the cart is intact
        let (orders,): (i64,) = sqlx::query_as("SELECT count(*) FROM orders")
            .fetch_one(&pool)
            .await
            .expect("count orders");
        assert_eq!(orders, 0);

        let lines = carts.lines_for_user(user_id).await.expect("lines");
        assert_eq!(lines.len(), 2);
    }
}
