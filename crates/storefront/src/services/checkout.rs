//! Checkout workflow: cart → order conversion.
//!
//! The flow is: load cart lines, build an [`OrderDraft`] (pure), persist
//! the draft and clear the cart in one transaction, then best-effort
//! notify. Line totals and the aggregate total are computed once from the
//! same loaded prices, so they cannot diverge if a catalog price changes
//! mid-flight.

use orchard_core::ProductId;
use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use crate::db::{CartRepository, OrderRepository, RepositoryError};
use crate::models::{CartLine, Order};

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no lines; no order is created.
    #[error("no items in the cart to order")]
    EmptyCart,

    /// The cart was modified by a concurrent request between the read and
    /// the order transaction. Nothing was persisted.
    #[error("cart changed during checkout")]
    CartChanged,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// One line of an order draft, with the price snapshot taken at draft time.
#[derive(Debug, Clone)]
pub struct DraftLine {
    /// Referenced product.
    pub product_id: ProductId,
    /// Product name, carried along for the confirmation page and email.
    pub name: String,
    /// Quantity purchased.
    pub quantity: i32,
    /// Price snapshot: unit price times quantity.
    pub total_price: Decimal,
}

/// A fully-priced order, ready to persist.
///
/// `total_amount` is always the sum of the line totals by construction.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    /// Priced lines, one per cart line.
    pub lines: Vec<DraftLine>,
    /// Sum of all line totals.
    pub total_amount: Decimal,
}

impl OrderDraft {
    /// Price a cart into an order draft.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if there are no lines.
    pub fn from_cart_lines(cart_lines: &[CartLine]) -> Result<Self, CheckoutError> {
        if cart_lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let lines: Vec<DraftLine> = cart_lines
            .iter()
            .map(|line| DraftLine {
                product_id: line.product_id,
                name: line.name.clone(),
                quantity: line.quantity,
                total_price: line.line_total(),
            })
            .collect();

        let total_amount = lines.iter().map(|line| line.total_price).sum();

        Ok(Self {
            lines,
            total_amount,
        })
    }
}

/// A persisted order together with its draft lines for rendering.
#[derive(Debug)]
pub struct CompletedOrder {
    /// The persisted order header.
    pub order: Order,
    /// The lines that were written, with names for display.
    pub lines: Vec<DraftLine>,
}

/// Checkout service.
pub struct CheckoutService<'a> {
    carts: CartRepository<'a>,
    orders: OrderRepository<'a>,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            carts: CartRepository::new(pool),
            orders: OrderRepository::new(pool),
        }
    }

    /// Convert the user's cart into an order.
    ///
    /// On success the cart is left empty (the cart row itself persists)
    /// and the created order is returned with its lines. Notification is
    /// the caller's concern; a failed email must not undo a purchase.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if the cart has no lines.
    /// Returns `CheckoutError::CartChanged` if a concurrent request
    /// modified the cart; the transaction was rolled back and no order
    /// exists.
    pub async fn purchase(
        &self,
        user_id: orchard_core::UserId,
    ) -> Result<CompletedOrder, CheckoutError> {
        let cart = self.carts.get_or_create(user_id).await?;
        let cart_lines = self.carts.lines_for_user(user_id).await?;

        let draft = OrderDraft::from_cart_lines(&cart_lines)?;

        let order = self
            .orders
            .create_from_draft(user_id, cart.id, &draft)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => CheckoutError::CartChanged,
                other => CheckoutError::Repository(other),
            })?;

        tracing::info!(
            order_id = %order.id,
            user_id = %user_id,
            total = %order.total_amount,
            lines = draft.lines.len(),
            "order created"
        );

        Ok(CompletedOrder {
            order,
            lines: draft.lines,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchard_core::{CartItemId, ProductId};
    use rust_decimal::dec;

    fn cart_line(id: i32, name: &str, price: Decimal, quantity: i32) -> CartLine {
        CartLine {
            id: CartItemId::new(id),
            product_id: ProductId::new(id),
            name: name.to_owned(),
            price,
            image: None,
            quantity,
        }
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        let result = OrderDraft::from_cart_lines(&[]);
        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    }

    #[test]
    fn test_draft_totals() {
        let lines = vec![
            cart_line(1, "Red Shoe", dec!(100), 2),
            cart_line(2, "Blue Hat", dec!(50), 1),
        ];

        let draft = OrderDraft::from_cart_lines(&lines).expect("non-empty cart");

        assert_eq!(draft.total_amount, dec!(250));
        assert_eq!(draft.lines.len(), 2);
        let totals: Vec<_> = draft.lines.iter().map(|l| l.total_price).collect();
        assert_eq!(totals, vec![dec!(200), dec!(50)]);
    }

    #[test]
    fn test_line_totals_sum_to_aggregate() {
        let lines = vec![
            cart_line(1, "A", dec!(19.99), 3),
            cart_line(2, "B", dec!(0.01), 7),
            cart_line(3, "C", dec!(5), 1),
        ];

        let draft = OrderDraft::from_cart_lines(&lines).expect("non-empty cart");
        let sum: Decimal = draft.lines.iter().map(|l| l.total_price).sum();
        assert_eq!(draft.total_amount, sum);
    }
}
