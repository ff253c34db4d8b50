//! Cart models.

use orchard_core::{CartId, CartItemId, ProductId, UserId};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// A user's cart.
///
/// One row per user (enforced by a UNIQUE constraint on `user_id`). The
/// cart row survives checkout; only its lines are deleted.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct Cart {
    /// Cart database ID.
    pub id: CartId,
    /// Owning user.
    pub user_id: UserId,
}

/// One cart line joined with the current product data.
///
/// `price` is the product's current catalog price at read time, not a
/// snapshot; order lines take their snapshot at checkout.
#[derive(Debug, Clone, FromRow)]
pub struct CartLine {
    /// Cart item database ID.
    pub id: CartItemId,
    /// Referenced product.
    pub product_id: ProductId,
    /// Product name at read time.
    pub name: String,
    /// Current catalog price.
    pub price: Decimal,
    /// Product image path, if any.
    pub image: Option<String>,
    /// Quantity in the cart; always positive, zero-quantity lines are deleted.
    pub quantity: i32,
}

impl CartLine {
    /// Price of this line: current product price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    fn line(price: Decimal, quantity: i32) -> CartLine {
        CartLine {
            id: CartItemId::new(1),
            product_id: ProductId::new(1),
            name: "Red Shoe".to_owned(),
            price,
            image: None,
            quantity,
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line(dec!(100), 2).line_total(), dec!(200));
        assert_eq!(line(dec!(19.99), 3).line_total(), dec!(59.97));
    }
}
