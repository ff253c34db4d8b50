//! Cart route handlers.
//!
//! All cart routes require a logged-in user; carts are created lazily on
//! the first add.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use orchard_core::{CartItemId, ProductId};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::db::{CartRepository, CatalogRepository, LineUpsert, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{CartLine, CurrentUser};
use crate::routes::MessageQuery;
use crate::{filters, state::AppState};

/// Payment options shown on the cart page. Collection happens offline;
/// checkout itself takes no payment details.
const PAYMENT_METHODS: &[&str] = &[
    "Credit Card",
    "Debit Card",
    "Net Banking",
    "UPI",
    "Cash on Delivery",
];

/// Add-to-cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
}

/// Update-cart form data.
///
/// A cleared number input submits `quantity=` with an empty value, so
/// the field is parsed leniently and rejected in the handler.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub item_id: i32,
    #[serde(default, deserialize_with = "crate::forms::empty_string_as_none")]
    pub quantity: Option<i32>,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartTemplate {
    pub user: CurrentUser,
    pub lines: Vec<CartLine>,
    pub subtotal: Decimal,
    pub payment_methods: &'static [&'static str],
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// Display the cart page with line totals and the running subtotal.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let lines = CartRepository::new(state.pool())
        .lines_for_user(user.id)
        .await?;

    let subtotal = lines.iter().map(CartLine::line_total).sum();

    Ok(CartTemplate {
        user,
        lines,
        subtotal,
        payment_methods: PAYMENT_METHODS,
        error: query.error_text(),
        success: query.success_text(),
    })
}

/// Add one unit of a product to the user's cart.
///
/// Redirects to the cart with a notice distinguishing a fresh line from an
/// incremented one.
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product_id = ProductId::new(form.product_id);

    // Reject unknown products before touching the cart
    CatalogRepository::new(state.pool())
        .get_product(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    let carts = CartRepository::new(state.pool());
    let cart = carts.get_or_create(user.id).await?;

    let outcome = carts.add_product(cart.id, product_id).await?;

    let notice = match outcome {
        LineUpsert::Created => "added",
        LineUpsert::Incremented { quantity } => {
            tracing::debug!(%product_id, quantity, "cart line incremented");
            "incremented"
        }
    };

    Ok(Redirect::to(&format!("/cart/?success={notice}")).into_response())
}

/// Set a cart line's quantity; zero removes the line.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let quantity = match form.quantity {
        Some(quantity) if quantity >= 0 => quantity,
        // Blank or negative input
        _ => return Ok(Redirect::to("/cart/?error=quantity").into_response()),
    };

    let result = CartRepository::new(state.pool())
        .set_quantity(user.id, CartItemId::new(form.item_id), quantity)
        .await;

    match result {
        Ok(()) if quantity == 0 => Ok(Redirect::to("/cart/?success=removed").into_response()),
        Ok(()) => Ok(Redirect::to("/cart/?success=updated").into_response()),
        // Covers both a stale line and a line in someone else's cart
        Err(RepositoryError::NotFound) => Ok(Redirect::to("/cart/?error=missing").into_response()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;

    fn parse_form(query: &str) -> UpdateCartForm {
        // Form bodies and query strings share the urlencoded format
        let uri = format!("/update-cart/?{query}")
            .parse::<Uri>()
            .expect("valid uri");
        let Query(form) = Query::<UpdateCartForm>::try_from_uri(&uri).expect("form parses");
        form
    }

    #[test]
    fn test_blank_quantity_parses_as_none() {
        let form = parse_form("item_id=1&quantity=");
        assert_eq!(form.item_id, 1);
        assert_eq!(form.quantity, None);
    }

    #[test]
    fn test_quantity_parses() {
        let form = parse_form("item_id=1&quantity=3");
        assert_eq!(form.quantity, Some(3));
    }

    #[test]
    fn test_payment_methods() {
        assert_eq!(
            PAYMENT_METHODS,
            [
                "Credit Card",
                "Debit Card",
                "Net Banking",
                "UPI",
                "Cash on Delivery",
            ]
        );
    }
}
