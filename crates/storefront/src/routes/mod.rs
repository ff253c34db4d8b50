//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Products (public)
//! GET  /products/              - Product listing (filter, search, sort)
//! GET  /products/{id}/         - Product detail
//!
//! # Cart (requires auth)
//! GET  /cart/                  - Cart page
//! POST /add-to-cart/           - Add a product to the cart
//! POST /update-cart/           - Set a line quantity (0 removes)
//!
//! # Checkout (requires auth)
//! POST /purchase/              - Convert the cart into an order
//!
//! # Auth
//! GET  /login_register/        - Combined login/register page
//! POST /login_register/        - Combined form action
//! GET  /login/                 - Login page
//! POST /login/                 - Login action
//! GET  /register/              - Register page
//! POST /register/              - Register action
//! GET  /logout/                - Logout action
//!
//! # Account (requires auth)
//! GET  /user/                  - Profile page
//! POST /update-user-info/      - Update profile and address
//! POST /add_address/           - Save address only
//! GET  /delete-account/        - Delete confirmation page
//! POST /delete-account/        - Delete the account
//! ```
//!
//! Flash-style notices travel as `?error=code` / `?success=code` query
//! parameters on redirects; pages map the codes back to display text.

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Deserialize;

use crate::state::AppState;

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

impl MessageQuery {
    /// Resolve the error code to display text, if any.
    #[must_use]
    pub fn error_text(&self) -> Option<&'static str> {
        self.error.as_deref().map(error_text)
    }

    /// Resolve the success code to display text, if any.
    #[must_use]
    pub fn success_text(&self) -> Option<&'static str> {
        self.success.as_deref().map(success_text)
    }
}

/// Display text for an error notice code.
fn error_text(code: &str) -> &'static str {
    match code {
        "credentials" => "Invalid email or password.",
        "email_invalid" => "Please enter a valid email address.",
        "email_taken" => "An account with this email already exists.",
        "password_mismatch" => "The passwords do not match.",
        "weak_password" => "Password must be at least 8 characters.",
        "address_incomplete" => "Please fill in all address fields.",
        "empty" => "There are no items in your cart to order.",
        "changed" => "Your cart changed while ordering. Please review it and try again.",
        "missing" => "That cart item no longer exists.",
        "quantity" => "Quantity must be zero or more.",
        "session" => "Your session expired. Please log in again.",
        _ => "Something went wrong. Please try again.",
    }
}

/// Display text for a success notice code.
fn success_text(code: &str) -> &'static str {
    match code {
        "registered" => "Account created. You can log in now.",
        "added" => "Added to your cart.",
        "incremented" => "Already in your cart; quantity increased.",
        "updated" => "Cart updated.",
        "removed" => "Item removed from your cart.",
        "profile_updated" => "Your details were updated.",
        "address_saved" => "Address saved.",
        "account_deleted" => "Your account has been deleted.",
        _ => "Done.",
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/login_register/",
            get(auth::login_register_page).post(auth::login_register),
        )
        .route("/login/", get(auth::login_page).post(auth::login))
        .route("/register/", get(auth::register_page).post(auth::register))
        .route("/logout/", get(auth::logout))
}

/// Create the cart and checkout routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart/", get(cart::show).post(cart::show))
        .route("/add-to-cart/", post(cart::add))
        .route("/update-cart/", post(cart::update))
        .route("/purchase/", post(checkout::purchase))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/user/", get(account::show))
        .route("/update-user-info/", post(account::update_profile))
        .route("/add_address/", post(account::add_address))
        .route(
            "/delete-account/",
            get(account::delete_page).post(account::delete_account),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Product routes
        .route("/products/", get(products::index))
        .route("/products/{id}/", get(products::show))
        // Cart and checkout routes
        .merge(cart_routes())
        // Auth routes
        .merge(auth_routes())
        // Account routes
        .merge(account_routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_notice_codes_have_specific_text() {
        assert_eq!(error_text("credentials"), "Invalid email or password.");
        assert_eq!(success_text("removed"), "Item removed from your cart.");
    }

    #[test]
    fn test_unknown_notice_codes_fall_back() {
        assert_eq!(
            error_text("nonsense"),
            "Something went wrong. Please try again."
        );
        assert_eq!(success_text("nonsense"), "Done.");
    }
}
