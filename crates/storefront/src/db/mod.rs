//! Database operations for the storefront `PostgreSQL` instance.
//!
//! ## Tables
//!
//! - `users` / `user_passwords` - Site authentication
//! - `addresses` - One shipping address per user
//! - `categories` / `products` - Catalog
//! - `carts` / `cart_items` - Per-user cart state
//! - `orders` / `order_items` - Immutable purchase records
//! - `tower_sessions.session` - Session storage
//!
//! # Migrations
//!
//! Migrations live in `crates/storefront/migrations/` and are embedded at
//! compile time; the binary applies pending migrations on startup.

pub mod carts;
pub mod catalog;
pub mod orders;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use carts::{CartRepository, LineUpsert};
pub use catalog::CatalogRepository;
pub use orders::OrderRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Row seeding for repository tests running against a throwaway
    //! database.

    use orchard_core::{CategoryId, ProductId, UserId};
    use rust_decimal::Decimal;
    use sqlx::PgPool;

    pub async fn seed_user(pool: &PgPool, email: &str) -> UserId {
        let (id,): (UserId,) =
            sqlx::query_as("INSERT INTO users (email) VALUES ($1) RETURNING id")
                .bind(email)
                .fetch_one(pool)
                .await
                .expect("insert user");
        id
    }

    pub async fn seed_product(pool: &PgPool, name: &str, price: Decimal) -> ProductId {
        let (category_id,): (CategoryId,) = sqlx::query_as(
            r"
            INSERT INTO categories (name) VALUES ('Footwear')
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            ",
        )
        .fetch_one(pool)
        .await
        .expect("insert category");

        let (id,): (ProductId,) = sqlx::query_as(
            "INSERT INTO products (name, price, category_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(name)
        .bind(price)
        .bind(category_id)
        .fetch_one(pool)
        .await
        .expect("insert product");
        id
    }
}
