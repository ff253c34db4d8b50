//! Order models.
//!
//! Orders and their lines are written once at checkout and never mutated
//! or deleted by the application.

use chrono::{DateTime, Utc};
use orchard_core::{OrderId, UserId};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// An order header.
#[derive(Debug, Clone, FromRow)]
pub struct Order {
    /// Order database ID.
    pub id: OrderId,
    /// Purchasing user.
    pub user_id: UserId,
    /// Sum of all line totals at creation time.
    pub total_amount: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
