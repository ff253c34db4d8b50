//! User and address models.

use chrono::{DateTime, Utc};
use orchard_core::{AddressId, Email, UserId};
use sqlx::FromRow;

/// A registered user.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    /// User database ID.
    pub id: UserId,
    /// Unique email address, also the login identifier.
    pub email: Email,
    /// First name; may be empty until the profile is filled in.
    pub first_name: String,
    /// Last name; may be empty until the profile is filled in.
    pub last_name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last profile update.
    pub updated_at: DateTime<Utc>,
}

/// A user's shipping address.
///
/// One row per user, upserted on every profile save.
#[derive(Debug, Clone, FromRow)]
pub struct Address {
    /// Address database ID.
    pub id: AddressId,
    /// Owning user.
    pub user_id: UserId,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
}
