//! Newtype wrappers for domain values.
//!
//! Using dedicated types instead of raw `i32`/`String` values prevents an
//! entire class of bugs where IDs of different entities get mixed up or an
//! unvalidated string is treated as an email address.

mod email;
mod id;

pub use email::{Email, EmailError};
pub use id::*;
