//! Application services.
//!
//! Services hold the domain logic between the route handlers and the
//! repositories: catalog filtering and sorting, authentication, the
//! checkout workflow, and outbound email.

pub mod auth;
pub mod catalog;
pub mod checkout;
pub mod email;
