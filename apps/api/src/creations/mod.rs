//! The `creations` table and the user-data routes that read it.

pub mod handlers;
pub mod store;
