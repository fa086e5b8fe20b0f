//! # NexusOne Core
//!
//! Domain types, the error taxonomy, and the appointment slot generator
//! shared by the database and API crates.

pub mod availability;
pub mod errors;
pub mod models;
