//! Core data model shared across subsystems.

pub mod schema;
pub mod value;
