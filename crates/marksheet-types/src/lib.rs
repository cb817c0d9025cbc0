//! Marksheet Types - Pure type definitions shared with clients
//!
//! This crate contains only serde data types with no async runtime
//! dependencies, so any client of the record service can depend on it.

pub mod student;

pub use student::*;
