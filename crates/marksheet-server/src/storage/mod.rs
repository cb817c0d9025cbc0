//! Storage layer
//!
//! One table, one parameterized statement per operation. Uses SQLite
//! (embedded) behind a sqlx connection pool.

pub mod db;

pub use db::Database;
