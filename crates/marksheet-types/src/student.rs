//! Student record types

use serde::{Deserialize, Serialize};

/// One student row, keyed by the database-assigned `id`.
///
/// `mark` is a general numeric value: integral and fractional marks are both
/// valid and compare correctly against thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub mark: f64,
    pub city: String,
}

/// Body of the create request. All fields are required; the database
/// assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub mark: f64,
    pub city: String,
}

/// Full-replacement body for update-by-id: all four mutable fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentUpdate {
    pub name: String,
    pub email: String,
    pub mark: f64,
    pub city: String,
}

/// Body for update-by-name: the name comes from the path, the remaining
/// fields are applied to every matching row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedStudentUpdate {
    pub email: String,
    pub mark: f64,
    pub city: String,
}

/// Single-field update bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkUpdate {
    pub mark: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailUpdate {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameUpdate {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityUpdate {
    pub city: String,
}

/// Response of the count endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentCount {
    pub total: i64,
}
