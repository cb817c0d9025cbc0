//! Report handlers: threshold filters, grouping, count and ranking
//!
//! Boundary semantics differ between superficially similar endpoints and
//! are part of the contract: `/studentsWithMarkGreaterThan` is strict,
//! `/studentsAbove` and `/studentsFilterByMark` are inclusive.

use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::Json;
use marksheet_types::{Student, StudentCount};

/// Minimum mark to pass.
const PASS_MARK: f64 = 50.0;
/// Minimum mark to count as a top student.
const TOP_MARK: f64 = 80.0;
/// Minimum mark for a distinction.
const DISTINCTION_MARK: f64 = 90.0;

/// `mark > threshold`, strict.
pub async fn mark_greater_than(
    State(state): State<AppState>,
    Path(mark): Path<f64>,
) -> Result<Json<Vec<Student>>, ApiError> {
    Ok(Json(state.db.students_with_mark_over(mark).await?))
}

/// `mark >= threshold`. Equivalent to [`students_above`].
pub async fn filter_by_mark(
    State(state): State<AppState>,
    Path(mark): Path<f64>,
) -> Result<Json<Vec<Student>>, ApiError> {
    Ok(Json(state.db.students_with_mark_at_least(mark).await?))
}

/// `mark >= threshold`. Equivalent to [`filter_by_mark`].
pub async fn students_above(
    State(state): State<AppState>,
    Path(mark): Path<f64>,
) -> Result<Json<Vec<Student>>, ApiError> {
    Ok(Json(state.db.students_with_mark_at_least(mark).await?))
}

pub async fn from_same_city(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<Vec<Student>>, ApiError> {
    Ok(Json(state.db.students_from_city(&city).await?))
}

pub async fn passed(State(state): State<AppState>) -> Result<Json<Vec<Student>>, ApiError> {
    Ok(Json(state.db.students_with_mark_at_least(PASS_MARK).await?))
}

pub async fn failed(State(state): State<AppState>) -> Result<Json<Vec<Student>>, ApiError> {
    Ok(Json(state.db.students_with_mark_below(PASS_MARK).await?))
}

pub async fn top(State(state): State<AppState>) -> Result<Json<Vec<Student>>, ApiError> {
    Ok(Json(state.db.students_with_mark_at_least(TOP_MARK).await?))
}

pub async fn distinction(State(state): State<AppState>) -> Result<Json<Vec<Student>>, ApiError> {
    Ok(Json(
        state.db.students_with_mark_at_least(DISTINCTION_MARK).await?,
    ))
}

pub async fn total(State(state): State<AppState>) -> Result<Json<StudentCount>, ApiError> {
    let total = state.db.count_students().await?;
    Ok(Json(StudentCount { total }))
}

pub async fn sorted_by_mark(
    State(state): State<AppState>,
) -> Result<Json<Vec<Student>>, ApiError> {
    Ok(Json(state.db.students_sorted_by_mark().await?))
}
