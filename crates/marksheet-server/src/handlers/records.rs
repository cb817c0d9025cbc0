//! Record handlers: create, read, update and delete operations
//!
//! Name-keyed mutations (update-by-name, update-city-by-name,
//! delete-by-name) apply to every row whose name matches; names are not
//! unique.

use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::Json;
use marksheet_types::{
    CityUpdate, EmailUpdate, MarkUpdate, NameUpdate, NamedStudentUpdate, NewStudent, Student,
    StudentUpdate,
};
use tracing::info;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Student>>, ApiError> {
    Ok(Json(state.db.list_students().await?))
}

/// Insert failures surface as a 500; success is never reported blindly.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<NewStudent>,
) -> Result<&'static str, ApiError> {
    info!("Adding student: {}", req.name);
    let id = state.db.insert_student(&req).await?;
    info!("Student added with id {}", id);
    Ok("Student added successfully!")
}

/// Returns the record, or JSON `null` when no row matches.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Option<Student>>, ApiError> {
    Ok(Json(state.db.get_student(id).await?))
}

pub async fn update_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<StudentUpdate>,
) -> Result<&'static str, ApiError> {
    let affected = state.db.update_student(id, &req).await?;
    if affected == 0 {
        return Err(ApiError::not_found_by_id());
    }
    Ok("Student updated successfully!")
}

pub async fn update_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<NamedStudentUpdate>,
) -> Result<&'static str, ApiError> {
    let affected = state.db.update_students_by_name(&name, &req).await?;
    if affected == 0 {
        return Err(ApiError::not_found_by_name(&name));
    }
    Ok("Student updated successfully!")
}

pub async fn update_mark(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<MarkUpdate>,
) -> Result<&'static str, ApiError> {
    state.db.set_mark(id, req.mark).await?;
    Ok("Student mark updated successfully!")
}

pub async fn update_email(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<EmailUpdate>,
) -> Result<&'static str, ApiError> {
    state.db.set_email(id, &req.email).await?;
    Ok("Student email updated successfully!")
}

pub async fn update_name(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<NameUpdate>,
) -> Result<&'static str, ApiError> {
    state.db.set_name(id, &req.name).await?;
    Ok("Student name updated successfully!")
}

pub async fn update_city(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<CityUpdate>,
) -> Result<&'static str, ApiError> {
    state.db.set_city_by_name(&name, &req.city).await?;
    Ok("Student city updated successfully!")
}

pub async fn delete_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<&'static str, ApiError> {
    let affected = state.db.delete_students_by_name(&name).await?;
    if affected == 0 {
        return Err(ApiError::NotFound(
            "No student found with that name".to_string(),
        ));
    }
    info!("Deleted {} student(s) named {}", affected, name);
    Ok("Student deleted successfully!")
}

pub async fn delete_all(State(state): State<AppState>) -> Result<&'static str, ApiError> {
    let removed = state.db.delete_all_students().await?;
    info!("Deleted all {} student(s)", removed);
    Ok("All students deleted successfully!")
}
