//! Marksheet Server
//!
//! HTTP record service over a single student table: CRUD plus the
//! filter/sort reporting views the client's data-entry screens use. Every
//! request maps to exactly one parameterized database statement.

mod error;
mod handlers;
mod storage;

use anyhow::{Context, Result};
use axum::routing::{delete, get, post, put};
use axum::Router;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use storage::Database;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting Marksheet Server v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    let config = load_config()
        .await
        .context("Failed to load configuration")?;
    info!(
        "Config loaded: bind={}, db={}",
        config.bind_address, config.database_path
    );

    let db = Arc::new(
        Database::new(&config.database_path)
            .await
            .context("Failed to initialize database")?,
    );

    let state = AppState { db };
    let app = router(state);

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Records
        .route("/student_record", get(handlers::records::list))
        .route("/addStudent", post(handlers::records::create))
        .route("/getStudent/:id", get(handlers::records::get_by_id))
        .route(
            "/updateStudentById/:id",
            put(handlers::records::update_by_id),
        )
        .route(
            "/updateStudentByName/:name",
            put(handlers::records::update_by_name),
        )
        .route("/updateMark/:id", put(handlers::records::update_mark))
        .route("/updateEmail/:id", put(handlers::records::update_email))
        .route("/updateName/:id", put(handlers::records::update_name))
        .route("/updateCity/:name", put(handlers::records::update_city))
        .route(
            "/deleteStudentByName/:name",
            delete(handlers::records::delete_by_name),
        )
        .route("/deleteAllStudents", delete(handlers::records::delete_all))
        // Reports
        .route(
            "/studentsWithMarkGreaterThan/:mark",
            get(handlers::reports::mark_greater_than),
        )
        .route(
            "/studentsFilterByMark/:mark",
            get(handlers::reports::filter_by_mark),
        )
        .route("/studentsAbove/:mark", get(handlers::reports::students_above))
        .route("/fromSameCity/:city", get(handlers::reports::from_same_city))
        .route("/passedStudents", get(handlers::reports::passed))
        .route("/failedStudents", get(handlers::reports::failed))
        .route("/topStudents", get(handlers::reports::top))
        .route(
            "/distinctionStudents",
            get(handlers::reports::distinction),
        )
        .route("/totalStudents", get(handlers::reports::total))
        .route(
            "/studentsSortedByMark",
            get(handlers::reports::sorted_by_mark),
        )
        // Layers
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Clone)]
struct Config {
    bind_address: String,
    database_path: String,
}

async fn load_config() -> Result<Config> {
    let data_dir = std::env::var("DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./data"));

    tokio::fs::create_dir_all(&data_dir)
        .await
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

    let database_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| {
        let path = data_dir.join("marksheet.db");
        path.to_string_lossy().to_string()
    });

    let bind_address = std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:5000".to_string());

    Ok(Config {
        bind_address,
        database_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use marksheet_types::Student;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn test_app() -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::new(path.to_str().unwrap()).await.unwrap();
        let app = router(AppState { db: Arc::new(db) });
        (dir, app)
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn bare_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn list_students(app: &Router) -> Vec<Student> {
        let response = app
            .clone()
            .oneshot(bare_request(Method::GET, "/student_record"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        serde_json::from_str(&body_string(response).await).unwrap()
    }

    fn alice_body() -> Value {
        json!({"name": "Alice", "email": "a@x.com", "mark": 85, "city": "NY"})
    }

    #[tokio::test]
    async fn create_update_mark_delete_scenario() {
        let (_dir, app) = test_app().await;

        // Create
        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/addStudent", alice_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "Student added successfully!");

        // Get by id reflects every submitted field
        let students = list_students(&app).await;
        assert_eq!(students.len(), 1);
        let id = students[0].id;

        let response = app
            .clone()
            .oneshot(bare_request(Method::GET, &format!("/getStudent/{id}")))
            .await
            .unwrap();
        let fetched: Student = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(fetched.name, "Alice");
        assert_eq!(fetched.email, "a@x.com");
        assert_eq!(fetched.mark, 85.0);
        assert_eq!(fetched.city, "NY");

        // Update mark only
        let response = app
            .clone()
            .oneshot(json_request(
                Method::PUT,
                &format!("/updateMark/{id}"),
                json!({"mark": 90}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(bare_request(Method::GET, &format!("/getStudent/{id}")))
            .await
            .unwrap();
        let updated: Student = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(updated.mark, 90.0);
        assert_eq!(updated.name, "Alice");
        assert_eq!(updated.email, "a@x.com");
        assert_eq!(updated.city, "NY");

        // Delete by name
        let response = app
            .clone()
            .oneshot(bare_request(Method::DELETE, "/deleteStudentByName/Alice"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        assert!(list_students(&app).await.is_empty());

        let response = app
            .clone()
            .oneshot(bare_request(Method::GET, "/totalStudents"))
            .await
            .unwrap();
        assert_eq!(body_string(response).await, r#"{"total":0}"#);
    }

    #[tokio::test]
    async fn update_by_id_on_missing_record_is_404() {
        let (_dir, app) = test_app().await;

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PUT,
                "/updateStudentById/42",
                json!({"name": "X", "email": "x@x.com", "mark": 1, "city": "Y"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(response).await, "No student found with that ID");

        assert!(list_students(&app).await.is_empty());
    }

    #[tokio::test]
    async fn delete_by_name_on_missing_record_is_404() {
        let (_dir, app) = test_app().await;

        let response = app
            .clone()
            .oneshot(bare_request(Method::DELETE, "/deleteStudentByName/Nobody"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_missing_student_returns_json_null() {
        let (_dir, app) = test_app().await;

        let response = app
            .clone()
            .oneshot(bare_request(Method::GET, "/getStudent/7"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "null");
    }

    #[tokio::test]
    async fn students_above_and_filter_by_mark_agree() {
        let (_dir, app) = test_app().await;

        for (name, mark) in [("A", 40.0), ("B", 75.0), ("C", 75.5), ("D", 91.0)] {
            let body = json!({"name": name, "email": "s@x.com", "mark": mark, "city": "NY"});
            let response = app
                .clone()
                .oneshot(json_request(Method::POST, "/addStudent", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let above = app
            .clone()
            .oneshot(bare_request(Method::GET, "/studentsAbove/75"))
            .await
            .unwrap();
        let filtered = app
            .clone()
            .oneshot(bare_request(Method::GET, "/studentsFilterByMark/75"))
            .await
            .unwrap();

        let above: Vec<Student> = serde_json::from_str(&body_string(above).await).unwrap();
        let filtered: Vec<Student> = serde_json::from_str(&body_string(filtered).await).unwrap();
        assert_eq!(above, filtered);
        // Inclusive boundary: the 75.0 row is in the set
        assert!(above.iter().any(|s| s.name == "B"));

        // Strict variant excludes the boundary row
        let strict = app
            .clone()
            .oneshot(bare_request(
                Method::GET,
                "/studentsWithMarkGreaterThan/75",
            ))
            .await
            .unwrap();
        let strict: Vec<Student> = serde_json::from_str(&body_string(strict).await).unwrap();
        assert!(strict.iter().all(|s| s.name != "B"));
        assert_eq!(strict.len(), 2);
    }

    #[tokio::test]
    async fn top_students_are_a_subset_of_passed() {
        let (_dir, app) = test_app().await;

        for (name, mark) in [("F", 20.0), ("P", 50.0), ("T", 80.0), ("D", 95.0)] {
            let body = json!({"name": name, "email": "s@x.com", "mark": mark, "city": "NY"});
            app.clone()
                .oneshot(json_request(Method::POST, "/addStudent", body))
                .await
                .unwrap();
        }

        let passed = app
            .clone()
            .oneshot(bare_request(Method::GET, "/passedStudents"))
            .await
            .unwrap();
        let top = app
            .clone()
            .oneshot(bare_request(Method::GET, "/topStudents"))
            .await
            .unwrap();

        let passed: Vec<Student> = serde_json::from_str(&body_string(passed).await).unwrap();
        let top: Vec<Student> = serde_json::from_str(&body_string(top).await).unwrap();
        assert!(top.iter().all(|t| passed.iter().any(|p| p.id == t.id)));
        assert_eq!(passed.len(), 3);
        assert_eq!(top.len(), 2);

        let distinction = app
            .clone()
            .oneshot(bare_request(Method::GET, "/distinctionStudents"))
            .await
            .unwrap();
        let distinction: Vec<Student> =
            serde_json::from_str(&body_string(distinction).await).unwrap();
        assert_eq!(distinction.len(), 1);
        assert_eq!(distinction[0].name, "D");
    }

    #[tokio::test]
    async fn update_by_name_applies_submitted_fields() {
        let (_dir, app) = test_app().await;

        app.clone()
            .oneshot(json_request(Method::POST, "/addStudent", alice_body()))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PUT,
                "/updateStudentByName/Alice",
                json!({"email": "new@x.com", "mark": 61.5, "city": "Boston"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let students = list_students(&app).await;
        assert_eq!(students[0].email, "new@x.com");
        assert_eq!(students[0].mark, 61.5);
        assert_eq!(students[0].city, "Boston");
        assert_eq!(students[0].name, "Alice");

        // Unknown name is a 404 with the name in the message
        let response = app
            .clone()
            .oneshot(json_request(
                Method::PUT,
                "/updateStudentByName/Nobody",
                json!({"email": "n@x.com", "mark": 1, "city": "Z"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_string(response).await,
            "No student found with that name: Nobody"
        );
    }

    #[tokio::test]
    async fn update_city_matches_on_name() {
        let (_dir, app) = test_app().await;

        app.clone()
            .oneshot(json_request(Method::POST, "/addStudent", alice_body()))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PUT,
                "/updateCity/Alice",
                json!({"city": "Chicago"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_string(response).await,
            "Student city updated successfully!"
        );

        let students = list_students(&app).await;
        assert_eq!(students[0].city, "Chicago");
    }

    #[tokio::test]
    async fn create_rejects_missing_fields_before_any_statement() {
        let (_dir, app) = test_app().await;

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/addStudent",
                json!({"name": "Alice", "email": "a@x.com", "mark": 85}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        assert!(list_students(&app).await.is_empty());
    }

    #[tokio::test]
    async fn from_same_city_and_sorted_views() {
        let (_dir, app) = test_app().await;

        for (name, mark, city) in [("A", 30.0, "NY"), ("B", 90.0, "LA"), ("C", 60.0, "NY")] {
            let body = json!({"name": name, "email": "s@x.com", "mark": mark, "city": city});
            app.clone()
                .oneshot(json_request(Method::POST, "/addStudent", body))
                .await
                .unwrap();
        }

        let ny = app
            .clone()
            .oneshot(bare_request(Method::GET, "/fromSameCity/NY"))
            .await
            .unwrap();
        let ny: Vec<Student> = serde_json::from_str(&body_string(ny).await).unwrap();
        assert_eq!(ny.len(), 2);
        assert!(ny.iter().all(|s| s.city == "NY"));

        let sorted = app
            .clone()
            .oneshot(bare_request(Method::GET, "/studentsSortedByMark"))
            .await
            .unwrap();
        let sorted: Vec<Student> = serde_json::from_str(&body_string(sorted).await).unwrap();
        let marks: Vec<f64> = sorted.iter().map(|s| s.mark).collect();
        assert_eq!(marks, vec![90.0, 60.0, 30.0]);
    }

    #[tokio::test]
    async fn health_endpoint_responds() {
        let (_dir, app) = test_app().await;

        let response = app
            .clone()
            .oneshot(bare_request(Method::GET, "/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["status"], "ok");
    }
}
