//! SQLite database layer (embedded, no external dependencies)
//!
//! Every method issues exactly one parameterized statement; user-supplied
//! values are always bound, never interpolated. Mutations return the
//! affected-row count so callers can distinguish "not found" from success.

use anyhow::Context;
use marksheet_types::{NamedStudentUpdate, NewStudent, Student, StudentUpdate};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct Database {
    pool: Arc<SqlitePool>,
}

impl Database {
    pub async fn new(database_path: &str) -> anyhow::Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_path);

        // Create parent directory if needed
        if let Some(parent) = std::path::Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| {
                format!("Failed to connect to SQLite database at: {}", database_path)
            })?;

        Self::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;

        tracing::info!("Database initialization complete");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS student_record (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                mark REAL NOT NULL,
                city TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn list_students(&self) -> Result<Vec<Student>, sqlx::Error> {
        let rows: Vec<StudentRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, mark, city FROM student_record
            "#,
        )
        .fetch_all(&*self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Inserts one student and returns the database-assigned id.
    pub async fn insert_student(&self, new: &NewStudent) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO student_record (name, email, mark, city)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(new.mark)
        .bind(&new.city)
        .execute(&*self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn get_student(&self, id: i64) -> Result<Option<Student>, sqlx::Error> {
        let row: Option<StudentRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, mark, city FROM student_record WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(row.map(|r| r.into()))
    }

    /// Replaces all four mutable fields on the matching row.
    pub async fn update_student(
        &self,
        id: i64,
        fields: &StudentUpdate,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE student_record SET name = ?1, email = ?2, mark = ?3, city = ?4
            WHERE id = ?5
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(fields.mark)
        .bind(&fields.city)
        .bind(id)
        .execute(&*self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Applies email, mark and city to every row with the given name.
    pub async fn update_students_by_name(
        &self,
        name: &str,
        fields: &NamedStudentUpdate,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE student_record SET email = ?1, mark = ?2, city = ?3
            WHERE name = ?4
            "#,
        )
        .bind(&fields.email)
        .bind(fields.mark)
        .bind(&fields.city)
        .bind(name)
        .execute(&*self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn set_mark(&self, id: i64, mark: f64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE student_record SET mark = ?1 WHERE id = ?2
            "#,
        )
        .bind(mark)
        .bind(id)
        .execute(&*self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn set_email(&self, id: i64, email: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE student_record SET email = ?1 WHERE id = ?2
            "#,
        )
        .bind(email)
        .bind(id)
        .execute(&*self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn set_name(&self, id: i64, name: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE student_record SET name = ?1 WHERE id = ?2
            "#,
        )
        .bind(name)
        .bind(id)
        .execute(&*self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Sets the city on every row with the given name.
    pub async fn set_city_by_name(
        &self,
        name: &str,
        city: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE student_record SET city = ?1 WHERE name = ?2
            "#,
        )
        .bind(city)
        .bind(name)
        .execute(&*self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Deletes every row with the given name.
    pub async fn delete_students_by_name(
        &self,
        name: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM student_record WHERE name = ?1
            "#,
        )
        .bind(name)
        .execute(&*self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_all_students(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM student_record
            "#,
        )
        .execute(&*self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Rows with mark strictly greater than the threshold.
    pub async fn students_with_mark_over(
        &self,
        threshold: f64,
    ) -> Result<Vec<Student>, sqlx::Error> {
        let rows: Vec<StudentRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, mark, city FROM student_record WHERE mark > ?1
            "#,
        )
        .bind(threshold)
        .fetch_all(&*self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Rows with mark at or above the threshold.
    pub async fn students_with_mark_at_least(
        &self,
        threshold: f64,
    ) -> Result<Vec<Student>, sqlx::Error> {
        let rows: Vec<StudentRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, mark, city FROM student_record WHERE mark >= ?1
            "#,
        )
        .bind(threshold)
        .fetch_all(&*self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Rows with mark strictly below the threshold.
    pub async fn students_with_mark_below(
        &self,
        threshold: f64,
    ) -> Result<Vec<Student>, sqlx::Error> {
        let rows: Vec<StudentRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, mark, city FROM student_record WHERE mark < ?1
            "#,
        )
        .bind(threshold)
        .fetch_all(&*self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    pub async fn students_from_city(
        &self,
        city: &str,
    ) -> Result<Vec<Student>, sqlx::Error> {
        let rows: Vec<StudentRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, mark, city FROM student_record WHERE city = ?1
            "#,
        )
        .bind(city)
        .fetch_all(&*self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    pub async fn count_students(&self) -> Result<i64, sqlx::Error> {
        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM student_record
            "#,
        )
        .fetch_one(&*self.pool)
        .await?;

        Ok(total)
    }

    pub async fn students_sorted_by_mark(
        &self,
    ) -> Result<Vec<Student>, sqlx::Error> {
        let rows: Vec<StudentRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, mark, city FROM student_record ORDER BY mark DESC
            "#,
        )
        .fetch_all(&*self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }
}

// Helper struct for sqlx query_as
#[derive(sqlx::FromRow)]
struct StudentRow {
    id: i64,
    name: String,
    email: String,
    mark: f64,
    city: String,
}

impl From<StudentRow> for Student {
    fn from(r: StudentRow) -> Self {
        Student {
            id: r.id,
            name: r.name,
            email: r.email,
            mark: r.mark,
            city: r.city,
        }
    }
}
