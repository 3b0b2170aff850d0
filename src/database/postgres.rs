use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use super::manager::DatabaseError;
use super::models::comment::{Comment, NewComment};
use super::models::user::{NewUser, User};
use super::store::Store;

/// Table definitions, applied one statement at a time
const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS "user" (
        id BIGSERIAL PRIMARY KEY,
        email VARCHAR(120) NOT NULL UNIQUE,
        password VARCHAR(200) NOT NULL,
        role VARCHAR(50) NOT NULL DEFAULT 'user'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS comment (
        id BIGSERIAL PRIMARY KEY,
        comment VARCHAR(200) NOT NULL,
        email VARCHAR(120) NOT NULL,
        "timestamp" TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"CREATE INDEX IF NOT EXISTS comment_timestamp_idx ON comment ("timestamp" DESC)"#,
];

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Translate a unique-constraint violation into `DatabaseError::Duplicate`
fn map_unique_violation(err: sqlx::Error, key: &str) -> DatabaseError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return DatabaseError::Duplicate(key.to_string());
        }
    }
    DatabaseError::Sqlx(err)
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(
            r#"INSERT INTO "user" (email, password, role) VALUES ($1, $2, $3)
               RETURNING id, email, password, role"#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &user.email))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, email, password, role FROM "user" WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let users = sqlx::query_as::<_, User>(
            r#"SELECT id, email, password, role FROM "user" ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn update_user_role(&self, email: &str, role: &str) -> Result<u64, DatabaseError> {
        let result = sqlx::query(r#"UPDATE "user" SET role = $1 WHERE email = $2"#)
            .bind(role)
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_user(&self, email: &str) -> Result<u64, DatabaseError> {
        let result = sqlx::query(r#"DELETE FROM "user" WHERE email = $1"#)
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, DatabaseError> {
        let stored = sqlx::query_as::<_, Comment>(
            r#"INSERT INTO comment (comment, email) VALUES ($1, $2)
               RETURNING id, comment, email, "timestamp""#,
        )
        .bind(&comment.comment)
        .bind(&comment.email)
        .fetch_one(&self.pool)
        .await?;
        Ok(stored)
    }

    async fn list_comments(&self) -> Result<Vec<Comment>, DatabaseError> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"SELECT id, comment, email, "timestamp" FROM comment
               ORDER BY "timestamp" DESC, id DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }

    async fn find_comment(&self, id: i64) -> Result<Option<Comment>, DatabaseError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"SELECT id, comment, email, "timestamp" FROM comment WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(comment)
    }

    async fn delete_comment(&self, id: i64) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM comment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn migrate(&self) -> Result<(), DatabaseError> {
        for statement in MIGRATIONS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Database schema is up to date");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
