//! Post repository for database operations
//!
//! Every read joins `users` so records carry the author's user name.

use crate::auth::Authored;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Post record from database, joined with its author
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRecord {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub cover: Option<String>,
    pub author_id: Uuid,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Authored for PostRecord {
    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

/// Input for creating a post
#[derive(Debug, Clone)]
pub struct CreatePost {
    pub author_id: Uuid,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub cover: Option<String>,
}

/// Input for updating a post; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub cover: Option<String>,
}

/// Post repository for database operations
pub struct PostRepository;

impl PostRepository {
    /// Create a new post
    pub async fn create(pool: &PgPool, input: CreatePost) -> Result<PostRecord> {
        let record = sqlx::query_as::<_, PostRecord>(
            r#"
            WITH inserted AS (
                INSERT INTO posts (author_id, title, summary, content, cover)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
            )
            SELECT p.id, p.title, p.summary, p.content, p.cover, p.author_id,
                   u.user_name AS author_name, p.created_at, p.updated_at
            FROM inserted p
            JOIN users u ON u.id = p.author_id
            "#,
        )
        .bind(input.author_id)
        .bind(&input.title)
        .bind(&input.summary)
        .bind(&input.content)
        .bind(&input.cover)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Find post by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<PostRecord>> {
        let record = sqlx::query_as::<_, PostRecord>(
            r#"
            SELECT p.id, p.title, p.summary, p.content, p.cover, p.author_id,
                   u.user_name AS author_name, p.created_at, p.updated_at
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Find post by ID and lock its row until the transaction ends
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<PostRecord>> {
        let record = sqlx::query_as::<_, PostRecord>(
            r#"
            SELECT p.id, p.title, p.summary, p.content, p.cover, p.author_id,
                   u.user_name AS author_name, p.created_at, p.updated_at
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE p.id = $1
            FOR UPDATE OF p
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(record)
    }

    /// Newest posts first
    pub async fn list_recent(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<PostRecord>> {
        let records = sqlx::query_as::<_, PostRecord>(
            r#"
            SELECT p.id, p.title, p.summary, p.content, p.cover, p.author_id,
                   u.user_name AS author_name, p.created_at, p.updated_at
            FROM posts p
            JOIN users u ON u.id = p.author_id
            ORDER BY p.created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Update post content; `author_id` is never touched
    pub async fn update(conn: &mut PgConnection, id: Uuid, updates: UpdatePost) -> Result<PostRecord> {
        let record = sqlx::query_as::<_, PostRecord>(
            r#"
            WITH updated AS (
                UPDATE posts SET
                    title = COALESCE($2, title),
                    summary = COALESCE($3, summary),
                    content = COALESCE($4, content),
                    cover = COALESCE($5, cover),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            SELECT p.id, p.title, p.summary, p.content, p.cover, p.author_id,
                   u.user_name AS author_name, p.created_at, p.updated_at
            FROM updated p
            JOIN users u ON u.id = p.author_id
            "#,
        )
        .bind(id)
        .bind(updates.title)
        .bind(updates.summary)
        .bind(updates.content)
        .bind(updates.cover)
        .fetch_one(&mut *conn)
        .await?;

        Ok(record)
    }
}
