//! Post service
//!
//! Creation, listing and author-only updates. Updates lock the post row,
//! check ownership and write within a single transaction, and only store
//! a new cover once the caller is known to be the author.

use crate::auth::{authorize, AuthUser};
use crate::error::ApiError;
use crate::repositories::{CreatePost, PostRecord, PostRepository, UpdatePost, UserRepository};
use crate::storage::{PendingUpload, UploadStore};
use quill_shared::validation::validate_not_blank;
use quill_shared::{
    AuthError, AuthorSummary, CreatePostRequest, PostListQuery, PostResponse, UpdatePostRequest,
};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

impl From<PostRecord> for PostResponse {
    fn from(record: PostRecord) -> Self {
        PostResponse {
            id: record.id,
            title: record.title,
            summary: record.summary,
            content: record.content,
            cover: record.cover,
            author: AuthorSummary {
                id: record.author_id,
                user_name: record.author_name,
            },
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

fn record_write(action: &'static str) {
    metrics::counter!("quill_posts_written_total", "action" => action).increment(1);
}

/// Best-effort removal of a stored cover no row refers to
async fn discard_upload(uploads: &UploadStore, cover: Option<&str>) {
    if let Some(path) = cover {
        if let Err(e) = uploads.remove(path).await {
            warn!(path = %path, error = %e, "Failed to remove orphaned upload");
        }
    }
}

/// Post service for business logic
pub struct PostService;

impl PostService {
    /// Create a post authored by `author`
    pub async fn create(
        pool: &PgPool,
        uploads: &UploadStore,
        author: &AuthUser,
        req: CreatePostRequest,
        cover: Option<PendingUpload>,
    ) -> Result<PostResponse, ApiError> {
        req.validate()?;
        validate_not_blank("Title", &req.title).map_err(ApiError::Validation)?;

        // A well-signed token can outlive its user row (e.g. a reset database)
        if UserRepository::find_by_id(pool, author.user_id).await?.is_none() {
            warn!(user_id = %author.user_id, "Token for unknown user");
            return Err(AuthError::InvalidToken.into());
        }

        let cover = match cover {
            Some(upload) => Some(uploads.persist(&upload).await?),
            None => None,
        };

        let created = PostRepository::create(
            pool,
            CreatePost {
                author_id: author.user_id,
                title: req.title,
                summary: req.summary,
                content: req.content,
                cover: cover.clone(),
            },
        )
        .await;

        let record = match created {
            Ok(record) => record,
            Err(e) => {
                discard_upload(uploads, cover.as_deref()).await;
                return Err(e.into());
            }
        };

        info!(post_id = %record.id, author_id = %record.author_id, "Post created");
        record_write("create");

        Ok(record.into())
    }

    /// Newest posts first
    pub async fn list(pool: &PgPool, query: &PostListQuery) -> Result<Vec<PostResponse>, ApiError> {
        let (limit, offset) = query.normalize();
        let records = PostRepository::list_recent(pool, limit, offset).await?;
        Ok(records.into_iter().map(PostResponse::from).collect())
    }

    /// Fetch a single post
    pub async fn get(pool: &PgPool, id: Uuid) -> Result<PostResponse, ApiError> {
        PostRepository::find_by_id(pool, id)
            .await?
            .map(PostResponse::from)
            .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))
    }

    /// Update a post on behalf of `editor`, who must be its author
    pub async fn update(
        pool: &PgPool,
        uploads: &UploadStore,
        editor: &AuthUser,
        id: Uuid,
        req: UpdatePostRequest,
        cover: Option<PendingUpload>,
    ) -> Result<PostResponse, ApiError> {
        req.validate()?;
        if let Some(title) = &req.title {
            validate_not_blank("Title", title).map_err(ApiError::Validation)?;
        }

        let mut tx = pool.begin().await?;

        let existing = PostRepository::find_by_id_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

        if let Err(e) = authorize(editor, &existing) {
            warn!(
                post_id = %id,
                author_id = %existing.author_id,
                editor_id = %editor.user_id,
                "Rejected update by non-author"
            );
            return Err(e.into());
        }

        let cover = match cover {
            Some(upload) => Some(uploads.persist(&upload).await?),
            None => None,
        };

        let written = async {
            let record = PostRepository::update(
                &mut *tx,
                id,
                UpdatePost {
                    title: req.title,
                    summary: req.summary,
                    content: req.content,
                    cover: cover.clone(),
                },
            )
            .await?;
            tx.commit().await?;
            Ok::<_, ApiError>(record)
        }
        .await;

        let record = match written {
            Ok(record) => record,
            Err(e) => {
                discard_upload(uploads, cover.as_deref()).await;
                return Err(e);
            }
        };

        // The replaced cover is unreferenced once the new row is committed
        if cover.is_some() {
            discard_upload(uploads, existing.cover.as_deref()).await;
        }

        info!(post_id = %record.id, "Post updated");
        record_write("update");

        Ok(record.into())
    }
}
