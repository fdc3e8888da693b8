//! Post routes
//!
//! Reads are public. Create and update require a session; update is
//! further restricted to the post's author by `PostService::update`.
//! Both write endpoints take `multipart/form-data` with `title`,
//! `summary`, `content` text parts and an optional `file` cover part.

use crate::auth::{auth_middleware, AuthUser};
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiMultipart, ApiPath, ApiQuery};
use crate::services::PostService;
use crate::state::AppState;
use crate::storage::PendingUpload;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use quill_shared::{CreatePostRequest, PostListQuery, PostResponse, UpdatePostRequest};
use std::collections::HashMap;
use uuid::Uuid;

/// Create post routes
pub fn post_routes(state: &AppState) -> Router<AppState> {
    let gate = middleware::from_fn_with_state(state.clone(), auth_middleware);

    Router::new()
        .route(
            "/post",
            get(list_posts).merge(post(create_post).route_layer(gate.clone())),
        )
        .route(
            "/post/:id",
            get(get_post).merge(put(update_post).route_layer(gate)),
        )
}

/// Multipart body of a create/update request
#[derive(Debug, Default)]
struct PostForm {
    fields: HashMap<String, String>,
    cover: Option<PendingUpload>,
}

impl PostForm {
    async fn read(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = PostForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Invalid multipart data: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" | "cover" => {
                    let original_name = field.file_name().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Invalid upload: {}", e)))?;
                    // Browsers send an empty, nameless part when no file is picked
                    if let Some(original_name) = original_name.filter(|n| !n.is_empty()) {
                        if !bytes.is_empty() {
                            form.cover = Some(PendingUpload {
                                original_name,
                                bytes: bytes.to_vec(),
                            });
                        }
                    }
                }
                "title" | "summary" | "content" => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Invalid field {}: {}", name, e)))?;
                    form.fields.insert(name, text);
                }
                _ => {}
            }
        }

        Ok(form)
    }

    fn take(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    fn into_create(mut self) -> (CreatePostRequest, Option<PendingUpload>) {
        let req = CreatePostRequest {
            title: self.take("title").unwrap_or_default(),
            summary: self.take("summary").unwrap_or_default(),
            content: self.take("content").unwrap_or_default(),
        };
        (req, self.cover)
    }

    fn into_update(mut self) -> (UpdatePostRequest, Option<PendingUpload>) {
        let req = UpdatePostRequest {
            title: self.take("title"),
            summary: self.take("summary"),
            content: self.take("content"),
        };
        (req, self.cover)
    }
}

/// POST /post - Create a post as the current user
async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiMultipart(multipart): ApiMultipart,
) -> ApiResult<(StatusCode, Json<PostResponse>)> {
    let (req, cover) = PostForm::read(multipart).await?.into_create();
    let post = PostService::create(state.db(), &state.uploads, &auth, req, cover).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /post - Newest posts first
async fn list_posts(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PostListQuery>,
) -> ApiResult<Json<Vec<PostResponse>>> {
    let posts = PostService::list(state.db(), &query).await?;
    Ok(Json(posts))
}

/// GET /post/:id - A single post
async fn get_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<PostResponse>> {
    let post = PostService::get(state.db(), id).await?;
    Ok(Json(post))
}

/// PUT /post/:id - Update a post; author only
async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiMultipart(multipart): ApiMultipart,
) -> ApiResult<Json<PostResponse>> {
    let (req, cover) = PostForm::read(multipart).await?.into_update();
    let post = PostService::update(state.db(), &state.uploads, &auth, id, req, cover).await?;
    Ok(Json(post))
}
