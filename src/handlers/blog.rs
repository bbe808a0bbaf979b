use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::Page;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::validation::{validate_create_post, validate_update_post};

const NOT_FOUND: &str = "Blog not found";

#[derive(Debug, Deserialize)]
pub struct BulkQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// POST / - create a post owned by the acting identity
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    tracing::debug!("Creating blog for user {}", user.id);

    let post = validate_create_post(&parse_body(body)?)
        .into_result()
        .map_err(|reasons| {
            tracing::debug!("Create rejected: {}", reasons.join("; "));
            ApiError::invalid_input()
        })?;

    let id = state.posts.create(user.id, &post).await?;
    tracing::info!("Blog {} created by {}", id, user.id);

    Ok(Json(json!({ "id": id })))
}

/// PUT / - update title and/or content of a post the caller owns
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let update = validate_update_post(&parse_body(body)?)
        .into_result()
        .map_err(|reasons| {
            tracing::debug!("Update rejected: {}", reasons.join("; "));
            ApiError::invalid_input()
        })?;

    if !state.posts.update_owned(user.id, &update).await? {
        tracing::debug!("Blog {} not updated: missing or not owned by {}", update.id, user.id);
        return Err(ApiError::not_found(NOT_FOUND));
    }

    Ok(Json(json!({ "message": "Blog post successfully updated" })))
}

/// GET /bulk - every post in projected shape, optionally paged with `?limit=&offset=`
pub async fn bulk(
    State(state): State<AppState>,
    query: Result<Query<BulkQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query.map_err(|_| ApiError::invalid_input())?;
    let page = page_from_query(&query, state.config.api.max_page_size)?;

    let blogs = state.posts.list(page).await?;
    Ok(Json(json!({ "blogs": blogs })))
}

/// GET /:id - a single post in projected shape
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;

    let blog = state
        .posts
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    Ok(Json(json!({ "blog": blog })))
}

/// DELETE /:id/delete - remove a post the caller owns
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;

    if !state.posts.delete_owned(user.id, id).await? {
        tracing::debug!("Blog {} not deleted: missing or not owned by {}", id, user.id);
        return Err(ApiError::not_found(NOT_FOUND));
    }

    tracing::info!("Blog {} deleted by {}", id, user.id);
    Ok(Json(json!({ "message": "Blog deleted successfully" })))
}

fn parse_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    body.map(|Json(value)| value).map_err(|e| {
        tracing::debug!("Unreadable request body: {}", e);
        ApiError::invalid_input()
    })
}

// An id that can never match a stored post is reported like any other missing post
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(NOT_FOUND))
}

fn page_from_query(query: &BulkQuery, max_page_size: i64) -> Result<Page, ApiError> {
    let offset = query.offset.unwrap_or(0);
    if offset < 0 || query.limit.is_some_and(|limit| limit < 0) {
        return Err(ApiError::invalid_input());
    }

    Ok(Page {
        limit: query.limit.map(|limit| limit.min(max_page_size)),
        offset,
    })
}
