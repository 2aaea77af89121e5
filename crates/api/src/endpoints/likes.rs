//! Like endpoints.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use likeboard_common::AppResult;
use likeboard_core::PostLikes;
use likeboard_db::entities::like;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{ApiPath, ApiQuery, AuthUser},
    middleware::AppState,
    response::MessageResponse,
};

/// A single like.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub id: i32,
    pub user_id: i32,
    pub created_at: String,
}

impl From<like::Model> for LikeResponse {
    fn from(like: like::Model) -> Self {
        Self {
            id: like.id,
            user_id: like.user_id,
            created_at: like.created_at.to_rfc3339(),
        }
    }
}

/// Likes on a post.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostLikesResponse {
    pub post_id: i32,
    pub count: u64,
    pub likes: Vec<LikeResponse>,
}

impl From<PostLikes> for PostLikesResponse {
    fn from(page: PostLikes) -> Self {
        Self {
            post_id: page.post_id,
            count: page.count,
            likes: page.likes.into_iter().map(Into::into).collect(),
        }
    }
}

/// List likes query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLikesQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<i32>,
}

const fn default_limit() -> u64 {
    10
}

/// Like a post.
async fn like(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    ApiPath(post_id): ApiPath<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.like_service.like(caller.user_id, post_id).await?;

    Ok(Json(MessageResponse::new(format!(
        "Post with ID {post_id} was liked"
    ))))
}

/// Remove a like from a post.
async fn unlike(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    ApiPath(post_id): ApiPath<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.like_service.unlike(caller.user_id, post_id).await?;

    Ok(Json(MessageResponse::new(format!(
        "Post with ID {post_id} was unliked by user {}",
        caller.user_id
    ))))
}

/// List likes on a post.
async fn list(
    State(state): State<AppState>,
    ApiPath(post_id): ApiPath<i32>,
    ApiQuery(query): ApiQuery<ListLikesQuery>,
) -> AppResult<Json<PostLikesResponse>> {
    let page = state
        .like_service
        .likes_for_post(post_id, query.limit, query.until_id)
        .await?;

    Ok(Json(page.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{post_id}/like", post(like).delete(unlike))
        .route("/{post_id}/likes", get(list))
}
