//! Like service.
//!
//! Every mutation runs in its own transaction, committed on success and
//! rolled back on any error.

use likeboard_common::{AppError, AppResult, LikeScope};
use likeboard_db::{
    entities::like,
    repositories::{LikeRepository, PostRepository},
};
use sea_orm::{DatabaseTransaction, Set};
use serde::Serialize;

/// Maximum page size when listing likes.
pub const MAX_LIST_LIMIT: u64 = 100;

/// Likes on a post.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostLikes {
    pub post_id: i32,
    pub count: u64,
    pub likes: Vec<like::Model>,
}

/// Like service for business logic.
#[derive(Clone)]
pub struct LikeService {
    like_repo: LikeRepository,
    post_repo: PostRepository,
    scope: LikeScope,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub const fn new(like_repo: LikeRepository, post_repo: PostRepository, scope: LikeScope) -> Self {
        Self {
            like_repo,
            post_repo,
            scope,
        }
    }

    /// Like a post on behalf of `user_id`.
    pub async fn like(&self, user_id: i32, post_id: i32) -> AppResult<like::Model> {
        let txn = self.like_repo.begin().await?;
        let result = self.like_in(&txn, user_id, post_id).await;
        finish(txn, result).await
    }

    async fn like_in(
        &self,
        txn: &DatabaseTransaction,
        user_id: i32,
        post_id: i32,
    ) -> AppResult<like::Model> {
        let post = self.post_repo.get_by_id(txn, post_id).await?;

        if post.author_id == user_id {
            return Err(AppError::BadRequest(
                "You cannot like your own post.".to_string(),
            ));
        }

        let existing = match self.scope {
            LikeScope::Post => self.like_repo.find_by_post(txn, post_id).await?,
            LikeScope::UserPost => {
                self.like_repo
                    .find_by_user_and_post(txn, user_id, post_id)
                    .await?
            }
        };
        if existing.is_some() {
            return Err(self.already_liked(post_id));
        }

        let model = like::ActiveModel {
            user_id: Set(user_id),
            post_id: Set(post_id),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        let created = self
            .like_repo
            .insert(txn, model)
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => self.already_liked(post_id),
                other => other,
            })?;

        tracing::info!(user_id, post_id, like_id = created.id, "Post liked");
        Ok(created)
    }

    /// Remove a like from a post on behalf of `user_id`.
    ///
    /// Under [`LikeScope::Post`] the post's single like is removed and only
    /// the post's author may do so. Under [`LikeScope::UserPost`] the
    /// caller's own like is removed.
    ///
    /// The author-only rule therefore depends on the scope: with
    /// [`LikeScope::UserPost`] there is no author check, and a caller can only
    /// ever remove a like they created.
    pub async fn unlike(&self, user_id: i32, post_id: i32) -> AppResult<like::Model> {
        let txn = self.like_repo.begin().await?;
        let result = self.unlike_in(&txn, user_id, post_id).await;
        finish(txn, result).await
    }

    async fn unlike_in(
        &self,
        txn: &DatabaseTransaction,
        user_id: i32,
        post_id: i32,
    ) -> AppResult<like::Model> {
        let post = self.post_repo.get_by_id(txn, post_id).await?;

        let like = match self.scope {
            LikeScope::Post => {
                let like = self
                    .like_repo
                    .find_by_post(txn, post_id)
                    .await?
                    .ok_or_else(not_liked)?;
                if post.author_id != user_id {
                    return Err(AppError::Forbidden(
                        "Unauthorized: User is not the author of the post".to_string(),
                    ));
                }
                like
            }
            LikeScope::UserPost => self
                .like_repo
                .find_by_user_and_post(txn, user_id, post_id)
                .await?
                .ok_or_else(not_liked)?,
        };

        self.like_repo.delete(txn, like.id).await?;

        tracing::info!(user_id, post_id, like_id = like.id, "Post unliked");
        Ok(like)
    }

    /// List likes on a post, newest first.
    pub async fn likes_for_post(
        &self,
        post_id: i32,
        limit: u64,
        until_id: Option<i32>,
    ) -> AppResult<PostLikes> {
        self.post_repo.get(post_id).await?;

        let limit = limit.clamp(1, MAX_LIST_LIMIT);
        let likes = self
            .like_repo
            .find_by_post_paginated(post_id, limit, until_id)
            .await?;
        let count = self.like_repo.count_by_post(post_id).await?;

        Ok(PostLikes {
            post_id,
            count,
            likes,
        })
    }

    fn already_liked(&self, post_id: i32) -> AppError {
        match self.scope {
            LikeScope::Post => {
                AppError::Conflict(format!("Post with ID {post_id} has already been liked"))
            }
            LikeScope::UserPost => AppError::Conflict("You have already liked this post".to_string()),
        }
    }
}

fn not_liked() -> AppError {
    AppError::NotFound("User has not liked this post".to_string())
}

/// Commit on success, roll back on failure.
async fn finish<T>(txn: DatabaseTransaction, result: AppResult<T>) -> AppResult<T> {
    match result {
        Ok(value) => {
            txn.commit()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            Ok(value)
        }
        Err(err) => {
            if let Err(e) = txn.rollback().await {
                tracing::warn!(error = %e, "Failed to roll back transaction");
            }
            Err(err)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use likeboard_db::test_utils::TestDatabase;

    const AUTHOR: i32 = 1;
    const BOB: i32 = 2;
    const CAROL: i32 = 3;
    const POST: i32 = 42;

    /// Users 1..=3, post 42 authored by user 1.
    async fn setup(scope: LikeScope) -> (TestDatabase, LikeService) {
        let db = TestDatabase::with_scope(scope).await.unwrap();
        db.insert_user(AUTHOR, "author").await.unwrap();
        db.insert_user(BOB, "bob").await.unwrap();
        db.insert_user(CAROL, "carol").await.unwrap();
        db.insert_post(POST, AUTHOR).await.unwrap();

        let service = LikeService::new(
            LikeRepository::new(db.connection()),
            PostRepository::new(db.connection()),
            scope,
        );
        (db, service)
    }

    #[tokio::test]
    async fn test_like_creates_single_row() {
        let (db, service) = setup(LikeScope::Post).await;

        let like = service.like(BOB, POST).await.unwrap();

        assert_eq!(like.user_id, BOB);
        assert_eq!(like.post_id, POST);
        let likes = db.likes().await.unwrap();
        assert_eq!(likes.len(), 1);
        assert_eq!(likes[0].id, like.id);
    }

    #[tokio::test]
    async fn test_like_own_post_rejected() {
        let (db, service) = setup(LikeScope::Post).await;

        let result = service.like(AUTHOR, POST).await;

        match result {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "You cannot like your own post."),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(db.count_likes().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_like_missing_post() {
        let (db, service) = setup(LikeScope::Post).await;

        let result = service.like(BOB, 999).await;

        assert!(matches!(result, Err(AppError::PostNotFound(999))));
        assert_eq!(db.count_likes().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_second_like_on_post_conflicts() {
        let (db, service) = setup(LikeScope::Post).await;
        let first = service.like(BOB, POST).await.unwrap();

        let by_other = service.like(CAROL, POST).await;
        let by_same = service.like(BOB, POST).await;

        assert!(matches!(by_other, Err(AppError::Conflict(_))));
        assert!(matches!(by_same, Err(AppError::Conflict(_))));
        let likes = db.likes().await.unwrap();
        assert_eq!(likes, vec![first]);
    }

    #[tokio::test]
    async fn test_store_unique_violation_maps_to_conflict() {
        // Store enforces one like per post while the service only checks the
        // caller's own like, so the insert is the first thing to see the clash.
        let (db, _) = setup(LikeScope::Post).await;
        let first = db.insert_like(BOB, POST).await.unwrap();
        let service = LikeService::new(
            LikeRepository::new(db.connection()),
            PostRepository::new(db.connection()),
            LikeScope::UserPost,
        );

        let result = service.like(CAROL, POST).await;

        match result {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "You have already liked this post"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(db.likes().await.unwrap(), vec![first]);
    }

    #[tokio::test]
    async fn test_unlike_by_author_removes_like() {
        let (db, service) = setup(LikeScope::Post).await;
        service.like(BOB, POST).await.unwrap();

        let removed = service.unlike(AUTHOR, POST).await.unwrap();

        assert_eq!(removed.user_id, BOB);
        assert_eq!(db.count_likes().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unlike_by_non_author_forbidden() {
        let (db, service) = setup(LikeScope::Post).await;
        service.like(BOB, POST).await.unwrap();

        let result = service.unlike(BOB, POST).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
        assert_eq!(db.count_likes().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unlike_without_like_not_found() {
        let (_db, service) = setup(LikeScope::Post).await;

        let result = service.unlike(AUTHOR, POST).await;

        match result {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "User has not liked this post"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unlike_missing_post() {
        let (_db, service) = setup(LikeScope::Post).await;

        let result = service.unlike(AUTHOR, 999).await;

        assert!(matches!(result, Err(AppError::PostNotFound(999))));
    }

    #[tokio::test]
    async fn test_like_unlike_scenario() {
        let (db, service) = setup(LikeScope::Post).await;

        service.like(BOB, POST).await.unwrap();
        service.unlike(AUTHOR, POST).await.unwrap();
        let again = service.unlike(BOB, POST).await;

        assert!(matches!(again, Err(AppError::NotFound(_))));
        assert_eq!(db.count_likes().await.unwrap(), 0);

        // The post can be liked again once its like is gone.
        service.like(CAROL, POST).await.unwrap();
        assert_eq!(db.count_likes().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_user_post_scope_allows_likes_from_different_users() {
        let (db, service) = setup(LikeScope::UserPost).await;

        service.like(BOB, POST).await.unwrap();
        service.like(CAROL, POST).await.unwrap();
        let duplicate = service.like(BOB, POST).await;

        assert!(matches!(duplicate, Err(AppError::Conflict(_))));
        assert_eq!(db.count_likes().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_user_post_scope_unlike_removes_own_like() {
        let (db, service) = setup(LikeScope::UserPost).await;
        service.like(BOB, POST).await.unwrap();
        service.like(CAROL, POST).await.unwrap();

        let removed = service.unlike(BOB, POST).await.unwrap();
        let again = service.unlike(BOB, POST).await;

        assert_eq!(removed.user_id, BOB);
        assert!(matches!(again, Err(AppError::NotFound(_))));
        let likes = db.likes().await.unwrap();
        assert_eq!(likes.len(), 1);
        assert_eq!(likes[0].user_id, CAROL);
    }

    #[tokio::test]
    async fn test_user_post_scope_still_forbids_self_like() {
        let (_db, service) = setup(LikeScope::UserPost).await;

        let result = service.like(AUTHOR, POST).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_likes_for_post() {
        let (_db, service) = setup(LikeScope::UserPost).await;
        let first = service.like(BOB, POST).await.unwrap();
        let second = service.like(CAROL, POST).await.unwrap();

        let page = service.likes_for_post(POST, 10, None).await.unwrap();
        assert_eq!(page.count, 2);
        assert_eq!(page.likes[0].id, second.id);

        let older = service
            .likes_for_post(POST, 10, Some(second.id))
            .await
            .unwrap();
        assert_eq!(older.likes.len(), 1);
        assert_eq!(older.likes[0].id, first.id);
    }

    #[tokio::test]
    async fn test_likes_for_missing_post() {
        let (_db, service) = setup(LikeScope::Post).await;

        let result = service.likes_for_post(999, 10, None).await;

        assert!(matches!(result, Err(AppError::PostNotFound(999))));
    }
}
