//! Like repository.

use std::sync::Arc;

use crate::entities::{Like, like};
use likeboard_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr,
    TransactionTrait,
};

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Open a transaction on the underlying pool.
    pub async fn begin(&self) -> AppResult<DatabaseTransaction> {
        self.db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the like on a post, if any.
    ///
    /// Under the per-post scope there is at most one.
    pub async fn find_by_post<C: ConnectionTrait>(
        &self,
        conn: &C,
        post_id: i32,
    ) -> AppResult<Option<like::Model>> {
        Like::find()
            .filter(like::Column::PostId.eq(post_id))
            .order_by_asc(like::Column::Id)
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a like by user and post.
    pub async fn find_by_user_and_post<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i32,
        post_id: i32,
    ) -> AppResult<Option<like::Model>> {
        Like::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::PostId.eq(post_id))
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a like.
    ///
    /// Constraint violations are reported as client errors: a duplicate
    /// becomes `Conflict`, a dangling user or post becomes `NotFound`.
    pub async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: like::ActiveModel,
    ) -> AppResult<like::Model> {
        model.insert(conn).await.map_err(map_write_error)
    }

    /// Delete a like by ID.
    pub async fn delete<C: ConnectionTrait>(&self, conn: &C, id: i32) -> AppResult<()> {
        let result = Like::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Like {id} not found")));
        }
        Ok(())
    }

    /// Get likes on a post (paginated, newest first).
    pub async fn find_by_post_paginated(
        &self,
        post_id: i32,
        limit: u64,
        until_id: Option<i32>,
    ) -> AppResult<Vec<like::Model>> {
        let mut query = Like::find()
            .filter(like::Column::PostId.eq(post_id))
            .order_by_desc(like::Column::Id)
            .limit(limit);

        if let Some(until) = until_id {
            query = query.filter(like::Column::Id.lt(until));
        }

        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count likes on a post.
    pub async fn count_by_post(&self, post_id: i32) -> AppResult<u64> {
        Like::find()
            .filter(like::Column::PostId.eq(post_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

fn map_write_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!(%detail, "Like insert hit a unique constraint");
            AppError::Conflict("Post has already been liked".to_string())
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            tracing::debug!(%detail, "Like insert references a missing row");
            AppError::NotFound("Referenced user or post no longer exists".to_string())
        }
        _ => AppError::Database(err.to_string()),
    }
}
