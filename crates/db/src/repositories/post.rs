//! Post repository.

use std::sync::Arc;

use crate::entities::{Post, post};
use likeboard_common::{AppError, AppResult};
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait};

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a post by ID.
    pub async fn find_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: i32,
    ) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a post by ID, returning an error if not found.
    pub async fn get_by_id<C: ConnectionTrait>(&self, conn: &C, id: i32) -> AppResult<post::Model> {
        self.find_by_id(conn, id)
            .await?
            .ok_or(AppError::PostNotFound(id))
    }

    /// Look up a post using the pool.
    pub async fn get(&self, id: i32) -> AppResult<post::Model> {
        self.get_by_id(self.db.as_ref(), id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_post(id: i32, author_id: i32) -> post::Model {
        post::Model {
            id,
            author_id,
            title: "Hello".to_string(),
            body: "World".to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get_existing_post() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post(42, 1)]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let post = repo.get(42).await.unwrap();

        assert_eq!(post.author_id, 1);
    }

    #[tokio::test]
    async fn test_get_missing_post() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.get(42).await;

        assert!(matches!(result, Err(AppError::PostNotFound(42))));
    }
}
