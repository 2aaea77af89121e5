//! Test utilities for database operations.
//!
//! Provides a migrated in-memory SQLite database plus seeding helpers.

use std::sync::Arc;

use crate::entities::{Like, like, post, user};
use crate::migrations::{Migrator, apply_like_scope};
use chrono::Utc;
use likeboard_common::LikeScope;
use sea_orm::{
    ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, PaginatorTrait, QueryOrder, Set,
};
use sea_orm_migration::MigratorTrait;
use tracing::info;

/// In-memory SQLite URL used by tests.
pub const MEMORY_URL: &str = "sqlite::memory:";

/// A migrated, isolated test database.
pub struct TestDatabase {
    /// Database connection.
    pub conn: Arc<DatabaseConnection>,
    /// Like scope applied to the schema.
    pub scope: LikeScope,
}

impl TestDatabase {
    /// Create a test database with the default (per-post) like scope.
    pub async fn new() -> Result<Self, DbErr> {
        Self::with_scope(LikeScope::default()).await
    }

    /// Create a test database with the given like scope.
    pub async fn with_scope(scope: LikeScope) -> Result<Self, DbErr> {
        // A single pooled connection; each SQLite memory connection is its own database.
        let mut opt = ConnectOptions::new(MEMORY_URL);
        opt.max_connections(1).min_connections(1).sqlx_logging(false);

        let conn = Database::connect(opt).await?;
        Migrator::up(&conn, None).await?;
        apply_like_scope(&conn, scope).await?;

        info!(?scope, "Created in-memory test database");

        Ok(Self {
            conn: Arc::new(conn),
            scope,
        })
    }

    /// Get the database connection.
    #[must_use]
    pub fn connection(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.conn)
    }

    /// Insert a user with a fixed ID.
    pub async fn insert_user(&self, id: i32, username: &str) -> Result<user::Model, DbErr> {
        user::ActiveModel {
            id: Set(id),
            username: Set(username.to_string()),
            created_at: Set(Utc::now().into()),
        }
        .insert(self.conn.as_ref())
        .await
    }

    /// Insert a post with a fixed ID.
    pub async fn insert_post(&self, id: i32, author_id: i32) -> Result<post::Model, DbErr> {
        post::ActiveModel {
            id: Set(id),
            author_id: Set(author_id),
            title: Set(format!("Post {id}")),
            body: Set("Lorem ipsum".to_string()),
            created_at: Set(Utc::now().into()),
        }
        .insert(self.conn.as_ref())
        .await
    }

    /// Insert a like directly, bypassing business rules.
    pub async fn insert_like(&self, user_id: i32, post_id: i32) -> Result<like::Model, DbErr> {
        like::ActiveModel {
            user_id: Set(user_id),
            post_id: Set(post_id),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(self.conn.as_ref())
        .await
    }

    /// All likes, oldest first.
    pub async fn likes(&self) -> Result<Vec<like::Model>, DbErr> {
        Like::find()
            .order_by_asc(like::Column::Id)
            .all(self.conn.as_ref())
            .await
    }

    /// Number of rows in the likes table.
    pub async fn count_likes(&self) -> Result<u64, DbErr> {
        Like::find().count(self.conn.as_ref()).await
    }

    /// Delete a post, letting the store cascade to its likes.
    pub async fn delete_post(&self, post: post::Model) -> Result<(), DbErr> {
        post.delete(self.conn.as_ref()).await?;
        Ok(())
    }

    /// Delete a user, letting the store cascade to their posts and likes.
    pub async fn delete_user(&self, user: user::Model) -> Result<(), DbErr> {
        user.delete(self.conn.as_ref()).await?;
        Ok(())
    }
}
