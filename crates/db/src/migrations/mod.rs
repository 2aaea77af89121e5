//! Database migrations.
//!
//! Schema migrations for the database, plus the like-scope switch that is
//! applied on top of them at startup.

#![allow(missing_docs)]

use likeboard_common::LikeScope;
use sea_orm::DatabaseConnection;
use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users_table;
mod m20250101_000002_create_posts_table;
mod m20250101_000003_create_likes_table;

/// Unique index enforcing one like per post.
pub const LIKES_POST_UNIQUE_INDEX: &str = "idx_likes_post_id_unique";

/// Plain lookup index on `likes.post_id`, used when likes are per user.
pub const LIKES_POST_INDEX: &str = "idx_likes_post_id";

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users_table::Migration),
            Box::new(m20250101_000002_create_posts_table::Migration),
            Box::new(m20250101_000003_create_likes_table::Migration),
        ]
    }
}

#[derive(Iden)]
pub(crate) enum Likes {
    Table,
    Id,
    UserId,
    PostId,
    CreatedAt,
}

/// Bring the likes indexes in line with the configured [`LikeScope`].
///
/// Idempotent. Switching to [`LikeScope::Post`] fails if some post already
/// has more than one like.
pub async fn apply_like_scope(db: &DatabaseConnection, scope: LikeScope) -> Result<(), DbErr> {
    let manager = SchemaManager::new(db);
    let table = Likes::Table.to_string();

    let (keep, drop, unique) = match scope {
        LikeScope::Post => (LIKES_POST_UNIQUE_INDEX, LIKES_POST_INDEX, true),
        LikeScope::UserPost => (LIKES_POST_INDEX, LIKES_POST_UNIQUE_INDEX, false),
    };

    if manager.has_index(&table, drop).await? {
        manager
            .drop_index(Index::drop().name(drop).table(Likes::Table).to_owned())
            .await?;
    }

    if !manager.has_index(&table, keep).await? {
        let mut index = Index::create();
        index.name(keep).table(Likes::Table).col(Likes::PostId);
        if unique {
            index.unique();
        }
        manager.create_index(index.to_owned()).await?;
    }

    tracing::info!(?scope, index = keep, "Applied like scope");
    Ok(())
}
