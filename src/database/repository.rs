use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::post::{BlogRow, BlogView, NewPost, Page, PostUpdate};

/// Post persistence. Update and delete are scoped to the author inside a
/// single statement, so ownership is never checked separately from the write.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Insert a post owned by `author_id` and return its id.
    async fn create(&self, author_id: Uuid, post: &NewPost) -> Result<Uuid, DatabaseError>;

    /// Apply `update` if the post exists and belongs to `author_id`.
    /// Returns `false` when no row matched.
    async fn update_owned(&self, author_id: Uuid, update: &PostUpdate) -> Result<bool, DatabaseError>;

    async fn list(&self, page: Page) -> Result<Vec<BlogView>, DatabaseError>;

    async fn find(&self, id: Uuid) -> Result<Option<BlogView>, DatabaseError>;

    /// Delete the post if it belongs to `author_id`. Returns `false` when no row matched.
    async fn delete_owned(&self, author_id: Uuid, id: Uuid) -> Result<bool, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;
}

/// PostgreSQL implementation over the shared pool
#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const BLOG_VIEW_SELECT: &str = r#"
    SELECT p.id, p.title, p.content, u.name AS author_name
    FROM posts p
    JOIN users u ON u.id = p.author_id
"#;

#[async_trait]
impl PostStore for PgPostStore {
    async fn create(&self, author_id: Uuid, post: &NewPost) -> Result<Uuid, DatabaseError> {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO posts (id, title, content, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&post.title)
        .bind(&post.content)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update_owned(&self, author_id: Uuid, update: &PostUpdate) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET title = COALESCE($3, title),
                content = COALESCE($4, content)
            WHERE id = $1 AND author_id = $2
            "#,
        )
        .bind(update.id)
        .bind(author_id)
        .bind(update.title.as_deref())
        .bind(update.content.as_deref())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, page: Page) -> Result<Vec<BlogView>, DatabaseError> {
        // LIMIT NULL means no limit
        let sql = format!("{BLOG_VIEW_SELECT} ORDER BY p.id LIMIT $1 OFFSET $2");
        let rows = sqlx::query_as::<_, BlogRow>(&sql)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(BlogView::from).collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<BlogView>, DatabaseError> {
        let sql = format!("{BLOG_VIEW_SELECT} WHERE p.id = $1");
        let row = sqlx::query_as::<_, BlogRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(BlogView::from))
    }

    async fn delete_owned(&self, author_id: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(author_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
