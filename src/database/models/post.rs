use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Validated input for a new post. The author comes from the acting identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
}

/// Validated update; `None` fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostUpdate {
    pub id: Uuid,
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Window over the bulk listing. `limit: None` returns every post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<i64>,
    pub offset: i64,
}

/// Public projection of a post joined with its author's name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogView {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: AuthorView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorView {
    pub name: Option<String>,
}

/// Row shape of the post/author join
#[derive(Debug, FromRow)]
pub(crate) struct BlogRow {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_name: Option<String>,
}

impl From<BlogRow> for BlogView {
    fn from(row: BlogRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            author: AuthorView {
                name: row.author_name,
            },
        }
    }
}
