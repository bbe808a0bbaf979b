//! Test utilities: an in-memory `PostStore` and request helpers for driving
//! the router without a database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::app::{app, AppState};
use crate::auth::{generate_jwt, Claims};
use crate::config::AppConfig;
use crate::database::models::{AuthorView, BlogView, NewPost, Page, PostUpdate};
use crate::database::{DatabaseError, PostStore};

pub const TEST_SECRET: &str = "test-secret";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPost {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
}

/// Posts and user names held in memory; listing orders by id like `PgPostStore`
#[derive(Default)]
pub struct MemoryPostStore {
    posts: Mutex<Vec<StoredPost>>,
    users: Mutex<HashMap<Uuid, Option<String>>>,
    failing: AtomicBool,
}

impl MemoryPostStore {
    pub fn add_user(&self, name: Option<&str>) -> Uuid {
        let id = Uuid::new_v4();
        self.users.lock().unwrap().insert(id, name.map(str::to_string));
        id
    }

    pub fn posts(&self) -> Vec<StoredPost> {
        self.posts.lock().unwrap().clone()
    }

    pub fn post(&self, id: Uuid) -> Option<StoredPost> {
        self.posts().into_iter().find(|p| p.id == id)
    }

    /// Make every subsequent call fail like a lost connection
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), DatabaseError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }

    fn view(&self, post: &StoredPost) -> BlogView {
        let name = self.users.lock().unwrap().get(&post.author_id).cloned().flatten();
        BlogView {
            id: post.id,
            title: post.title.clone(),
            content: post.content.clone(),
            author: AuthorView { name },
        }
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn create(&self, author_id: Uuid, post: &NewPost) -> Result<Uuid, DatabaseError> {
        self.check()?;
        let id = Uuid::new_v4();
        self.posts.lock().unwrap().push(StoredPost {
            id,
            title: post.title.clone(),
            content: post.content.clone(),
            author_id,
        });
        Ok(id)
    }

    async fn update_owned(&self, author_id: Uuid, update: &PostUpdate) -> Result<bool, DatabaseError> {
        self.check()?;
        let mut posts = self.posts.lock().unwrap();
        let Some(post) = posts
            .iter_mut()
            .find(|p| p.id == update.id && p.author_id == author_id)
        else {
            return Ok(false);
        };
        if let Some(title) = &update.title {
            post.title = title.clone();
        }
        if let Some(content) = &update.content {
            post.content = content.clone();
        }
        Ok(true)
    }

    async fn list(&self, page: Page) -> Result<Vec<BlogView>, DatabaseError> {
        self.check()?;
        let mut posts = self.posts();
        posts.sort_by_key(|p| p.id);
        let skipped = posts.iter().skip(page.offset as usize);
        let taken: Vec<&StoredPost> = match page.limit {
            Some(limit) => skipped.take(limit as usize).collect(),
            None => skipped.collect(),
        };
        Ok(taken.into_iter().map(|p| self.view(p)).collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<BlogView>, DatabaseError> {
        self.check()?;
        Ok(self.post(id).map(|p| self.view(&p)))
    }

    async fn delete_owned(&self, author_id: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        self.check()?;
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| !(p.id == id && p.author_id == author_id));
        Ok(posts.len() < before)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.check()
    }
}

pub fn test_config() -> AppConfig {
    AppConfig::from_lookup(|name| match name {
        "DATABASE_URL" => Some("postgres://localhost/blog_test".to_string()),
        "JWT_SECRET" => Some(TEST_SECRET.to_string()),
        _ => None,
    })
    .expect("test config")
}

/// Router wired to a fresh in-memory store
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryPostStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let store = Arc::new(MemoryPostStore::default());
        let state = AppState::new(config, store.clone());
        Self {
            router: app(state),
            store,
        }
    }

    /// Register a user and return a valid bearer token for them
    pub fn login(&self, name: Option<&str>) -> (Uuid, String) {
        let id = self.store.add_user(name);
        (id, token_for(id))
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}

pub fn token_for(id: Uuid) -> String {
    generate_jwt(&Claims::new(id, Some(1)), TEST_SECRET).unwrap()
}
