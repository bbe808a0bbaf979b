//! Live-server harness: spawns the built `blog-api` binary against the
//! PostgreSQL database named by `DATABASE_URL` (a `.env` file is honoured).

#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use blog_api::auth::{generate_jwt, Claims};
use blog_api::config::AppConfig;
use blog_api::database::{service, DatabaseManager};
use reqwest::StatusCode;
use uuid::Uuid;

pub const BLOG_PREFIX: &str = "/api/v1/blog";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_blog-api"));
        cmd.env("BLOG_API_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server sees DATABASE_URL and JWT_SECRET
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn blog_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, BLOG_PREFIX, path)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let _ = dotenvy::dotenv();
    migrate().await?;
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

async fn migrate() -> Result<()> {
    let config = AppConfig::from_env()?;
    let db = DatabaseManager::connect(&config.database).await?;
    db.migrate().await?;
    db.close().await;
    Ok(())
}

/// Insert a fresh author and return their id with a signed bearer token
pub async fn author(name: Option<&str>) -> Result<(Uuid, String)> {
    let config = AppConfig::from_env()?;
    let db = DatabaseManager::connect(&config.database).await?;
    let email = format!("author-{}@example.test", Uuid::new_v4().simple());
    let user = service::create_user(db.pool(), &email, name, "password").await?;
    db.close().await;

    let token = generate_jwt(&Claims::new(user.id, Some(1)), &config.security.jwt_secret)?;
    Ok((user.id, token))
}
