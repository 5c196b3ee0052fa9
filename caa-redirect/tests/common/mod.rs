//! Common test utilities - CaaTest harness for end-to-end testing

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use caa_redirect::{Config, Server};
use reqwest::{redirect, Client};
use tokio::task::JoinHandle;

/// Release with a front, a back and one untagged image
pub const RELEASE: &str = "353710ec-1509-4df9-8ce2-9bd5011e3b80";
/// Release with images but no front or back flag
pub const UNTAGGED: &str = "98f08de3-c91c-4180-a961-06c205e63669";
/// Release known to the catalog with no images
pub const EMPTY: &str = "0a1b2c3d-0000-4000-8000-000000000001";

pub const FRONT_ID: i64 = 100000001;
pub const BACK_ID: i64 = 999999999;
pub const UNTAGGED_ID: i64 = 555555555;

/// Test harness that spawns a real redirect server on a random port
pub struct CaaTest {
    pub addr: SocketAddr,
    pub client: Client,
    server: Arc<Server>,
    _handle: JoinHandle<()>,
}

impl CaaTest {
    /// Start a new test server instance
    pub async fn start() -> Result<Self> {
        Self::start_with(Config::default()).await
    }

    /// Start a server from a base config; bind address and database are
    /// always replaced with a random port and an in-memory catalog
    pub async fn start_with(config: Config) -> Result<Self> {
        // Find a random available port
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        drop(listener);

        let config = Config {
            bind_addr: addr,
            db_path: None, // In-memory for tests
            ..config
        };

        let server = Arc::new(Server::new(config).await?);
        let server_clone = server.clone();

        // Spawn the server in a background task
        let handle = tokio::spawn(async move {
            if let Err(e) = server_clone.run().await {
                eprintln!("Server error: {}", e);
            }
        });

        // Redirects are asserted on, never followed
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .redirect(redirect::Policy::none())
            .build()?;

        // Poll until server is ready (max 2 seconds)
        let mut ready = false;
        for _ in 0..20 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            if client
                .get(format!("http://{}/health", addr))
                .send()
                .await
                .is_ok()
            {
                ready = true;
                break;
            }
        }

        if !ready {
            panic!("Server failed to start within 2 seconds");
        }

        Ok(Self {
            addr,
            client,
            server,
            _handle: handle,
        })
    }

    /// Start a server with the standard fixture catalog loaded
    pub async fn start_seeded() -> Result<Self> {
        let caa = Self::start().await?;
        caa.seed_fixture().await?;
        Ok(caa)
    }

    /// Get the base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(format!("{}{}", self.base_url(), path))
            .send()
            .await?)
    }

    /// Get direct access to the database pool for test setup
    pub fn pool(&self) -> sqlx::SqlitePool {
        self.server.db().pool().clone()
    }

    /// Shutdown the server gracefully
    pub fn shutdown(&self) {
        self.server.shutdown();
    }

    /// Create a release and return its row id
    pub async fn create_release(&self, gid: &str) -> Result<i64> {
        let result = sqlx::query("INSERT INTO release (gid) VALUES (?)")
            .bind(gid)
            .execute(&self.pool())
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Attach an image to a release row
    pub async fn create_cover_art(
        &self,
        release_id: i64,
        id: i64,
        is_front: bool,
        is_back: bool,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO cover_art (id, release, is_front, is_back, ordering)
             VALUES (?, ?, ?, ?, (SELECT COUNT(*) + 1 FROM cover_art WHERE release = ?))",
        )
        .bind(id)
        .bind(release_id)
        .bind(is_front)
        .bind(is_back)
        .bind(release_id)
        .execute(&self.pool())
        .await?;
        Ok(())
    }

    /// Load the standard fixture releases
    pub async fn seed_fixture(&self) -> Result<()> {
        let release = self.create_release(RELEASE).await?;
        self.create_cover_art(release, FRONT_ID, true, false).await?;
        self.create_cover_art(release, BACK_ID, false, true).await?;

        let untagged = self.create_release(UNTAGGED).await?;
        self.create_cover_art(untagged, UNTAGGED_ID, false, false).await?;

        self.create_release(EMPTY).await?;
        Ok(())
    }

    /// Assert that `src` answers with a temporary redirect to `dst`
    pub async fn verify_redirect(&self, src: &str, dst: &str) {
        let resp = self.get(src).await.expect("request failed");
        assert_eq!(resp.status(), 307, "status for {}", src);
        assert_eq!(
            resp.headers()["location"].to_str().unwrap(),
            dst,
            "location for {}",
            src
        );
        let body = resp.text().await.expect("body");
        assert_eq!(body, format!("See: {}\n", dst), "body for {}", src);
    }

    /// Fetch `src` and return status plus body text
    pub async fn get_text(&self, src: &str) -> (u16, String) {
        let resp = self.get(src).await.expect("request failed");
        let status = resp.status().as_u16();
        (status, resp.text().await.expect("body"))
    }
}

impl Drop for CaaTest {
    fn drop(&mut self) {
        self.server.shutdown();
    }
}
