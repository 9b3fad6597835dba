#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use uuid::Uuid;

use projector_api::app::{router, AppState};
use projector_api::auth::issue_token;
use projector_api::client::HttpProjectClient;
use projector_api::config::AppConfig;
use projector_api::database::MemoryProjectStore;

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub config: AppConfig,
}

impl TestServer {
    /// Serve the router in-process on a free port, backed by an empty in-memory store.
    /// The server task lives on the calling test's runtime.
    async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let config = AppConfig::development();
        let app = router(AppState::new(Arc::new(MemoryProjectStore::new()), &config), &config);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind port {}", port))?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { port, base_url, config })
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
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn token_for(&self, user: Uuid) -> Result<String> {
        Ok(issue_token(&self.config.security, user, "tester")?)
    }

    /// Typed client acting as `user`
    pub fn client_for(&self, user: Uuid) -> Result<HttpProjectClient> {
        Ok(HttpProjectClient::new(&self.base_url, Some(self.token_for(user)?))?)
    }
}

pub async fn start_server() -> Result<TestServer> {
    let server = TestServer::spawn().await?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}
