#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use comment_board_api::config::AppConfig;
use comment_board_api::database::MemoryStore;
use comment_board_api::AppState;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: Client,
}

impl TestServer {
    /// Serve the router over an empty in-memory store on a free port.
    ///
    /// The server task lives on the calling test's runtime, so every test
    /// gets its own isolated instance.
    async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let state = AppState::new(AppConfig::for_tests(), Arc::new(MemoryStore::new()));
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;

        tokio::spawn(async move {
            let _ = axum::serve(listener, comment_board_api::app(state)).await;
        });

        Ok(Self {
            port,
            base_url,
            client: Client::new(),
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn register(&self, email: &str, password: &str, role: Option<&str>) -> Result<reqwest::Response> {
        let mut body = json!({ "email": email, "password": password });
        if let Some(role) = role {
            body["role"] = json!(role);
        }
        Ok(self.client.post(self.url("/register")).json(&body).send().await?)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?)
    }

    /// Register (if needed) and log in, returning the access token
    pub async fn token_for(&self, email: &str, role: &str) -> Result<String> {
        self.register(email, "secret", Some(role)).await?;
        let res = self.login(email, "secret").await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        let body: Value = res.json().await?;
        body["access_token"]
            .as_str()
            .map(str::to_string)
            .context("login response missing access_token")
    }

    pub async fn post_comment(&self, text: &str, email: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/post_comment"))
            .json(&json!({ "comments": text, "email": email }))
            .send()
            .await?)
    }

    pub async fn get(&self, path: &str, token: &str) -> Result<reqwest::Response> {
        Ok(self.client.get(self.url(path)).bearer_auth(token).send().await?)
    }

    pub async fn delete(&self, path: &str, token: &str) -> Result<reqwest::Response> {
        Ok(self.client.delete(self.url(path)).bearer_auth(token).send().await?)
    }

    pub async fn put_json(&self, path: &str, token: &str, body: &Value) -> Result<reqwest::Response> {
        Ok(self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }
}

pub async fn start_server() -> Result<TestServer> {
    let server = TestServer::spawn().await?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}
