//! # Common Test Utilities
//!
//! `TestApp` spawns a real server on a random port with a temporary SQLite database
//! and a local AI provider pointed at an `httpmock::MockServer`.

// Not every test file uses every helper.
#![allow(unused)]

use anyhow::Result;
use httpmock::MockServer;
use reqwest::Client;
use serde_json::{json, Value};
use std::{fs::File, io::Write, net::SocketAddr, sync::Arc};
use supportpilot::SupportClient;
use supportpilot_server::{
    config, router,
    state::{build_app_state, AppState},
};
use supportpilot_test_utils::{seed_knowledge, TestSetup};
use tempfile::{tempdir, NamedTempFile, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub app_state: AppState,
    _db_file: Option<NamedTempFile>,
    _config_dir: Option<TempDir>,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the server with the local provider pointed at the mock server.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with_sections(|mock_server| {
            format!(
                r#"
provider:
  provider: "local"
  api_url: "{}"
  api_key: null
  model_name: "mock-chat-model"
"#,
                mock_server.url(CHAT_COMPLETIONS_PATH)
            )
        })
        .await
    }

    /// Spawns the server with a config file whose sections after `db_url` are
    /// produced by `sections`.
    pub async fn spawn_with_sections(
        sections: impl FnOnce(&MockServer) -> String,
    ) -> Result<Self> {
        let mock_server = MockServer::start();
        let db_file = NamedTempFile::new()?;
        let db_path = db_file.path().to_path_buf();

        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let config_content = format!(
            "port: 0\ndb_url: \"{}\"\n{}",
            db_path.to_str().unwrap(),
            sections(&mock_server)
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config = config::get_config(Some(config_path.to_str().unwrap()))?;
        let app_state = build_app_state(config).await?;

        let mut app = TestApp::spawn_with_state(app_state, mock_server).await?;
        app._db_file = Some(db_file);
        app._config_dir = Some(config_dir);
        Ok(app)
    }

    pub async fn spawn_with_state(app_state: AppState, mock_server: MockServer) -> Result<Self> {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let app_state_for_harness = app_state.clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            app_state: app_state_for_harness,
            _db_file: None,
            _config_dir: None,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Spawns the server around a prebuilt `SupportClient`, for collaborators that a
    /// config file cannot describe.
    pub async fn spawn_with_client(support_client: SupportClient) -> Result<Self> {
        let setup = TestSetup::new().await?;
        let app_state = AppState {
            sqlite_provider: Arc::new(setup.provider),
            support_client: Arc::new(support_client),
        };
        TestApp::spawn_with_state(app_state, MockServer::start()).await
    }

    /// Adds question/answer pairs to the server's knowledge base.
    pub async fn seed_knowledge(&self, records: &[(&str, &str)]) -> Result<()> {
        seed_knowledge(&self.app_state.sqlite_provider, records).await
    }

    pub async fn post_chat(&self, body: Value) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(format!("{}/chat", self.address))
            .json(&body)
            .send()
            .await?)
    }

    pub async fn post_lead(&self, body: Value) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(format!("{}/lead", self.address))
            .json(&body)
            .send()
            .await?)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// A chat completion body as returned by an OpenAI-compatible server.
pub fn completion(content: &str) -> Value {
    json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
}
