pub mod rest;

use std::{path::Path, time::Duration};

use anyhow::{Result, anyhow};
use libcat_app::state::AppState;
use libcat_dal::{
    book::{Book, BookRepository, CreateBook},
    member::MemberRepository,
};
use libcat_server::{
    config::{Parser, ServerConfig},
    run::{build_state, run_graceful_with_state},
};
use rand::Rng as _;
use tempfile::TempDir;
use tokio::sync::oneshot;
use tracing::{debug, error};
use url::Url;

fn random_port() -> Result<u16> {
    let mut rng = rand::rng();

    let mut retries = 3;
    while retries > 0 {
        let port: u16 = rng.random_range(5030..6030);
        let addr: std::net::SocketAddr = format!("127.0.0.1:{}", port).parse()?;
        match std::net::TcpStream::connect_timeout(&addr, std::time::Duration::from_millis(100)) {
            Err(e) if e.kind() == std::io::ErrorKind::ConnectionRefused => return Ok(port),
            Err(_) => retries -= 1,
            Ok(_) => retries -= 1,
        }
    }

    Err(anyhow!("Could not find a free port"))
}

pub struct ConfigGuard {
    #[allow(dead_code)]
    data_dir: TempDir,
}

pub fn test_config(test_name: &str, base_dir: &Path) -> Result<(ServerConfig, ConfigGuard)> {
    let tmp_data_dir = TempDir::with_prefix_in(format!("{}_", test_name), base_dir)?;
    let data_dir = tmp_data_dir.path().to_string_lossy().to_string();
    let port = random_port()?;
    let port = port.to_string();
    let base_url = format!("http://127.0.0.1:{}", port);
    let args = &[
        "libcat-e2e-tests",
        "--data-dir",
        &data_dir,
        "--port",
        &port,
        "--base-url",
        &base_url,
    ];
    let config = ServerConfig::try_parse_from(args)?;
    Ok((
        config,
        ConfigGuard {
            data_dir: tmp_data_dir,
        },
    ))
}

pub async fn prepare_env(test_name: &str) -> Result<(ServerConfig, ConfigGuard)> {
    test_config(test_name, &std::env::temp_dir())
}

/// Running server, stops when dropped
pub struct TestServer {
    pub base_url: Url,
    state: AppState,
    _shutdown: oneshot::Sender<()>,
}

impl TestServer {
    pub fn books(&self) -> BookRepository {
        BookRepository::new(self.state.pool().clone())
    }

    pub fn members(&self) -> MemberRepository {
        MemberRepository::new(self.state.pool().clone())
    }

    /// Books cannot be created over API, so they are seeded directly
    pub async fn seed_book(&self, title: &str, author: &str, isbn: &str) -> Result<Book> {
        let book = self
            .books()
            .create(CreateBook {
                title: title.to_string(),
                author: author.to_string(),
                isbn: isbn.to_string(),
            })
            .await?;
        Ok(book)
    }

    pub fn url(&self, path: &str) -> Url {
        self.base_url.join(path).unwrap()
    }
}

pub async fn spawn_server(args: ServerConfig) -> Result<TestServer> {
    let base_url = args.base_url.clone();
    let state = build_state(&args).await?;
    let (tx, rx) = oneshot::channel::<()>();
    let shutdown = async move {
        let _ = rx.await;
    };
    let server_state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = run_graceful_with_state(args, server_state, shutdown).await {
            error!("Server error: {e}");
        }
    });

    wait_for_server(&base_url).await?;
    Ok(TestServer {
        base_url,
        state,
        _shutdown: tx,
    })
}

pub async fn launch_env(test_name: &str) -> Result<(reqwest::Client, TestServer, ConfigGuard)> {
    let (args, config_guard) = prepare_env(test_name).await?;
    let server = spawn_server(args).await?;
    Ok((reqwest::Client::new(), server, config_guard))
}

async fn wait_for_server(base_url: &Url) -> Result<()> {
    let health_url = base_url.join("health")?;
    let client = reqwest::Client::new();
    for _ in 0..50 {
        match client.get(health_url.clone()).send().await {
            Ok(response) if response.status().is_success() => return Ok(()),
            Ok(response) => debug!("Server not ready: {}", response.status()),
            Err(e) => debug!("Server not ready: {e}"),
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    Err(anyhow!("Server did not start"))
}

pub fn extend_url(url: &Url, segment: impl ToString) -> Url {
    let mut url = url.clone();
    url.path_segments_mut()
        .unwrap()
        .pop_if_empty()
        .push(&segment.to_string());
    url
}
