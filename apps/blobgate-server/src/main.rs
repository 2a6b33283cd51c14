//! BlobGate server: an S3-compatible blob gateway.
//!
//! Classifies S3 requests, dispatches them to an in-memory blob store, and
//! encodes results and errors in the S3 wire format.
//!
//! # Usage
//!
//! ```text
//! GATEWAY_LISTEN=0.0.0.0:8000 blobgate-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `0.0.0.0:8000` | Bind address |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `LOG_FORMAT` | `text` | `json` for JSON log lines |
//! | `OWNER_ID` | `blobgate` | Owner id reported by ListBuckets |
//! | `OWNER_DISPLAY_NAME` | `blobgate` | Owner display name |
//! | `MAX_OBJECT_SIZE` | `5368709120` | Largest accepted object, in bytes |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod handler;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use blobgate_core::{BlobGateway, GatewayConfig, LogFormat};
use blobgate_http::dispatch::S3Handler;
use blobgate_http::service::S3HttpService;

use crate::handler::GatewayHandler;

/// Server version logged at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build the log filter: `RUST_LOG` if set, otherwise `log_level`.
fn build_filter(log_level: &str) -> Result<EnvFilter> {
    if std::env::var("RUST_LOG").is_ok() {
        return Ok(EnvFilter::from_default_env());
    }
    EnvFilter::try_new(log_level).with_context(|| format!("invalid log level filter: {log_level}"))
}

/// Initialize the tracing subscriber.
fn init_tracing(config: &GatewayConfig) -> Result<()> {
    let filter = build_filter(&config.log_level)?;

    match config.log_format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }

    Ok(())
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve<H: S3Handler>(listener: TcpListener, service: S3HttpService<H>) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

/// Probe the health endpoint of a running gateway.
///
/// Exits with code 0 if healthy, 1 otherwise.
async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;

    let (mut reader, mut writer) = stream.into_split();

    let request = format!("GET /_health HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    writer.write_all(request.as_bytes()).await?;
    writer.shutdown().await?;

    let mut response = String::new();
    reader.read_to_string(&mut response).await?;

    if response.contains("200 OK") && response.contains("\"status\":\"running\"") {
        Ok(())
    } else {
        anyhow::bail!("unhealthy response from {addr}")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = GatewayConfig::from_env();

    // Docker HEALTHCHECK entry point.
    if std::env::args().any(|a| a == "--health-check") {
        let addr = config.gateway_listen.replace("0.0.0.0", "127.0.0.1");
        let healthy = run_health_check(&addr).await.is_ok();
        std::process::exit(i32::from(!healthy));
    }

    init_tracing(&config)?;

    info!(
        gateway_listen = %config.gateway_listen,
        owner_id = %config.owner_id,
        max_object_size = config.max_object_size,
        version = VERSION,
        "starting BlobGate server",
    );

    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;

    let body_limit = config.max_object_size;
    let gateway = BlobGateway::in_memory(config);
    let service = S3HttpService::new(GatewayHandler(gateway)).with_body_limit(body_limit);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, "listening for connections");

    serve(listener, service).await
}
