use anyhow::Context;
use docsort::{api, config, logging, processing};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::net::TcpListener;

const FALLBACK_PORTS: std::ops::RangeInclusive<u16> = 4100..=4199;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();
    let config = config::init_config().context("Failed to load configuration")?;
    let service = processing::DocumentService::new(config)
        .context("Failed to prepare document folders")?;
    let app = api::create_router(Arc::new(service), config);

    let (listener, port) = bind_listener(config.server_port)
        .await
        .context("Failed to bind listener")?;
    tracing::info!("Listening on http://0.0.0.0:{}", port);
    axum::serve(listener, app).await.context("Server stopped")?;
    Ok(())
}

/// Bind the configured port, or the first free port in the fallback range.
async fn bind_listener(port: Option<u16>) -> std::io::Result<(TcpListener, u16)> {
    if let Some(port) = port {
        return TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
            .await
            .map(|listener| (listener, port));
    }

    for port in FALLBACK_PORTS {
        match TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await {
            Ok(listener) => return Ok((listener, port)),
            Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
                tracing::debug!(port, "Port in use");
            }
            Err(err) => return Err(err),
        }
    }

    Err(std::io::Error::new(
        std::io::ErrorKind::AddrNotAvailable,
        format!(
            "No free port between {} and {}",
            FALLBACK_PORTS.start(),
            FALLBACK_PORTS.end()
        ),
    ))
}
