// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Devportal: documentation reader composition, cookie refresh coordination,
//! and the website proxy backend.

pub mod card;
pub mod config;
pub mod cookie;
pub mod error;
pub mod node;
pub mod proxy;
pub mod reader;
pub mod state;
pub mod transport;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::PortalConfig;
use crate::state::PortalState;
use crate::transport::build_router;

/// Install the process-wide TLS crypto provider used by outbound HTTP clients.
///
/// Safe to call more than once; later calls are no-ops.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Run the portal backend until shutdown.
pub async fn run(config: PortalConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let shutdown = CancellationToken::new();

    let state = Arc::new(PortalState::new(config)?);

    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown requested");
            }
            shutdown.cancel();
        });
    }

    tracing::info!(
        route = %state.config.proxy_route,
        backend = %state.config.backend_base_url(),
        "devportal listening on {addr}"
    );
    let router = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, router).with_graceful_shutdown(shutdown.cancelled_owned()).await?;

    Ok(())
}
