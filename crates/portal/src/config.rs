// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

/// Configuration for the developer portal backend.
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "devportal", version, about = "Developer portal backend services")]
pub struct PortalConfig {
    /// Host to bind on.
    #[arg(long, default_value = "127.0.0.1", env = "DEVPORTAL_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 7007, env = "DEVPORTAL_PORT")]
    pub port: u16,

    /// Public base URL of this backend, used when building proxied embed URLs.
    /// Defaults to `http://<host>:<port>`.
    #[arg(long, env = "DEVPORTAL_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Route name the website proxy is mounted under (`/api/<route>`).
    #[arg(long, default_value = "website-proxy", env = "DEVPORTAL_PROXY_ROUTE")]
    pub proxy_route: String,

    /// Upstream request timeout in milliseconds.
    #[arg(long, default_value_t = 10000, env = "DEVPORTAL_UPSTREAM_TIMEOUT_MS")]
    pub upstream_timeout_ms: u64,

    /// Log format (json or text).
    #[arg(long, default_value = "json", env = "DEVPORTAL_LOG_FORMAT")]
    pub log_format: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "DEVPORTAL_LOG_LEVEL")]
    pub log_level: String,
}

impl PortalConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.proxy_route.is_empty() {
            anyhow::bail!("--proxy-route must not be empty");
        }
        if self.proxy_route.contains('/') {
            anyhow::bail!("--proxy-route must be a single path segment, got {:?}", self.proxy_route);
        }
        if self.upstream_timeout_ms == 0 {
            anyhow::bail!("--upstream-timeout-ms must be greater than zero");
        }
        match self.log_format.as_str() {
            "json" | "text" => {}
            other => anyhow::bail!("invalid --log-format: {other} (expected json or text)"),
        }
        Ok(())
    }

    /// Base URL embed cards point at when proxying.
    pub fn backend_base_url(&self) -> String {
        match &self.backend_url {
            Some(url) => url.trim_end_matches('/').to_owned(),
            None => format!("http://{}:{}", self.host, self.port),
        }
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
