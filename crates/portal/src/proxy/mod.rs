// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Website proxy: fetches a remote page on behalf of the portal and patches
//! its asset links so sub-resources come back through the proxy too.

pub mod rewrite;
pub mod target;

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, CONNECTION};
use reqwest::{redirect, Client};

use crate::proxy::rewrite::AssetRewriter;
use crate::proxy::target::ProxyTarget;

/// Headers that describe a single connection and never cross the proxy.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// An upstream response ready to hand back to the client.
#[derive(Debug)]
pub struct ProxiedResponse {
    pub status: u16,
    /// Upstream headers safe to return to the client.
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Asset paths rewritten in the body.
    pub rewritten: Vec<String>,
}

/// HTTP client plus rewriter for one proxy route.
pub struct WebsiteProxy {
    client: Client,
    rewriter: AssetRewriter,
}

impl WebsiteProxy {
    pub fn new(route: &str, timeout: Duration) -> anyhow::Result<Self> {
        crate::install_crypto_provider();
        // Redirects go back to the client unfollowed, with their `location`.
        let client = Client::builder().timeout(timeout).redirect(redirect::Policy::none()).build()?;
        Ok(Self { client, rewriter: AssetRewriter::new(route)? })
    }

    /// Fetch `request_path` (relative to the proxy route) for `target`.
    ///
    /// `headers` are the client's request headers; they are forwarded minus
    /// hop-by-hop headers. Bodies that are valid UTF-8 have their asset links
    /// rewritten; anything else is passed through byte for byte. Upstream
    /// error statuses are returned as responses, not errors.
    pub async fn fetch(
        &self,
        target: &ProxyTarget,
        request_path: &str,
        headers: &HeaderMap,
    ) -> anyhow::Result<ProxiedResponse> {
        let upstream = target.upstream_url(request_path);
        tracing::info!(host = %target.base(), url = %target.raw(), "proxy to host");
        tracing::debug!(upstream = %upstream, request_path, "proxy request path resolved");

        let resp =
            self.client.get(&upstream).headers(upstream_request_headers(headers)).send().await?;
        let status = resp.status().as_u16();
        let headers = client_response_headers(resp.headers());
        let bytes = resp.bytes().await?;

        let (body, rewritten) = match std::str::from_utf8(&bytes) {
            Ok(text) => {
                let out = self.rewriter.rewrite(text, &target.encoded());
                (Bytes::from(out.body), out.paths)
            }
            Err(_) => (bytes.clone(), Vec::new()),
        };

        Ok(ProxiedResponse { status, headers, body, rewritten })
    }
}

/// Client request headers to send upstream.
///
/// `host` and `content-length` belong to the client's request. The body must
/// arrive uncompressed to be rewritten, so `accept-encoding` is dropped too.
pub fn upstream_request_headers(headers: &HeaderMap) -> HeaderMap {
    end_to_end(headers, &["host", "content-length", "accept-encoding"])
}

/// Upstream response headers to return to the client. The body may be
/// rewritten, so `content-length` is recomputed on the way out.
pub fn client_response_headers(headers: &HeaderMap) -> HeaderMap {
    end_to_end(headers, &["content-length"])
}

/// Copy `headers` without hop-by-hop headers, headers named in `connection`,
/// and `extra`. Repeated headers keep every value.
fn end_to_end(headers: &HeaderMap, extra: &[&str]) -> HeaderMap {
    let listed: Vec<String> = headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|token| token.trim().to_ascii_lowercase())
        .collect();

    let mut out = HeaderMap::new();
    for (name, value) in headers {
        let name_str = name.as_str();
        if HOP_BY_HOP.contains(&name_str)
            || extra.contains(&name_str)
            || listed.iter().any(|token| token == name_str)
        {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}
