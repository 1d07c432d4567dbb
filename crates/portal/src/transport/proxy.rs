// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Website proxy handlers.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{OriginalUri, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::error::PortalError;
use crate::proxy::target::ProxyTarget;
use crate::state::PortalState;

/// `GET /api/{route}?url=...` — fetch the target page.
pub async fn proxy_root(
    State(s): State<Arc<PortalState>>,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response {
    proxy_request(&s, "/", &query, &headers).await
}

/// `GET /api/{route}/{*path}?url=...` — fetch a sub-resource from the target host.
///
/// The sub-path is forwarded exactly as the client sent it, still percent-encoded.
pub async fn proxy_sub_resource(
    State(s): State<Arc<PortalState>>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response {
    let request_path = sub_resource_path(uri.path(), &s.config.proxy_route);
    proxy_request(&s, request_path, &query, &headers).await
}

/// The raw request path below `/api/<route>`, starting with `/`.
fn sub_resource_path<'a>(path: &'a str, route: &str) -> &'a str {
    path.strip_prefix("/api/")
        .and_then(|rest| rest.strip_prefix(route))
        .filter(|rest| rest.starts_with('/'))
        .unwrap_or(path)
}

async fn proxy_request(
    state: &PortalState,
    request_path: &str,
    query: &[(String, String)],
    headers: &HeaderMap,
) -> Response {
    let target = match ProxyTarget::from_query(query) {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(request_path, err = %e, "rejected proxy request");
            return PortalError::BadRequest.to_http_response(format!("{e:#}")).into_response();
        }
    };

    let proxied = match state.proxy.fetch(&target, request_path, headers).await {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(url = %target.raw(), request_path, err = %e, "upstream fetch failed");
            return PortalError::UpstreamError
                .to_http_response(format!("upstream error: {e}"))
                .into_response();
        }
    };

    let status = StatusCode::from_u16(proxied.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut response = (status, Body::from(proxied.body)).into_response();
    response.headers_mut().extend(proxied.headers);
    response
}
