// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP transport for the portal backend.

pub mod http;
pub mod proxy;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::PortalState;

/// Build the axum `Router` with all portal routes.
pub fn build_router(state: Arc<PortalState>) -> Router {
    let route = &state.config.proxy_route;
    Router::new()
        // Health
        .route("/api/v1/health", get(http::health))
        // Website proxy: the route root fetches the target page, deeper paths
        // are sub-resources on the target host.
        .route(&format!("/api/{route}"), get(proxy::proxy_root))
        .route(&format!("/api/{route}/{{*path}}"), get(proxy::proxy_sub_resource))
        // Entity cards
        .route("/api/v1/cards/website-proxy", post(http::website_proxy_card))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
