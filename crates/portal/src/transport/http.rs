// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP handlers for health and entity cards.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::card::{Entity, WebsiteProxyCard};
use crate::node::render_html;
use crate::state::PortalState;

// -- Request/Response types ---------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub proxy_route: String,
}

#[derive(Debug, Deserialize)]
pub struct CardRequest {
    pub entity: Entity,
    #[serde(flatten)]
    pub card: WebsiteProxyCard,
}

// -- Handlers -----------------------------------------------------------------

/// `GET /api/v1/health`
pub async fn health(State(s): State<Arc<PortalState>>) -> impl IntoResponse {
    Json(HealthResponse { status: "running".to_owned(), proxy_route: s.config.proxy_route.clone() })
}

/// `POST /api/v1/cards/website-proxy` — render the website embed card for an entity.
pub async fn website_proxy_card(
    State(s): State<Arc<PortalState>>,
    Json(req): Json<CardRequest>,
) -> impl IntoResponse {
    let backend = s.config.backend_base_url();
    let node = req.card.render(&req.entity, &backend, &s.config.proxy_route);
    Html(render_html(&node))
}
