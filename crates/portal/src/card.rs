// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entity card embedding a website named by a `website-proxy/<name>` annotation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::node::{Element, Node};
use crate::proxy::target::encode_uri_component;

/// Prefix of the annotation holding the website URL.
pub const WEBSITE_PROXY_NAME_ANNOTATION_PREFIX: &str = "website-proxy/";

/// Catalog entity, reduced to what the card reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub metadata: EntityMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
}

impl Entity {
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.metadata.annotations.as_ref()?.get(key).map(String::as_str)
    }
}

pub fn annotation_key(name: &str) -> String {
    format!("{WEBSITE_PROXY_NAME_ANNOTATION_PREFIX}{name}")
}

/// Whether the entity carries the annotation for `name`, even if it is empty.
pub fn is_website_proxy_available(name: &str, entity: &Entity) -> bool {
    entity.annotation(&annotation_key(name)).is_some()
}

/// What the card shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardView {
    Embed { src: String, height: &'static str },
    MissingAnnotation { annotation: String },
}

/// Card options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebsiteProxyCard {
    pub name: String,
    /// Load the site through the backend proxy instead of directly.
    #[serde(default)]
    pub use_proxy: bool,
    /// Let the embed fill its container instead of the viewport height.
    #[serde(default)]
    pub disable_view_height: bool,
}

impl WebsiteProxyCard {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    /// Decide what to show. `proxy_route` is the route the backend mounts
    /// the website proxy under.
    pub fn view(&self, entity: &Entity, backend_url: &str, proxy_route: &str) -> CardView {
        let annotation = annotation_key(&self.name);
        let url = match entity.annotation(&annotation) {
            Some(url) if !url.is_empty() => url,
            _ => return CardView::MissingAnnotation { annotation },
        };

        let src = if self.use_proxy {
            format!("{backend_url}/api/{proxy_route}?url={}", encode_uri_component(url))
        } else {
            url.to_owned()
        };
        let height = if self.disable_view_height { "100%" } else { "100vh" };
        CardView::Embed { src, height }
    }

    pub fn render(&self, entity: &Entity, backend_url: &str, proxy_route: &str) -> Node {
        match self.view(entity, backend_url, proxy_route) {
            CardView::Embed { src, height } => Element::new("embed")
                .prop("type", "text/html")
                .prop("src", src)
                .prop("style", format!("width: 100%; height: {height}"))
                .into(),
            CardView::MissingAnnotation { annotation } => Element::new("Alert")
                .prop("severity", "error")
                .child(Node::text("Annotation "))
                .child(
                    Element::new("pre")
                        .child(Node::text(format!("{annotation} doesn't exist on this entity!"))),
                )
                .into(),
        }
    }
}

#[cfg(test)]
#[path = "card_tests.rs"]
mod tests;
