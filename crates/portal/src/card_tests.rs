// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde_json::json;

use super::*;
use crate::node::render_html;

const BACKEND: &str = "http://localhost:7007";
const ROUTE: &str = "website-proxy";

fn entity(annotations: serde_json::Value) -> anyhow::Result<Entity> {
    Ok(serde_json::from_value(json!({
        "apiVersion": "backstage.io/v1alpha1",
        "kind": "Component",
        "metadata": { "name": "docs-site", "annotations": annotations },
    }))?)
}

#[test]
fn missing_annotation_renders_error_and_no_embed() -> anyhow::Result<()> {
    let entity = entity(json!({ "website-proxy/other": "https://other.test" }))?;
    let card = WebsiteProxyCard::new("status");

    assert_eq!(
        card.view(&entity, BACKEND, ROUTE),
        CardView::MissingAnnotation { annotation: "website-proxy/status".into() }
    );
    let node = card.render(&entity, BACKEND, ROUTE);
    assert!(node.find("embed").is_none());
    assert_eq!(
        render_html(&node),
        r#"<div data-component="Alert" severity="error">Annotation <pre>website-proxy/status doesn&#39;t exist on this entity!</pre></div>"#
    );
    Ok(())
}

#[test]
fn entity_without_annotations_is_missing() {
    let entity = Entity::default();
    assert!(!is_website_proxy_available("status", &entity));
    assert!(matches!(
        WebsiteProxyCard::new("status").view(&entity, BACKEND, ROUTE),
        CardView::MissingAnnotation { .. }
    ));
}

#[test]
fn empty_annotation_is_available_but_renders_error() -> anyhow::Result<()> {
    let entity = entity(json!({ "website-proxy/status": "" }))?;
    assert!(is_website_proxy_available("status", &entity));
    assert!(matches!(
        WebsiteProxyCard::new("status").view(&entity, BACKEND, ROUTE),
        CardView::MissingAnnotation { .. }
    ));
    Ok(())
}

#[test]
fn direct_embed_uses_annotation_url() -> anyhow::Result<()> {
    let entity = entity(json!({ "website-proxy/status": "https://status.example.com/" }))?;
    let card = WebsiteProxyCard::new("status");

    assert_eq!(
        card.view(&entity, BACKEND, ROUTE),
        CardView::Embed { src: "https://status.example.com/".into(), height: "100vh" }
    );
    let node = card.render(&entity, BACKEND, ROUTE);
    let embed = node.find("embed").ok_or_else(|| anyhow::anyhow!("no embed"))?;
    assert_eq!(embed.get_prop("type"), Some("text/html"));
    assert_eq!(embed.get_prop("style"), Some("width: 100%; height: 100vh"));
    Ok(())
}

#[test]
fn proxied_embed_points_at_backend() -> anyhow::Result<()> {
    let entity = entity(json!({ "website-proxy/status": "https://status.example.com/?tab=a b" }))?;
    let card = WebsiteProxyCard { name: "status".into(), use_proxy: true, disable_view_height: true };

    assert_eq!(
        card.view(&entity, BACKEND, ROUTE),
        CardView::Embed {
            src: "http://localhost:7007/api/website-proxy?url=https%3A%2F%2Fstatus.example.com%2F%3Ftab%3Da%20b"
                .into(),
            height: "100%",
        }
    );
    Ok(())
}

#[test]
fn proxied_embed_follows_proxy_route() -> anyhow::Result<()> {
    let entity = entity(json!({ "website-proxy/status": "https://status.example.com" }))?;
    let card = WebsiteProxyCard { use_proxy: true, ..WebsiteProxyCard::new("status") };

    let node = card.render(&entity, BACKEND, "site-proxy");
    let embed = node.find("embed").ok_or_else(|| anyhow::anyhow!("no embed"))?;
    assert_eq!(
        embed.get_prop("src"),
        Some("http://localhost:7007/api/site-proxy?url=https%3A%2F%2Fstatus.example.com")
    );
    Ok(())
}
