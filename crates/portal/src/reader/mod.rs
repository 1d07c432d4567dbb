// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Documentation reader page composition.
//!
//! A reader page can be configured four ways:
//!
//! 1. No children and no outlet content: the default [`ReaderLayout`].
//! 2. Element children: rendered as-is inside a documentation page.
//! 3. Render-function children: called with the entity reference, reader
//!    metadata, entity metadata, and a ready handle.
//! 4. Outlet content supplied by the router: the first outlet grandchild that
//!    is neither an addon wrapper nor an addon.
//!
//! [`ContentSource::resolve`] picks exactly one of these on every render.

pub mod layout;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::cookie::gate::auth_gate;
use crate::cookie::AuthStatus;
use crate::node::{Element, MarkerLookup, Node};

pub use layout::{ReaderLayout, DOCUMENTATION_THEME};

/// Marker on the element that wraps a page's addons.
pub const ADDONS_WRAPPER_KEY: &str = "techdocs.addons.wrapper.v1";

/// Marker on an individual addon.
pub const ADDONS_KEY: &str = "techdocs.addons.addon.v1";

/// Class on the wrapper emitted around explicit children.
pub const READER_PAGE_CLASS: &str = "techdocs-reader-page";

/// `kind:namespace/name` reference to a catalog entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompoundEntityRef {
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

impl CompoundEntityRef {
    pub fn new(
        kind: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self { kind: kind.into(), namespace: namespace.into(), name: name.into() }
    }
}

impl fmt::Display for CompoundEntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.kind, self.namespace, self.name)
    }
}

impl FromStr for CompoundEntityRef {
    type Err = anyhow::Error;

    /// Parses `kind:namespace/name`; the namespace defaults to `default`.
    fn from_str(s: &str) -> anyhow::Result<Self> {
        let (kind, rest) =
            s.split_once(':').ok_or_else(|| anyhow::anyhow!("entity ref {s:?} has no kind"))?;
        let (namespace, name) = rest.split_once('/').unwrap_or(("default", rest));
        if kind.is_empty() || namespace.is_empty() || name.is_empty() {
            anyhow::bail!("entity ref {s:?} has an empty part");
        }
        Ok(Self::new(kind, namespace, name))
    }
}

/// Lets a render function tell the page its content has finished rendering.
#[derive(Debug, Clone)]
pub struct ReadyHandle {
    ready: Arc<watch::Sender<bool>>,
}

impl Default for ReadyHandle {
    fn default() -> Self {
        Self { ready: Arc::new(watch::Sender::new(false)) }
    }
}

impl ReadyHandle {
    pub fn notify(&self) {
        self.ready.send_replace(true);
    }

    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.ready.subscribe()
    }
}

/// Arguments passed to render-function children.
pub struct RenderArgs<'a> {
    pub entity_ref: &'a CompoundEntityRef,
    pub techdocs_metadata: Option<&'a serde_json::Value>,
    pub entity_metadata: Option<&'a serde_json::Value>,
    pub on_ready: ReadyHandle,
}

pub type RenderFn = Box<dyn Fn(RenderArgs<'_>) -> Node + Send + Sync>;

/// Children passed directly to the reader page.
#[derive(Default)]
pub enum PageChildren {
    #[default]
    None,
    Element(Node),
    Render(RenderFn),
}

impl PageChildren {
    pub fn render(f: impl Fn(RenderArgs<'_>) -> Node + Send + Sync + 'static) -> Self {
        Self::Render(Box::new(f))
    }
}

/// The single thing a reader page renders as its primary content.
pub enum ContentSource<'a> {
    Layout,
    Outlet(&'a Node),
    Element(&'a Node),
    RenderFn(&'a RenderFn),
}

impl<'a> ContentSource<'a> {
    /// Choose the content for one render pass. Explicit children win; without
    /// them the outlet is searched, then the default layout is used.
    pub fn resolve(
        children: &'a PageChildren,
        outlet: Option<&'a Node>,
        lookup: &dyn MarkerLookup,
    ) -> Self {
        match children {
            PageChildren::Element(node) => Self::Element(node),
            PageChildren::Render(f) => Self::RenderFn(f),
            PageChildren::None => match primary_outlet_node(outlet, lookup) {
                Some(node) => Self::Outlet(node),
                None => Self::Layout,
            },
        }
    }
}

/// First grandchild of the outlet that is not addon content.
///
/// Only one level is flattened: the outlet's children are expanded into their
/// own children, and those are scanned in order.
pub fn primary_outlet_node<'a>(
    outlet: Option<&'a Node>,
    lookup: &dyn MarkerLookup,
) -> Option<&'a Node> {
    outlet?.children().iter().flat_map(Node::children).find(|node| {
        !lookup.has_marker(node, ADDONS_WRAPPER_KEY) && !lookup.has_marker(node, ADDONS_KEY)
    })
}

/// Metadata the page provider has loaded for the current entity.
#[derive(Debug, Clone, Default)]
pub struct ReaderMetadata {
    pub techdocs: Option<serde_json::Value>,
    pub entity: Option<serde_json::Value>,
}

/// Inputs that change between renders.
pub struct RenderContext<'a> {
    /// Entity from the current route; used when the page has no explicit ref.
    pub route: &'a CompoundEntityRef,
    pub outlet: Option<&'a Node>,
    pub auth: &'a AuthStatus,
    pub metadata: &'a ReaderMetadata,
    pub on_ready: &'a ReadyHandle,
    pub lookup: &'a dyn MarkerLookup,
}

/// An addon-aware documentation reader page.
#[derive(Default)]
pub struct ReaderPage {
    pub entity_ref: Option<CompoundEntityRef>,
    pub children: PageChildren,
}

impl ReaderPage {
    pub fn new(children: PageChildren) -> Self {
        Self { entity_ref: None, children }
    }

    pub fn entity_ref(mut self, entity_ref: CompoundEntityRef) -> Self {
        self.entity_ref = Some(entity_ref);
        self
    }

    /// Render the page tree for one pass.
    pub fn render(&self, cx: &RenderContext<'_>) -> Node {
        let entity_ref = self.entity_ref.as_ref().unwrap_or(cx.route);
        let source = ContentSource::resolve(&self.children, cx.outlet, cx.lookup);

        auth_gate(cx.auth, || {
            let content = match source {
                ContentSource::Layout => ReaderLayout::default().render(),
                ContentSource::Outlet(node) => node.clone(),
                ContentSource::Element(node) => documentation_page(node.clone()),
                ContentSource::RenderFn(f) => documentation_page(f(RenderArgs {
                    entity_ref,
                    techdocs_metadata: cx.metadata.techdocs.as_ref(),
                    entity_metadata: cx.metadata.entity.as_ref(),
                    on_ready: cx.on_ready.clone(),
                })),
            };
            Element::new("ReaderPageProvider")
                .prop("entityRef", entity_ref.to_string())
                .child(content)
                .into()
        })
    }
}

fn documentation_page(content: Node) -> Node {
    Element::new("div")
        .prop("class", READER_PAGE_CLASS)
        .child(Element::new("Page").prop("themeId", DOCUMENTATION_THEME).child(content))
        .into()
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
