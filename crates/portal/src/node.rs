// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal UI node tree used by the reader page and embed card.
//!
//! Elements carry string props, a set of component markers (assigned by
//! whoever builds the tree), and children. Markers never reach the rendered
//! HTML; they only exist so composers can classify children.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

/// A UI node: either an element or a run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            Self::Text(_) => None,
        }
    }

    /// Tag name for elements, `None` for text.
    pub fn tag(&self) -> Option<&str> {
        self.as_element().map(|el| el.tag.as_str())
    }

    /// Children of an element; text nodes have none.
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Element(el) => &el.children,
            Self::Text(_) => &[],
        }
    }

    /// Depth-first search for the first element with the given tag.
    pub fn find(&self, tag: &str) -> Option<&Element> {
        let el = self.as_element()?;
        if el.tag == tag {
            return Some(el);
        }
        el.children.iter().find_map(|child| child.find(tag))
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Self::Element(el)
    }
}

/// A tagged element with props, markers, and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub props: BTreeMap<String, String>,
    pub markers: BTreeSet<String>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), ..Default::default() }
    }

    pub fn prop(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.markers.insert(marker.into());
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn get_prop(&self, key: &str) -> Option<&str> {
        self.props.get(key).map(String::as_str)
    }
}

/// Looks up component markers on a node.
pub trait MarkerLookup {
    fn has_marker(&self, node: &Node, marker: &str) -> bool;
}

/// Reads markers carried on the element itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeMarkers;

impl MarkerLookup for NodeMarkers {
    fn has_marker(&self, node: &Node, marker: &str) -> bool {
        node.as_element().is_some_and(|el| el.markers.contains(marker))
    }
}

impl<F> MarkerLookup for F
where
    F: Fn(&Node, &str) -> bool,
{
    fn has_marker(&self, node: &Node, marker: &str) -> bool {
        self(node, marker)
    }
}

const VOID_TAGS: &[&str] = &["br", "embed", "hr", "img", "input", "link", "meta"];

/// Render a node tree to HTML.
///
/// Lowercase tags render as themselves. Component tags (leading uppercase)
/// render as a `div` carrying `data-component`.
pub fn render_html(node: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

fn write_node(out: &mut String, node: &Node) {
    let el = match node {
        Node::Text(text) => {
            out.push_str(&escape(text));
            return;
        }
        Node::Element(el) => el,
    };

    let is_component = el.tag.starts_with(|c: char| c.is_ascii_uppercase());
    let tag = if is_component { "div" } else { el.tag.as_str() };

    out.push('<');
    out.push_str(tag);
    if is_component {
        let _ = write!(out, " data-component=\"{}\"", escape(&el.tag));
    }
    for (key, value) in &el.props {
        let _ = write!(out, " {}=\"{}\"", key, escape(value));
    }
    out.push('>');

    if VOID_TAGS.contains(&tag) {
        return;
    }
    for child in &el.children {
        write_node(out, child);
    }
    let _ = write!(out, "</{tag}>");
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
