// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::node::{Element, Node};

/// Theme the reader page is rendered with.
pub const DOCUMENTATION_THEME: &str = "documentation";

/// Default reader structure: header, subheader, and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderLayout {
    /// Show the header. Defaults to true.
    pub with_header: bool,
    /// Show the content search bar. Left to the content's default when unset.
    pub with_search: Option<bool>,
}

impl Default for ReaderLayout {
    fn default() -> Self {
        Self { with_header: true, with_search: None }
    }
}

impl ReaderLayout {
    pub fn render(&self) -> Node {
        let mut page = Element::new("Page").prop("themeId", DOCUMENTATION_THEME);
        if self.with_header {
            page = page.child(Element::new("ReaderPageHeader"));
        }
        let mut content = Element::new("ReaderPageContent");
        if let Some(with_search) = self.with_search {
            content = content.prop("withSearch", with_search.to_string());
        }
        page.child(Element::new("ReaderPageSubheader")).child(content).into()
    }
}
