// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rewrites root-relative `<link>`/`<script>` references in proxied pages so
//! the browser fetches them back through the proxy.
//!
//! This is a line-oriented regex patch, not an HTML parser. The greedy `.*`
//! means at most one reference per line is found, and each found path replaces
//! the first occurrence of that path anywhere in the body.

use regex::Regex;

const ASSET_LINK_PATTERN: &str = r#"(?i)<(link|script)\s.*(href|src)=['"]/(.*?)['"]"#;

/// Result of rewriting one response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub body: String,
    /// Root-relative paths that were rewritten, without the leading `/`.
    pub paths: Vec<String>,
}

/// Compiled asset-link rewriter for one proxy route.
#[derive(Debug, Clone)]
pub struct AssetRewriter {
    pattern: Regex,
    route: String,
}

impl AssetRewriter {
    /// Rewriter producing links under `/api/<route>/`.
    pub fn new(route: &str) -> anyhow::Result<Self> {
        Ok(Self { pattern: Regex::new(ASSET_LINK_PATTERN)?, route: route.to_owned() })
    }

    /// Rewrite `body`. `encoded_target` is the already-encoded original target URL.
    pub fn rewrite(&self, body: &str, encoded_target: &str) -> Rewritten {
        let paths: Vec<String> = self
            .pattern
            .captures_iter(body)
            .filter_map(|caps| caps.get(3))
            .map(|m| m.as_str().to_owned())
            .collect();

        let mut out = body.to_owned();
        for path in &paths {
            tracing::info!(path = %path, "rewriting asset link");
            let replacement = format!("/api/{}/{path}?url={encoded_target}", self.route);
            out = out.replacen(&format!("/{path}"), &replacement, 1);
        }
        Rewritten { body: out, paths }
    }
}

#[cfg(test)]
#[path = "rewrite_tests.rs"]
mod tests;
