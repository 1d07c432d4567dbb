// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use anyhow::Context;
use reqwest::Url;

/// The remote page a proxy request is for, taken from its `url` query parameter.
#[derive(Debug, Clone)]
pub struct ProxyTarget {
    raw: String,
    url: Url,
}

impl ProxyTarget {
    /// Extract the target from decoded query pairs.
    ///
    /// Exactly one non-empty `url` parameter holding an absolute http(s) URL is accepted.
    pub fn from_query(pairs: &[(String, String)]) -> anyhow::Result<Self> {
        let mut values = pairs.iter().filter(|(k, _)| k == "url").map(|(_, v)| v);
        let raw = match (values.next(), values.next()) {
            (Some(v), None) if !v.is_empty() => v.clone(),
            _ => anyhow::bail!("failed to fetch data, query parameter url undefined or array"),
        };
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let url = Url::parse(raw).with_context(|| format!("invalid proxy url {raw:?}"))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("unsupported proxy url scheme {:?}", url.scheme());
        }
        if url.host_str().is_none() {
            anyhow::bail!("proxy url {raw:?} has no host");
        }
        Ok(Self { raw: raw.to_owned(), url })
    }

    /// The target exactly as the client sent it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// `scheme://host[:port]` of the target.
    pub fn base(&self) -> String {
        let host = self.url.host_str().unwrap_or_default();
        match self.url.port() {
            Some(port) => format!("{}://{host}:{port}", self.url.scheme()),
            None => format!("{}://{host}", self.url.scheme()),
        }
    }

    /// Path, fragment, then query of the target, in that order.
    pub fn path(&self) -> String {
        let mut path = self.url.path().to_owned();
        if let Some(fragment) = self.url.fragment().filter(|f| !f.is_empty()) {
            path.push('#');
            path.push_str(fragment);
        }
        if let Some(query) = self.url.query().filter(|q| !q.is_empty()) {
            path.push('?');
            path.push_str(query);
        }
        path
    }

    /// Upstream URL for a request arriving at `request_path` under the proxy
    /// route. The route root fetches the target page itself; any longer path
    /// is a sub-resource fetched from the target host as-is.
    pub fn upstream_url(&self, request_path: &str) -> String {
        if request_path.len() > 1 {
            format!("{}{request_path}", self.base())
        } else {
            format!("{}{}", self.base(), self.path())
        }
    }

    /// The raw target, encoded for use as a query value.
    pub fn encoded(&self) -> String {
        encode_uri_component(&self.raw)
    }
}

/// Percent-encode everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
pub fn encode_uri_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(b as char),
            _ => {
                out.push('%');
                out.push(char::from(HEX[(b >> 4) as usize]));
                out.push(char::from(HEX[(b & 0xf) as usize]));
            }
        }
    }
    out
}

const HEX: &[u8; 16] = b"0123456789ABCDEF";
