// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Documentation cookie: fetch, jittered background refresh, and cross-instance
//! coordination over a named broadcast channel.
//!
//! Each mounted [`refresh::CookieRefresher`] fetches a credential on mount and
//! re-fetches shortly before it expires. Every successful fetch is announced on
//! the shared channel so sibling instances push their own timer out instead of
//! fetching again.

pub mod channel;
pub mod gate;
pub mod refresh;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An expiring credential. Fields other than `expiresAt` are opaque and kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub expires_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl Credential {
    pub fn new(expires_at: DateTime<Utc>) -> Self {
        Self { expires_at, fields: serde_json::Map::new() }
    }
}

/// Observable state of a refresher, consumed by [`gate::auth_gate`].
#[derive(Debug, Clone, PartialEq)]
pub enum AuthStatus {
    Loading,
    Failed(String),
    Ready(Credential),
}

impl AuthStatus {
    pub fn credential(&self) -> Option<&Credential> {
        match self {
            Self::Ready(cred) => Some(cred),
            _ => None,
        }
    }
}

/// Source of documentation cookies.
#[async_trait]
pub trait CookieApi: Send + Sync {
    async fn get_cookie(&self) -> anyhow::Result<Credential>;
}

/// [`CookieApi`] backed by `GET <base_url>/cookie`.
pub struct HttpCookieApi {
    base_url: String,
    auth_token: Option<String>,
    client: reqwest::Client,
}

impl HttpCookieApi {
    pub fn new(base_url: String, auth_token: Option<String>) -> Self {
        crate::install_crypto_provider();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { base_url: base_url.trim_end_matches('/').to_owned(), auth_token, client }
    }
}

#[async_trait]
impl CookieApi for HttpCookieApi {
    async fn get_cookie(&self) -> anyhow::Result<Credential> {
        let mut req = self.client.get(format!("{}/cookie", self.base_url));
        if let Some(ref token) = self.auth_token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("cookie request failed ({status}): {text}");
        }
        let credential: Credential = resp.json().await?;
        Ok(credential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_keeps_opaque_fields() -> anyhow::Result<()> {
        let json = r#"{"expiresAt":"2026-10-19T12:00:00Z","token":"abc","scope":["docs"]}"#;
        let cred: Credential = serde_json::from_str(json)?;
        assert_eq!(cred.expires_at.to_rfc3339(), "2026-10-19T12:00:00+00:00");
        assert_eq!(cred.fields["token"], "abc");

        let back = serde_json::to_value(&cred)?;
        assert_eq!(back["scope"][0], "docs");
        assert!(back.get("expiresAt").is_some());
        Ok(())
    }

    #[test]
    fn credential_requires_expiry() {
        let result = serde_json::from_str::<Credential>(r#"{"token":"abc"}"#);
        assert!(result.is_err());
    }
}
