// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide named broadcast channels.
//!
//! Every handle opened on the same name sees every message posted by the other
//! handles, in post order. A handle never receives its own posts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::cookie::Credential;

/// Channel carrying cookie refresh announcements.
pub const COOKIE_REFRESH_CHANNEL: &str = "techdocs-cookie-refresh";

const CHANNEL_CAPACITY: usize = 64;

/// Messages exchanged between refresher instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload")]
pub enum RefreshMessage {
    #[serde(rename = "COOKIE_REFRESHED")]
    CookieRefreshed(Credential),
}

#[derive(Debug, Clone)]
struct Envelope {
    origin: Uuid,
    message: RefreshMessage,
}

/// Registry of named channels.
#[derive(Default)]
pub struct ChannelHub {
    channels: Mutex<HashMap<String, broadcast::Sender<Envelope>>>,
}

impl ChannelHub {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The hub shared by everything in this process.
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<ChannelHub>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(ChannelHub::new))
    }

    /// Open a handle on the named channel, creating the channel on first use.
    pub fn open(&self, name: &str) -> ChannelHandle {
        let mut channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        let tx = channels
            .entry(name.to_owned())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone();
        drop(channels);

        let rx = tx.subscribe();
        ChannelHandle { id: Uuid::new_v4(), name: name.to_owned(), tx, rx }
    }

    /// Number of open handles on a channel.
    pub fn subscriber_count(&self, name: &str) -> usize {
        let channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        channels.get(name).map_or(0, |tx| tx.receiver_count())
    }
}

/// One participant on a named channel. Dropping it unsubscribes.
pub struct ChannelHandle {
    id: Uuid,
    name: String,
    tx: broadcast::Sender<Envelope>,
    rx: broadcast::Receiver<Envelope>,
}

impl ChannelHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Post to every other handle on this channel.
    pub fn post(&self, message: RefreshMessage) {
        // Only our own receiver may be listening; that is not an error.
        let _ = self.tx.send(Envelope { origin: self.id, message });
    }

    /// Wait for the next message posted by another handle.
    ///
    /// Returns `None` once the channel can no longer deliver messages.
    pub async fn recv(&mut self) -> Option<RefreshMessage> {
        loop {
            match self.rx.recv().await {
                Ok(envelope) if envelope.origin == self.id => continue,
                Ok(envelope) => return Some(envelope.message),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::debug!(channel = %self.name, skipped = n, "channel receiver lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::{TimeZone, Utc};

    use super::*;

    fn refreshed(secs: i64) -> RefreshMessage {
        RefreshMessage::CookieRefreshed(Credential::new(
            Utc.timestamp_opt(secs, 0).single().unwrap_or_default(),
        ))
    }

    #[tokio::test]
    async fn delivers_to_other_handles_only() -> anyhow::Result<()> {
        let hub = ChannelHub::new();
        let mut a = hub.open("test");
        let mut b = hub.open("test");

        a.post(refreshed(1));
        assert_eq!(b.recv().await, Some(refreshed(1)));

        let own = tokio::time::timeout(Duration::from_millis(20), a.recv()).await;
        assert!(own.is_err(), "handle received its own post");
        Ok(())
    }

    #[tokio::test]
    async fn channels_are_isolated_by_name() -> anyhow::Result<()> {
        let hub = ChannelHub::new();
        let a = hub.open("one");
        let mut b = hub.open("two");

        a.post(refreshed(1));
        let got = tokio::time::timeout(Duration::from_millis(20), b.recv()).await;
        assert!(got.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn messages_arrive_in_post_order() -> anyhow::Result<()> {
        let hub = ChannelHub::new();
        let a = hub.open("order");
        let mut b = hub.open("order");

        a.post(refreshed(1));
        a.post(refreshed(2));
        assert_eq!(b.recv().await, Some(refreshed(1)));
        assert_eq!(b.recv().await, Some(refreshed(2)));
        Ok(())
    }

    #[test]
    fn dropping_handle_unsubscribes() {
        let hub = ChannelHub::new();
        let a = hub.open("drop");
        let b = hub.open("drop");
        assert_eq!(hub.subscriber_count("drop"), 2);
        drop(b);
        assert_eq!(hub.subscriber_count("drop"), 1);
        drop(a);
        assert_eq!(hub.subscriber_count("drop"), 0);
    }

    #[test]
    fn message_wire_format() -> anyhow::Result<()> {
        let json = serde_json::to_value(refreshed(0))?;
        assert_eq!(json["action"], "COOKIE_REFRESHED");
        assert_eq!(json["payload"]["expiresAt"], "1970-01-01T00:00:00Z");
        Ok(())
    }

    #[test]
    fn global_hub_is_shared() {
        let a = ChannelHub::global();
        let b = ChannelHub::global();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
