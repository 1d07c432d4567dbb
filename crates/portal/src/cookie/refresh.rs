// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background cookie refresh with randomized lead time.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::cookie::channel::{ChannelHub, RefreshMessage, COOKIE_REFRESH_CHANNEL};
use crate::cookie::{AuthStatus, CookieApi, Credential};

/// One minute. Lead times span one to four of these.
const MARGIN_UNIT_MS: f64 = 60_000.0;

/// Lead time for a unit sample `u` in `[0, 1)`: `(1 + 3u) × 60s`, so the
/// result lies in `[60s, 240s)`.
pub fn jitter_from_unit(u: f64) -> Duration {
    Duration::from_millis(((1.0 + 3.0 * u) * MARGIN_UNIT_MS) as u64)
}

/// Random lead time so instances do not all refresh at the same moment.
pub fn refresh_margin() -> Duration {
    jitter_from_unit(rand::rng().random::<f64>())
}

/// Time until a refresh is due: `expires_at − now − margin`, clamped at zero.
pub fn refresh_delay(expires_at: DateTime<Utc>, now: DateTime<Utc>, margin: Duration) -> Duration {
    let ms = (expires_at - now).num_milliseconds() - margin.as_millis() as i64;
    Duration::from_millis(ms.max(0) as u64)
}

fn refresh_deadline(credential: &Credential) -> Instant {
    let delay = refresh_delay(credential.expires_at, Utc::now(), refresh_margin());
    tracing::debug!(
        expires_at = %credential.expires_at,
        delay_ms = delay.as_millis() as u64,
        "cookie refresh scheduled"
    );
    Instant::now() + delay
}

/// Keeps one documentation cookie fresh for one mounted view.
pub struct CookieRefresher {
    api: Arc<dyn CookieApi>,
    hub: Arc<ChannelHub>,
    channel: String,
}

impl CookieRefresher {
    /// Refresher coordinating over the process-wide hub.
    pub fn new(api: Arc<dyn CookieApi>) -> Self {
        Self::with_hub(api, ChannelHub::global())
    }

    pub fn with_hub(api: Arc<dyn CookieApi>, hub: Arc<ChannelHub>) -> Self {
        Self { api, hub, channel: COOKIE_REFRESH_CHANNEL.to_owned() }
    }

    pub fn channel(mut self, name: impl Into<String>) -> Self {
        self.channel = name.into();
        self
    }

    /// Start fetching and refreshing. Must be called within a tokio runtime.
    pub fn mount(self) -> RefresherHandle {
        let (status_tx, status_rx) = watch::channel(AuthStatus::Loading);
        let retry = Arc::new(Notify::new());
        let cancel = CancellationToken::new();

        let task = tokio::spawn(self.run(status_tx, Arc::clone(&retry), cancel.clone()));
        RefresherHandle { status: status_rx, retry, cancel, task: Some(task) }
    }

    async fn run(
        self,
        status_tx: watch::Sender<AuthStatus>,
        retry: Arc<Notify>,
        cancel: CancellationToken,
    ) {
        let mut channel = self.hub.open(&self.channel);
        let mut channel_open = true;
        let mut deadline: Option<Instant> = None;
        let mut fetch = true;

        loop {
            if fetch {
                fetch = false;
                status_tx.send_replace(AuthStatus::Loading);

                // An in-flight fetch runs to completion; its result is dropped after unmount.
                let result = self.api.get_cookie().await;
                if cancel.is_cancelled() {
                    break;
                }
                match result {
                    Ok(credential) => {
                        channel.post(RefreshMessage::CookieRefreshed(credential.clone()));
                        deadline = Some(refresh_deadline(&credential));
                        tracing::info!(expires_at = %credential.expires_at, "cookie refreshed");
                        status_tx.send_replace(AuthStatus::Ready(credential));
                    }
                    Err(e) => {
                        tracing::warn!(err = %e, "cookie fetch failed");
                        deadline = None;
                        status_tx.send_replace(AuthStatus::Failed(format!("{e:#}")));
                    }
                }
            }

            let armed = deadline;
            let timer = async move {
                match armed {
                    Some(at) => tokio::time::sleep_until(at).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = retry.notified() => fetch = true,
                _ = timer => fetch = true,
                msg = channel.recv(), if channel_open => match msg {
                    Some(RefreshMessage::CookieRefreshed(credential)) => {
                        // Only an armed timer is rescheduled; a failed or loading
                        // instance keeps waiting for its own fetch or a retry.
                        if deadline.is_some() {
                            tracing::debug!(
                                channel = %self.channel,
                                expires_at = %credential.expires_at,
                                "cookie refreshed elsewhere, rescheduling"
                            );
                            deadline = Some(refresh_deadline(&credential));
                        }
                    }
                    None => channel_open = false,
                },
            }
        }

        tracing::debug!(channel = %self.channel, "cookie refresher unmounted");
    }
}

/// Handle to a mounted [`CookieRefresher`]. Dropping it unmounts.
pub struct RefresherHandle {
    status: watch::Receiver<AuthStatus>,
    retry: Arc<Notify>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl RefresherHandle {
    /// Current status snapshot.
    pub fn status(&self) -> AuthStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthStatus> {
        self.status.clone()
    }

    /// Fetch again now, replacing any pending timer.
    pub fn retry(&self) {
        self.retry.notify_one();
    }

    /// Cancel the pending timer and leave the channel.
    ///
    /// Resolves once the background task has exited. A fetch already in
    /// flight is allowed to finish first.
    pub async fn unmount(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for RefresherHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
#[path = "refresh_tests.rs"]
mod tests;
