// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::cookie::AuthStatus;
use crate::node::{Element, Node};

/// Render `content` only once a cookie is available.
///
/// `content` is not called while loading or after a failure.
pub fn auth_gate(status: &AuthStatus, content: impl FnOnce() -> Node) -> Node {
    match status {
        AuthStatus::Failed(message) => Element::new("ErrorPanel")
            .prop("severity", "error")
            .child(Node::text(message.clone()))
            .into(),
        AuthStatus::Loading => Element::new("Progress").into(),
        AuthStatus::Ready(_) => content(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::cookie::Credential;

    #[test]
    fn loading_renders_progress_without_content() {
        let node = auth_gate(&AuthStatus::Loading, || unreachable!("content built while loading"));
        assert_eq!(node.tag(), Some("Progress"));
    }

    #[test]
    fn failure_renders_error_panel() {
        let node = auth_gate(&AuthStatus::Failed("boom".into()), || {
            unreachable!("content built after failure")
        });
        assert_eq!(node.tag(), Some("ErrorPanel"));
        assert_eq!(node.children(), &[Node::text("boom")]);
    }

    #[test]
    fn ready_renders_content() {
        let status = AuthStatus::Ready(Credential::new(Utc::now()));
        let node = auth_gate(&status, || Element::new("article").into());
        assert_eq!(node.tag(), Some("article"));
    }
}
