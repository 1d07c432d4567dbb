// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::config::PortalConfig;
use crate::proxy::WebsiteProxy;

/// Shared portal state.
pub struct PortalState {
    pub config: PortalConfig,
    pub proxy: WebsiteProxy,
}

impl PortalState {
    pub fn new(config: PortalConfig) -> anyhow::Result<Self> {
        let proxy = WebsiteProxy::new(&config.proxy_route, config.upstream_timeout())?;
        Ok(Self { config, proxy })
    }
}
