// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Wiring from configuration to a ready session, navigator and API client.

use std::path::Path;
use std::sync::Arc;

use anyhow::anyhow;
use estate_auth::{
    FileStorage, MemoryStorage, Navigation, Navigator, RestoreOutcome, RouteTable, SessionStore,
};
use estate_client::ApiClient;
use estate_config::{ConfigLoader, EstateConfig, NavigationConfig, SessionBackend, SessionConfig};
use tracing::{debug, warn};

use crate::error::{BinError, BinResult};

/// Everything a command needs to talk to the API.
#[derive(Debug)]
pub struct AppContext {
    /// Effective configuration.
    pub config: EstateConfig,
    /// Role-gated navigator over the live session.
    pub navigator: Navigator,
    /// API client sharing the same session.
    pub client: ApiClient,
}

impl AppContext {
    /// Builds the context from a loaded configuration.
    ///
    /// Restores the persisted session before anything else reads it.
    pub fn from_config(config: EstateConfig) -> BinResult<Self> {
        let store = Arc::new(open_session(&config.session)?);
        match store.restore_outcome() {
            RestoreOutcome::Cleared(reason) => {
                warn!(reason = reason.as_str(), "Stored session discarded")
            }
            RestoreOutcome::Unavailable => warn!("Session storage unavailable, starting logged out"),
            outcome => debug!(?outcome, "Session restored"),
        }

        let routes = build_routes(&config.navigation)?;
        let navigator = Navigator::new(Arc::clone(&store), routes);
        let client = ApiClient::from_config(&config.api, store)?;

        Ok(Self {
            config,
            navigator,
            client,
        })
    }

    /// Returns the session store.
    pub fn store(&self) -> &Arc<SessionStore> {
        self.navigator.store()
    }

    /// Navigates to a guarded route and fails unless it is allowed.
    pub fn require(&self, route: &str) -> BinResult<()> {
        match self.navigator.navigate(route) {
            Navigation::Allowed { .. } => Ok(()),
            Navigation::Redirected { to } => Err(BinError::forbidden(route, to)),
        }
    }
}

/// Loads the configuration, falling back to defaults when the file is missing.
pub fn load_config(path: &Path) -> BinResult<EstateConfig> {
    Ok(ConfigLoader::new().load_or_default(path)?)
}

/// Opens the configured storage backend and restores the session from it.
pub fn open_session(config: &SessionConfig) -> BinResult<SessionStore> {
    let store = match config.backend {
        SessionBackend::Memory => SessionStore::restore(MemoryStorage::new()),
        SessionBackend::File => {
            let path = config
                .effective_path()
                .ok_or_else(|| anyhow!("no home directory; set session.path"))?;
            debug!(path = %path.display(), "Using file session storage");
            SessionStore::restore(FileStorage::new(path))
        }
    };
    Ok(store)
}

/// Builds the standard route table with the configured overrides applied.
pub fn build_routes(config: &NavigationConfig) -> BinResult<RouteTable> {
    let mut routes = RouteTable::standard().with_fallback(config.fallback.clone());
    for (pattern, required) in &config.guards {
        routes.set_guard(pattern, *required)?;
        debug!(route = %pattern, required = %required, "Route guard overridden");
    }
    Ok(routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use estate_auth::RouteError;
    use estate_core::{Role, RoleSet};

    #[test]
    fn test_build_routes_applies_overrides() {
        let mut config = NavigationConfig {
            fallback: "/login".into(),
            ..NavigationConfig::default()
        };
        config
            .guards
            .insert("/favorites".into(), RoleSet::of(&[Role::Buyer]));

        let routes = build_routes(&config).unwrap();
        assert_eq!(routes.fallback(), "/login");
        assert_eq!(
            routes.get("/favorites").map(|r| r.required()),
            Some(RoleSet::of(&[Role::Buyer]))
        );
        assert_eq!(
            routes.get("/admin/users").map(|r| r.required()),
            Some(RoleSet::of(&[Role::Admin]))
        );
    }

    #[test]
    fn test_build_routes_rejects_unknown_route() {
        let mut config = NavigationConfig::default();
        config.guards.insert("/reports".into(), RoleSet::public());

        let err = build_routes(&config).unwrap_err();
        assert!(matches!(err, BinError::Route(RouteError::UnknownRoute { .. })));
    }

    #[test]
    fn test_logged_out_context_is_denied() {
        let mut config = EstateConfig::default();
        config.session.backend = SessionBackend::Memory;

        let ctx = AppContext::from_config(config).unwrap();
        assert!(!ctx.store().is_authenticated());
        ctx.require("/favorites").unwrap();

        let err = ctx.require("/manage-properties").unwrap_err();
        assert!(matches!(err, BinError::Forbidden { ref redirect, .. } if redirect == "/"));
    }

    #[test]
    fn test_file_session_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = SessionConfig {
            backend: SessionBackend::File,
            path: Some(dir.path().join("session.json")),
        };
        let store = open_session(&config).unwrap();
        assert_eq!(store.backend(), "file");
        assert_eq!(store.restore_outcome(), RestoreOutcome::Empty);
    }
}
