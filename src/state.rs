use std::sync::Arc;

use storehub_config::{AuthConfig, CorsConfig, SessionConfig};
use storehub_observability::PrometheusHandle;

use crate::store::{DashboardRepository, RoleRepository, UserRepository};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub roles: Arc<dyn RoleRepository>,
    pub dashboard: Arc<dyn DashboardRepository>,
    pub auth_config: AuthConfig,
    pub session_config: SessionConfig,
    pub cors_config: CorsConfig,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// State over a single store implementing every repository, with
    /// default configuration.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserRepository + RoleRepository + DashboardRepository + 'static,
    {
        Self {
            users: store.clone(),
            roles: store.clone(),
            dashboard: store,
            auth_config: AuthConfig::default(),
            session_config: SessionConfig::default(),
            cors_config: CorsConfig::default(),
            metrics: None,
        }
    }

    pub fn with_auth_config(mut self, config: AuthConfig) -> Self {
        self.auth_config = config;
        self
    }

    pub fn with_session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    pub fn with_cors_config(mut self, config: CorsConfig) -> Self {
        self.cors_config = config;
        self
    }

    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }
}
