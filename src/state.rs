use std::sync::Arc;

use crate::auth::{AccessPolicy, IdentityProvider, JwtIdentityProvider};
use crate::config::AppConfig;
use crate::services::{AssetHost, AssetIngress, CloudinaryClient};

/// Shared, immutable state handed to every handler and middleware
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub ingress: AssetIngress,
    pub identity: Arc<dyn IdentityProvider>,
    pub policy: Arc<AccessPolicy>,
}

impl AppState {
    /// Wire production collaborators from configuration
    pub fn from_config(config: AppConfig) -> Self {
        let host: Arc<dyn AssetHost> = Arc::new(CloudinaryClient::new(&config.assets));
        let identity: Arc<dyn IdentityProvider> = Arc::new(JwtIdentityProvider::new(
            config.auth.jwt_secret.clone(),
            config.auth.session_cookie.clone(),
        ));
        Self::new(config, host, identity)
    }

    /// Build state around explicit collaborators, e.g. test doubles
    pub fn new(config: AppConfig, host: Arc<dyn AssetHost>, identity: Arc<dyn IdentityProvider>) -> Self {
        let policy = AccessPolicy::new(config.auth.login_path.clone(), &config.auth.public_paths);
        let ingress = AssetIngress::new(host, config.assets.folder.clone());

        Self {
            config: Arc::new(config),
            ingress,
            identity,
            policy: Arc::new(policy),
        }
    }
}
