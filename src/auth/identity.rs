use axum::http::HeaderMap;

use super::{validate_session_token, SessionIdentity};

/// Source of the current session identity.
///
/// A single read: either the signed-in user or nothing. Implementations must
/// not fail and must not perform network I/O, since the access guard calls
/// this on every page navigation.
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self, headers: &HeaderMap) -> Option<SessionIdentity>;
}

/// Reads a Supabase access token from the session cookie or a Bearer header
#[derive(Debug, Clone)]
pub struct JwtIdentityProvider {
    secret: String,
    cookie_name: String,
}

impl JwtIdentityProvider {
    pub fn new(secret: impl Into<String>, cookie_name: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            cookie_name: cookie_name.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.secret.is_empty()
    }
}

impl IdentityProvider for JwtIdentityProvider {
    fn current_user(&self, headers: &HeaderMap) -> Option<SessionIdentity> {
        let token = extract_bearer_token(headers).or_else(|| extract_cookie(headers, &self.cookie_name))?;

        match validate_session_token(&token, &self.secret) {
            Ok(claims) => Some(claims.into()),
            Err(e) => {
                tracing::debug!("Ignoring session token: {}", e);
                None
            }
        }
    }
}

/// Extract token from an `Authorization: Bearer` header
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers.get("authorization")?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Find a named cookie across all `Cookie` headers
fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all("cookie")
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

pub mod mock {
    use super::*;

    /// Identity provider that always answers with the same identity
    #[derive(Debug, Clone, Default)]
    pub struct FixedIdentity(pub Option<SessionIdentity>);

    impl FixedIdentity {
        pub fn anonymous() -> Self {
            Self(None)
        }

        pub fn signed_in(identity: SessionIdentity) -> Self {
            Self(Some(identity))
        }
    }

    impl IdentityProvider for FixedIdentity {
        fn current_user(&self, _headers: &HeaderMap) -> Option<SessionIdentity> {
            self.0.clone()
        }
    }
}
