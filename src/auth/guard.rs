//! Navigation access guard.
//!
//! Decides, per page navigation, whether the visitor may continue or must be
//! sent to the login page. The decision only looks at the destination path
//! and whether a session identity is present.

use super::SessionIdentity;

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Let the navigation continue unmodified
    Proceed,
    /// Abort the navigation and start a new one toward this path
    Redirect(String),
}

/// A path that unauthenticated visitors may reach
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// `/register`
    Exact(String),
    /// `/share/*` - exactly one segment below the prefix
    Segment(String),
    /// `/share/**` - anything below the prefix
    Subtree(String),
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        if let Some(prefix) = pattern.strip_suffix("/**") {
            PathPattern::Subtree(format!("{}/", prefix))
        } else if let Some(prefix) = pattern.strip_suffix("/*") {
            PathPattern::Segment(format!("{}/", prefix))
        } else {
            PathPattern::Exact(pattern.to_string())
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(p) => path == p,
            PathPattern::Segment(prefix) => path
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| !rest.is_empty() && !rest.contains('/')),
            PathPattern::Subtree(prefix) => path
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| !rest.is_empty()),
        }
    }
}

/// Which paths need a session, and where to send visitors who lack one
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    login_path: String,
    public_paths: Vec<PathPattern>,
}

impl AccessPolicy {
    /// Only the login page is reachable without a session
    pub fn login_only(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
            public_paths: Vec::new(),
        }
    }

    pub fn new<I, S>(login_path: impl Into<String>, public_paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            login_path: login_path.into(),
            public_paths: public_paths
                .into_iter()
                .map(|p| PathPattern::parse(p.as_ref()))
                .collect(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// True when `path` can be visited without a session
    pub fn is_public(&self, path: &str) -> bool {
        path == self.login_path || self.public_paths.iter().any(|p| p.matches(path))
    }

    /// Decide a navigation from `_from` to `to`.
    ///
    /// `_from` is accepted for parity with the navigation hook but does not
    /// influence the decision.
    pub fn check(&self, to: &str, _from: Option<&str>, identity: Option<&SessionIdentity>) -> GuardDecision {
        if identity.is_none() && !self.is_public(to) {
            return GuardDecision::Redirect(self.login_path.clone());
        }
        GuardDecision::Proceed
    }
}
