use async_trait::async_trait;
use serde::Deserialize;

/// How the remote host should classify the upload. Uploads always let the
/// host detect the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Auto,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Auto => "auto",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    pub resource_type: ResourceType,
    pub folder: String,
}

impl UploadOptions {
    /// Auto-detected resource type into a fixed folder
    pub fn auto(folder: impl Into<String>) -> Self {
        Self {
            resource_type: ResourceType::Auto,
            folder: folder.into(),
        }
    }
}

/// What the remote host reports for a stored asset; other response fields are ignored
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedAsset {
    pub secure_url: String,
}

impl UploadedAsset {
    pub fn new(secure_url: impl Into<String>) -> Self {
        Self {
            secure_url: secure_url.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssetHostError {
    /// Credentials are missing, so the client cannot talk to the host at all
    #[error("asset host not configured: missing {0}")]
    NotConfigured(&'static str),
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    /// The host answered with an error body
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("{0}")]
    Other(String),
}

impl AssetHostError {
    /// Human-readable message, safe to embed in a client-facing error
    pub fn message(&self) -> String {
        match self {
            AssetHostError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Remote service that durably stores uploaded assets
#[async_trait]
pub trait AssetHost: Send + Sync {
    async fn upload(&self, data_uri: &str, options: &UploadOptions) -> Result<UploadedAsset, AssetHostError>;
}

pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Debug)]
    enum Outcome {
        Stored(String),
        Failed(String),
        NotConfigured(&'static str),
    }

    /// Asset host double that records calls and answers from a script
    #[derive(Debug)]
    pub struct RecordingAssetHost {
        outcome: Outcome,
        calls: AtomicUsize,
        last: Mutex<Option<(String, UploadOptions)>>,
    }

    impl RecordingAssetHost {
        /// Every upload succeeds with `secure_url`
        pub fn returning(secure_url: impl Into<String>) -> Self {
            Self::with_outcome(Outcome::Stored(secure_url.into()))
        }

        /// Every upload fails with `message`
        pub fn failing(message: impl Into<String>) -> Self {
            Self::with_outcome(Outcome::Failed(message.into()))
        }

        /// Every upload reports the credential `field` as missing
        pub fn unconfigured(field: &'static str) -> Self {
            Self::with_outcome(Outcome::NotConfigured(field))
        }

        fn with_outcome(outcome: Outcome) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// Data URI and options of the most recent upload
        pub fn last_upload(&self) -> Option<(String, UploadOptions)> {
            self.last.lock().ok().and_then(|last| last.clone())
        }
    }

    #[async_trait]
    impl AssetHost for RecordingAssetHost {
        async fn upload(&self, data_uri: &str, options: &UploadOptions) -> Result<UploadedAsset, AssetHostError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut last) = self.last.lock() {
                *last = Some((data_uri.to_string(), options.clone()));
            }

            match &self.outcome {
                Outcome::Stored(url) => Ok(UploadedAsset::new(url.clone())),
                Outcome::Failed(message) => Err(AssetHostError::Other(message.clone())),
                Outcome::NotConfigured(field) => Err(AssetHostError::NotConfigured(field)),
            }
        }
    }
}
