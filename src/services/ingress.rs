use std::sync::Arc;

use axum::body::Bytes;
use serde::Serialize;

use super::asset_host::{AssetHost, AssetHostError, UploadOptions};
use super::data_uri::to_data_uri;
use crate::error::ApiError;

/// Message returned when the request carries no usable file
pub const NO_FILE_MESSAGE: &str = "未找到文件。";

/// Prefix of the message returned when the remote upload fails
pub const UPLOAD_FAILED_PREFIX: &str = "上传失败: ";

/// One part lifted out of a multipart body
#[derive(Debug, Clone)]
pub struct UploadPart {
    pub name: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Body of a successful upload: the asset's HTTPS URL and nothing else
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Forwards uploaded files to the remote asset host
#[derive(Clone)]
pub struct AssetIngress {
    host: Arc<dyn AssetHost>,
    options: UploadOptions,
}

impl AssetIngress {
    pub fn new(host: Arc<dyn AssetHost>, folder: impl Into<String>) -> Self {
        Self {
            host,
            options: UploadOptions::auto(folder),
        }
    }

    /// Upload one file part and return its durable URL.
    ///
    /// Makes at most one remote call and never retries.
    pub async fn ingest(&self, part: Option<UploadPart>) -> Result<UploadResponse, ApiError> {
        let part = match part {
            Some(part) if !part.data.is_empty() => part,
            _ => return Err(ApiError::bad_request(NO_FILE_MESSAGE)),
        };

        tracing::debug!(
            "Ingesting upload field={:?} file={:?} type={:?} size={}",
            part.name,
            part.file_name,
            part.content_type,
            part.data.len()
        );

        // The part (and its bytes) is dropped here; only the encoded copy goes out.
        let data_uri = to_data_uri(&part.data, part.content_type.as_deref());
        drop(part);

        match self.host.upload(&data_uri, &self.options).await {
            Ok(asset) => Ok(UploadResponse { url: asset.secure_url }),
            Err(AssetHostError::NotConfigured(field)) => {
                tracing::error!("Asset host is not configured (missing {}), cannot upload", field);
                Err(ApiError::internal_server_error("Internal server error"))
            }
            Err(e) => {
                tracing::error!("Asset upload failed: {:?}", e);
                Err(ApiError::internal_server_error(format!("{}{}", UPLOAD_FAILED_PREFIX, e.message())))
            }
        }
    }
}
