//! Cloudinary upload client.
//!
//! Talks to the signed upload endpoint
//! `POST {api_base_url}/{cloud_name}/{resource_type}/upload`.
//! Each call is a single attempt; timeouts are whatever reqwest defaults to.

use async_trait::async_trait;
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use url::Url;

use super::asset_host::{AssetHost, AssetHostError, UploadOptions, UploadedAsset};
use crate::config::{AssetsConfig, SignatureAlgorithm};

#[derive(Debug, Clone)]
pub struct CloudinaryClient {
    http: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    api_base_url: String,
    signature_algorithm: SignatureAlgorithm,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl CloudinaryClient {
    pub fn new(config: &AssetsConfig) -> Self {
        Self::with_http_client(reqwest::Client::new(), config)
    }

    pub fn with_http_client(http: reqwest::Client, config: &AssetsConfig) -> Self {
        Self {
            http,
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            api_base_url: config.api_base_url.clone(),
            signature_algorithm: config.signature_algorithm,
        }
    }

    fn ensure_configured(&self) -> Result<(), AssetHostError> {
        if self.cloud_name.is_empty() {
            return Err(AssetHostError::NotConfigured("cloud_name"));
        }
        if self.api_key.is_empty() {
            return Err(AssetHostError::NotConfigured("api_key"));
        }
        if self.api_secret.is_empty() {
            return Err(AssetHostError::NotConfigured("api_secret"));
        }
        Ok(())
    }

    fn upload_url(&self, options: &UploadOptions) -> Result<Url, AssetHostError> {
        let mut url = Url::parse(&self.api_base_url)
            .map_err(|e| AssetHostError::Other(format!("invalid Cloudinary API URL '{}': {}", self.api_base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| AssetHostError::Other(format!("Cloudinary API URL '{}' cannot take a path", self.api_base_url)))?
            .pop_if_empty()
            .extend([self.cloud_name.as_str(), options.resource_type.as_str(), "upload"]);

        Ok(url)
    }
}

/// Build the `key=value&...` string Cloudinary signs: keys sorted, empty values dropped
pub fn string_to_sign(params: &[(&str, String)]) -> String {
    let mut signed: Vec<&(&str, String)> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    signed.sort_by(|a, b| a.0.cmp(b.0));

    signed
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Hex digest of the string to sign followed by the API secret
pub fn sign(params: &[(&str, String)], api_secret: &str, algorithm: SignatureAlgorithm) -> String {
    let payload = format!("{}{}", string_to_sign(params), api_secret);
    match algorithm {
        SignatureAlgorithm::Sha1 => hex::encode(Sha1::digest(payload.as_bytes())),
        SignatureAlgorithm::Sha256 => hex::encode(Sha256::digest(payload.as_bytes())),
    }
}

#[async_trait]
impl AssetHost for CloudinaryClient {
    async fn upload(&self, data_uri: &str, options: &UploadOptions) -> Result<UploadedAsset, AssetHostError> {
        self.ensure_configured()?;
        let url = self.upload_url(options)?;

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signed_params = [("folder", options.folder.clone()), ("timestamp", timestamp.clone())];
        let signature = sign(&signed_params, &self.api_secret, self.signature_algorithm);

        let mut form: Vec<(&str, &str)> = vec![
            ("file", data_uri),
            ("timestamp", timestamp.as_str()),
            ("api_key", self.api_key.as_str()),
            ("signature", signature.as_str()),
        ];
        if !options.folder.is_empty() {
            form.push(("folder", options.folder.as_str()));
        }
        if self.signature_algorithm == SignatureAlgorithm::Sha256 {
            form.push(("signature_algorithm", "sha256"));
        }

        tracing::debug!("Uploading {} bytes of data URI to {}", data_uri.len(), url);

        let response = self.http.post(url).form(&form).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ErrorBody>(&body) {
                Ok(parsed) => parsed.error.message,
                Err(_) if body.trim().is_empty() => format!("Cloudinary responded with {}", status),
                Err(_) => body,
            };
            return Err(AssetHostError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let asset = response.json::<UploadedAsset>().await?;
        Ok(asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AssetsConfig {
        AssetsConfig {
            cloud_name: "demo".into(),
            api_key: "1234".into(),
            api_secret: "abcd".into(),
            folder: "supermap_notes".into(),
            api_base_url: "https://api.cloudinary.com/v1_1".into(),
            signature_algorithm: SignatureAlgorithm::Sha1,
        }
    }

    #[test]
    fn string_to_sign_sorts_and_skips_empty() {
        let params = [
            ("timestamp", "1315060510".to_string()),
            ("public_id", "".to_string()),
            ("folder", "supermap_notes".to_string()),
        ];
        assert_eq!(string_to_sign(&params), "folder=supermap_notes&timestamp=1315060510");
    }

    #[test]
    fn signature_lengths_follow_algorithm() {
        let params = [("timestamp", "1315060510".to_string())];
        let sha1 = sign(&params, "abcd", SignatureAlgorithm::Sha1);
        let sha256 = sign(&params, "abcd", SignatureAlgorithm::Sha256);
        assert_eq!(sha1.len(), 40);
        assert_eq!(sha256.len(), 64);
        assert!(sha1.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn signature_depends_on_secret() {
        let params = [("timestamp", "1315060510".to_string())];
        assert_ne!(
            sign(&params, "abcd", SignatureAlgorithm::Sha1),
            sign(&params, "efgh", SignatureAlgorithm::Sha1)
        );
    }

    #[test]
    fn upload_url_includes_cloud_and_resource_type() {
        let client = CloudinaryClient::new(&config());
        let url = client.upload_url(&UploadOptions::auto("supermap_notes")).unwrap();
        assert_eq!(url.as_str(), "https://api.cloudinary.com/v1_1/demo/auto/upload");
    }

    #[test]
    fn trailing_slash_in_base_url_is_tolerated() {
        let mut cfg = config();
        cfg.api_base_url = "http://127.0.0.1:9000/v1_1/".into();
        let client = CloudinaryClient::new(&cfg);
        let url = client.upload_url(&UploadOptions::auto("x")).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/v1_1/demo/auto/upload");
    }

    #[tokio::test]
    async fn missing_credentials_fail_before_any_request() {
        let mut cfg = config();
        cfg.api_secret = String::new();
        // Unroutable base URL: reaching the network would surface a transport error instead
        cfg.api_base_url = "http://127.0.0.1:1".into();
        let client = CloudinaryClient::new(&cfg);

        let err = client
            .upload("data:text/plain;base64,aGk=", &UploadOptions::auto("supermap_notes"))
            .await
            .unwrap_err();
        assert!(matches!(err, AssetHostError::NotConfigured("api_secret")));
    }
}
