//! Asset ingress and the remote asset host it talks to.

pub mod asset_host;
pub mod cloudinary;
pub mod data_uri;
pub mod ingress;

pub use asset_host::{AssetHost, AssetHostError, ResourceType, UploadOptions, UploadedAsset};
pub use cloudinary::CloudinaryClient;
pub use data_uri::to_data_uri;
pub use ingress::{AssetIngress, UploadPart, UploadResponse};
