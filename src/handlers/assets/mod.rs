// handlers/assets/mod.rs - Asset upload handlers
//
// Thin HTTP layer over services::ingress::AssetIngress: pulls the file out of
// the multipart body and maps the ingress result onto a JSON response.

pub mod upload;

pub use upload::upload_asset;
