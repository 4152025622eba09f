// handlers/mod.rs - HTTP handlers
//
// Public (no session needed) → Assets (file upload forwarding)
//
// Page navigations are not handled here: they fall through to the static
// pages service, which sits behind the access guard middleware.
pub mod assets; // POST /api/upload-asset
pub mod public; // GET /health

pub use assets::upload_asset;
pub use public::health;
