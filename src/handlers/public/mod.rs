// handlers/public/mod.rs - Public handlers (no session required)
//
// Health only. It never touches the asset host or the identity provider over
// the network; it only reports whether they are configured.

pub mod health;

pub use health::health;
