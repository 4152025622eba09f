pub mod auth;

pub use auth::access_guard_middleware;
