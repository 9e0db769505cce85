pub mod auth;
pub mod error;
pub mod health;
pub mod openapi;
pub mod predict;

pub use auth::ApiKeyVerifier;
pub use error::ApiError;
