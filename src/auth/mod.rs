// Authentication module
// Application token lifecycle and the user (authorization code) flow

mod manager;
pub mod oauth;
mod types;

pub use manager::AuthManager;
pub use types::{
    CachedToken, Endpoints, Environment, TokenResponse, APPLICATION_SCOPE, DEFAULT_EXPIRES_IN,
    DEFAULT_USER_SCOPES, EXPIRY_BUFFER_SECS,
};
