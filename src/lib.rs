// eBay REST client - library root

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http_client;
pub mod models;
pub mod pagination;
pub mod resources;
pub mod utils;

pub use client::{ClientSettings, EbayClient};
pub use error::{ApiError, ErrorKind, Result};
