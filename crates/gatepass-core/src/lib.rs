//! gatepass-core - client library for an event ticketing and check-in service.
//!
//! Provides the authenticated API client, bearer token storage, typed
//! request/response models, and configuration shared by front-ends.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError, Capability, ErrorKind};
pub use auth::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, Session, StoreError, TokenStore};
pub use config::Config;
