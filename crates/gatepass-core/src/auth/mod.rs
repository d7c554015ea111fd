//! Authentication module for token storage and the session lifecycle.
//!
//! This module provides:
//! - `TokenStore`: the storage seam the API client reads its bearer token from
//! - `FileTokenStore`, `KeyringTokenStore`, `MemoryTokenStore`: backends
//! - `Session`: logout and rejected-token handling for callers
//! - `validate`: form input checks run before a request is made

pub mod credentials;
pub mod session;
pub mod store;
pub mod validate;

pub use credentials::KeyringTokenStore;
pub use session::{FileTokenStore, Session, SessionData};
pub use store::{MemoryTokenStore, StoreError, TokenStore, TOKEN_KEY};
pub use validate::ValidationError;
