//! REST API client module for the ticketing service.
//!
//! This module provides the `ApiClient` for calling the service's auth,
//! profile, ticket, and check-in endpoints, the `Capability` table that maps
//! each operation to its method and path, and `ErrorKind` for turning a
//! failed call into something a caller can branch on.
//!
//! The service uses bearer token authentication. The token is obtained from
//! the login endpoint and read from a `TokenStore` before every request.

pub mod capability;
pub mod classify;
pub mod client;
pub mod error;

pub use capability::Capability;
pub use classify::ErrorKind;
pub use client::ApiClient;
pub use error::ApiError;
