//! Endpoint wrappers, one module per functional group of the pCloud API.
//!
//! Each module adds an `impl<T: Transport> PCloudClient<T>` block. Methods
//! are named after the remote method they call. Operations with optional
//! arguments take a request struct whose `params()` builds and validates the
//! query without touching the transport.

pub mod archiving;
pub mod auth;
pub mod collection;
pub mod file;
pub mod folder;
pub mod general;
pub mod oauth;
pub mod publinks;
pub mod revisions;
pub mod sharing;
pub mod streaming;
pub mod thumbnails;
pub mod transfer;
pub mod trash;
pub mod upload;
pub mod uploadlinks;
