//! Synchronous client for the pCloud REST API.
//!
//! # Overview
//! Every remote method is a plain function call on `PCloudClient`. Arguments
//! are validated and flattened into a query map before anything is sent; the
//! response comes back as a JSON `Value`, or as raw bytes for downloads such
//! as `getzip`, `getthumb` and `gettextfile`.
//!
//! # Design
//! - `params` resolves the optional-argument rules (id-or-path locators,
//!   destination combinations, required values) with no I/O at all.
//! - `http` describes requests and responses as data; `transport` is the one
//!   seam that performs I/O, with a `reqwest` implementation by default.
//! - `client` decodes responses three ways (json, checked, bytes); `api` adds
//!   the endpoint wrappers, grouped the way the service documents them.
//!
//! ```no_run
//! use pcloud_core::{ClientConfig, PCloudClient};
//! use pcloud_core::api::folder::ListFolder;
//!
//! # fn main() -> Result<(), pcloud_core::ApiError> {
//! let client = PCloudClient::new(ClientConfig::default().with_access_token("token"))?;
//! let root = client.listfolder(&ListFolder::new(0u64))?;
//! println!("{}", root["metadata"]["name"]);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod params;
pub mod transport;

pub use client::PCloudClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{FilePart, HttpMethod, HttpRequest, HttpResponse, RequestBody};
pub use params::{Destination, DestinationRule, Locator, Params};
pub use transport::{ReqwestTransport, Transport};
