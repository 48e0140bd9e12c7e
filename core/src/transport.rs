//! Transport seam between request building and the network.
//!
//! `PCloudClient` is generic over `Transport`, so tests can substitute a
//! recorder and applications can bring their own HTTP stack. The bundled
//! `ReqwestTransport` sends requests with a blocking `reqwest` client.

use std::sync::Arc;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{FilePart, HttpMethod, HttpRequest, HttpResponse, RequestBody};

/// Executes one request and returns the raw response.
///
/// Implementations must not interpret the status or body; non-2xx responses
/// are returned as data. `Err` is reserved for failures that produced no
/// response at all.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// Blocking HTTP transport over `reqwest`.
///
/// The base URL, bearer token, user agent and timeout come from
/// `ClientConfig` and apply to every request.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
    config: ClientConfig,
}

impl ReqwestTransport {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        config.validate()?;
        let mut builder = reqwest::blocking::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = self.config.endpoint_url(&request.endpoint);
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
        };
        let query: Vec<(&str, &str)> = request.params.iter().collect();

        let mut builder = self.client.request(method, &url).query(&query);
        if let Some(token) = &self.config.access_token {
            builder = builder.bearer_auth(token);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Bytes(data) => builder
                .header(CONTENT_TYPE, "application/octet-stream")
                .body(data),
            RequestBody::Multipart(files) => builder.multipart(build_form(files)?),
        };

        let response = builder
            .send()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .map_err(|e| ApiError::Transport(e.to_string()))?
            .to_vec();
        debug!(url = %url, status, bytes = body.len(), "pcloud response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn build_form(files: Vec<FilePart>) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for file in files {
        let handle = std::fs::File::open(&file.source)?;
        let len = handle.metadata()?.len();
        let part = Part::reader_with_length(handle, len).file_name(file.filename);
        form = form.part(file.field, part);
    }
    Ok(form)
}
