//! Request dispatch and response decoding.
//!
//! # Design
//! `PCloudClient` holds only its transport and carries no mutable state
//! between calls. The endpoint wrappers live in `crate::api`, one `impl`
//! block per functional group, and all of them funnel through the three
//! decode paths here:
//!
//! - `json`: parse the body and return it unchanged, `result` code included.
//! - `checked`: parse the body and turn a non-zero `result` into
//!   `ApiError::Api`.
//! - `bytes`: return the body verbatim; never parsed.
//!
//! A non-2xx HTTP status is an error on every path.

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::params::Params;
use crate::transport::{ReqwestTransport, Transport};

/// Client for the pCloud API.
///
/// Generic over the transport so tests can record requests instead of
/// sending them.
#[derive(Debug, Clone)]
pub struct PCloudClient<T = ReqwestTransport> {
    transport: T,
}

impl PCloudClient<ReqwestTransport> {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::with_transport(ReqwestTransport::new(config)?))
    }

    /// Client configured from `PCLOUD_*` environment variables.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(ClientConfig::from_env()?)
    }
}

impl<T: Transport> PCloudClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends a prepared request and returns the undecoded response.
    pub fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(
            endpoint = %request.endpoint,
            method = request.method.as_str(),
            params = request.params.len(),
            "pcloud request"
        );
        self.transport.execute(request)
    }

    pub fn json(&self, request: HttpRequest) -> Result<Value, ApiError> {
        parse_json(self.send(request)?)
    }

    pub fn checked(&self, request: HttpRequest) -> Result<Value, ApiError> {
        let context = request.endpoint.clone();
        parse_checked(&context, self.send(request)?)
    }

    pub fn bytes(&self, request: HttpRequest) -> Result<Vec<u8>, ApiError> {
        parse_bytes(self.send(request)?)
    }

    pub(crate) fn get_json(&self, endpoint: &str, params: Params) -> Result<Value, ApiError> {
        self.json(HttpRequest::get(endpoint, params))
    }

    pub(crate) fn get_checked(&self, endpoint: &str, params: Params) -> Result<Value, ApiError> {
        self.checked(HttpRequest::get(endpoint, params))
    }

    pub(crate) fn get_bytes(&self, endpoint: &str, params: Params) -> Result<Vec<u8>, ApiError> {
        self.bytes(HttpRequest::get(endpoint, params))
    }
}

/// Map a non-2xx status to `ApiError::HttpError`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.text(),
    })
}

pub fn parse_json(response: HttpResponse) -> Result<Value, ApiError> {
    check_status(&response)?;
    serde_json::from_slice(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

pub fn parse_checked(context: &str, response: HttpResponse) -> Result<Value, ApiError> {
    let value = parse_json(response)?;
    let result = result_code(&value);
    if result != 0 {
        let error = value
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error")
            .to_string();
        warn!(context, result, error = %error, "pcloud call failed");
        return Err(ApiError::Api {
            context: context.to_string(),
            result,
            error,
        });
    }
    Ok(value)
}

pub fn parse_bytes(response: HttpResponse) -> Result<Vec<u8>, ApiError> {
    check_status(&response)?;
    Ok(response.body)
}

/// The payload's `result` code; a missing code counts as success.
pub fn result_code(value: &Value) -> i64 {
    value.get("result").and_then(Value::as_i64).unwrap_or(0)
}

/// Takes `key` out of a decoded payload, or `fallback` when it is absent.
pub(crate) fn take_field(mut value: Value, key: &str, fallback: Value) -> Value {
    value
        .as_object_mut()
        .and_then(|obj| obj.remove(key))
        .unwrap_or(fallback)
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::http::HttpMethod;

    #[test]
    fn json_returns_error_payload_unchanged() {
        let c = client();
        c.transport()
            .respond(200, r#"{"result":2005,"error":"Directory does not exist."}"#);
        let value = c.get_json("listfolder", Params::new().with("folderid", 9)).unwrap();
        assert_eq!(result_code(&value), 2005);
        assert_eq!(value["error"], "Directory does not exist.");
    }

    #[test]
    fn checked_converts_nonzero_result() {
        let c = client();
        c.transport()
            .respond(200, r#"{"result":1000,"error":"Log in required."}"#);
        let err = c.get_checked("userinfo", Params::new()).unwrap_err();
        match err {
            ApiError::Api {
                context,
                result,
                error,
            } => {
                assert_eq!(context, "userinfo");
                assert_eq!(result, 1000);
                assert_eq!(error, "Log in required.");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn checked_without_error_message() {
        let c = client();
        c.transport().respond(200, r#"{"result":5000}"#);
        let err = c.get_checked("getip", Params::new()).unwrap_err();
        assert!(matches!(err, ApiError::Api { ref error, .. } if error == "Unknown error"));
    }

    #[test]
    fn bytes_skip_json_decoding() {
        let c = client();
        let png = vec![0x89, b'P', b'N', b'G', 0x00, 0xff];
        c.transport().respond(200, png.clone());
        let body = c.get_bytes("getthumb", Params::new()).unwrap();
        assert_eq!(body, png);
    }

    #[test]
    fn non_success_status_is_http_error() {
        let c = client();
        c.transport().respond(503, "maintenance");
        let err = c.get_bytes("getzip", Params::new()).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 503, ref body } if body == "maintenance"));

        c.transport().respond(404, "");
        let err = c.get_json("stat", Params::new()).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 404, .. }));
    }

    #[test]
    fn bad_json_is_deserialization_error() {
        let c = client();
        c.transport().respond(200, "not json");
        let err = c.get_json("stat", Params::new()).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn get_requests_have_no_body() {
        let c = client();
        c.get_json("getip", Params::new()).unwrap();
        let req = c.transport().last();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.body, crate::http::RequestBody::Empty);
    }

    #[test]
    fn take_field_falls_back() {
        let value: Value = serde_json::json!({"result": 0, "tokens": [1, 2]});
        assert_eq!(take_field(value.clone(), "tokens", Value::Null), serde_json::json!([1, 2]));
        assert_eq!(take_field(value, "missing", serde_json::json!([])), serde_json::json!([]));
    }
}
