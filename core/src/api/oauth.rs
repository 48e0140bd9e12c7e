//! OAuth 2.0 code flow.

use reqwest::Url;
use serde_json::Value;

use crate::client::PCloudClient;
use crate::error::ApiError;
use crate::params::{require_str, Params};
use crate::transport::Transport;

pub const AUTHORIZE_URL: &str = "https://my.pcloud.com/oauth2/authorize";

/// URL of the consent page that hands a `code` back to the application.
pub fn authorize_url(client_id: &str, redirect_uri: Option<&str>, state: Option<&str>) -> Result<String, ApiError> {
    let mut pairs = vec![
        ("response_type", "code"),
        ("client_id", require_str("client_id", client_id)?),
    ];
    if let Some(uri) = redirect_uri {
        pairs.push(("redirect_uri", uri));
    }
    if let Some(state) = state {
        pairs.push(("state", state));
    }
    Url::parse_with_params(AUTHORIZE_URL, &pairs)
        .map(String::from)
        .map_err(|e| ApiError::SerializationError(e.to_string()))
}

impl<T: Transport> PCloudClient<T> {
    /// Exchanges an authorization code for an access token.
    pub fn oauth2_token(&self, client_id: &str, client_secret: &str, code: &str) -> Result<Value, ApiError> {
        let params = Params::new()
            .with("client_id", require_str("client_id", client_id)?)
            .with("client_secret", require_str("client_secret", client_secret)?)
            .with("code", require_str("code", code)?);
        self.get_json("oauth2_token", params)
    }
}
