//! Account and server information.
//!
//! Unlike most groups, every call here is checked: a non-zero `result`
//! comes back as `ApiError::Api`.

use serde_json::{json, Value};

use crate::client::{take_field, PCloudClient};
use crate::error::ApiError;
use crate::params::{require_id, require_str, Params};
use crate::transport::Transport;

/// Options for `diff`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    /// Return events after this diff id.
    pub diffid: Option<u64>,
    /// Return events after this datetime.
    pub after: Option<String>,
    /// Return the last N events.
    pub last: Option<u64>,
    /// Block until an event arrives.
    pub block: bool,
    pub limit: Option<u64>,
}

impl Diff {
    pub fn params(&self) -> Params {
        let mut p = Params::new();
        p.opt("diffid", self.diffid);
        p.opt("after", self.after.as_deref());
        p.opt("last", self.last);
        p.flag("block", self.block);
        p.opt("limit", self.limit);
        p
    }
}

impl<T: Transport> PCloudClient<T> {
    pub fn userinfo(&self) -> Result<Value, ApiError> {
        self.get_checked("userinfo", Params::new())
    }

    /// The `languages` map, or an empty object when the server omits it.
    pub fn supportedlanguages(&self) -> Result<Value, ApiError> {
        let value = self.get_checked("supportedlanguages", Params::new())?;
        Ok(take_field(value, "languages", json!({})))
    }

    pub fn setlanguage(&self, language: &str) -> Result<Value, ApiError> {
        let params = Params::new().with("language", require_str("language", language)?);
        self.get_checked("setlanguage", params)
    }

    pub fn currentserver(&self) -> Result<Value, ApiError> {
        self.get_checked("currentserver", Params::new())
    }

    pub fn diff(&self, options: &Diff) -> Result<Value, ApiError> {
        self.get_checked("diff", options.params())
    }

    pub fn getfilehistory(&self, fileid: u64) -> Result<Value, ApiError> {
        let params = Params::new().with("fileid", require_id("fileid", fileid)?);
        self.get_checked("getfilehistory", params)
    }

    pub fn getip(&self) -> Result<Value, ApiError> {
        self.get_checked("getip", Params::new())
    }

    pub fn getapiserver(&self) -> Result<Value, ApiError> {
        self.get_checked("getapiserver", Params::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::*;

    #[test]
    fn userinfo_success() {
        let c = client();
        c.transport()
            .respond(200, r#"{"result":0,"email":"a@b.c","quota":10737418240}"#);
        let info = c.userinfo().unwrap();
        assert_eq!(info["email"], "a@b.c");
        assert_sent(&c, "userinfo", &[]);
    }

    #[test]
    fn userinfo_failure_is_error() {
        let c = client();
        c.transport()
            .respond(200, r#"{"result":2000,"error":"Log in failed."}"#);
        let err = c.userinfo().unwrap_err();
        assert!(matches!(err, ApiError::Api { result: 2000, .. }));
    }

    #[test]
    fn supportedlanguages_extracts_map() {
        let c = client();
        c.transport()
            .respond(200, r#"{"result":0,"languages":{"en":"English","bg":"Български"}}"#);
        let langs = c.supportedlanguages().unwrap();
        assert_eq!(langs["en"], "English");

        c.transport().respond(200, r#"{"result":0}"#);
        assert_eq!(c.supportedlanguages().unwrap(), json!({}));
    }

    #[test]
    fn setlanguage_requires_value() {
        let c = client();
        assert_rejected(&c, c.setlanguage(""));
        c.setlanguage("de").unwrap();
        assert_sent(&c, "setlanguage", &[("language", "de")]);
    }

    #[test]
    fn diff_sends_only_set_options() {
        let c = client();
        c.diff(&Diff {
            diffid: Some(1200),
            block: true,
            ..Diff::default()
        })
        .unwrap();
        assert_sent(&c, "diff", &[("block", "1"), ("diffid", "1200")]);

        c.diff(&Diff::default()).unwrap();
        assert_sent(&c, "diff", &[]);
    }

    #[test]
    fn getfilehistory_requires_id() {
        let c = client();
        assert_rejected(&c, c.getfilehistory(0));
        c.getfilehistory(77).unwrap();
        assert_sent(&c, "getfilehistory", &[("fileid", "77")]);
    }

    #[test]
    fn server_info_calls() {
        let c = client();
        c.currentserver().unwrap();
        c.getip().unwrap();
        c.getapiserver().unwrap();
        let endpoints: Vec<String> = c
            .transport()
            .requests()
            .into_iter()
            .map(|r| r.endpoint)
            .collect();
        assert_eq!(endpoints, vec!["currentserver", "getip", "getapiserver"]);
    }
}
