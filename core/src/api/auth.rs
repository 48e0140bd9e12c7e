//! Account lifecycle: registration, email and password changes, tokens.

use serde_json::{json, Value};

use crate::client::{take_field, PCloudClient};
use crate::error::ApiError;
use crate::params::{require_id, require_str, Params};
use crate::transport::Transport;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Register {
    pub mail: String,
    pub password: String,
    /// Must be true; sent as `termsaccepted=yes`.
    pub termsaccepted: bool,
    pub language: Option<String>,
    /// User id of the referrer.
    pub referer: Option<String>,
}

impl Register {
    pub fn params(&self) -> Result<Params, ApiError> {
        if !self.termsaccepted {
            return Err(ApiError::invalid("'termsaccepted' must be 'yes'"));
        }
        let mut p = Params::new()
            .with("mail", require_str("mail", &self.mail)?)
            .with("password", require_str("password", &self.password)?)
            .with("termsaccepted", "yes");
        p.opt("language", self.language.as_deref());
        p.opt("referer", self.referer.as_deref());
        Ok(p)
    }
}

fn pair(a: (&str, &str), b: (&str, &str)) -> Result<Params, ApiError> {
    Ok(Params::new()
        .with(a.0, require_str(a.0, a.1)?)
        .with(b.0, require_str(b.0, b.1)?))
}

impl<T: Transport> PCloudClient<T> {
    pub fn sendverificationemail(&self) -> Result<Value, ApiError> {
        self.get_json("sendverificationemail", Params::new())
    }

    pub fn verifyemail(&self, code: &str) -> Result<Value, ApiError> {
        self.get_json("verifyemail", Params::new().with("code", require_str("code", code)?))
    }

    pub fn changepassword(&self, oldpassword: &str, newpassword: &str) -> Result<Value, ApiError> {
        let params = pair(("oldpassword", oldpassword), ("newpassword", newpassword))?;
        self.get_json("changepassword", params)
    }

    pub fn lostpassword(&self, mail: &str) -> Result<Value, ApiError> {
        self.get_json("lostpassword", Params::new().with("mail", require_str("mail", mail)?))
    }

    pub fn resetpassword(&self, code: &str, newpassword: &str) -> Result<Value, ApiError> {
        let params = pair(("code", code), ("newpassword", newpassword))?;
        self.get_json("resetpassword", params)
    }

    pub fn register(&self, request: &Register) -> Result<Value, ApiError> {
        self.get_json("register", request.params()?)
    }

    pub fn invite(&self) -> Result<Value, ApiError> {
        self.get_json("invite", Params::new())
    }

    pub fn userinvites(&self) -> Result<Value, ApiError> {
        self.get_json("userinvites", Params::new())
    }

    pub fn logout(&self) -> Result<Value, ApiError> {
        self.get_json("logout", Params::new())
    }

    /// Active tokens of the current user. Checked; returns the `tokens`
    /// array, or an empty one when the server omits it.
    pub fn listtokens(&self) -> Result<Value, ApiError> {
        let value = self.get_checked("listtokens", Params::new())?;
        Ok(take_field(value, "tokens", json!([])))
    }

    pub fn deletetoken(&self, tokenid: u64) -> Result<Value, ApiError> {
        let params = Params::new().with("tokenid", require_id("tokenid", tokenid)?);
        self.get_json("deletetoken", params)
    }

    /// Without arguments, mails a change link to the current address. With
    /// `newmail` and the code from that link, mails the new address.
    pub fn sendchangemail(&self, newmail: Option<&str>, code: Option<&str>) -> Result<Value, ApiError> {
        let mut p = Params::new();
        p.opt("newmail", newmail);
        p.opt("code", code);
        self.get_json("sendchangemail", p)
    }

    pub fn changemail(&self, password: &str, code: &str) -> Result<Value, ApiError> {
        self.get_json("changemail", pair(("password", password), ("code", code))?)
    }

    pub fn senddeactivatemail(&self) -> Result<Value, ApiError> {
        self.get_json("senddeactivatemail", Params::new())
    }

    pub fn deactivateuser(&self, password: &str, code: &str) -> Result<Value, ApiError> {
        self.get_json("deactivateuser", pair(("password", password), ("code", code))?)
    }
}
