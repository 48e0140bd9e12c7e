//! File transfers mailed to recipients outside the account.

use serde_json::Value;

use crate::client::PCloudClient;
use crate::error::ApiError;
use crate::http::{FilePart, HttpRequest};
use crate::params::{require_list, require_str, Params};
use crate::transport::Transport;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadTransfer {
    pub sendermail: String,
    pub receivermails: Vec<String>,
    pub files: Vec<FilePart>,
    pub message: Option<String>,
    pub progresshash: Option<String>,
}

impl UploadTransfer {
    pub fn params(&self) -> Result<Params, ApiError> {
        let mut p = Params::new().with("sendermail", require_str("sendermail", &self.sendermail)?);
        p.list("receivermails", require_list("receivermails", &self.receivermails)?);
        require_list("files", &self.files)?;
        p.opt("message", self.message.as_deref());
        p.opt("progresshash", self.progresshash.as_deref());
        Ok(p)
    }

    pub fn request(&self) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::multipart("uploadtransfer", self.params()?, self.files.clone()))
    }
}

impl<T: Transport> PCloudClient<T> {
    pub fn uploadtransfer(&self, request: &UploadTransfer) -> Result<Value, ApiError> {
        self.json(request.request()?)
    }

    pub fn uploadtransferprogress(&self, progresshash: &str) -> Result<Value, ApiError> {
        let p = Params::new().with("progresshash", require_str("progresshash", progresshash)?);
        self.get_json("uploadtransferprogress", p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::*;
    use crate::http::{HttpMethod, RequestBody};

    fn transfer() -> UploadTransfer {
        UploadTransfer {
            sendermail: "me@x.com".to_string(),
            receivermails: vec!["a@x.com".to_string(), "b@x.com".to_string()],
            files: vec![FilePart::new("/tmp/big.iso").with_field("iso")],
            ..UploadTransfer::default()
        }
    }

    #[test]
    fn every_required_field() {
        let c = client();
        assert_rejected(
            &c,
            c.uploadtransfer(&UploadTransfer {
                sendermail: String::new(),
                ..transfer()
            }),
        );
        assert_rejected(
            &c,
            c.uploadtransfer(&UploadTransfer {
                receivermails: Vec::new(),
                ..transfer()
            }),
        );
        assert_rejected(
            &c,
            c.uploadtransfer(&UploadTransfer {
                files: Vec::new(),
                ..transfer()
            }),
        );
        assert_rejected(&c, c.uploadtransferprogress(""));
    }

    #[test]
    fn uploadtransfer_request() {
        let c = client();
        c.uploadtransfer(&UploadTransfer {
            message: Some("enjoy".to_string()),
            ..transfer()
        })
        .unwrap();
        let req = c.transport().last();
        assert_eq!(req.method, HttpMethod::Post);
        assert!(matches!(req.body, RequestBody::Multipart(ref parts) if parts[0].field == "iso"));
        assert_sent(
            &c,
            "uploadtransfer",
            &[
                ("message", "enjoy"),
                ("receivermails", "a@x.com,b@x.com"),
                ("sendermail", "me@x.com"),
            ],
        );
    }
}
