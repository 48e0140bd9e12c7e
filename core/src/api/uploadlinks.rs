//! Upload links: let others drop files into one of the account's folders.

use serde_json::Value;

use crate::client::PCloudClient;
use crate::error::ApiError;
use crate::http::{FilePart, HttpRequest};
use crate::params::{require_id, require_list, require_str, Locator, Params};
use crate::transport::Transport;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateUploadLink {
    pub folder: Locator,
    /// Shown to uploaders.
    pub comment: String,
    pub expire: Option<String>,
    /// Bytes.
    pub maxspace: Option<u64>,
    pub maxfiles: Option<u64>,
}

impl CreateUploadLink {
    pub fn params(&self) -> Result<Params, ApiError> {
        let mut p = Params::new();
        self.folder.apply(&mut p, "folderid", "path")?;
        p.insert("comment", require_str("comment", &self.comment)?);
        p.opt("expire", self.expire.as_deref());
        p.opt("maxspace", self.maxspace);
        p.opt("maxfiles", self.maxfiles);
        Ok(p)
    }
}

/// Changes to an upload link. At least one field must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeUploadLink {
    pub expire: Option<String>,
    pub deleteexpire: bool,
    pub maxspace: Option<u64>,
    pub maxfiles: Option<u64>,
}

impl ChangeUploadLink {
    pub fn params(&self) -> Result<Params, ApiError> {
        let mut p = Params::new();
        p.opt("expire", self.expire.as_deref());
        p.flag("deleteexpire", self.deleteexpire);
        p.opt("maxspace", self.maxspace);
        p.opt("maxfiles", self.maxfiles);
        if p.is_empty() {
            return Err(ApiError::invalid("at least one option must be provided"));
        }
        Ok(p)
    }
}

/// Anonymous multipart upload through a link code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadToLink {
    pub code: String,
    pub files: Vec<FilePart>,
    pub nopartial: bool,
    pub progresshash: Option<String>,
}

impl UploadToLink {
    pub fn request(&self) -> Result<HttpRequest, ApiError> {
        let mut p = Params::new().with("code", require_str("code", &self.code)?);
        require_list("files", &self.files)?;
        p.flag("nopartial", self.nopartial);
        p.opt("progresshash", self.progresshash.as_deref());
        Ok(HttpRequest::multipart("uploadtolink", p, self.files.clone()))
    }
}

fn link_id(uploadlinkid: u64) -> Result<Params, ApiError> {
    Ok(Params::new().with("uploadlinkid", require_id("uploadlinkid", uploadlinkid)?))
}

impl<T: Transport> PCloudClient<T> {
    pub fn createuploadlink(&self, request: &CreateUploadLink) -> Result<Value, ApiError> {
        self.get_json("createuploadlink", request.params()?)
    }

    pub fn listuploadlinks(&self) -> Result<Value, ApiError> {
        self.get_json("listuploadlinks", Params::new())
    }

    pub fn deleteuploadlink(&self, uploadlinkid: u64) -> Result<Value, ApiError> {
        self.get_json("deleteuploadlink", link_id(uploadlinkid)?)
    }

    pub fn changeuploadlink(&self, uploadlinkid: u64, changes: &ChangeUploadLink) -> Result<Value, ApiError> {
        let mut p = link_id(uploadlinkid)?;
        p.extend(changes.params()?);
        self.get_json("changeuploadlink", p)
    }

    pub fn showuploadlink(&self, uploadlinkid: u64) -> Result<Value, ApiError> {
        self.get_json("showuploadlink", link_id(uploadlinkid)?)
    }

    pub fn uploadtolink(&self, request: &UploadToLink) -> Result<Value, ApiError> {
        self.json(request.request()?)
    }

    pub fn uploadlinkprogress(&self, code: &str, progresshash: &str) -> Result<Value, ApiError> {
        let p = Params::new()
            .with("code", require_str("code", code)?)
            .with("progresshash", require_str("progresshash", progresshash)?);
        self.get_json("uploadlinkprogress", p)
    }

    /// Copies a file the current user owns into an upload link.
    pub fn copytolink(&self, code: &str, file: impl Into<Locator>, toname: Option<&str>) -> Result<Value, ApiError> {
        let mut p = Params::new().with("code", require_str("code", code)?);
        file.into().apply(&mut p, "fileid", "path")?;
        p.opt("toname", toname);
        self.get_json("copytolink", p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::*;
    use crate::http::{HttpMethod, RequestBody};

    #[test]
    fn createuploadlink_requires_folder_and_comment() {
        let c = client();
        assert_rejected(
            &c,
            c.createuploadlink(&CreateUploadLink {
                comment: "drop here".to_string(),
                ..CreateUploadLink::default()
            }),
        );
        assert_rejected(
            &c,
            c.createuploadlink(&CreateUploadLink {
                folder: Locator::by_id(3),
                ..CreateUploadLink::default()
            }),
        );

        c.createuploadlink(&CreateUploadLink {
            folder: Locator::by_id(3),
            comment: "drop here".to_string(),
            maxfiles: Some(10),
            ..CreateUploadLink::default()
        })
        .unwrap();
        assert_sent(
            &c,
            "createuploadlink",
            &[("comment", "drop here"), ("folderid", "3"), ("maxfiles", "10")],
        );
    }

    #[test]
    fn changeuploadlink_needs_an_option() {
        let c = client();
        assert_rejected(&c, c.changeuploadlink(2, &ChangeUploadLink::default()));
        c.changeuploadlink(
            2,
            &ChangeUploadLink {
                deleteexpire: true,
                ..ChangeUploadLink::default()
            },
        )
        .unwrap();
        assert_sent(&c, "changeuploadlink", &[("deleteexpire", "1"), ("uploadlinkid", "2")]);
    }

    #[test]
    fn uploadtolink_is_multipart() {
        let c = client();
        assert_rejected(
            &c,
            c.uploadtolink(&UploadToLink {
                code: "up1".to_string(),
                ..UploadToLink::default()
            }),
        );

        let files = vec![FilePart::new("/tmp/report.pdf")];
        c.uploadtolink(&UploadToLink {
            code: "up1".to_string(),
            files: files.clone(),
            nopartial: true,
            progresshash: None,
        })
        .unwrap();
        let req = c.transport().last();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.body, RequestBody::Multipart(files));
        assert_sent(&c, "uploadtolink", &[("code", "up1"), ("nopartial", "1")]);
    }

    #[test]
    fn copytolink_params() {
        let c = client();
        assert_rejected(&c, c.copytolink("", 1u64, None));
        assert_rejected(&c, c.copytolink("up1", Locator::default(), None));

        c.copytolink("up1", "/a.txt", Some("b.txt")).unwrap();
        assert_sent(
            &c,
            "copytolink",
            &[("code", "up1"), ("path", "/a.txt"), ("toname", "b.txt")],
        );
    }

    #[test]
    fn id_calls() {
        let c = client();
        assert_rejected(&c, c.deleteuploadlink(0));
        assert_rejected(&c, c.showuploadlink(0));
        assert_rejected(&c, c.uploadlinkprogress("up1", ""));

        c.showuploadlink(4).unwrap();
        assert_sent(&c, "showuploadlink", &[("uploadlinkid", "4")]);
        c.listuploadlinks().unwrap();
        assert_sent(&c, "listuploadlinks", &[]);
    }
}
