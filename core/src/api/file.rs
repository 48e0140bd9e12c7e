//! File upload, download-to-account, copy, rename, and metadata.

use serde_json::Value;

use crate::client::PCloudClient;
use crate::error::ApiError;
use crate::http::{FilePart, HttpRequest};
use crate::params::{require_list, require_str, Destination, DestinationRule, Locator, Params};
use crate::transport::Transport;

/// Multipart upload into a folder.
///
/// The target folder is optional; without one the server uses the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadFile {
    pub files: Vec<FilePart>,
    pub folder: Locator,
    pub nopartial: bool,
    pub progresshash: Option<String>,
    pub renameifexists: bool,
    pub mtime: Option<u64>,
    pub ctime: Option<u64>,
}

impl UploadFile {
    pub fn new(folder: impl Into<Locator>, files: Vec<FilePart>) -> Self {
        Self {
            files,
            folder: folder.into(),
            ..Self::default()
        }
    }

    pub fn params(&self) -> Result<Params, ApiError> {
        require_list("files", &self.files)?;
        let mut p = Params::new();
        self.folder.apply_optional(&mut p, "folderid", "path");
        p.flag("nopartial", self.nopartial);
        p.opt("progresshash", self.progresshash.as_deref());
        p.flag("renameifexists", self.renameifexists);
        p.opt("mtime", self.mtime);
        p.opt("ctime", self.ctime);
        Ok(p)
    }

    pub fn request(&self) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::multipart(
            "uploadfile",
            self.params()?,
            self.files.clone(),
        ))
    }
}

/// Server-side download of a URL into the account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadFile {
    pub url: String,
    pub folder: Locator,
    /// File name to save as.
    pub target: Option<String>,
    pub progresshash: Option<String>,
}

impl DownloadFile {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn params(&self) -> Result<Params, ApiError> {
        let mut p = Params::new().with("url", require_str("url", &self.url)?);
        self.folder.apply_optional(&mut p, "folderid", "path");
        p.opt("target", self.target.as_deref());
        p.opt("progresshash", self.progresshash.as_deref());
        Ok(p)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyFile {
    pub file: Locator,
    /// `tofolderid` or `topath` is required; `toname` is optional.
    pub to: Destination,
    pub noover: bool,
    pub mtime: Option<u64>,
    pub ctime: Option<u64>,
}

impl CopyFile {
    pub fn params(&self) -> Result<Params, ApiError> {
        let mut p = Params::new();
        self.file.apply(&mut p, "fileid", "path")?;
        self.to.apply(&mut p, DestinationRule::PathOrFolder)?;
        p.flag("noover", self.noover);
        p.opt("mtime", self.mtime);
        p.opt("ctime", self.ctime);
        Ok(p)
    }
}

fn file_params(file: &Locator) -> Result<Params, ApiError> {
    let mut p = Params::new();
    file.apply(&mut p, "fileid", "path")?;
    Ok(p)
}

impl<T: Transport> PCloudClient<T> {
    pub fn uploadfile(&self, request: &UploadFile) -> Result<Value, ApiError> {
        self.json(request.request()?)
    }

    pub fn uploadprogress(&self, progresshash: &str) -> Result<Value, ApiError> {
        let params = Params::new().with("progresshash", require_str("progresshash", progresshash)?);
        self.get_json("uploadprogress", params)
    }

    pub fn downloadfile(&self, request: &DownloadFile) -> Result<Value, ApiError> {
        self.get_json("downloadfile", request.params()?)
    }

    pub fn downloadfileasync(&self, request: &DownloadFile) -> Result<Value, ApiError> {
        self.get_json("downloadfileasync", request.params()?)
    }

    pub fn copyfile(&self, request: &CopyFile) -> Result<Value, ApiError> {
        self.get_json("copyfile", request.params()?)
    }

    pub fn checksumfile(&self, file: impl Into<Locator>) -> Result<Value, ApiError> {
        self.get_json("checksumfile", file_params(&file.into())?)
    }

    pub fn deletefile(&self, file: impl Into<Locator>) -> Result<Value, ApiError> {
        self.get_json("deletefile", file_params(&file.into())?)
    }

    /// Renames and/or moves a file. At least one destination field is
    /// required.
    pub fn renamefile(&self, file: impl Into<Locator>, to: &Destination) -> Result<Value, ApiError> {
        let mut p = file_params(&file.into())?;
        to.apply(&mut p, DestinationRule::AnyOf)?;
        self.get_json("renamefile", p)
    }

    pub fn stat(&self, file: impl Into<Locator>) -> Result<Value, ApiError> {
        self.get_json("stat", file_params(&file.into())?)
    }
}
