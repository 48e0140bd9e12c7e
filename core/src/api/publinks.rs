//! Public links: creating them, managing them, and reading through them.
//!
//! Calls that read through a link take its `code` (or short code) and, for
//! folder and tree links, the `fileid` of an item inside it. The option
//! structs are the same ones the account-side calls use.

use serde_json::Value;

use crate::api::archiving::ZipOptions;
use crate::api::streaming::{AudioOptions, LinkOptions, TextOptions};
use crate::api::thumbnails::ThumbOptions;
use crate::client::PCloudClient;
use crate::error::ApiError;
use crate::params::{require_id, require_str, Destination, DestinationRule, Locator, Params};
use crate::transport::Transport;

/// Limits applied to a new link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSettings {
    /// Expiry datetime.
    pub expire: Option<String>,
    pub maxdownloads: Option<u64>,
    /// Bytes.
    pub maxtraffic: Option<u64>,
    /// Also create a short link.
    pub shortlink: bool,
    pub linkpassword: Option<String>,
}

impl LinkSettings {
    fn write_limits(&self, p: &mut Params) {
        p.opt("expire", self.expire.as_deref());
        p.opt("maxdownloads", self.maxdownloads);
        p.opt("maxtraffic", self.maxtraffic);
        p.flag("shortlink", self.shortlink);
    }

    fn write(&self, p: &mut Params) {
        self.write_limits(p);
        p.opt("linkpassword", self.linkpassword.as_deref());
    }
}

/// Link to a virtual folder made of arbitrary files and folders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreePublink {
    /// Name of the virtual root.
    pub name: String,
    pub fileids: Vec<u64>,
    pub folderids: Vec<u64>,
    pub folderid: Option<u64>,
    pub settings: LinkSettings,
}

impl TreePublink {
    pub fn params(&self) -> Result<Params, ApiError> {
        let mut p = Params::new().with("name", require_str("name", &self.name)?);
        p.list("fileids", &self.fileids);
        p.list("folderids", &self.folderids);
        p.opt("folderid", self.folderid);
        self.settings.write(&mut p);
        Ok(p)
    }
}

/// Changes to an existing link. At least one field must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangePublink {
    pub shortlink: bool,
    pub deleteshortlink: bool,
    pub expire: Option<String>,
    pub deleteexpire: bool,
    pub maxtraffic: Option<u64>,
    pub maxdownloads: Option<u64>,
    pub linkpassword: Option<String>,
}

impl ChangePublink {
    pub fn params(&self) -> Result<Params, ApiError> {
        let mut p = Params::new();
        p.flag("shortlink", self.shortlink);
        p.flag("deleteshortlink", self.deleteshortlink);
        p.opt("expire", self.expire.as_deref());
        p.flag("deleteexpire", self.deleteexpire);
        p.opt("maxtraffic", self.maxtraffic);
        p.opt("maxdownloads", self.maxdownloads);
        p.opt("linkpassword", self.linkpassword.as_deref());
        if p.is_empty() {
            return Err(ApiError::invalid("at least one option must be provided"));
        }
        Ok(p)
    }
}

/// Copy of a linked file into the current account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyPubFile {
    pub code: String,
    pub fileid: Option<u64>,
    /// Defaults to the root folder under the original name.
    pub to: Destination,
    pub noover: bool,
}

impl CopyPubFile {
    pub fn params(&self) -> Result<Params, ApiError> {
        let mut p = code_params(&self.code, self.fileid)?;
        self.to.apply(&mut p, DestinationRule::Optional)?;
        p.flag("noover", self.noover);
        Ok(p)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavePubThumb {
    pub code: String,
    pub fileid: u64,
    pub thumb: ThumbOptions,
    /// `topath`, or `tofolderid` with `toname`.
    pub to: Destination,
    pub noover: bool,
}

impl SavePubThumb {
    pub fn params(&self) -> Result<Params, ApiError> {
        let mut p = pub_thumb_params(&self.code, self.fileid, &self.thumb)?;
        self.to.apply(&mut p, DestinationRule::PathOrFolderAndName)?;
        p.flag("noover", self.noover);
        Ok(p)
    }
}

fn code_params(code: &str, fileid: Option<u64>) -> Result<Params, ApiError> {
    let mut p = Params::new().with("code", require_str("code", code)?);
    p.opt("fileid", fileid);
    Ok(p)
}

fn pub_thumb_params(code: &str, fileid: u64, thumb: &ThumbOptions) -> Result<Params, ApiError> {
    let mut p = Params::new()
        .with("code", require_str("code", code)?)
        .with("fileid", require_id("fileid", fileid)?);
    thumb.write(&mut p)?;
    Ok(p)
}

impl<T: Transport> PCloudClient<T> {
    pub fn getfilepublink(&self, file: impl Into<Locator>, settings: &LinkSettings) -> Result<Value, ApiError> {
        let mut p = Params::new();
        file.into().apply(&mut p, "fileid", "path")?;
        settings.write(&mut p);
        self.get_json("getfilepublink", p)
    }

    pub fn getfolderpublink(&self, folder: impl Into<Locator>, settings: &LinkSettings) -> Result<Value, ApiError> {
        let mut p = Params::new();
        folder.into().apply(&mut p, "folderid", "path")?;
        settings.write(&mut p);
        self.get_json("getfolderpublink", p)
    }

    pub fn gettreepublink(&self, request: &TreePublink) -> Result<Value, ApiError> {
        self.get_json("gettreepublink", request.params()?)
    }

    /// Metadata of a link, as seen by anyone holding the code.
    pub fn showpublink(&self, code: &str) -> Result<Value, ApiError> {
        self.get_json("showpublink", code_params(code, None)?)
    }

    pub fn getpublinkdownload(&self, code: &str, fileid: Option<u64>, options: &LinkOptions) -> Result<Value, ApiError> {
        let mut p = code_params(code, fileid)?;
        options.write(&mut p);
        self.get_json("getpublinkdownload", p)
    }

    pub fn copypubfile(&self, request: &CopyPubFile) -> Result<Value, ApiError> {
        self.get_json("copypubfile", request.params()?)
    }

    pub fn listpublinks(&self) -> Result<Value, ApiError> {
        self.get_json("listpublinks", Params::new())
    }

    /// Only the links that have a short code.
    pub fn listplshort(&self) -> Result<Value, ApiError> {
        self.get_json("listplshort", Params::new())
    }

    pub fn deletepublink(&self, linkid: u64) -> Result<Value, ApiError> {
        self.get_json("deletepublink", Params::new().with("linkid", require_id("linkid", linkid)?))
    }

    pub fn changepublink(&self, linkid: u64, changes: &ChangePublink) -> Result<Value, ApiError> {
        let mut p = Params::new().with("linkid", require_id("linkid", linkid)?);
        p.extend(changes.params()?);
        self.get_json("changepublink", p)
    }

    pub fn getpubthumb(&self, code: &str, fileid: u64, thumb: &ThumbOptions) -> Result<Vec<u8>, ApiError> {
        self.get_bytes("getpubthumb", pub_thumb_params(code, fileid, thumb)?)
    }

    pub fn getpubthumblink(&self, code: &str, fileid: u64, thumb: &ThumbOptions) -> Result<Value, ApiError> {
        self.get_json("getpubthumblink", pub_thumb_params(code, fileid, thumb)?)
    }

    pub fn getpubthumbslinks(&self, code: &str, fileid: u64, thumb: &ThumbOptions) -> Result<Value, ApiError> {
        self.get_json("getpubthumbslinks", pub_thumb_params(code, fileid, thumb)?)
    }

    pub fn savepubthumb(&self, request: &SavePubThumb) -> Result<Value, ApiError> {
        self.get_json("savepubthumb", request.params()?)
    }

    pub fn getpubzip(&self, code: &str, options: &ZipOptions) -> Result<Vec<u8>, ApiError> {
        let mut p = code_params(code, None)?;
        options.write(&mut p);
        self.get_bytes("getpubzip", p)
    }

    pub fn getpubziplink(&self, code: &str, options: &ZipOptions) -> Result<Value, ApiError> {
        let mut p = code_params(code, None)?;
        options.write(&mut p);
        self.get_json("getpubziplink", p)
    }

    /// Saves the whole link as a zip in the current account.
    pub fn savepubzip(&self, code: &str, to: &Destination, timeoffset: Option<&str>) -> Result<Value, ApiError> {
        let mut p = code_params(code, None)?;
        to.apply(&mut p, DestinationRule::PathOrFolderAndName)?;
        p.opt("timeoffset", timeoffset);
        self.get_json("savepubzip", p)
    }

    pub fn getpubvideolinks(&self, code: &str, fileid: Option<u64>, options: &LinkOptions) -> Result<Value, ApiError> {
        let mut p = code_params(code, fileid)?;
        options.write(&mut p);
        self.get_json("getpubvideolinks", p)
    }

    pub fn getpubaudiolink(&self, code: &str, fileid: Option<u64>, options: &AudioOptions) -> Result<Value, ApiError> {
        let mut p = code_params(code, fileid)?;
        options.write(&mut p);
        self.get_json("getpubaudiolink", p)
    }

    pub fn getpubtextfile(&self, code: &str, fileid: Option<u64>, options: &TextOptions) -> Result<Vec<u8>, ApiError> {
        let mut p = code_params(code, fileid)?;
        options.write(&mut p);
        self.get_bytes("getpubtextfile", p)
    }

    /// Link to a collection. Collection links take no password.
    pub fn getcollectionpublink(&self, collectionid: u64, settings: &LinkSettings) -> Result<Value, ApiError> {
        let mut p = Params::new().with("collectionid", require_id("collectionid", collectionid)?);
        settings.write_limits(&mut p);
        self.get_json("getcollectionpublink", p)
    }
}
