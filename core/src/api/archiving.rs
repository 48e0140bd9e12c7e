//! Zip creation and archive extraction.

use serde::Serialize;
use serde_json::Value;

use crate::client::PCloudClient;
use crate::error::ApiError;
use crate::params::{require_str, Destination, DestinationRule, Locator, Params};
use crate::transport::Transport;

/// Selection of folders and files to zip, sent as JSON in `tree`.
///
/// Folders are included recursively; the exclude lists carve items back out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ZipTree {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folderid: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub folderids: Vec<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fileids: Vec<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excludefolderids: Vec<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excludefileids: Vec<u64>,
}

impl ZipTree {
    pub fn folder(folderid: u64) -> Self {
        Self {
            folderid: Some(folderid),
            ..Self::default()
        }
    }

    pub fn files(fileids: Vec<u64>) -> Self {
        Self {
            fileids,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.folderid.is_none() && self.folderids.is_empty() && self.fileids.is_empty()
    }

    fn params(&self) -> Result<Params, ApiError> {
        if self.is_empty() {
            return Err(ApiError::invalid("'tree' must select at least one folder or file"));
        }
        let tree = serde_json::to_string(self).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(Params::new().with("tree", tree))
    }
}

/// Download options shared by the account and public-link zip calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZipOptions {
    pub forcedownload: bool,
    /// Must end in `.zip` when given.
    pub filename: Option<String>,
    /// Timezone for file times inside the archive, e.g. `+0800` or `PST`.
    pub timeoffset: Option<String>,
}

impl ZipOptions {
    pub(crate) fn write(&self, p: &mut Params) {
        p.flag("forcedownload", self.forcedownload);
        p.opt("filename", self.filename.as_deref());
        p.opt("timeoffset", self.timeoffset.as_deref());
    }
}

/// Zip saved into the account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveZip {
    pub tree: ZipTree,
    /// `topath`, or `tofolderid` with `toname`.
    pub to: Destination,
    pub timeoffset: Option<String>,
    pub progresshash: Option<String>,
}

impl SaveZip {
    pub fn params(&self) -> Result<Params, ApiError> {
        let mut p = self.tree.params()?;
        self.to.apply(&mut p, DestinationRule::PathOrFolderAndName)?;
        p.opt("timeoffset", self.timeoffset.as_deref());
        p.opt("progresshash", self.progresshash.as_deref());
        Ok(p)
    }
}

/// What to do with existing files during extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Overwrite {
    /// Server default; never sent.
    #[default]
    Rename,
    Overwrite,
    Skip,
}

impl Overwrite {
    pub fn as_str(&self) -> &'static str {
        match self {
            Overwrite::Rename => "rename",
            Overwrite::Overwrite => "overwrite",
            Overwrite::Skip => "skip",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractArchive {
    pub file: Locator,
    /// `tofolderid` or `topath`; a `toname` is dropped.
    pub to: Destination,
    pub password: Option<String>,
    pub overwrite: Overwrite,
    pub nooutput: bool,
}

impl ExtractArchive {
    pub fn params(&self) -> Result<Params, ApiError> {
        let mut p = Params::new();
        self.file.apply(&mut p, "fileid", "path")?;
        let to = Destination {
            toname: None,
            ..self.to.clone()
        };
        to.apply(&mut p, DestinationRule::PathOrFolder)?;
        p.opt("password", self.password.as_deref());
        if self.overwrite != Overwrite::Rename {
            p.insert("overwrite", self.overwrite.as_str());
        }
        p.flag("nooutput", self.nooutput);
        Ok(p)
    }
}

impl<T: Transport> PCloudClient<T> {
    /// The zip itself, streamed by the API server.
    pub fn getzip(&self, tree: &ZipTree, options: &ZipOptions) -> Result<Vec<u8>, ApiError> {
        let mut p = tree.params()?;
        options.write(&mut p);
        self.get_bytes("getzip", p)
    }

    pub fn getziplink(&self, tree: &ZipTree, maxspeed: Option<u64>, options: &ZipOptions) -> Result<Value, ApiError> {
        let mut p = tree.params()?;
        p.opt("maxspeed", maxspeed);
        options.write(&mut p);
        self.get_json("getziplink", p)
    }

    pub fn savezip(&self, request: &SaveZip) -> Result<Value, ApiError> {
        self.get_json("savezip", request.params()?)
    }

    pub fn extractarchive(&self, request: &ExtractArchive) -> Result<Value, ApiError> {
        self.get_json("extractarchive", request.params()?)
    }

    /// `lines` skips that many lines of already-seen output.
    pub fn extractarchiveprogress(&self, progresshash: &str, lines: Option<u64>) -> Result<Value, ApiError> {
        let mut p = Params::new().with("progresshash", require_str("progresshash", progresshash)?);
        p.opt("lines", lines);
        self.get_json("extractarchiveprogress", p)
    }

    pub fn savezipprogress(&self, progresshash: &str) -> Result<Value, ApiError> {
        let p = Params::new().with("progresshash", require_str("progresshash", progresshash)?);
        self.get_json("savezipprogress", p)
    }
}
