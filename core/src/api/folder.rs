//! Folder management.

use serde_json::Value;

use crate::client::PCloudClient;
use crate::error::ApiError;
use crate::params::{Destination, DestinationRule, Locator, Params};
use crate::transport::Transport;

/// Where to create a folder: a full `path`, or a parent `folderid` plus
/// `name`. A path wins and is sent alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateFolder {
    pub path: Option<String>,
    pub folderid: Option<u64>,
    pub name: Option<String>,
}

impl CreateFolder {
    pub fn at_path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn in_folder(folderid: u64, name: impl Into<String>) -> Self {
        Self {
            path: None,
            folderid: Some(folderid),
            name: Some(name.into()),
        }
    }

    pub fn params(&self) -> Result<Params, ApiError> {
        let mut p = Params::new();
        match (&self.path, self.folderid, &self.name) {
            (Some(path), _, _) => p.insert("path", path),
            (None, Some(folderid), Some(name)) => {
                p.insert("folderid", folderid);
                p.insert("name", name);
            }
            _ => {
                return Err(ApiError::invalid(
                    "either 'path' or both 'folderid' and 'name' must be provided",
                ))
            }
        }
        Ok(p)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFolder {
    pub folder: Locator,
    pub recursive: bool,
    pub showdeleted: bool,
    pub nofiles: bool,
    pub noshares: bool,
}

impl ListFolder {
    pub fn new(folder: impl Into<Locator>) -> Self {
        Self {
            folder: folder.into(),
            ..Self::default()
        }
    }

    pub fn params(&self) -> Result<Params, ApiError> {
        let mut p = Params::new();
        self.folder.apply(&mut p, "folderid", "path")?;
        p.flag("recursive", self.recursive);
        p.flag("showdeleted", self.showdeleted);
        p.flag("nofiles", self.nofiles);
        p.flag("noshares", self.noshares);
        Ok(p)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyFolder {
    pub folder: Locator,
    /// `tofolderid` or `topath` is required.
    pub to: Destination,
    pub noover: bool,
    pub skipexisting: bool,
    pub copycontentonly: bool,
}

impl CopyFolder {
    pub fn params(&self) -> Result<Params, ApiError> {
        let mut p = Params::new();
        self.folder.apply(&mut p, "folderid", "path")?;
        self.to.apply(&mut p, DestinationRule::PathOrFolder)?;
        p.flag("noover", self.noover);
        p.flag("skipexisting", self.skipexisting);
        p.flag("copycontentonly", self.copycontentonly);
        Ok(p)
    }
}

fn folder_params(folder: &Locator) -> Result<Params, ApiError> {
    let mut p = Params::new();
    folder.apply(&mut p, "folderid", "path")?;
    Ok(p)
}

impl<T: Transport> PCloudClient<T> {
    pub fn createfolder(&self, request: &CreateFolder) -> Result<Value, ApiError> {
        self.get_json("createfolder", request.params()?)
    }

    pub fn createfolderifnotexists(&self, request: &CreateFolder) -> Result<Value, ApiError> {
        self.get_json("createfolderifnotexists", request.params()?)
    }

    pub fn listfolder(&self, request: &ListFolder) -> Result<Value, ApiError> {
        self.get_json("listfolder", request.params()?)
    }

    /// Renames and/or moves a folder. At least one destination field is
    /// required.
    pub fn renamefolder(&self, folder: impl Into<Locator>, to: &Destination) -> Result<Value, ApiError> {
        let mut p = folder_params(&folder.into())?;
        to.apply(&mut p, DestinationRule::AnyOf)?;
        self.get_json("renamefolder", p)
    }

    /// Deletes an empty folder.
    pub fn deletefolder(&self, folder: impl Into<Locator>) -> Result<Value, ApiError> {
        self.get_json("deletefolder", folder_params(&folder.into())?)
    }

    pub fn deletefolderrecursive(&self, folder: impl Into<Locator>) -> Result<Value, ApiError> {
        self.get_json("deletefolderrecursive", folder_params(&folder.into())?)
    }

    pub fn copyfolder(&self, request: &CopyFolder) -> Result<Value, ApiError> {
        self.get_json("copyfolder", request.params()?)
    }
}
