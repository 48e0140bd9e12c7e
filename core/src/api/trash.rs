//! Trash: listing, restoring and purging deleted items.

use serde_json::Value;

use crate::client::PCloudClient;
use crate::error::ApiError;
use crate::params::{one_of, Params};
use crate::transport::Transport;

/// A file or folder in the trash. The file id wins when both are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrashItem {
    pub fileid: Option<u64>,
    pub folderid: Option<u64>,
}

impl TrashItem {
    pub fn file(fileid: u64) -> Self {
        Self {
            fileid: Some(fileid),
            folderid: None,
        }
    }

    pub fn folder(folderid: u64) -> Self {
        Self {
            fileid: None,
            folderid: Some(folderid),
        }
    }

    fn params(&self) -> Result<Params, ApiError> {
        let mut p = Params::new();
        one_of(
            &mut p,
            &[
                ("fileid", self.fileid.map(|id| id.to_string())),
                ("folderid", self.folderid.map(|id| id.to_string())),
            ],
        )?;
        Ok(p)
    }
}

impl<T: Transport> PCloudClient<T> {
    /// Contents of a trashed folder; folder 0 is the trash root.
    pub fn trash_list(&self, folderid: u64, nofiles: bool, recursive: bool) -> Result<Value, ApiError> {
        let mut p = Params::new().with("folderid", folderid);
        p.flag("nofiles", nofiles);
        p.flag("recursive", recursive);
        self.get_json("trash_list", p)
    }

    /// Where an item would be restored to, without restoring it.
    pub fn trash_restorepath(&self, item: TrashItem) -> Result<Value, ApiError> {
        self.get_json("trash_restorepath", item.params()?)
    }

    /// `restoreto` overrides the original parent folder; `metadata` asks for
    /// the restored item's metadata in the response.
    pub fn trash_restore(&self, item: TrashItem, restoreto: Option<u64>, metadata: bool) -> Result<Value, ApiError> {
        let mut p = item.params()?;
        p.opt("restoreto", restoreto);
        p.flag("metadata", metadata);
        self.get_json("trash_restore", p)
    }

    /// Permanently deletes an item. `TrashItem::folder(0)` empties the trash.
    pub fn trash_clear(&self, item: TrashItem) -> Result<Value, ApiError> {
        self.get_json("trash_clear", item.params()?)
    }
}
