//! Collections: ordered, user-defined lists of files such as playlists.

use serde_json::Value;

use crate::client::PCloudClient;
use crate::error::ApiError;
use crate::params::{join, one_of, require_id, require_list, require_str, Params};
use crate::transport::Transport;

/// Which items `collection_unlinkfiles` removes.
///
/// Only one selector is sent: `positions`, else `all`, else `fileids`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnlinkFiles {
    pub positions: Vec<u64>,
    pub all: bool,
    pub fileids: Vec<u64>,
}

impl UnlinkFiles {
    pub fn params(&self) -> Result<Params, ApiError> {
        let mut p = Params::new();
        one_of(
            &mut p,
            &[
                ("positions", non_empty(&self.positions)),
                ("all", self.all.then(|| "1".to_string())),
                ("fileids", non_empty(&self.fileids)),
            ],
        )?;
        Ok(p)
    }
}

fn non_empty(ids: &[u64]) -> Option<String> {
    (!ids.is_empty()).then(|| join(ids))
}

fn collection(collectionid: u64) -> Result<Params, ApiError> {
    Ok(Params::new().with("collectionid", require_id("collectionid", collectionid)?))
}

impl<T: Transport> PCloudClient<T> {
    /// `kind` filters by collection type (1 for audio playlists). Sent as
    /// `type`.
    pub fn collection_list(&self, kind: Option<u32>, showfiles: bool, pagesize: Option<u64>) -> Result<Value, ApiError> {
        let mut p = Params::new();
        p.opt("type", kind);
        p.flag("showfiles", showfiles);
        p.opt("pagesize", pagesize);
        self.get_json("collection_list", p)
    }

    pub fn collection_details(&self, collectionid: u64, page: Option<u64>, pagesize: Option<u64>) -> Result<Value, ApiError> {
        let mut p = collection(collectionid)?;
        p.opt("page", page);
        p.opt("pagesize", pagesize);
        self.get_json("collection_details", p)
    }

    pub fn collection_create(&self, name: &str, kind: Option<u32>, fileids: &[u64]) -> Result<Value, ApiError> {
        let mut p = Params::new().with("name", require_str("name", name)?);
        p.opt("type", kind);
        p.list("fileids", fileids);
        self.get_json("collection_create", p)
    }

    pub fn collection_rename(&self, collectionid: u64, name: &str) -> Result<Value, ApiError> {
        let p = collection(collectionid)?.with("name", require_str("name", name)?);
        self.get_json("collection_rename", p)
    }

    pub fn collection_delete(&self, collectionid: u64) -> Result<Value, ApiError> {
        self.get_json("collection_delete", collection(collectionid)?)
    }

    /// Appends files; `noitems` leaves the item list out of the response.
    pub fn collection_linkfiles(&self, collectionid: u64, fileids: &[u64], noitems: bool) -> Result<Value, ApiError> {
        let mut p = collection(collectionid)?;
        p.list("fileids", require_list("fileids", fileids)?);
        p.flag("noitems", noitems);
        self.get_json("collection_linkfiles", p)
    }

    pub fn collection_unlinkfiles(&self, collectionid: u64, selector: &UnlinkFiles) -> Result<Value, ApiError> {
        let mut p = collection(collectionid)?;
        p.extend(selector.params()?);
        self.get_json("collection_unlinkfiles", p)
    }

    /// Moves the item at position `item`, holding `fileid`, to `position`.
    /// Positions are 1-based.
    pub fn collection_move(&self, collectionid: u64, item: u64, fileid: u64, position: u64) -> Result<Value, ApiError> {
        let p = collection(collectionid)?
            .with("item", require_id("item", item)?)
            .with("fileid", require_id("fileid", fileid)?)
            .with("position", require_id("position", position)?);
        self.get_json("collection_move", p)
    }
}
