//! Folder sharing between accounts.

use bitflags::bitflags;
use serde_json::Value;

use crate::client::PCloudClient;
use crate::error::ApiError;
use crate::params::{require_id, require_str, Locator, Params};
use crate::transport::Transport;

bitflags! {
    /// Share permission bits. The empty set is read-only access.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permissions: u8 {
        const CREATE = 1;
        const MODIFY = 2;
        const DELETE = 4;
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Permissions::empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareFolder {
    pub folder: Locator,
    /// Recipient address.
    pub mail: String,
    pub permissions: Permissions,
    /// Name the recipient sees; defaults to the folder name.
    pub name: Option<String>,
    pub message: Option<String>,
}

impl ShareFolder {
    pub fn params(&self) -> Result<Params, ApiError> {
        let mut p = Params::new();
        self.folder.apply(&mut p, "folderid", "path")?;
        p.insert("mail", require_str("mail", &self.mail)?);
        p.insert("permissions", self.permissions.bits());
        p.opt("name", self.name.as_deref());
        p.opt("message", self.message.as_deref());
        Ok(p)
    }
}

/// Filters for `listshares`; all off lists everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListShares {
    pub norequests: bool,
    pub noshares: bool,
    pub noincoming: bool,
    pub nooutgoing: bool,
}

impl ListShares {
    pub fn params(&self) -> Params {
        let mut p = Params::new();
        p.flag("norequests", self.norequests);
        p.flag("noshares", self.noshares);
        p.flag("noincoming", self.noincoming);
        p.flag("nooutgoing", self.nooutgoing);
        p
    }
}

/// A pending share request, by id or by the code from the invitation mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareRequest {
    Id(u64),
    Code(String),
}

impl ShareRequest {
    fn params(&self) -> Result<Params, ApiError> {
        match self {
            ShareRequest::Id(id) => Ok(Params::new().with("sharerequestid", require_id("sharerequestid", *id)?)),
            ShareRequest::Code(code) => Ok(Params::new().with("code", require_str("code", code)?)),
        }
    }
}

/// Where an accepted share is mounted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptShare {
    pub name: Option<String>,
    /// Parent folder to mount under.
    pub folderid: Option<u64>,
    pub path: Option<String>,
    /// Accept future shares from the same user automatically.
    pub always: bool,
}

impl<T: Transport> PCloudClient<T> {
    pub fn sharefolder(&self, request: &ShareFolder) -> Result<Value, ApiError> {
        self.get_json("sharefolder", request.params()?)
    }

    pub fn listshares(&self, filter: &ListShares) -> Result<Value, ApiError> {
        self.get_json("listshares", filter.params())
    }

    pub fn sharerequestinfo(&self, code: &str) -> Result<Value, ApiError> {
        self.get_json("sharerequestinfo", Params::new().with("code", require_str("code", code)?))
    }

    /// Withdraws a request sent by the current user.
    pub fn cancelsharerequest(&self, sharerequestid: u64) -> Result<Value, ApiError> {
        let p = Params::new().with("sharerequestid", require_id("sharerequestid", sharerequestid)?);
        self.get_json("cancelsharerequest", p)
    }

    pub fn acceptshare(&self, request: &ShareRequest, options: &AcceptShare) -> Result<Value, ApiError> {
        let mut p = request.params()?;
        p.opt("name", options.name.as_deref());
        p.opt("folderid", options.folderid);
        p.opt("path", options.path.as_deref());
        p.flag("always", options.always);
        self.get_json("acceptshare", p)
    }

    /// `block` also refuses future requests from the sender.
    pub fn declineshare(&self, request: &ShareRequest, block: bool) -> Result<Value, ApiError> {
        let mut p = request.params()?;
        p.flag("block", block);
        self.get_json("declineshare", p)
    }

    pub fn removeshare(&self, shareid: u64) -> Result<Value, ApiError> {
        self.get_json("removeshare", Params::new().with("shareid", require_id("shareid", shareid)?))
    }

    pub fn changeshare(&self, shareid: u64, permissions: Permissions) -> Result<Value, ApiError> {
        let p = Params::new()
            .with("shareid", require_id("shareid", shareid)?)
            .with("permissions", permissions.bits());
        self.get_json("changeshare", p)
    }
}
