//! Thumbnails of images and videos.

use serde_json::Value;

use crate::client::PCloudClient;
use crate::error::ApiError;
use crate::params::{require_list, require_str, Destination, DestinationRule, Locator, Params};
use crate::transport::Transport;

/// Size and format of a thumbnail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThumbOptions {
    /// `WIDTHxHEIGHT`; `getthumbslinks` also accepts a comma-separated list.
    pub size: String,
    /// Crop to the exact size instead of fitting inside it.
    pub crop: bool,
    /// Output format, e.g. `png`. Sent as `type`.
    pub format: Option<String>,
}

impl ThumbOptions {
    pub fn new(size: impl Into<String>) -> Self {
        Self {
            size: size.into(),
            ..Self::default()
        }
    }

    pub(crate) fn write(&self, p: &mut Params) -> Result<(), ApiError> {
        p.insert("size", require_str("size", &self.size)?);
        p.flag("crop", self.crop);
        p.opt("type", self.format.as_deref());
        Ok(())
    }
}

/// Thumbnail rendered into the account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveThumb {
    pub file: Locator,
    pub thumb: ThumbOptions,
    /// `topath`, or `tofolderid` with `toname`.
    pub to: Destination,
    pub noover: bool,
}

impl SaveThumb {
    pub fn params(&self) -> Result<Params, ApiError> {
        let mut p = thumb_params(&self.file, &self.thumb)?;
        self.to.apply(&mut p, DestinationRule::PathOrFolderAndName)?;
        p.flag("noover", self.noover);
        Ok(p)
    }
}

fn thumb_params(file: &Locator, thumb: &ThumbOptions) -> Result<Params, ApiError> {
    let mut p = Params::new();
    file.apply(&mut p, "fileid", "path")?;
    thumb.write(&mut p)?;
    Ok(p)
}

impl<T: Transport> PCloudClient<T> {
    pub fn getthumblink(&self, file: impl Into<Locator>, thumb: &ThumbOptions) -> Result<Value, ApiError> {
        self.get_json("getthumblink", thumb_params(&file.into(), thumb)?)
    }

    /// Links for many files at once; failures are reported per file.
    pub fn getthumbslinks(&self, fileids: &[u64], thumb: &ThumbOptions) -> Result<Value, ApiError> {
        let mut p = Params::new();
        p.list("fileids", require_list("fileids", fileids)?);
        thumb.write(&mut p)?;
        self.get_json("getthumbslinks", p)
    }

    /// Image bytes.
    pub fn getthumb(&self, file: impl Into<Locator>, thumb: &ThumbOptions) -> Result<Vec<u8>, ApiError> {
        self.get_bytes("getthumb", thumb_params(&file.into(), thumb)?)
    }

    pub fn savethumb(&self, request: &SaveThumb) -> Result<Value, ApiError> {
        self.get_json("savethumb", request.params()?)
    }
}
