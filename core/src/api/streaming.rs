//! Download and streaming links for files in the account.
//!
//! The option structs here are shared with the public-link variants in
//! `publinks`, which address the same content through a link code instead of
//! a locator.

use serde_json::Value;

use crate::client::PCloudClient;
use crate::error::ApiError;
use crate::params::{Locator, Params};
use crate::transport::Transport;

/// Options for plain download links (`getfilelink`, `getvideolinks`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkOptions {
    /// Serve as `application/octet-stream`.
    pub forcedownload: bool,
    pub contenttype: Option<String>,
    /// Bytes per second.
    pub maxspeed: Option<u64>,
    /// Leave the file name out of the link.
    pub skipfilename: bool,
}

impl LinkOptions {
    pub(crate) fn write(&self, p: &mut Params) {
        p.flag("forcedownload", self.forcedownload);
        p.opt("contenttype", self.contenttype.as_deref());
        p.opt("maxspeed", self.maxspeed);
        p.flag("skipfilename", self.skipfilename);
    }
}

/// Options for `getvideolink`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoOptions {
    pub forcedownload: bool,
    pub contenttype: Option<String>,
    pub skipfilename: bool,
    /// Audio bitrate, 16 to 320 kbps.
    pub abitrate: Option<u32>,
    /// Video bitrate, 16 to 4000 kbps.
    pub vbitrate: Option<u32>,
    /// `WIDTHxHEIGHT`, e.g. `640x360`.
    pub resolution: Option<String>,
    pub fixedbitrate: bool,
}

impl VideoOptions {
    pub(crate) fn write(&self, p: &mut Params) {
        p.flag("forcedownload", self.forcedownload);
        p.opt("contenttype", self.contenttype.as_deref());
        p.flag("skipfilename", self.skipfilename);
        p.opt("abitrate", self.abitrate);
        p.opt("vbitrate", self.vbitrate);
        p.opt("resolution", self.resolution.as_deref());
        p.flag("fixedbitrate", self.fixedbitrate);
    }
}

/// Options for audio links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioOptions {
    pub forcedownload: bool,
    pub contenttype: Option<String>,
    pub abitrate: Option<u32>,
}

impl AudioOptions {
    pub(crate) fn write(&self, p: &mut Params) {
        p.flag("forcedownload", self.forcedownload);
        p.opt("contenttype", self.contenttype.as_deref());
        p.opt("abitrate", self.abitrate);
    }
}

/// Options for `gethlslink`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HlsOptions {
    pub abitrate: Option<u32>,
    pub vbitrate: Option<u32>,
    pub resolution: Option<String>,
    pub skipfilename: bool,
}

impl HlsOptions {
    fn write(&self, p: &mut Params) {
        p.opt("abitrate", self.abitrate);
        p.opt("vbitrate", self.vbitrate);
        p.opt("resolution", self.resolution.as_deref());
        p.flag("skipfilename", self.skipfilename);
    }
}

/// Options for text downloads with charset conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextOptions {
    /// Source charset; guessed by the server when absent.
    pub fromencoding: Option<String>,
    /// Target charset; the server defaults to utf-8.
    pub toencoding: Option<String>,
    pub forcedownload: bool,
    pub contenttype: Option<String>,
}

impl TextOptions {
    pub(crate) fn write(&self, p: &mut Params) {
        p.opt("fromencoding", self.fromencoding.as_deref());
        p.opt("toencoding", self.toencoding.as_deref());
        p.flag("forcedownload", self.forcedownload);
        p.opt("contenttype", self.contenttype.as_deref());
    }
}

fn located(file: impl Into<Locator>) -> Result<Params, ApiError> {
    let mut p = Params::new();
    file.into().apply(&mut p, "fileid", "path")?;
    Ok(p)
}

impl<T: Transport> PCloudClient<T> {
    pub fn getfilelink(&self, file: impl Into<Locator>, options: &LinkOptions) -> Result<Value, ApiError> {
        let mut p = located(file)?;
        options.write(&mut p);
        self.get_json("getfilelink", p)
    }

    pub fn getvideolink(&self, file: impl Into<Locator>, options: &VideoOptions) -> Result<Value, ApiError> {
        let mut p = located(file)?;
        options.write(&mut p);
        self.get_json("getvideolink", p)
    }

    /// Links to every transcoded variant of a video.
    pub fn getvideolinks(&self, file: impl Into<Locator>, options: &LinkOptions) -> Result<Value, ApiError> {
        let mut p = located(file)?;
        options.write(&mut p);
        self.get_json("getvideolinks", p)
    }

    pub fn getaudiolink(&self, file: impl Into<Locator>, options: &AudioOptions) -> Result<Value, ApiError> {
        let mut p = located(file)?;
        options.write(&mut p);
        self.get_json("getaudiolink", p)
    }

    /// m3u8 playlist link for live streaming.
    pub fn gethlslink(&self, file: impl Into<Locator>, options: &HlsOptions) -> Result<Value, ApiError> {
        let mut p = located(file)?;
        options.write(&mut p);
        self.get_json("gethlslink", p)
    }

    /// Raw file contents, re-encoded by the server.
    pub fn gettextfile(&self, file: impl Into<Locator>, options: &TextOptions) -> Result<Vec<u8>, ApiError> {
        let mut p = located(file)?;
        options.write(&mut p);
        self.get_bytes("gettextfile", p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::*;

    #[test]
    fn every_link_requires_locator() {
        let c = client();
        let none = Locator::default;
        assert_rejected(&c, c.getfilelink(none(), &LinkOptions::default()));
        assert_rejected(&c, c.getvideolink(none(), &VideoOptions::default()));
        assert_rejected(&c, c.getvideolinks(none(), &LinkOptions::default()));
        assert_rejected(&c, c.getaudiolink(none(), &AudioOptions::default()));
        assert_rejected(&c, c.gethlslink(none(), &HlsOptions::default()));
        assert_rejected(&c, c.gettextfile(none(), &TextOptions::default()));
    }

    #[test]
    fn getfilelink_options() {
        let c = client();
        c.getfilelink(
            1234u64,
            &LinkOptions {
                forcedownload: true,
                maxspeed: Some(65536),
                ..LinkOptions::default()
            },
        )
        .unwrap();
        assert_sent(
            &c,
            "getfilelink",
            &[("fileid", "1234"), ("forcedownload", "1"), ("maxspeed", "65536")],
        );
    }

    #[test]
    fn getvideolink_options() {
        let c = client();
        c.getvideolink(
            "/Videos/clip.mp4",
            &VideoOptions {
                vbitrate: Some(1000),
                resolution: Some("1280x720".to_string()),
                fixedbitrate: true,
                ..VideoOptions::default()
            },
        )
        .unwrap();
        assert_sent(
            &c,
            "getvideolink",
            &[
                ("fixedbitrate", "1"),
                ("path", "/Videos/clip.mp4"),
                ("resolution", "1280x720"),
                ("vbitrate", "1000"),
            ],
        );
    }

    #[test]
    fn gethlslink_and_audio() {
        let c = client();
        c.gethlslink(
            5u64,
            &HlsOptions {
                abitrate: Some(128),
                skipfilename: true,
                ..HlsOptions::default()
            },
        )
        .unwrap();
        assert_sent(
            &c,
            "gethlslink",
            &[("abitrate", "128"), ("fileid", "5"), ("skipfilename", "1")],
        );

        c.getaudiolink(5u64, &AudioOptions::default()).unwrap();
        assert_sent(&c, "getaudiolink", &[("fileid", "5")]);
    }

    #[test]
    fn gettextfile_returns_raw_body() {
        let c = client();
        c.transport().respond(200, "plain {text} not json");
        let body = c
            .gettextfile(
                9u64,
                &TextOptions {
                    toencoding: Some("windows-1251".to_string()),
                    ..TextOptions::default()
                },
            )
            .unwrap();
        assert_eq!(body, b"plain {text} not json");
        assert_sent(&c, "gettextfile", &[("fileid", "9"), ("toencoding", "windows-1251")]);
    }
}
