//! Chunked upload sessions.
//!
//! A session is opened with `upload_create`, filled with raw `upload_write`
//! chunks at explicit offsets, and committed as a file with `upload_save`.

use serde_json::Value;
use tracing::debug;

use crate::client::PCloudClient;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::params::{require_id, require_str, Params};
use crate::transport::Transport;

fn write_request(uploadid: u64, uploadoffset: u64, data: &[u8]) -> Result<HttpRequest, ApiError> {
    let p = Params::new()
        .with("uploadid", require_id("uploadid", uploadid)?)
        .with("uploadoffset", uploadoffset);
    Ok(HttpRequest::put_bytes("upload_write", p, data.to_vec()))
}

fn save_params(uploadid: u64, name: &str, folderid: u64) -> Result<Params, ApiError> {
    Ok(Params::new()
        .with("uploadid", require_id("uploadid", uploadid)?)
        .with("name", require_str("name", name)?)
        .with("folderid", folderid))
}

impl<T: Transport> PCloudClient<T> {
    pub fn upload_create(&self) -> Result<Value, ApiError> {
        self.get_json("upload_create", Params::new())
    }

    /// Writes `data` at `uploadoffset` as the raw request body.
    pub fn upload_write(&self, uploadid: u64, uploadoffset: u64, data: &[u8]) -> Result<Value, ApiError> {
        self.json(write_request(uploadid, uploadoffset, data)?)
    }

    /// Commits the session as `name` in `folderid` (0 is the root).
    pub fn upload_save(&self, uploadid: u64, name: &str, folderid: u64) -> Result<Value, ApiError> {
        self.get_json("upload_save", save_params(uploadid, name, folderid)?)
    }

    /// Uploads `data` through a fresh session, `chunk_size` bytes per write,
    /// and returns the `upload_save` payload.
    ///
    /// Every step is checked; the first failing step aborts the upload and
    /// the session is left for the server to expire.
    pub fn upload_bytes(&self, name: &str, folderid: u64, data: &[u8], chunk_size: usize) -> Result<Value, ApiError> {
        require_str("name", name)?;
        if chunk_size == 0 {
            return Err(ApiError::invalid("'chunk_size' must be greater than zero"));
        }

        let session = self.get_checked("upload_create", Params::new())?;
        let uploadid = session
            .get("uploadid")
            .and_then(Value::as_u64)
            .filter(|&id| id != 0)
            .ok_or_else(|| ApiError::DeserializationError("upload_create: missing 'uploadid'".to_string()))?;

        let mut offset = 0u64;
        for chunk in data.chunks(chunk_size) {
            self.checked(write_request(uploadid, offset, chunk)?)?;
            offset += chunk.len() as u64;
        }
        debug!(uploadid, bytes = offset, file = name, "upload session written");

        self.get_checked("upload_save", save_params(uploadid, name, folderid)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::*;
    use crate::http::{HttpMethod, RequestBody};

    #[test]
    fn upload_write_puts_raw_bytes() {
        let c = client();
        c.upload_write(17, 4096, b"chunk").unwrap();
        let req = c.transport().last();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.body, RequestBody::Bytes(b"chunk".to_vec()));
        assert_sent(&c, "upload_write", &[("uploadid", "17"), ("uploadoffset", "4096")]);
    }

    #[test]
    fn save_and_write_validate() {
        let c = client();
        assert_rejected(&c, c.upload_write(0, 0, b"x"));
        assert_rejected(&c, c.upload_save(17, "", 0));
        assert_rejected(&c, c.upload_save(0, "a.bin", 0));

        c.upload_save(17, "a.bin", 0).unwrap();
        assert_sent(&c, "upload_save", &[("folderid", "0"), ("name", "a.bin"), ("uploadid", "17")]);
    }

    #[test]
    fn upload_bytes_drives_session() {
        let c = client();
        c.transport().respond(200, r#"{"result":0,"uploadid":55}"#);
        c.upload_bytes("data.bin", 3, b"abcdefghij", 4).unwrap();

        let requests = c.transport().requests();
        let steps: Vec<&str> = requests.iter().map(|r| r.endpoint.as_str()).collect();
        assert_eq!(
            steps,
            vec!["upload_create", "upload_write", "upload_write", "upload_write", "upload_save"]
        );
        let offsets: Vec<&str> = requests[1..4]
            .iter()
            .map(|r| r.params.get("uploadoffset").unwrap_or_default())
            .collect();
        assert_eq!(offsets, vec!["0", "4", "8"]);
        assert_eq!(requests[3].body, RequestBody::Bytes(b"ij".to_vec()));
        assert_sent(&c, "upload_save", &[("folderid", "3"), ("name", "data.bin"), ("uploadid", "55")]);
    }

    #[test]
    fn upload_bytes_empty_data_skips_writes() {
        let c = client();
        c.transport().respond(200, r#"{"result":0,"uploadid":8}"#);
        c.upload_bytes("empty", 0, &[], 1024).unwrap();
        assert_eq!(c.transport().count(), 2);
    }

    #[test]
    fn upload_bytes_stops_on_failure() {
        let c = client();
        c.transport().respond(200, r#"{"result":0,"uploadid":8}"#);
        c.transport()
            .respond(200, r#"{"result":2008,"error":"User is over quota."}"#);
        let err = c.upload_bytes("big", 0, &[0u8; 10], 5).unwrap_err();
        assert!(matches!(err, ApiError::Api { result: 2008, ref context, .. } if context == "upload_write"));
        assert_eq!(c.transport().count(), 2);
    }

    #[test]
    fn upload_bytes_needs_uploadid() {
        let c = client();
        assert_rejected(&c, c.upload_bytes("x", 0, b"1", 0));
        assert_rejected(&c, c.upload_bytes("", 0, b"1", 1));

        let err = c.upload_bytes("x", 0, b"1", 1).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
        assert_eq!(c.transport().count(), 1);
    }

    #[test]
    fn upload_bytes_zero_uploadid_is_malformed() {
        let c = client();
        c.transport().respond(200, r#"{"result":0,"uploadid":0}"#);
        let err = c.upload_bytes("x", 0, b"1", 1).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
        assert!(!err.is_invalid_argument());
        assert_eq!(c.transport().count(), 1);
    }
}
