//! File revisions.

use serde_json::Value;

use crate::client::PCloudClient;
use crate::error::ApiError;
use crate::params::{require_id, Locator, Params};
use crate::transport::Transport;

impl<T: Transport> PCloudClient<T> {
    pub fn listrevisions(&self, file: impl Into<Locator>) -> Result<Value, ApiError> {
        let mut p = Params::new();
        file.into().apply(&mut p, "fileid", "path")?;
        self.get_json("listrevisions", p)
    }

    /// Makes `revisionid` the current content; the replaced content becomes
    /// a revision itself.
    pub fn revertrevision(&self, file: impl Into<Locator>, revisionid: u64) -> Result<Value, ApiError> {
        let mut p = Params::new();
        file.into().apply(&mut p, "fileid", "path")?;
        p.insert("revisionid", require_id("revisionid", revisionid)?);
        self.get_json("revertrevision", p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::*;

    #[test]
    fn listrevisions_locator() {
        let c = client();
        assert_rejected(&c, c.listrevisions(Locator::default()));
        c.listrevisions("/notes.txt").unwrap();
        assert_sent(&c, "listrevisions", &[("path", "/notes.txt")]);
    }

    #[test]
    fn revertrevision_requires_revision() {
        let c = client();
        assert_rejected(&c, c.revertrevision(5u64, 0));
        assert_rejected(&c, c.revertrevision(Locator::default(), 3));

        c.revertrevision(5u64, 3).unwrap();
        assert_sent(&c, "revertrevision", &[("fileid", "5"), ("revisionid", "3")]);
    }
}
