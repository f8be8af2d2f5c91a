//! # Reference reporter writing artifacts to a local directory.
//!
//! [`LocalReporter`] persists each artifact under a base directory at the
//! destination's [`object_key`](crate::Destination::object_key) path.
//! Intended for demos, local development, and as a template for real
//! storage clients — production deployments implement [`Reporter`] against
//! their storage backend.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::ReportError;
use crate::profiler::ProfileArtifact;
use crate::reporter::{Destination, Reporter};

/// Filesystem-backed [`Reporter`].
#[derive(Clone, Debug)]
pub struct LocalReporter {
    base_dir: PathBuf,
}

impl LocalReporter {
    /// Creates a reporter rooted at `base_dir` (created on first upload).
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Directory under which artifacts are written.
    pub fn base_dir(&self) -> &std::path::Path {
        &self.base_dir
    }
}

#[async_trait]
impl Reporter for LocalReporter {
    async fn upload(
        &self,
        artifact: ProfileArtifact,
        destination: &Destination,
    ) -> Result<(), ReportError> {
        let path = self.base_dir.join(destination.object_key());
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ReportError::upload(e.to_string()))?;
        }
        tokio::fs::write(&path, artifact.as_bytes())
            .await
            .map_err(|e| ReportError::upload(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("profvisor-{}-{}", tag, std::process::id()))
    }

    #[tokio::test]
    async fn test_upload_writes_bytes_at_object_key() {
        let base = scratch_dir("local-upload");
        let reporter = LocalReporter::new(&base);
        let dest = Destination::new("profiles", "", "profile.json", "checkout", "req-7");

        reporter
            .upload(ProfileArtifact::new(vec![1, 2, 3]), &dest)
            .await
            .unwrap();

        let written = tokio::fs::read(base.join("checkout/req-7/profile.json"))
            .await
            .unwrap();
        assert_eq!(written, vec![1, 2, 3]);

        tokio::fs::remove_dir_all(&base).await.unwrap();
    }
}
