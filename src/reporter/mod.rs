//! # Artifact upload capability.
//!
//! The upload mechanism is an **external collaborator**: [`Reporter`] is the
//! seam, [`Destination`] is the metadata an artifact is tagged with (storage
//! container, key layout, and the identity of the invocation that produced
//! it).
//!
//! A reference implementation writing to the local filesystem is provided
//! in [`LocalReporter`] — useful for demos and as a template for real
//! storage clients.

mod local;

pub use local::LocalReporter;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ReportError;
use crate::profiler::ProfileArtifact;

/// Where an artifact goes and which invocation produced it.
///
/// The object key layout is `[prefix/]function/request_id/file_name`; the
/// prefix contributes nothing when empty, and a trailing `/` on the prefix
/// is not doubled.
#[derive(Clone, Debug)]
pub struct Destination {
    bucket: Arc<str>,
    path_prefix: Arc<str>,
    file_name: Arc<str>,
    function_name: Arc<str>,
    request_id: Arc<str>,
}

impl Destination {
    /// Creates a fully-resolved destination.
    pub fn new(
        bucket: impl Into<Arc<str>>,
        path_prefix: impl Into<Arc<str>>,
        file_name: impl Into<Arc<str>>,
        function_name: impl Into<Arc<str>>,
        request_id: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            path_prefix: path_prefix.into(),
            file_name: file_name.into(),
            function_name: function_name.into(),
            request_id: request_id.into(),
        }
    }

    /// Target storage container name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Key prefix under which the artifact is stored (possibly empty).
    pub fn path_prefix(&self) -> &str {
        &self.path_prefix
    }

    /// Artifact object name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Name of the function that produced the artifact.
    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// Request identifier of the invocation that produced the artifact.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Renders the object key: `[prefix/]function/request_id/file_name`.
    pub fn object_key(&self) -> String {
        let prefix = self.path_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            format!(
                "{}/{}/{}",
                self.function_name, self.request_id, self.file_name
            )
        } else {
            format!(
                "{}/{}/{}/{}",
                prefix, self.function_name, self.request_id, self.file_name
            )
        }
    }
}

/// Contract for the external artifact upload mechanism.
///
/// An upload runs to completion or failure — the controller has no way to
/// cancel it mid-flight, and never retries.
#[async_trait]
pub trait Reporter: Send + Sync + 'static {
    /// Delivers one artifact to the destination.
    async fn upload(
        &self,
        artifact: ProfileArtifact,
        destination: &Destination,
    ) -> Result<(), ReportError>;
}
