//! # contract: seams to the external collaborators
//!
//! Traits for the three remote services the pipeline talks to: the
//! generation service (chat session), the object store and the document
//! index. Concrete HTTP clients implement them for production; every trait
//! is annotated for `mockall` so tests substitute deterministic mocks
//! without a live backend.
//!
//! Error handling is uniform: all methods return the domain [`Error`], and
//! a cancelled network call surfaces as `ErrorKind::Cancelled` rather than
//! a generic failure.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::error::Error;

/// One logical conversation with the generation service, exclusively owned
/// by the generator for the duration of a run. Both call shapes the pipeline
/// uses are explicit: priming discards the streamed reply, sending collects
/// it into one document string.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ChatSession: Send {
    /// Send the instruction template and drain its streamed reply without
    /// retaining the tokens.
    async fn prime(&mut self, template: &str) -> Result<(), Error>;

    /// Send a prompt and join the streamed tokens, with no separator, into
    /// one string.
    async fn send(&mut self, prompt: &str) -> Result<String, Error>;
}

/// Minimal operation set of the object store holding generated artifacts.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, Error>;

    async fn make_bucket(&self, bucket: &str) -> Result<(), Error>;

    async fn remove_bucket(&self, bucket: &str) -> Result<(), Error>;

    async fn put_object(&self, bucket: &str, object: &str, content: &[u8]) -> Result<(), Error>;

    async fn remove_objects(&self, bucket: &str, objects: &[String]) -> Result<(), Error>;
}

/// Content type of every stored artifact, used both for the upload header
/// and the metadata row so the two can never disagree.
pub const ARTIFACT_CONTENT_TYPE: &str = "text/markdown";

/// One artifact's metadata row in the document index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub id: Uuid,
    pub file_size: u64,
    pub content_type: String,
    /// Artifact object name inside the bucket.
    pub file_path: String,
    pub bucket_name: String,
    pub upload_date: DateTime<Utc>,
}

/// The artifact metadata collection, keyed loosely by bucket name.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ArtifactIndex: Send + Sync {
    async fn insert_many(&self, records: Vec<ArtifactRecord>) -> Result<(), Error>;

    async fn delete_by_bucket(&self, bucket: &str) -> Result<(), Error>;

    /// Artifact object names currently recorded under the bucket.
    async fn names_by_bucket(&self, bucket: &str) -> Result<Vec<String>, Error>;
}
