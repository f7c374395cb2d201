//! Artifact synchronizer: replaces the stored artifact set for a project.
//!
//! Destructive-then-additive: the previous bucket contents and metadata
//! rows are removed first, then every freshly generated document is
//! uploaded and indexed. The sequence aborts on the first failure and never
//! rolls back uploads already committed, so a mid-sync failure can leave
//! the store and the index out of step until the next successful run.
//!
//! # Responsibilities
//! - Derive the bucket key from the project name and the artifact name from
//!   each source path.
//! - Trim generation preamble so stored documents start at the
//!   `# File Overview` marker.
//! - Keep the object store and the index in the same order of operations
//!   for every run: list, remove, delete rows, upload + insert per file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::contract::{ArtifactIndex, ArtifactRecord, ArtifactStore, ARTIFACT_CONTENT_TYPE};
use crate::error::Error;
use crate::template::DOC_START_MARKER;

const ARTIFACT_EXTENSION: &str = "md";

/// Replaces all stored artifacts for `project_name` with `documents`.
pub async fn sync<S, I>(
    store: &S,
    index: &I,
    documents: &BTreeMap<PathBuf, String>,
    project_name: &str,
) -> Result<(), Error>
where
    S: ArtifactStore,
    I: ArtifactIndex,
{
    let bucket = bucket_name(project_name);
    info!(bucket = %bucket, documents = documents.len(), "Synchronising artifacts");

    let stale_names = index.names_by_bucket(&bucket).await?;

    if store.bucket_exists(&bucket).await? {
        if !stale_names.is_empty() {
            store.remove_objects(&bucket, &stale_names).await?;
        }
        store.remove_bucket(&bucket).await?;
        debug!(bucket = %bucket, removed = stale_names.len(), "Removed previous bucket");
    }

    index.delete_by_bucket(&bucket).await?;

    for (path, document) in documents {
        let object_name = artifact_name(path);
        let content = trim_to_marker(document);

        if !store.bucket_exists(&bucket).await? {
            store.make_bucket(&bucket).await?;
        }
        store
            .put_object(&bucket, &object_name, content.as_bytes())
            .await?;

        let record = ArtifactRecord {
            id: Uuid::new_v4(),
            file_size: content.len() as u64,
            content_type: ARTIFACT_CONTENT_TYPE.to_string(),
            file_path: object_name.clone(),
            bucket_name: bucket.clone(),
            upload_date: Utc::now(),
        };
        index.insert_many(vec![record]).await?;
        debug!(bucket = %bucket, object = %object_name, "Uploaded artifact");
    }

    info!(bucket = %bucket, "Synchronisation complete");
    Ok(())
}

/// The bucket key is the base name of the project path.
fn bucket_name(project_name: &str) -> String {
    Path::new(project_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| project_name.to_string())
}

/// Basename of the source path with its extension replaced by `.md`.
fn artifact_name(path: &Path) -> String {
    let base = path.file_name().map(Path::new).unwrap_or(path);
    base.with_extension(ARTIFACT_EXTENSION)
        .to_string_lossy()
        .into_owned()
}

/// Keeps the text from the first occurrence of the document marker onward,
/// discarding any conversational preamble the generation service echoed.
/// Documents without the marker are stored unmodified.
fn trim_to_marker(document: &str) -> &str {
    match document.find(DOC_START_MARKER) {
        Some(start) => &document[start..],
        None => document,
    }
}
