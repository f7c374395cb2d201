//! Pipeline coordinator: extract, generate, synchronise.
//!
//! Data flows strictly left to right; no stage re-enters an earlier one.
//! Extraction and template-priming failures short-circuit the run; per-file
//! assembly or generation failures only shrink the document set, and the
//! synchroniser still stores whatever was produced.

use std::path::Path;

use tracing::{error, info};

use crate::contract::{ArtifactIndex, ArtifactStore, ChatSession};
use crate::error::Error;
use crate::extract;
use crate::generate;
use crate::sync;

/// Outcome summary of one pipeline run, for display and logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub files_analyzed: usize,
    pub documents_generated: usize,
    pub files_skipped: usize,
    pub artifacts_uploaded: usize,
}

/// Runs the full pipeline for the project at `project_path`.
pub async fn run<C, S, I>(
    project_path: &Path,
    session: &mut C,
    store: &S,
    index: &I,
) -> Result<RunReport, Error>
where
    C: ChatSession,
    S: ArtifactStore,
    I: ArtifactIndex,
{
    info!(path = %project_path.display(), "Starting documentation pipeline");

    let project = extract::extract(project_path).inspect_err(|e| {
        error!(path = %project_path.display(), error = %e, "Project analysis failed");
    })?;
    let files_analyzed = project.files.len();
    info!(files = files_analyzed, "Project analysis complete");

    let documents = generate::generate(session, &project.files).await?;
    let documents_generated = documents.len();

    let project_name = project_path.to_string_lossy();
    sync::sync(store, index, &documents, &project_name).await?;

    let report = RunReport {
        files_analyzed,
        documents_generated,
        files_skipped: files_analyzed - documents_generated,
        artifacts_uploaded: documents_generated,
    };
    info!(?report, "Pipeline finished");
    Ok(report)
}
