//! Documentation stream generator.
//!
//! Opens one logical conversation for the whole run: the instruction
//! template is sent once and its reply discarded (context-setting only),
//! then each file is assembled and generated independently. A file whose
//! prompt fails to assemble or whose generation fails is skipped and simply
//! absent from the result map; the run continues. Template-priming failures
//! and cancellation are fatal.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{error, info};

use crate::contract::ChatSession;
use crate::error::Error;
use crate::model::SourceFile;
use crate::prompt;
use crate::template;

/// Generates one document per file, keyed by the file's path. Skipped files
/// are reported via tracing only, never via the result type.
pub async fn generate<S: ChatSession>(
    session: &mut S,
    files: &[SourceFile],
) -> Result<BTreeMap<PathBuf, String>, Error> {
    session.prime(&template::instruction_template()).await?;
    info!("Documentation template sent");

    let mut documents = BTreeMap::new();
    let mut skipped = 0usize;

    for file in files {
        let prompt = match prompt::assemble(file) {
            Ok(prompt) => prompt,
            Err(e) => {
                error!(path = %file.path.display(), error = %e, "Prompt assembly failed, skipping file");
                skipped += 1;
                continue;
            }
        };

        match session.send(&prompt).await {
            Ok(document) => {
                documents.insert(file.path.clone(), document);
            }
            Err(e) if e.is_cancelled() => return Err(e),
            Err(e) => {
                error!(path = %file.path.display(), error = %e, "Generation failed, skipping file");
                skipped += 1;
            }
        }
    }

    info!(
        generated = documents.len(),
        skipped, "Documentation generation finished"
    );
    Ok(documents)
}
