use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;

use crate::config;
use crate::index::HttpArtifactIndex;
use crate::llama::OllamaChatSession;
use crate::pipeline;
use crate::store::HttpArtifactStore;

/// CLI for docsmith: generate and publish documentation for a C# project.
#[derive(Parser)]
#[clap(
    name = "docsmith",
    version,
    about = "Generate LLM-written documentation for a C# project and publish it to an object store"
)]
pub struct Cli {
    /// Project root containing the solution file; prompted for
    /// interactively when omitted
    pub project_path: Option<PathBuf>,

    /// Path to the YAML settings file
    #[clap(long)]
    pub config: Option<PathBuf>,
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    let settings = config::load_settings(cli.config.as_deref())?;
    let project_path = match cli.project_path {
        Some(path) => path,
        None => prompt_for_path()?,
    };

    let cancel = CancellationToken::new();
    spawn_ctrl_c_handler(cancel.clone());

    let mut session = OllamaChatSession::new(&settings.llama, cancel.clone());
    let store = HttpArtifactStore::new(&settings.object_store, cancel.clone());
    let index = HttpArtifactIndex::new(&settings.index, cancel.clone());

    match pipeline::run(&project_path, &mut session, &store, &index).await {
        Ok(report) => {
            println!("Documentation generated and published successfully.");
            println!("{report:#?}");
            Ok(())
        }
        Err(e) => {
            eprintln!("[ERROR] Documentation generation failed: {e}");
            Err(anyhow::Error::new(e))
        }
    }
}

/// Reads the project path from stdin, re-prompting on blank input.
fn prompt_for_path() -> Result<PathBuf> {
    print!("Enter your project path: ");
    io::stdout().flush()?;

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            anyhow::bail!("No project path provided");
        }
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }
}

fn spawn_ctrl_c_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling run");
            cancel.cancel();
        }
    });
}
