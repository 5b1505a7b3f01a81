//! Main application entry point
//!
//! Runs one headless dashboard session: restores the previous state, applies
//! the requested changes, saves and prints the render frames as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dv_data::{DatasetStore, FileImporter, MemoryStore, SqliteStore};

mod session;

use session::Session;

#[derive(Parser)]
#[command(name = "datavis")]
#[command(about = "Headless data visualization dashboard")]
struct Args {
    /// Directory holding the dataset store and settings file
    #[arg(long, default_value = "./.datavis")]
    data_dir: PathBuf,

    /// Load the built-in demo dataset
    #[arg(long)]
    mock: bool,

    /// Add a bar chart over the selected dataset
    #[arg(long)]
    add_viz: bool,

    /// Delete a dataset and its charts
    #[arg(long, value_name = "ID")]
    delete_dataset: Option<String>,

    /// Switch between dark and light mode
    #[arg(long)]
    toggle_theme: bool,

    /// CSV or JSON files to import
    files: Vec<PathBuf>,
}

fn open_store(data_dir: &std::path::Path) -> Arc<dyn DatasetStore> {
    let path = data_dir.join("datasets.db");
    match SqliteStore::open(&path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!("Could not open {}: {}. Datasets will not be kept", path.display(), e);
            Arc::new(MemoryStore::new())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    std::fs::create_dir_all(&args.data_dir)
        .with_context(|| format!("Failed to create data directory {}", args.data_dir.display()))?;

    let mut session = Session::new(
        open_store(&args.data_dir),
        Arc::new(FileImporter::default()),
        args.data_dir.join("settings.json"),
    );
    session.restore();

    if !args.files.is_empty() {
        let report = session.import_paths(&args.files).await?;
        info!("Imported {} of {} files", report.imported.len(), args.files.len());
    }

    if args.mock {
        session.load_mock().await?;
    }

    if args.add_viz {
        match session.dashboard().selected_id().map(str::to_string) {
            Some(id) => {
                session.dashboard_mut().add_visualization(&id)?;
            }
            None => warn!("No dataset selected; nothing to chart"),
        }
    }

    if let Some(id) = &args.delete_dataset {
        if session.delete_dataset(id).is_none() {
            warn!("Unknown dataset {}", id);
        }
    }

    if args.toggle_theme {
        session.toggle_theme();
        info!("Theme: {}", if session.dark_mode() { "dark" } else { "light" });
    }

    if session.persist_if_dirty() {
        info!("Saved dashboard to {}", session.settings_path().display());
    }

    let frames = session.render_frames();
    println!("{}", serde_json::to_string_pretty(&frames)?);

    if !session.warnings().is_empty() {
        warn!("Session finished with {} warnings", session.warnings().len());
    }

    Ok(())
}
