//! Whole-dataset import and export.

use std::path::PathBuf;

use chrono::Utc;
use clap::Subcommand;
use pomofocus_core::{export_file_name, ImportMode};

use super::{print_json, CommandResult};
use crate::host::Host;

#[derive(Subcommand)]
pub enum DataAction {
    /// Write the dataset and a summary as JSON
    Export {
        /// Destination file, or "-" for stdout
        /// [default: pomodoro-data-<date>.json]
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Load a JSON dataset
    Import {
        path: PathBuf,
        /// replace or merge
        #[arg(long)]
        mode: ImportMode,
    },
}

pub fn run(action: DataAction) -> CommandResult {
    let host = Host::open()?;
    let mut app = host.app()?;

    match action {
        DataAction::Export { output } => {
            let json = app.export().to_json_pretty()?;
            let path = output.unwrap_or_else(|| {
                PathBuf::from(export_file_name(Utc::now(), app.tracker().zone()))
            });
            if path.as_os_str() == "-" {
                println!("{json}");
            } else {
                std::fs::write(&path, json)?;
                eprintln!("Exported to {}", path.display());
            }
        }
        DataAction::Import { path, mode } => {
            let payload = std::fs::read_to_string(&path)?;
            let (_, event) = app.import(&payload, mode)?;
            host.save_state(&app)?;
            print_json(&event)?;
        }
    }
    Ok(())
}
