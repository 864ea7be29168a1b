use anyhow::Result;
use colored::Colorize;

use crate::app::init_config;

use super::Commands;

/// Handle CLI subcommands that need neither a backend nor the UI.
///
/// Returns `true` when the command was fully handled here.
pub async fn handle_command(command: &Commands) -> Result<bool> {
    match command {
        Commands::Init => {
            println!("Initializing SiteScan configuration...");
            let path = init_config()?;
            println!("Configuration ready at {}", path.display().to_string().green());
            Ok(true)
        }
        Commands::Version => {
            show_version();
            Ok(true)
        }
        // Needs the backend / terminal, run by the orchestrator
        Commands::Ui | Commands::Analyze { .. } => Ok(false),
    }
}

/// Show version information
pub fn show_version() {
    println!("SiteScan v{}", env!("CARGO_PKG_VERSION"));
    println!("   Vegetation and soil analysis of site images");
}
