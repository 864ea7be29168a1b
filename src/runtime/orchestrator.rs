use anyhow::{Context, Result};
use colored::Colorize;
use std::sync::Arc;

use crate::{
    analysis::BackendFactory,
    app::{get_config_dir, load_config, load_config_file, BackendMode, Config},
    cli::{handle_command, Cli},
    controller::{Controller, ControllerSettings},
    presentation::DiskFileSource,
    tui::{run_ui, TuiPresenter},
    utils::init_file_logger,
};

/// Load configuration for a CLI invocation and apply command-line overrides
pub fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        load_config_file(config_path)?
    } else {
        match load_config() {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Failed to load config: {}. Using defaults.", e);
                Config::default()
            }
        }
    };

    apply_overrides(&mut config, cli);
    Ok(config)
}

/// Command-line flags win over every config source
pub fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(url) = &cli.backend_url {
        config.backend.url = url.clone();
        config.backend.mode = BackendMode::Remote;
    }
    if cli.mock {
        config.backend.mode = BackendMode::Mock;
    }
    if cli.auto_submit {
        config.ui.auto_submit = true;
    }
}

/// Main runtime orchestrator
pub struct Orchestrator {
    cli: Cli,
    config: Config,
}

impl Orchestrator {
    /// Create a new orchestrator from CLI args
    pub fn new(cli: Cli) -> Result<Self> {
        let config = resolve_config(&cli)?;
        Ok(Self { cli, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the orchestrator
    pub async fn run(self) -> Result<()> {
        // Handle subcommands
        if let Some(command) = &self.cli.command {
            if handle_command(command).await? {
                return Ok(()); // Command handled, exit
            }
        }

        // The terminal belongs to the UI, so logs go to a file
        let log_dir = get_config_dir()?;
        let _log_guard = init_file_logger(&log_dir);

        let backend = BackendFactory::create(&self.config)
            .context("Failed to initialize analysis backend")?;

        println!("Starting SiteScan with backend: {}", backend.name().green());
        tracing::info!(
            "Starting UI (backend: {}, auto submit: {})",
            backend.name(),
            self.config.ui.auto_submit
        );

        let controller = Controller::new(
            TuiPresenter::new(),
            backend,
            Arc::new(DiskFileSource),
            ControllerSettings::from(&self.config.ui),
        );

        run_ui(controller).await
    }
}
