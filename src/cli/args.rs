use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::analysis::AnalysisKind;

#[derive(Parser, Debug)]
#[command(name = "sitescan")]
#[command(version)]
#[command(about = "Vegetation and soil analysis of site images", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the analysis service (overrides config)
    #[arg(short, long, global = true)]
    pub backend_url: Option<String>,

    /// Fabricate results locally instead of contacting the service
    #[arg(long, global = true)]
    pub mock: bool,

    /// Submit as soon as a file is selected
    #[arg(long, global = true)]
    pub auto_submit: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive terminal UI (default)
    Ui,
    /// Analyze one image and print the result
    Analyze {
        /// Which analysis to run
        #[arg(short, long, value_enum)]
        kind: AnalysisKind,

        /// Image file to upload
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        output_format: OutputFormat,
    },
    /// Initialize configuration
    Init,
    /// Show version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON structured output
    Json,
}
