use anyhow::Result;
use clap::Parser;

use sitescan::{
    analysis::AnalysisKind,
    cli::{Cli, Commands, OutputFormat},
    runtime::{resolve_config, NonInteractiveRunner, Orchestrator},
    utils::init_logger,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Set up logging if verbose (the UI logs to a file instead)
    if cli.verbose && !matches!(cli.command, None | Some(Commands::Ui)) {
        init_logger();
    }

    // Check if running in non-interactive mode
    let analyze = match &cli.command {
        Some(Commands::Analyze {
            kind,
            file,
            output_format,
        }) => Some((*kind, file.clone(), *output_format)),
        _ => None,
    };

    if let Some((kind, file, output_format)) = analyze {
        run_non_interactive(cli, kind, file, output_format).await
    } else {
        // Create and run the orchestrator for interactive mode
        let orchestrator = Orchestrator::new(cli)?;
        orchestrator.run().await
    }
}

/// Run in non-interactive mode
async fn run_non_interactive(
    cli: Cli,
    kind: AnalysisKind,
    file: std::path::PathBuf,
    output_format: OutputFormat,
) -> Result<()> {
    let config = resolve_config(&cli)?;

    // Create and run the non-interactive runner
    let runner = NonInteractiveRunner::new(&config)?;
    let result = runner.execute(kind, &file).await?;

    // Format and output the result
    println!("{}", runner.format_result(&result, output_format));

    // Exit with appropriate code
    if result.is_error() {
        std::process::exit(1);
    }

    Ok(())
}
