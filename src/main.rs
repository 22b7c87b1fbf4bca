//! form-analyzer - extract answers from scanned forms via cached Textract results

use clap::Parser;
use tracing_subscriber::EnvFilter;

use form_analyzer::cli::{Cli, Commands};
use form_analyzer::config::Config;
use form_analyzer::error::Result;

mod commands;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        if let Some(hint) = e.hint() {
            eprintln!("\nHint: {}", hint);
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze {
            folder,
            description,
            output,
            format,
            dump_fields,
        } => {
            let config = Config::load(cli.config.as_deref())?;
            commands::cmd_analyze(&folder, &description, output, format, dump_fields, &config)
        }
        Commands::Fields { folder, description } => {
            commands::cmd_fields(&folder, description.as_deref())
        }
        Commands::Config { json } => commands::cmd_config(cli.config.as_deref(), json),
        Commands::Completions { shell } => commands::cmd_completions(shell),
    }
}
