use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Shell types for completion generation
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Result table formats
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Parser)]
#[command(name = "form-analyzer")]
#[command(author, version, about = "Extract answers from scanned forms using cached Textract results", long_about = None)]
#[command(after_help = r#"Examples:
  form-analyzer analyze scans/ -d survey.toml              Write scans/result.xlsx
  form-analyzer analyze scans/ -d survey.toml -f json      Print results as JSON
  form-analyzer fields scans/                              List recognized fields per file
  form-analyzer config                                     Show effective thresholds

Quick Start:
  1. Run Textract (FORMS) on every page image, save as <image>.json
  2. form-analyzer fields scans/ to see what Textract found
  3. Describe the questions in a TOML file
  4. form-analyzer analyze scans/ -d survey.toml
"#)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze all forms in a folder of Textract results
    #[command(after_help = r#"Examples:
  form-analyzer analyze scans/ -d survey.toml
  form-analyzer analyze scans/ -d survey.toml -o review.xlsx
  form-analyzer analyze scans/ -d survey.toml -f json -o result.json
  form-analyzer analyze scans/ -d survey.toml --dump-fields   # Also write fields<file>.txt
"#)]
    Analyze {
        /// Folder holding the Textract JSON result files
        #[arg(value_name = "FOLDER")]
        folder: PathBuf,

        /// Form description (TOML)
        #[arg(short, long, value_name = "FILE")]
        description: PathBuf,

        /// Output file (default: <FOLDER>/result.xlsx; JSON goes to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Xlsx)]
        format: OutputFormat,

        /// Write a field listing per form next to the result files
        #[arg(long)]
        dump_fields: bool,
    },

    /// List the recognized fields of every form
    #[command(after_help = r#"Examples:
  form-analyzer fields scans/                       One form per result file
  form-analyzer fields scans/ -d survey.toml        Group pages as the description does
"#)]
    Fields {
        /// Folder holding the Textract JSON result files
        #[arg(value_name = "FOLDER")]
        folder: PathBuf,

        /// Form description, used only for its page grouping
        #[arg(short, long, value_name = "FILE")]
        description: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    #[command(after_help = r#"Examples:
  form-analyzer completions bash > ~/.local/share/bash-completion/completions/form-analyzer
  form-analyzer completions zsh > ~/.zfunc/_form-analyzer
  form-analyzer completions fish > ~/.config/fish/completions/form-analyzer.fish
"#)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}
