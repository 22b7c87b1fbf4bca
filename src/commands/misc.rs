//! Miscellaneous commands: config, completions

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io;
use std::path::Path;

use form_analyzer::cli::{Cli, CompletionShell};
use form_analyzer::config::Config;
use form_analyzer::error::Result;

/// Show the effective configuration
pub fn cmd_config(path: Option<&Path>, json: bool) -> Result<()> {
    let config = Config::load(path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let source = match path {
        Some(p) => p.to_path_buf(),
        None => Config::config_path()?,
    };
    if source.exists() {
        println!("\nConfiguration from {}\n", source.display().to_string().cyan());
    } else {
        println!("\nDefault configuration ({} not found)\n", source.display());
    }

    let t = &config.thresholds;
    println!("  {}:", "Thresholds".bold());
    println!("    similarity_threshold:          {}", t.similarity_threshold);
    println!("    min_confidence:                {}", t.min_confidence);
    println!("    max_certain_text_len:          {}", t.max_certain_text_len);
    println!("    part_match_min_label_len:      {}", t.part_match_min_label_len);
    println!("    single_select_missing_options: {}", t.single_select_missing_options);
    println!("    multi_select_missing_options:  {}", t.multi_select_missing_options);
    println!();
    println!("  {}:", "Output".bold());
    println!("    file_name:        {}", config.output.file_name);
    println!("    sheet_name:       {}", config.output.sheet_name);
    println!("    uncertain_marker: {}", config.output.uncertain_marker);
    println!();
    Ok(())
}

/// Generate shell completions
pub fn cmd_completions(shell: CompletionShell) -> Result<()> {
    let mut cmd = Cli::command();
    let shell = match shell {
        CompletionShell::Bash => Shell::Bash,
        CompletionShell::Zsh => Shell::Zsh,
        CompletionShell::Fish => Shell::Fish,
        CompletionShell::Powershell => Shell::PowerShell,
    };
    generate(shell, &mut cmd, "form-analyzer", &mut io::stdout());
    Ok(())
}
