//! The analyze command: description + folder -> result table

use colored::Colorize;
use std::path::{Path, PathBuf};

use form_analyzer::analyze::{self, Analysis};
use form_analyzer::cli::OutputFormat;
use form_analyzer::config::Config;
use form_analyzer::description::FormDescription;
use form_analyzer::dump;
use form_analyzer::error::Result;
use form_analyzer::forms::{self, ParsedForm};
use form_analyzer::render;

pub fn cmd_analyze(
    folder: &Path,
    description: &Path,
    output: Option<PathBuf>,
    format: OutputFormat,
    dump_fields: bool,
    config: &Config,
) -> Result<()> {
    let description = FormDescription::load(description)?;
    let forms: Vec<ParsedForm> =
        forms::build(folder, &description.keywords_per_page)?.collect::<Result<_>>()?;

    if dump_fields {
        let written = dump::write_listings(folder, &forms)?;
        eprintln!("Wrote {} field listing(s) to {}", written.len(), folder.display());
    }

    let analysis = analyze::evaluate(&description, &forms, &config.thresholds);

    match (format, output) {
        (OutputFormat::Json, None) => {
            println!("{}", render::to_json(&analysis)?);
        }
        (OutputFormat::Json, Some(path)) => {
            render::write_json(&analysis, &path)?;
            print_summary(&analysis, &path);
        }
        (OutputFormat::Xlsx, output) => {
            let path = output.unwrap_or_else(|| folder.join(&config.output.file_name));
            render::write_xlsx(&analysis, &path, &config.output)?;
            print_summary(&analysis, &path);
        }
    }

    Ok(())
}

fn print_summary(analysis: &Analysis, path: &Path) {
    let summary = &analysis.summary;
    println!(
        "\nAnalyzed {} form(s), {} answer(s)",
        summary.forms.to_string().bold(),
        summary.questions
    );

    if summary.uncertain == 0 {
        println!("  {}", "All values certain".green());
    } else {
        println!(
            "  {} value(s) need review",
            summary.uncertain.to_string().yellow()
        );
        for row in analysis.rows.iter().filter(|r| r.uncertain_count() > 0) {
            println!("    {} ({})", row.label, row.uncertain_count());
        }
    }

    println!("\nResults written to {}", path.display().to_string().cyan());
}
