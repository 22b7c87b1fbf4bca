//! The fields command: dump what Textract recognized, per form

use colored::Colorize;
use std::path::Path;

use form_analyzer::description::FormDescription;
use form_analyzer::dump;
use form_analyzer::error::Result;
use form_analyzer::forms;

pub fn cmd_fields(folder: &Path, description: Option<&Path>) -> Result<()> {
    let keywords_per_page = match description {
        Some(path) => FormDescription::load(path)?.keywords_per_page,
        None => Vec::new(),
    };

    let mut count = 0;
    for form in forms::build(folder, &keywords_per_page)? {
        let form = form?;
        let path = dump::write_listing(folder, &form)?;

        println!(
            "  {} {} field(s) -> {}",
            form.label().bold(),
            form.fields.len(),
            path.display()
        );
        count += 1;
    }

    if count == 0 {
        println!("No Textract result files in {}", folder.display());
    } else {
        println!("\nWrote {} field listing(s).", count);
    }
    Ok(())
}
