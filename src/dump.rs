//! Plain-text field listings, for writing and debugging form descriptions

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::forms::ParsedForm;

/// All fields of a form, sorted by page and key text
pub fn field_listing(form: &ParsedForm) -> String {
    let mut fields: Vec<_> = form.fields.iter().collect();
    fields.sort_by(|a, b| (a.page, &a.field.key).cmp(&(b.page, &b.field.key)));

    let mut out = String::new();
    for positioned in fields {
        let field = &positioned.field;
        out.push_str(&format!(
            "{} {}: {} {} {} {}\n",
            positioned.page,
            field.key,
            field.bounding_box.left,
            field.bounding_box.top,
            field.value.as_deref().unwrap_or(""),
            field.confidence
        ));
    }
    out
}

/// Listing file name of a form: `fields<first page file>.txt`
pub fn listing_path(folder: &Path, form: &ParsedForm) -> PathBuf {
    let first = form.page_file(0).unwrap_or_default();
    folder.join(format!("fields{}.txt", first))
}

/// Write the listing of one form next to its result files
pub fn write_listing(folder: &Path, form: &ParsedForm) -> Result<PathBuf> {
    let path = listing_path(folder, form);
    std::fs::write(&path, field_listing(form))?;
    tracing::debug!("Wrote field listing {}", path.display());
    Ok(path)
}

/// Write the listing of every form
pub fn write_listings(folder: &Path, forms: &[ParsedForm]) -> Result<Vec<PathBuf>> {
    forms.iter().map(|form| write_listing(folder, form)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, PositionedField, SELECTED};

    fn form() -> ParsedForm {
        ParsedForm {
            page_files: vec!["scan_1.png".into(), "scan_2.png".into()],
            fields: vec![
                PositionedField::new(1, Field::new("Name:", Some("Ada"), 91.5).at(0.1, 0.2)),
                PositionedField::new(0, Field::new("Option 2", Some(SELECTED), 80.0).at(0.5, 0.25)),
                PositionedField::new(0, Field::new("Agree", None, 12.0)),
            ],
        }
    }

    #[test]
    fn test_listing_sorted_by_page_and_key() {
        let listing = field_listing(&form());
        let lines: Vec<&str> = listing.lines().collect();

        assert_eq!(
            lines,
            vec![
                "0 Agree: 0 0  12",
                "0 Option 2: 0.5 0.25 SELECTED 80",
                "1 Name:: 0.1 0.2 Ada 91.5",
            ]
        );
    }

    #[test]
    fn test_write_listings() {
        let dir = tempfile::tempdir().unwrap();

        let written = write_listings(dir.path(), &[form()]).unwrap();
        assert_eq!(written, vec![dir.path().join("fieldsscan_1.png.txt")]);
        assert!(std::fs::read_to_string(&written[0]).unwrap().contains("Ada"));
    }

    #[test]
    fn test_write_single_listing() {
        let dir = tempfile::tempdir().unwrap();
        let form = form();

        let path = write_listing(dir.path(), &form).unwrap();
        assert_eq!(path, listing_path(dir.path(), &form));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), field_listing(&form));
    }
}
