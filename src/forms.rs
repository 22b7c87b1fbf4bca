//! Page-group assembly: consecutive result files make up one logical form

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{FormError, Result};
use crate::field::PositionedField;
use crate::textract::{self, TextractPage};

/// One logical (possibly multi-page) form instance
#[derive(Debug, Clone, Serialize)]
pub struct ParsedForm {
    /// Result file names without the `.json` extension, in page order
    pub page_files: Vec<String>,
    /// All fields of the form, tagged with their page index
    pub fields: Vec<PositionedField>,
}

impl ParsedForm {
    /// Human readable identifier, the joined file names
    pub fn label(&self) -> String {
        self.page_files.join(", ")
    }

    /// File a page was read from. Files holding several pages are repeated.
    pub fn page_file(&self, page: usize) -> Option<&str> {
        self.page_files.get(page).map(String::as_str)
    }
}

/// Sorted Textract result files of a folder
pub fn result_files(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(FormError::SourceNotFound(folder.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Group the result files of `folder` into logical forms.
///
/// The page count of a form is `keywords_per_page.len()`; zero means every
/// file is a form of its own and no keywords are checked.
pub fn build(folder: &Path, keywords_per_page: &[Vec<String>]) -> Result<FormGroups> {
    let files = result_files(folder)?;
    let pages = keywords_per_page.len();

    if files.is_empty() {
        if pages > 0 {
            return Err(FormError::SourceNotFound(folder.to_path_buf()));
        }
        tracing::warn!("No Textract result files in {}", folder.display());
    }

    tracing::info!("Loading Textract data for {} pages", files.len());

    Ok(FormGroups {
        files,
        keywords_per_page: keywords_per_page.to_vec(),
        group_size: pages.max(1),
        next: 0,
    })
}

/// Lazily assembled forms, in file order
#[derive(Debug)]
pub struct FormGroups {
    files: Vec<PathBuf>,
    keywords_per_page: Vec<Vec<String>>,
    group_size: usize,
    next: usize,
}

impl FormGroups {
    /// Number of forms this folder yields, counting an incomplete trailing group
    pub fn len(&self) -> usize {
        self.files.len().div_ceil(self.group_size)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn assemble(&self, files: &[PathBuf]) -> Result<ParsedForm> {
        let names: Vec<String> = files.iter().map(|f| base_name(f)).collect();

        if files.len() < self.group_size {
            return Err(FormError::IncompleteGroup {
                files: names,
                found: files.len(),
                expected: self.group_size,
            });
        }

        let mut pages: Vec<TextractPage> = Vec::new();
        let mut page_files = Vec::new();
        for (file, name) in files.iter().zip(&names) {
            let file_pages = textract::read(file)?;
            tracing::debug!("{}: {} page(s)", file.display(), file_pages.len());
            page_files.extend(std::iter::repeat(name.clone()).take(file_pages.len()));
            pages.extend(file_pages);
        }

        for (page, keywords) in self.keywords_per_page.iter().enumerate() {
            let found = pages
                .get(page)
                .map_or(keywords.is_empty(), |p| p.contains_any(keywords));
            if !found {
                return Err(FormError::AlignmentError {
                    files: names,
                    page,
                    keywords: keywords.clone(),
                });
            }
        }

        let fields = pages
            .into_iter()
            .enumerate()
            .flat_map(|(page, p)| {
                p.fields
                    .into_iter()
                    .map(move |field| PositionedField::new(page, field))
            })
            .collect();

        Ok(ParsedForm { page_files, fields })
    }
}

impl Iterator for FormGroups {
    type Item = Result<ParsedForm>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.files.len() {
            return None;
        }
        let end = (self.next + self.group_size).min(self.files.len());
        let form = self.assemble(&self.files[self.next..end]);
        self.next = end;
        Some(form)
    }
}

/// `scan_01.png.json` -> `scan_01.png`
fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
