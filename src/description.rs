//! Form descriptions: which questions a form has and how to answer them
//!
//! A description is built once, before any document is read, either with the
//! builder API or from a TOML file:
//!
//! ```toml
//! keywords_per_page = [["example"], ["another"]]
//!
//! [[items]]
//! title = "Start with a single select"
//! selector = { type = "single_select", options = ["Option 1", "Option 2"], filter = { page = 0 } }
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{FormError, Result};
use crate::selectors::{Selector, SelectorDef};

/// One question of the form
#[derive(Debug)]
pub struct FormItem {
    pub title: String,
    pub selector: Box<dyn Selector>,
}

#[derive(Debug, Default)]
pub struct FormDescription {
    pub items: Vec<FormItem>,
    /// Per page, words of which at least one must appear on that page.
    /// Its length is the page count of one form.
    pub keywords_per_page: Vec<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDescription {
    items: Option<Vec<RawItem>>,
    keywords_per_page: Option<Vec<Vec<String>>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawItem {
    title: String,
    selector: SelectorDef,
}

impl FormDescription {
    pub fn new<K, S>(keywords_per_page: K) -> Self
    where
        K: IntoIterator,
        K::Item: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: Vec::new(),
            keywords_per_page: keywords_per_page
                .into_iter()
                .map(|page| page.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Append a question
    pub fn item(mut self, title: impl Into<String>, selector: impl Selector + 'static) -> Self {
        self.items.push(FormItem {
            title: title.into(),
            selector: Box::new(selector),
        });
        self
    }

    /// Pages per logical form, zero when every file is a form of its own
    pub fn pages(&self) -> usize {
        self.keywords_per_page.len()
    }

    /// Table header row: an empty label column, then each title and its extra headers
    pub fn headers(&self) -> Vec<String> {
        let mut headers = vec![String::new()];
        for item in &self.items {
            headers.push(item.title.clone());
            headers.extend(item.selector.headers());
        }
        headers
    }

    /// Load a description file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FormError::DescriptionNotFound(path.to_path_buf())
            } else {
                FormError::IoError(e)
            }
        })?;
        tracing::info!("Loading form description from {}", path.display());
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawDescription =
            toml::from_str(content).map_err(|e| FormError::DescriptionError(e.to_string()))?;

        let items = raw.items.ok_or_else(|| {
            FormError::DescriptionError("Form description does not contain an `items` list".into())
        })?;
        let keywords_per_page = raw.keywords_per_page.ok_or_else(|| {
            FormError::DescriptionError(
                "Form description does not contain a `keywords_per_page` list".into(),
            )
        })?;
        if items.is_empty() {
            return Err(FormError::DescriptionError(
                "Form description has no items".into(),
            ));
        }

        let mut description = FormDescription {
            items: Vec::with_capacity(items.len()),
            keywords_per_page,
        };
        for item in items {
            item.selector.validate().map_err(|e| match e {
                FormError::DescriptionError(msg) => {
                    FormError::DescriptionError(format!("item '{}': {}", item.title, msg))
                }
                other => other,
            })?;
            description.items.push(FormItem {
                title: item.title,
                selector: item.selector.into_selector(),
            });
        }
        Ok(description)
    }
}
