//! Selectors turn a field pool into the answer cells of one form question
//!
//! Every selector filters the pool with its own [`Filter`], classifies what is
//! left and applies a value policy. A question occupies `1 + headers().len()`
//! spreadsheet columns, which is always the number of values it returns.

mod multi_select;
mod select;
mod single_select;
mod text_fields;

use serde::Deserialize;

use crate::config::Thresholds;
use crate::error::{FormError, Result};
use crate::field::{FormValue, PositionedField};
use crate::filter::Filter;
use crate::normalize::canonical;

pub use multi_select::MultiSelect;
pub use single_select::SingleSelect;
pub use text_fields::{Number, TextField, TextFieldWithCheckbox};

pub trait Selector: std::fmt::Debug + Send + Sync {
    /// Extra column headers after the question title
    fn headers(&self) -> Vec<String>;

    /// Answer cells for one logical form
    fn values(&self, pool: &[PositionedField], thresholds: &Thresholds) -> Vec<FormValue>;
}

/// Reserves an empty column with no backing question
#[derive(Debug, Clone, Copy, Default)]
pub struct Placeholder;

impl Selector for Placeholder {
    fn headers(&self) -> Vec<String> {
        Vec::new()
    }

    fn values(&self, _pool: &[PositionedField], _thresholds: &Thresholds) -> Vec<FormValue> {
        vec![FormValue::empty(0, false)]
    }
}

/// Free-text selector usable as alternative or additional column of a select
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextSelector {
    TextField(TextField),
    TextFieldWithCheckbox(TextFieldWithCheckbox),
}

impl TextSelector {
    pub fn label(&self) -> &str {
        match self {
            TextSelector::TextField(s) => &s.label,
            TextSelector::TextFieldWithCheckbox(s) => &s.label,
        }
    }

    pub fn value(&self, pool: &[PositionedField], thresholds: &Thresholds) -> FormValue {
        match self {
            TextSelector::TextField(s) => s.value(pool, thresholds),
            TextSelector::TextFieldWithCheckbox(s) => s.value(pool, thresholds),
        }
    }
}

impl From<TextField> for TextSelector {
    fn from(selector: TextField) -> Self {
        TextSelector::TextField(selector)
    }
}

impl From<TextFieldWithCheckbox> for TextSelector {
    fn from(selector: TextFieldWithCheckbox) -> Self {
        TextSelector::TextFieldWithCheckbox(selector)
    }
}

/// Selector as written in a form description file
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectorDef {
    SingleSelect(SingleSelect),
    MultiSelect(MultiSelect),
    TextField(TextField),
    TextFieldWithCheckbox(TextFieldWithCheckbox),
    Number(Number),
    Placeholder,
}

impl SelectorDef {
    pub fn validate(&self) -> Result<()> {
        match self {
            SelectorDef::SingleSelect(s) => {
                require_options(&s.options)?;
                require_text_labels([&s.alternative, &s.additional])
            }
            SelectorDef::MultiSelect(s) => {
                require_options(&s.options)?;
                require_text_labels([&s.alternative, &s.additional])
            }
            SelectorDef::TextField(s) => require_label(&s.label),
            SelectorDef::TextFieldWithCheckbox(s) => {
                require_label(&s.label)?;
                if s.separator.is_empty() {
                    return Err(FormError::DescriptionError(format!(
                        "text field '{}' has an empty separator",
                        s.label
                    )));
                }
                Ok(())
            }
            SelectorDef::Number(s) => {
                require_label(&s.label)?;
                if s.min_digits > s.max_digits {
                    return Err(FormError::DescriptionError(format!(
                        "number '{}' needs min_digits <= max_digits",
                        s.label
                    )));
                }
                Ok(())
            }
            SelectorDef::Placeholder => Ok(()),
        }
    }

    pub fn into_selector(self) -> Box<dyn Selector> {
        match self {
            SelectorDef::SingleSelect(s) => Box::new(s),
            SelectorDef::MultiSelect(s) => Box::new(s),
            SelectorDef::TextField(s) => Box::new(s),
            SelectorDef::TextFieldWithCheckbox(s) => Box::new(s),
            SelectorDef::Number(s) => Box::new(s),
            SelectorDef::Placeholder => Box::new(Placeholder),
        }
    }
}

fn require_options(options: &[String]) -> Result<()> {
    if options.is_empty() {
        return Err(FormError::DescriptionError(
            "select without options".to_string(),
        ));
    }
    Ok(())
}

/// An empty canonical label would be contained in every key
fn require_label(label: &str) -> Result<()> {
    if canonical(label).is_empty() {
        return Err(FormError::DescriptionError(format!(
            "text field label '{}' has no letters or digits",
            label
        )));
    }
    Ok(())
}

fn require_text_labels(selectors: [&Option<TextSelector>; 2]) -> Result<()> {
    for selector in selectors.into_iter().flatten() {
        require_label(selector.label())?;
    }
    Ok(())
}

/// Page to report when nothing matched: first candidate, else the filter's page
fn fallback_page(filtered: &[PositionedField], filter: &Filter) -> usize {
    filtered
        .first()
        .map(|f| f.page)
        .or_else(|| filter.first_page())
        .unwrap_or(0)
}
