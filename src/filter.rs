//! Filter algebra - select which fields are candidates for a form question
//!
//! A [`Filter`] is an immutable expression tree. `&` narrows sequentially
//! (the right side only sees what the left side kept), `|` appends the right
//! side's result computed against the *original* pool. Both operators build a
//! new node; operands are never modified, so one filter can be reused in any
//! number of questions.

use std::ops::{BitAnd, BitOr};

use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::field::{PositionedField, SELECTED};

/// Open interval `(low, high)` of page ratios
pub type Range = (f64, f64);

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Filter {
    /// Keep every field
    #[default]
    All,
    /// Keep fields found on one of these pages
    Pages(Vec<usize>),
    /// Keep fields whose box origin lies strictly inside the given ranges
    Location {
        horizontal: Option<Range>,
        vertical: Option<Range>,
    },
    /// Keep checked checkboxes
    Selected,
    And(Box<Filter>, Box<Filter>),
    Or(Box<Filter>, Box<Filter>),
}

impl Filter {
    pub fn page(page: usize) -> Self {
        Filter::Pages(vec![page])
    }

    pub fn pages(pages: impl Into<Vec<usize>>) -> Self {
        Filter::Pages(pages.into())
    }

    pub fn location(horizontal: Option<Range>, vertical: Option<Range>) -> Self {
        Filter::Location {
            horizontal,
            vertical,
        }
    }

    pub fn horizontal(low: f64, high: f64) -> Self {
        Self::location(Some((low, high)), None)
    }

    pub fn vertical(low: f64, high: f64) -> Self {
        Self::location(None, Some((low, high)))
    }

    pub fn selected() -> Self {
        Filter::Selected
    }

    pub fn and(self, other: Filter) -> Self {
        Filter::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Filter) -> Self {
        Filter::Or(Box::new(self), Box::new(other))
    }

    /// Apply the filter to a field pool, preserving pool order
    pub fn apply(&self, pool: &[PositionedField]) -> Vec<PositionedField> {
        match self {
            Filter::And(left, right) => {
                let narrowed = left.apply(pool);
                right.apply(&narrowed)
            }
            Filter::Or(left, right) => {
                let mut fields = left.apply(pool);
                fields.extend(right.apply(pool));
                fields
            }
            base => pool
                .iter()
                .filter(|f| base.matches(f))
                .cloned()
                .collect(),
        }
    }

    /// Base predicate for a single field. Combinators never reach this.
    fn matches(&self, positioned: &PositionedField) -> bool {
        let field = &positioned.field;
        match self {
            Filter::All => true,
            Filter::Pages(pages) => pages.contains(&positioned.page),
            Filter::Location {
                horizontal,
                vertical,
            } => {
                in_range(*horizontal, field.bounding_box.left)
                    && in_range(*vertical, field.bounding_box.top)
            }
            Filter::Selected => field.value.as_deref() == Some(SELECTED),
            Filter::And(..) | Filter::Or(..) => false,
        }
    }

    /// First page the filter refers to, left operand first
    pub fn first_page(&self) -> Option<usize> {
        match self {
            Filter::Pages(pages) => pages.first().copied(),
            Filter::And(left, right) | Filter::Or(left, right) => {
                left.first_page().or_else(|| right.first_page())
            }
            _ => None,
        }
    }
}

fn in_range(range: Option<Range>, value: f64) -> bool {
    match range {
        Some((low, high)) => low < value && value < high,
        None => true,
    }
}

impl BitAnd for Filter {
    type Output = Filter;

    fn bitand(self, rhs: Filter) -> Filter {
        self.and(rhs)
    }
}

impl BitOr for Filter {
    type Output = Filter;

    fn bitor(self, rhs: Filter) -> Filter {
        self.or(rhs)
    }
}

/// Declarative filter as written in a form description file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum FilterDef {
    All,
    Selected,
    Page(usize),
    Pages(Vec<usize>),
    Location {
        #[serde(default)]
        horizontal: Option<Range>,
        #[serde(default)]
        vertical: Option<Range>,
    },
    And(Vec<FilterDef>),
    Or(Vec<FilterDef>),
}

impl TryFrom<FilterDef> for Filter {
    type Error = FormError;

    fn try_from(def: FilterDef) -> Result<Self, Self::Error> {
        Ok(match def {
            FilterDef::All => Filter::All,
            FilterDef::Selected => Filter::Selected,
            FilterDef::Page(page) => Filter::page(page),
            FilterDef::Pages(pages) => Filter::Pages(pages),
            FilterDef::Location {
                horizontal,
                vertical,
            } => {
                for (low, high) in horizontal.iter().chain(vertical.iter()) {
                    if low >= high {
                        return Err(FormError::DescriptionError(format!(
                            "empty location range ({}, {})",
                            low, high
                        )));
                    }
                }
                Filter::location(horizontal, vertical)
            }
            FilterDef::And(defs) => fold(defs, "and", Filter::and)?,
            FilterDef::Or(defs) => fold(defs, "or", Filter::or)?,
        })
    }
}

/// Left fold keeps the evaluation order of chained operators: `a & b & c`
fn fold(
    defs: Vec<FilterDef>,
    op: &str,
    combine: fn(Filter, Filter) -> Filter,
) -> Result<Filter, FormError> {
    let mut filters = defs.into_iter().map(Filter::try_from);
    let first = filters.next().ok_or_else(|| {
        FormError::DescriptionError(format!("`{}` filter needs at least one operand", op))
    })??;
    filters.try_fold(first, |acc, next: Result<Filter, FormError>| {
        Ok(combine(acc, next?))
    })
}

impl<'de> Deserialize<'de> for Filter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let def = FilterDef::deserialize(deserializer)?;
        Filter::try_from(def).map_err(serde::de::Error::custom)
    }
}
