use serde::Deserialize;

use super::select::OptionMatches;
use super::{Selector, TextSelector};
use crate::config::Thresholds;
use crate::field::{FormValue, PositionedField};
use crate::filter::Filter;

/// Any number of checkboxes; each checked option gets a `1` in its own column.
///
/// The leading column (under the question title) carries no value unless an
/// `alternative` is configured, but is flagged uncertain when detection of
/// the block looks incomplete.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MultiSelect {
    pub options: Vec<String>,
    #[serde(default)]
    pub filter: Filter,
    #[serde(default)]
    pub alternative: Option<TextSelector>,
    #[serde(default)]
    pub additional: Option<TextSelector>,
}

impl MultiSelect {
    pub fn new<S: Into<String>>(options: impl IntoIterator<Item = S>, filter: Filter) -> Self {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            filter,
            alternative: None,
            additional: None,
        }
    }

    pub fn alternative(mut self, selector: impl Into<TextSelector>) -> Self {
        self.alternative = Some(selector.into());
        self
    }

    pub fn additional(mut self, selector: impl Into<TextSelector>) -> Self {
        self.additional = Some(selector.into());
        self
    }
}

impl Selector for MultiSelect {
    fn headers(&self) -> Vec<String> {
        self.options
            .iter()
            .cloned()
            .chain(self.additional.iter().map(|s| s.label().to_string()))
            .collect()
    }

    fn values(&self, pool: &[PositionedField], thresholds: &Thresholds) -> Vec<FormValue> {
        let matches = OptionMatches::classify(&self.options, &self.filter, pool, thresholds);
        let page = pool.first().map(|f| f.page).unwrap_or(0);

        let mut values = Vec::with_capacity(self.options.len() + 2);
        values.push(FormValue::empty(page, false));
        values.extend(matches.outcomes.iter().map(|outcome| {
            if outcome.kind.is_selected() {
                FormValue::new("1", outcome.page, outcome.uncertain)
            } else {
                FormValue::empty(page, false)
            }
        }));

        // Undetected options may hide the checked one; many undetected options
        // mean the block was not read properly at all
        let missing = matches.missing();
        values[0].uncertain = (!matches.any_selected() && missing > 0)
            || missing > thresholds.multi_select_missing_options;

        if let Some(alternative) = &self.alternative {
            values[0] = alternative.value(pool, thresholds);
        }
        if let Some(additional) = &self.additional {
            values.push(additional.value(pool, thresholds));
        }

        values
    }
}
