use serde::Deserialize;

use super::select::OptionMatches;
use super::{fallback_page, Selector, TextSelector};
use crate::config::Thresholds;
use crate::field::{FormValue, PositionedField};
use crate::filter::Filter;
use crate::matching::MatchKind;

/// Exactly one of several checkboxes; the answer is the checked option's label.
///
/// When nothing is checked, the `alternative` text selector answers instead.
/// Without one, a single undetected option is assumed to be the checked one
/// (Textract tends to lose checked boxes with heavy marks), flagged uncertain.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SingleSelect {
    pub options: Vec<String>,
    #[serde(default)]
    pub filter: Filter,
    #[serde(default)]
    pub alternative: Option<TextSelector>,
    #[serde(default)]
    pub additional: Option<TextSelector>,
}

impl SingleSelect {
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

    fn selection(&self, pool: &[PositionedField], thresholds: &Thresholds) -> FormValue {
        let matches = OptionMatches::classify(&self.options, &self.filter, pool, thresholds);

        let winner = matches
            .position(MatchKind::ExactSelected)
            .or_else(|| matches.position(MatchKind::SimilarSelected));
        if let Some(index) = winner {
            let outcome = &matches.outcomes[index];
            return FormValue::new(&self.options[index], outcome.page, outcome.uncertain);
        }

        if let Some(alternative) = &self.alternative {
            return alternative.value(pool, thresholds);
        }

        let missing = matches.missing();
        let page = fallback_page(&matches.filtered, &self.filter);
        if missing == thresholds.single_select_missing_options {
            if let Some(index) = matches.position(MatchKind::NotFound) {
                return FormValue::new(&self.options[index], page, true);
            }
        }

        FormValue::empty(page, missing > thresholds.single_select_missing_options)
    }
}

impl Selector for SingleSelect {
    fn headers(&self) -> Vec<String> {
        self.additional
            .iter()
            .map(|s| s.label().to_string())
            .collect()
    }

    fn values(&self, pool: &[PositionedField], thresholds: &Thresholds) -> Vec<FormValue> {
        let mut values = vec![self.selection(pool, thresholds)];
        if let Some(additional) = &self.additional {
            values.push(additional.value(pool, thresholds));
        }
        values
    }
}
