use serde::Deserialize;

use super::{fallback_page, Selector};
use crate::config::Thresholds;
use crate::field::{FormValue, PositionedField};
use crate::filter::Filter;
use crate::normalize::canonical;

/// Free text identified by a field label.
///
/// The first filtered field whose key contains the label and that carries a
/// value wins. Checkbox sentinels leaking into a text slot become empty text.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextField {
    pub label: String,
    #[serde(default)]
    pub filter: Filter,
}

impl TextField {
    pub fn new(label: impl Into<String>, filter: Filter) -> Self {
        Self {
            label: label.into(),
            filter,
        }
    }

    pub fn value(&self, pool: &[PositionedField], thresholds: &Thresholds) -> FormValue {
        let filtered = self.filter.apply(pool);
        let wanted = canonical(&self.label);

        filtered
            .iter()
            .find(|f| f.field.value.is_some() && canonical(&f.field.key).contains(&wanted))
            .map(|f| {
                let text = if f.field.has_sentinel_value() {
                    ""
                } else {
                    f.field.value.as_deref().unwrap_or_default()
                };
                FormValue::new(text, f.page, thresholds.text_uncertainty(text, f.field.confidence))
            })
            .unwrap_or_else(|| FormValue::empty(fallback_page(&filtered, &self.filter), false))
    }
}

impl Selector for TextField {
    fn headers(&self) -> Vec<String> {
        Vec::new()
    }

    fn values(&self, pool: &[PositionedField], thresholds: &Thresholds) -> Vec<FormValue> {
        vec![self.value(pool, thresholds)]
    }
}

fn default_separator() -> String {
    ":".to_string()
}

/// Checkbox caption followed by inline free text, e.g. `Other: ____`.
///
/// The recognized value is used when it is real text; otherwise the text after
/// the separator inside the key itself. Combine the filter with
/// [`Filter::Selected`] to only read the text of checked boxes.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextFieldWithCheckbox {
    pub label: String,
    #[serde(default)]
    pub filter: Filter,
    #[serde(default = "default_separator")]
    pub separator: String,
}

impl TextFieldWithCheckbox {
    pub fn new(label: impl Into<String>, filter: Filter) -> Self {
        Self {
            label: label.into(),
            filter,
            separator: default_separator(),
        }
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    fn inline_text<'a>(&self, key: &'a str) -> &'a str {
        if self.separator.is_empty() {
            return "";
        }
        key.split(self.separator.as_str())
            .nth(1)
            .map(str::trim)
            .unwrap_or_default()
    }

    pub fn value(&self, pool: &[PositionedField], thresholds: &Thresholds) -> FormValue {
        let filtered = self.filter.apply(pool);
        let wanted = canonical(&self.label);

        filtered
            .iter()
            .find(|f| canonical(&f.field.key).contains(&wanted))
            .map(|f| {
                let text = match f.field.value.as_deref() {
                    Some(value) if !f.field.has_sentinel_value() => value.trim(),
                    _ => self.inline_text(&f.field.key),
                };
                FormValue::new(text, f.page, thresholds.text_uncertainty(text, f.field.confidence))
            })
            .unwrap_or_else(|| FormValue::empty(fallback_page(&filtered, &self.filter), false))
    }
}

impl Selector for TextFieldWithCheckbox {
    fn headers(&self) -> Vec<String> {
        Vec::new()
    }

    fn values(&self, pool: &[PositionedField], thresholds: &Thresholds) -> Vec<FormValue> {
        vec![self.value(pool, thresholds)]
    }
}

fn default_max_digits() -> usize {
    100
}

/// Numeric text field with a digit-count sanity check
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Number {
    pub label: String,
    #[serde(default)]
    pub filter: Filter,
    #[serde(default)]
    pub min_digits: usize,
    #[serde(default = "default_max_digits")]
    pub max_digits: usize,
}

impl Number {
    pub fn new(label: impl Into<String>, filter: Filter) -> Self {
        Self {
            label: label.into(),
            filter,
            min_digits: 0,
            max_digits: default_max_digits(),
        }
    }

    pub fn digits(mut self, min_digits: usize, max_digits: usize) -> Self {
        self.min_digits = min_digits;
        self.max_digits = max_digits;
        self
    }

    /// `O` is the usual OCR misreading of `0`; everything else non-numeric is dropped
    fn digits_of(text: &str) -> String {
        text.chars()
            .map(|c| if c == 'O' { '0' } else { c })
            .filter(char::is_ascii_digit)
            .collect()
    }
}

impl Selector for Number {
    fn headers(&self) -> Vec<String> {
        Vec::new()
    }

    fn values(&self, pool: &[PositionedField], thresholds: &Thresholds) -> Vec<FormValue> {
        let text = TextField {
            label: self.label.clone(),
            filter: self.filter.clone(),
        }
        .value(pool, thresholds);

        let digits = Self::digits_of(&text.value);
        let count = digits.chars().count();
        if digits.is_empty() || count < self.min_digits || count > self.max_digits {
            return vec![FormValue::empty(text.page, true)];
        }

        vec![FormValue::new(digits, text.page, text.uncertain)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, NOT_SELECTED, SELECTED};

    fn at(page: usize, key: &str, value: Option<&str>, confidence: f64) -> PositionedField {
        PositionedField::new(page, Field::new(key, value, confidence))
    }

    #[test]
    fn test_text_field_takes_first_with_value() {
        let t = Thresholds::default();
        let pool = vec![
            at(0, "Name", None, 99.0),
            at(1, "Full name:", Some("Ada"), 95.0),
            at(1, "Name", Some("Bob"), 95.0),
        ];

        let value = TextField::new("name", Filter::All).value(&pool, &t);
        assert_eq!(value, FormValue::new("Ada", 1, false));
    }

    #[test]
    fn test_text_field_sentinels_become_empty() {
        let t = Thresholds::default();
        let pool = vec![at(0, "Comment", Some(SELECTED), 10.0)];
        assert_eq!(
            TextField::new("Comment", Filter::All).value(&pool, &t),
            FormValue::new("", 0, false)
        );

        let pool = vec![at(0, "Comment", Some(NOT_SELECTED), 10.0)];
        assert_eq!(
            TextField::new("Comment", Filter::All).value(&pool, &t),
            FormValue::new("", 0, false)
        );
    }

    #[test]
    fn test_text_field_uncertainty() {
        let t = Thresholds::default();
        let field = TextField::new("City", Filter::All);

        let low = vec![at(0, "City", Some("Bonn"), 30.0)];
        assert!(field.value(&low, &t).uncertain);

        let long = vec![at(0, "City", Some("Frankfurt am Main"), 99.0)];
        assert!(field.value(&long, &t).uncertain);

        let good = vec![at(0, "City", Some("Bonn"), 99.0)];
        assert!(!field.value(&good, &t).uncertain);
    }

    #[test]
    fn test_text_field_not_found_uses_filter_page() {
        let t = Thresholds::default();
        let pool = vec![at(0, "Something else", Some("x"), 99.0)];

        let value = TextField::new("City", Filter::page(2)).value(&pool, &t);
        assert_eq!(value, FormValue::new("", 2, false));

        let value = TextField::new("City", Filter::All).value(&pool, &t);
        assert_eq!(value, FormValue::new("", 0, false));
    }

    #[test]
    fn test_checkbox_text_prefers_value() {
        let t = Thresholds::default();
        let pool = vec![at(0, "Other: blue", Some("  green "), 99.0)];

        let value = TextFieldWithCheckbox::new("Other", Filter::All).value(&pool, &t);
        assert_eq!(value.value, "green");
    }

    #[test]
    fn test_checkbox_text_falls_back_to_key() {
        let t = Thresholds::default();
        let field = TextFieldWithCheckbox::new("Other", Filter::All);

        let checked = vec![at(0, "Other: blue", Some(SELECTED), 99.0)];
        assert_eq!(field.value(&checked, &t), FormValue::new("blue", 0, false));

        let bare = vec![at(1, "Other: blue", None, 20.0)];
        assert_eq!(field.value(&bare, &t), FormValue::new("blue", 1, true));

        let no_separator = vec![at(0, "Other", Some(NOT_SELECTED), 20.0)];
        assert_eq!(field.value(&no_separator, &t), FormValue::new("", 0, false));
    }

    #[test]
    fn test_checkbox_text_custom_separator() {
        let t = Thresholds::default();
        let pool = vec![at(0, "Other - light blue", None, 99.0)];

        let value = TextFieldWithCheckbox::new("Other", Filter::All)
            .separator("-")
            .value(&pool, &t);
        assert_eq!(value, FormValue::new("light blue", 0, true));
    }

    #[test]
    fn test_number_replaces_letter_o() {
        let t = Thresholds::default();
        let pool = vec![at(0, "Age", Some("O12"), 95.0)];

        let values = Number::new("Age", Filter::All).digits(1, 3).values(&pool, &t);
        assert_eq!(values, vec![FormValue::new("012", 0, false)]);

        let pool = vec![at(0, "Age", Some("O12"), 35.0)];
        let values = Number::new("Age", Filter::All).digits(1, 3).values(&pool, &t);
        assert_eq!(values, vec![FormValue::new("012", 0, true)]);
    }

    #[test]
    fn test_number_out_of_range() {
        let t = Thresholds::default();
        let pool = vec![at(0, "Zip code", Some("1234 5"), 99.0)];

        let values = Number::new("Zip code", Filter::All).digits(4, 4).values(&pool, &t);
        assert_eq!(values, vec![FormValue::new("", 0, true)]);
    }

    #[test]
    fn test_number_empty_is_uncertain() {
        let t = Thresholds::default();
        let pool = vec![at(0, "Age", Some(""), 99.0)];
        assert_eq!(
            Number::new("Age", Filter::All).values(&pool, &t),
            vec![FormValue::new("", 0, true)]
        );

        let pool = vec![at(0, "Age", Some("n/a"), 99.0)];
        assert_eq!(
            Number::new("Age", Filter::All).values(&pool, &t),
            vec![FormValue::new("", 0, true)]
        );

        assert_eq!(
            Number::new("Age", Filter::All).values(&[], &t),
            vec![FormValue::new("", 0, true)]
        );
    }
}
