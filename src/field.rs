use serde::{Deserialize, Serialize};

/// Textract sentinel for a checked checkbox
pub const SELECTED: &str = "SELECTED";
/// Textract sentinel for an unchecked checkbox
pub const NOT_SELECTED: &str = "NOT_SELECTED";

/// Position of a field on its page, as ratios of the page size
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

/// One OCR-recognized key/value pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Raw key text as recognized
    pub key: String,
    /// Raw value text; absent for a bare checkbox without value block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Recognition confidence in [0, 100]
    pub confidence: f64,
    /// Bounding box of the key
    #[serde(default)]
    pub bounding_box: BoundingBox,
}

impl Field {
    pub fn new(key: impl Into<String>, value: Option<&str>, confidence: f64) -> Self {
        Self {
            key: key.into(),
            value: value.map(str::to_string),
            confidence,
            bounding_box: BoundingBox::default(),
        }
    }

    /// Place the field on the page (builder style)
    pub fn at(mut self, left: f64, top: f64) -> Self {
        self.bounding_box.left = left;
        self.bounding_box.top = top;
        self
    }

    /// Checkbox state as Textract reports it.
    ///
    /// A field without value counts as selected, only an explicit
    /// `NOT_SELECTED` value counts as unchecked.
    pub fn is_selected(&self) -> bool {
        self.value.as_deref() != Some(NOT_SELECTED)
    }

    /// Whether the value is one of the two checkbox sentinels
    pub fn has_sentinel_value(&self) -> bool {
        matches!(self.value.as_deref(), Some(SELECTED) | Some(NOT_SELECTED))
    }
}

/// A field tagged with the page it was found on within one logical form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedField {
    pub page: usize,
    pub field: Field,
}

impl PositionedField {
    pub fn new(page: usize, field: Field) -> Self {
        Self { page, field }
    }
}

/// One extracted answer cell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormValue {
    /// Extracted text, empty means no value
    pub value: String,
    /// Page the value was sourced from
    pub page: usize,
    /// Needs human review
    pub uncertain: bool,
}

impl FormValue {
    pub fn new(value: impl Into<String>, page: usize, uncertain: bool) -> Self {
        Self {
            value: value.into(),
            page,
            uncertain,
        }
    }

    pub fn empty(page: usize, uncertain: bool) -> Self {
        Self::new(String::new(), page, uncertain)
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}
