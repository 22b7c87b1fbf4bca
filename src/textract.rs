//! Reader for cached Textract `AnalyzeDocument` (FORMS) responses
//!
//! Only the parts the analyzer needs are kept: key/value fields with their
//! confidence and position, and the raw text of every block for keyword
//! checks.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{FormError, Result};
use crate::field::{BoundingBox, Field};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Response {
    #[serde(default)]
    blocks: Vec<Block>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Block {
    block_type: String,
    id: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    geometry: Option<Geometry>,
    #[serde(default)]
    relationships: Option<Vec<Relationship>>,
    #[serde(default)]
    entity_types: Option<Vec<String>>,
    #[serde(default)]
    selection_status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Geometry {
    #[serde(default)]
    bounding_box: Option<RawBoundingBox>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawBoundingBox {
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
    #[serde(default)]
    left: f64,
    #[serde(default)]
    top: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Relationship {
    #[serde(rename = "Type")]
    kind: String,
    #[serde(default)]
    ids: Vec<String>,
}

impl Block {
    fn is(&self, block_type: &str) -> bool {
        self.block_type == block_type
    }

    fn has_entity(&self, entity: &str) -> bool {
        self.entity_types
            .as_deref()
            .is_some_and(|types| types.iter().any(|t| t == entity))
    }

    fn related<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.relationships
            .iter()
            .flatten()
            .filter(move |r| r.kind == kind)
            .flat_map(|r| r.ids.iter().map(String::as_str))
    }

    fn bounding_box(&self) -> BoundingBox {
        let raw = self
            .geometry
            .as_ref()
            .and_then(|g| g.bounding_box.as_ref());
        match raw {
            Some(b) => BoundingBox {
                left: b.left,
                top: b.top,
                width: b.width,
                height: b.height,
            },
            None => BoundingBox::default(),
        }
    }
}

/// One recognized page
#[derive(Debug, Clone, Default)]
pub struct TextractPage {
    /// Key/value fields in discovery order
    pub fields: Vec<Field>,
    /// Text of every block that carries text (lines and words)
    pub text_blocks: Vec<String>,
}

impl TextractPage {
    /// Whether any text block contains any of the keywords.
    /// An empty keyword list always matches.
    pub fn contains_any(&self, keywords: &[String]) -> bool {
        keywords.is_empty()
            || self
                .text_blocks
                .iter()
                .any(|text| keywords.iter().any(|k| text.contains(k.as_str())))
    }
}

/// Parse one response into its pages
pub fn parse(json: &str) -> std::result::Result<Vec<TextractPage>, serde_json::Error> {
    let response: Response = serde_json::from_str(json)?;
    Ok(pages_of(&response.blocks))
}

/// Read one cached response file
pub fn read(path: &Path) -> Result<Vec<TextractPage>> {
    let content = std::fs::read_to_string(path)?;
    parse(&content).map_err(|e| FormError::TextractError {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn pages_of(blocks: &[Block]) -> Vec<TextractPage> {
    let by_id: HashMap<&str, &Block> = blocks.iter().map(|b| (b.id.as_str(), b)).collect();
    let mut pages: Vec<TextractPage> = Vec::new();

    for block in blocks {
        if block.is("PAGE") || pages.is_empty() {
            pages.push(TextractPage::default());
        }
        let Some(page) = pages.last_mut() else {
            continue;
        };

        if let Some(text) = &block.text {
            page.text_blocks.push(text.clone());
        }

        if block.is("KEY_VALUE_SET") && block.has_entity("KEY") {
            page.fields.push(field_of(block, &by_id));
        }
    }

    pages
}

fn field_of(key: &Block, by_id: &HashMap<&str, &Block>) -> Field {
    let value = key
        .related("VALUE")
        .find_map(|id| by_id.get(id))
        .map(|value_block| content_text(value_block, by_id, true));

    if value.is_none() {
        tracing::trace!("Key block {} has no value block", key.id);
    }

    Field {
        key: content_text(key, by_id, false),
        value,
        confidence: key.confidence.unwrap_or(0.0),
        bounding_box: key.bounding_box(),
    }
}

/// Words of a key or value block joined by spaces; values also include
/// checkbox states
fn content_text(block: &Block, by_id: &HashMap<&str, &Block>, with_selection: bool) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for id in block.related("CHILD") {
        let Some(child) = by_id.get(id) else {
            tracing::warn!("Block {} references unknown child {}", block.id, id);
            continue;
        };
        if child.is("WORD") {
            if let Some(text) = &child.text {
                parts.push(text);
            }
        } else if with_selection && child.is("SELECTION_ELEMENT") {
            if let Some(status) = &child.selection_status {
                parts.push(status);
            }
        }
    }
    parts.join(" ")
}
