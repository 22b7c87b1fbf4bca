//! Evaluate a form description against every form of a folder

use std::path::Path;

use rayon::prelude::*;
use serde::Serialize;

use crate::config::Thresholds;
use crate::description::FormDescription;
use crate::error::Result;
use crate::field::FormValue;
use crate::forms::{self, ParsedForm};

/// One answer cell of the result table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    #[serde(flatten)]
    pub value: FormValue,
    /// Page file to review, set on uncertain cells
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Result row of one logical form
#[derive(Debug, Clone, Serialize)]
pub struct FormRow {
    pub label: String,
    pub page_files: Vec<String>,
    pub cells: Vec<Cell>,
}

impl FormRow {
    pub fn uncertain_count(&self) -> usize {
        self.cells.iter().filter(|c| c.value.uncertain).count()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub forms: usize,
    pub questions: usize,
    pub uncertain: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub headers: Vec<String>,
    pub rows: Vec<FormRow>,
    pub summary: Summary,
}

/// Assemble every form of `folder` and answer all questions of `description`
pub fn analyze(
    description: &FormDescription,
    folder: &Path,
    thresholds: &Thresholds,
) -> Result<Analysis> {
    let forms: Vec<ParsedForm> =
        forms::build(folder, &description.keywords_per_page)?.collect::<Result<_>>()?;
    Ok(evaluate(description, &forms, thresholds))
}

/// Answer all questions for already assembled forms
pub fn evaluate(
    description: &FormDescription,
    forms: &[ParsedForm],
    thresholds: &Thresholds,
) -> Analysis {
    let rows: Vec<FormRow> = forms
        .par_iter()
        .map(|form| evaluate_form(description, form, thresholds))
        .collect();

    let summary = Summary {
        forms: rows.len(),
        questions: rows.len() * description.items.len(),
        uncertain: rows.iter().map(FormRow::uncertain_count).sum(),
    };
    tracing::info!(
        "Analyzed {} forms, {} of {} values need review",
        summary.forms,
        summary.uncertain,
        rows.iter().map(|r| r.cells.len()).sum::<usize>()
    );

    Analysis {
        headers: description.headers(),
        rows,
        summary,
    }
}

fn evaluate_form(description: &FormDescription, form: &ParsedForm, thresholds: &Thresholds) -> FormRow {
    let label = form.label();
    tracing::info!("Analyzing {}", label);

    let cells = description
        .items
        .iter()
        .flat_map(|item| item.selector.values(&form.fields, thresholds))
        .map(|value| {
            let link = value.uncertain.then(|| review_file(form, value.page));
            Cell { value, link }
        })
        .collect();

    FormRow {
        label,
        page_files: form.page_files.clone(),
        cells,
    }
}

fn review_file(form: &ParsedForm, page: usize) -> String {
    form.page_file(page)
        .or_else(|| form.page_file(0))
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, PositionedField, NOT_SELECTED, SELECTED};
    use crate::filter::Filter;
    use crate::selectors::{MultiSelect, Placeholder, SingleSelect, TextField};

    fn form(files: &[&str], fields: Vec<PositionedField>) -> ParsedForm {
        ParsedForm {
            page_files: files.iter().map(|f| f.to_string()).collect(),
            fields,
        }
    }

    fn at(page: usize, key: &str, value: Option<&str>, confidence: f64) -> PositionedField {
        PositionedField::new(page, Field::new(key, value, confidence))
    }

    fn description() -> FormDescription {
        FormDescription::new([vec!["first"], vec!["second"]])
            .item("Choice", SingleSelect::new(["Yes", "No"], Filter::page(0)))
            .item("Colors", MultiSelect::new(["Red", "Blue"], Filter::page(1)))
            .item("Name", TextField::new("Name", Filter::All))
            .item("Spare", Placeholder)
    }

    #[test]
    fn test_rows_follow_form_order() {
        let forms = vec![
            form(
                &["a_1", "a_2"],
                vec![
                    at(0, "Yes", Some(SELECTED), 90.0),
                    at(0, "No", Some(NOT_SELECTED), 90.0),
                    at(1, "Red", Some(SELECTED), 90.0),
                    at(1, "Blue", Some(NOT_SELECTED), 90.0),
                    at(1, "Name", Some("Ada"), 95.0),
                ],
            ),
            form(
                &["b_1", "b_2"],
                vec![
                    at(0, "No", Some(SELECTED), 90.0),
                    at(1, "Blue", Some(SELECTED), 20.0),
                    at(1, "Name", Some("Bob"), 95.0),
                ],
            ),
        ];

        let analysis = evaluate(&description(), &forms, &Thresholds::default());

        assert_eq!(analysis.headers, vec!["", "Choice", "Colors", "Red", "Blue", "Name", "Spare"]);
        assert_eq!(analysis.rows.len(), 2);

        let first = &analysis.rows[0];
        assert_eq!(first.label, "a_1, a_2");
        let values: Vec<&str> = first.cells.iter().map(|c| c.value.value.as_str()).collect();
        assert_eq!(values, vec!["Yes", "", "1", "", "Ada", ""]);
        assert_eq!(first.uncertain_count(), 0);

        let second = &analysis.rows[1];
        assert_eq!(second.label, "b_1, b_2");
        assert_eq!(second.cells[0].value, FormValue::new("No", 0, false));
        // Blue was read with low confidence
        assert_eq!(second.cells[1].link, None);
        assert_eq!(second.cells[3].value, FormValue::new("1", 1, true));
        assert_eq!(second.cells[3].link.as_deref(), Some("b_2"));
        assert_eq!(second.cells[4].link, None);

        assert_eq!(analysis.summary.forms, 2);
        assert_eq!(analysis.summary.questions, 8);
        assert_eq!(analysis.summary.uncertain, second.uncertain_count());
    }

    #[test]
    fn test_link_falls_back_to_first_file() {
        let parsed = form(&["scan"], vec![]);
        assert_eq!(review_file(&parsed, 3), "scan");
        assert_eq!(review_file(&parsed, 0), "scan");
    }

    #[test]
    fn test_cell_json_is_flat() {
        let cell = Cell {
            value: FormValue::new("", 1, true),
            link: Some("a_2".into()),
        };
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(json["value"], "");
        assert_eq!(json["page"], 1);
        assert_eq!(json["uncertain"], true);
        assert_eq!(json["link"], "a_2");
    }
}
