//! Result table output: an XLSX workbook for review and JSON for tooling

use std::path::Path;

use rust_xlsxwriter::{Format, Formula, Url, Workbook, Worksheet, XlsxError};

use crate::analyze::{Analysis, Cell};
use crate::config::OutputConfig;
use crate::error::Result;

/// Save the analysis as a workbook with one row per form.
///
/// Uncertain cells link to the page file they were read from so a reviewer
/// can open the scan directly from the sheet.
pub fn write_xlsx(analysis: &Analysis, path: &Path, output: &OutputConfig) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&output.sheet_name)?;

    let header_format = Format::new().set_bold();
    for (col, header) in analysis.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }

    for (index, row) in analysis.rows.iter().enumerate() {
        let row_num = (index + 1) as u32;
        match row.page_files.first() {
            Some(file) => {
                worksheet.write_url_with_text(row_num, 0, file_url(file), &row.label)?;
            }
            None => {
                worksheet.write_string(row_num, 0, &row.label)?;
            }
        }
        for (offset, cell) in row.cells.iter().enumerate() {
            write_cell(worksheet, row_num, (offset + 1) as u16, cell, output)?;
        }
    }

    worksheet.set_freeze_panes(1, 0)?;
    worksheet.set_repeat_rows(0, 0)?;
    workbook.save(path)?;

    tracing::info!("Wrote {} rows to {}", analysis.rows.len(), path.display());
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    output: &OutputConfig,
) -> std::result::Result<(), XlsxError> {
    let value = &cell.value.value;

    if let (true, Some(file)) = (cell.value.uncertain, &cell.link) {
        if let Some(number) = as_number(value) {
            let formula = Formula::new(hyperlink_formula(file, number)).set_result(number.to_string());
            worksheet.write_formula(row, col, formula)?;
            return Ok(());
        }
        let text = if value.is_empty() {
            output.uncertain_marker.as_str()
        } else {
            value.as_str()
        };
        worksheet.write_url_with_text(row, col, file_url(file), text)?;
        return Ok(());
    }

    if value.is_empty() {
        return Ok(());
    }
    match as_number(value) {
        Some(number) => worksheet.write_number(row, col, number)?,
        None => worksheet.write_string(row, col, value)?,
    };
    Ok(())
}

fn file_url(file: &str) -> Url {
    Url::new(format!("file:///{}", file))
}

/// Linked cell that still holds a number
fn hyperlink_formula(file: &str, number: f64) -> String {
    format!("=HYPERLINK(\"file:///{}\",{})", file.replace('"', "\"\""), number)
}

/// Values made only of ASCII digits are stored as numbers
fn as_number(value: &str) -> Option<f64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

pub fn to_json(analysis: &Analysis) -> Result<String> {
    Ok(serde_json::to_string_pretty(analysis)?)
}

pub fn write_json(analysis: &Analysis, path: &Path) -> Result<()> {
    std::fs::write(path, to_json(analysis)?)?;
    tracing::info!("Wrote {} rows to {}", analysis.rows.len(), path.display());
    Ok(())
}
