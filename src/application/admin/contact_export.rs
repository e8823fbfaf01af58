//! Spreadsheet export of contact messages.

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use thiserror::Error;
use time::{UtcOffset, macros::format_description};

use crate::domain::entities::ContactRecord;

pub const EXPORT_FILENAME: &str = "message-list.xlsx";
pub const EXPORT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const EXPORT_SHEET_NAME: &str = "Messages";

/// Header labels, in column order.
pub const EXPORT_COLUMNS: [&str; 7] = [
    "Name",
    "Company",
    "Mobile",
    "Email",
    "Demand",
    "Created At",
    "Status",
];

const COLUMN_WIDTHS: [f64; 7] = [18.0, 24.0, 18.0, 28.0, 60.0, 20.0, 10.0];

#[derive(Debug, Error)]
pub enum ContactExportError {
    #[error("spreadsheet could not be written: {0}")]
    Workbook(#[from] XlsxError),
    #[error("timestamp could not be formatted: {0}")]
    Timestamp(#[from] time::error::Format),
    #[error("export exceeds the spreadsheet row limit")]
    TooManyRows,
}

/// Cell values for one message, in `EXPORT_COLUMNS` order.
pub fn export_row(record: &ContactRecord) -> Result<[String; 7], ContactExportError> {
    let created_at = record
        .created_at
        .to_offset(UtcOffset::UTC)
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))?;

    Ok([
        record.name.clone(),
        record.company.clone().unwrap_or_default(),
        record.mobile.clone(),
        record.email.clone().unwrap_or_default(),
        record.demand.clone(),
        created_at,
        record.status.label().to_string(),
    ])
}

/// Header row followed by one row per message, exactly as the sheet holds them.
pub fn export_table(records: &[ContactRecord]) -> Result<Vec<[String; 7]>, ContactExportError> {
    let mut table = Vec::with_capacity(records.len() + 1);
    table.push(EXPORT_COLUMNS.map(str::to_string));
    for record in records {
        table.push(export_row(record)?);
    }
    Ok(table)
}

/// Serialize a table from `export_table`; its first row becomes the bold header.
pub fn build_workbook(table: &[[String; 7]]) -> Result<Vec<u8>, ContactExportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(EXPORT_SHEET_NAME)?;

    for (col, width) in COLUMN_WIDTHS.into_iter().enumerate() {
        sheet.set_column_width(col as u16, width)?;
    }
    sheet.set_freeze_panes(1, 0)?;

    for (index, cells) in table.iter().enumerate() {
        let row = u32::try_from(index).map_err(|_| ContactExportError::TooManyRows)?;
        for (col, value) in cells.iter().enumerate() {
            if row == 0 {
                sheet.write_string_with_format(row, col as u16, value, &header)?;
            } else {
                sheet.write_string(row, col as u16, value)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
