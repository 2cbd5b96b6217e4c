//! CSV export of (already filtered) records.
//!
//! Every field is quote-wrapped so commas, quotes and line breaks inside a
//! value survive a round trip through any CSV reader.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::errors::AppError;
use crate::models::Tabular;

/// Render `items` as CSV: a header row of `columns`, then one row per item.
///
/// Callers validate `columns` against `T::FIELDS`; an unknown column renders empty.
pub fn export_csv<'a, T, I>(items: I, columns: &[&str]) -> Result<String, AppError>
where
    T: Tabular + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(columns)?;
    for item in items {
        let row: Vec<String> = columns
            .iter()
            .map(|column| item.field(column).unwrap_or_default().into_owned())
            .collect();
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV flush failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV was not UTF-8: {}", e)))
}
