use crate::clean::value::CellValue;
use crate::dataset::LogicalName;
use crate::load::RawTable;
use calamine::{Data, DataType, Reader, Xlsx, XlsxError};
use std::io::Cursor;

/// A consolidated workbook opened from an in-memory buffer, so the same
/// bytes feed both the parser and the content fingerprint.
pub(crate) struct Workbook {
    inner: Xlsx<Cursor<Vec<u8>>>,
    path: String,
}

impl Workbook {
    /// Opens workbook bytes. A corrupt archive fails here, before any sheet
    /// is touched.
    pub(crate) fn from_bytes(path: &str, bytes: Vec<u8>) -> Result<Self, XlsxError> {
        Ok(Workbook {
            inner: Xlsx::new(Cursor::new(bytes))?,
            path: path.to_owned(),
        })
    }

    pub(crate) fn path(&self) -> &str {
        self.path.as_str()
    }

    /// Resolves the physical sheet holding a logical table: exact expected
    /// name first, then case-insensitive substring containment.
    pub(crate) fn resolve_sheet(&self, logical: LogicalName) -> Option<String> {
        let names = self.inner.sheet_names();
        if names.iter().any(|name| name == logical.sheet_name()) {
            return Some(logical.sheet_name().to_owned());
        }
        names.into_iter().find(|name| logical.matches(name))
    }

    /// Reads one sheet into a header row plus typed cell rows.
    pub(crate) fn read_sheet(&mut self, sheet_name: &str) -> Result<RawTable, XlsxError> {
        let range = self.inner.worksheet_range(sheet_name)?;
        let mut rows = range.rows();
        let headers: Vec<String> = rows
            .next()
            .map(|row| row.iter().map(header_text).collect())
            .unwrap_or_default();
        let rows = rows
            .map(|row| row.iter().map(cell_value).collect())
            .collect();
        Ok(RawTable { headers, rows })
    }
}

fn header_text(data: &Data) -> String {
    match data {
        Data::String(text) => text.trim().to_owned(),
        other => cell_value(other).to_string(),
    }
}

/// Maps a workbook cell to the tagged union. Error cells degrade to missing;
/// date cells are rendered as ISO text the way a reader would see them.
fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Missing,
        Data::Float(value) => CellValue::Number(*value),
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Bool(value) => CellValue::Text(value.to_string()),
        Data::String(text) => CellValue::Text(text.clone()),
        Data::DateTime(datetime) => match data.as_datetime() {
            Some(value) => CellValue::Text(format_datetime(value)),
            None => CellValue::Number(datetime.as_f64()),
        },
        Data::DateTimeIso(text) | Data::DurationIso(text) => CellValue::Text(text.clone()),
    }
}

fn format_datetime(value: chrono::NaiveDateTime) -> String {
    if value.time() == chrono::NaiveTime::MIN {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
