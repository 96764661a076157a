//! Column-oriented table read from CSV.
//!
//! Each column is typed once on load: if every non-missing cell parses as a
//! float the column is [`ColumnData::Numeric`] (missing = `NaN`), otherwise it
//! is [`ColumnData::Text`] (missing = `None`).

use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Cell contents treated as missing values.
pub const MISSING_MARKERS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

/// Errors produced while building, reading or writing a [`Frame`].
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("column {column} has {got} rows, expected {expected}")]
    RowCountMismatch {
        column: String,
        expected: usize,
        got: usize,
    },
}

/// Storage of a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Floating point values, `NaN` marks a missing cell.
    Numeric(Vec<f64>),
    /// Free text, `None` marks a missing cell.
    Text(Vec<Option<String>>),
}

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    /// Create a numeric column.
    pub fn numeric(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self { name: name.into(), data: ColumnData::Numeric(values) }
    }

    /// Create a text column.
    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self { name: name.into(), data: ColumnData::Text(values) }
    }

    /// Build a column from raw cells, inferring its type.
    pub fn from_cells(name: impl Into<String>, cells: Vec<String>) -> Self {
        let parsed: Option<Vec<f64>> = cells.iter().map(|c| parse_numeric_cell(c)).collect();
        match parsed {
            Some(values) => Self::numeric(name, values),
            None => Self::text(
                name,
                cells
                    .into_iter()
                    .map(|c| if is_missing_marker(&c) { None } else { Some(c) })
                    .collect(),
            ),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.data, ColumnData::Numeric(_))
    }

    /// Numeric values, if this is a numeric column.
    pub fn as_numeric(&self) -> Option<&[f64]> {
        match &self.data {
            ColumnData::Numeric(v) => Some(v),
            ColumnData::Text(_) => None,
        }
    }

    /// Text cell at `row`, `None` when missing or out of range.
    ///
    /// Numeric cells are rendered the same way they are written to CSV.
    pub fn text_at(&self, row: usize) -> Option<String> {
        match &self.data {
            ColumnData::Text(v) => v.get(row).cloned().flatten(),
            ColumnData::Numeric(v) => v
                .get(row)
                .filter(|x| !x.is_nan())
                .map(|&x| format_number(x)),
        }
    }

    /// Cell at `row` read as a number.
    ///
    /// Returns `None` for missing cells and for text that does not parse.
    pub fn value_at(&self, row: usize) -> Option<f64> {
        match &self.data {
            ColumnData::Numeric(v) => v.get(row).copied().filter(|x| !x.is_nan()),
            ColumnData::Text(v) => v
                .get(row)
                .and_then(|c| c.as_deref())
                .and_then(|c| c.trim().parse::<f64>().ok())
                .filter(|x| !x.is_nan()),
        }
    }

    /// True when the cell at `row` holds no value.
    pub fn is_missing(&self, row: usize) -> bool {
        match &self.data {
            ColumnData::Numeric(v) => v.get(row).map_or(true, |x| x.is_nan()),
            ColumnData::Text(v) => v.get(row).map_or(true, Option::is_none),
        }
    }

    fn retain_rows(&mut self, keep: &[bool]) {
        match &mut self.data {
            ColumnData::Numeric(v) => retain_by_mask(v, keep),
            ColumnData::Text(v) => retain_by_mask(v, keep),
        }
    }

    fn cell_for_csv(&self, row: usize) -> String {
        self.text_at(row).unwrap_or_default()
    }
}

/// Column-oriented table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Frame {
    /// Create a frame from columns that all have the same length.
    pub fn new(columns: Vec<Column>) -> Result<Self, FrameError> {
        let n_rows = columns.first().map_or(0, Column::len);
        let mut seen = HashSet::with_capacity(columns.len());
        for col in &columns {
            if !seen.insert(col.name()) {
                return Err(FrameError::DuplicateColumn(col.name().to_string()));
            }
            if col.len() != n_rows {
                return Err(FrameError::RowCountMismatch {
                    column: col.name().to_string(),
                    expected: n_rows,
                    got: col.len(),
                });
            }
        }
        Ok(Self { columns, n_rows })
    }

    /// Read a CSV file with a header row.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, FrameError> {
        let file = File::open(path.as_ref())?;
        Self::from_csv_reader(file)
    }

    /// Read CSV data with a header row.
    ///
    /// Rows with a different number of fields than the header are rejected.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, FrameError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];

        for record in rdr.records() {
            let record = record?;
            for (col, field) in cells.iter_mut().zip(record.iter()) {
                col.push(field.to_string());
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, col)| Column::from_cells(name, col))
            .collect();
        Self::new(columns)
    }

    /// Write the frame as CSV with a header row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), FrameError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(self.columns.iter().map(Column::name))?;
        for row in 0..self.n_rows {
            wtr.write_record(self.columns.iter().map(|c| c.cell_for_csv(row)))?;
        }
        wtr.flush()?;
        Ok(())
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[inline]
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Column by name, or [`FrameError::MissingColumn`].
    pub fn require(&self, name: &str) -> Result<&Column, FrameError> {
        self.column(name)
            .ok_or_else(|| FrameError::MissingColumn(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Remove a column, returning it if it existed.
    pub fn drop_column(&mut self, name: &str) -> Option<Column> {
        let idx = self.columns.iter().position(|c| c.name() == name)?;
        Some(self.columns.remove(idx))
    }

    /// Append a column at the end.
    pub fn push_column(&mut self, column: Column) -> Result<(), FrameError> {
        if self.contains(column.name()) {
            return Err(FrameError::DuplicateColumn(column.name().to_string()));
        }
        if self.columns.is_empty() {
            self.n_rows = column.len();
        } else if column.len() != self.n_rows {
            return Err(FrameError::RowCountMismatch {
                column: column.name().to_string(),
                expected: self.n_rows,
                got: column.len(),
            });
        }
        self.columns.push(column);
        Ok(())
    }

    /// Keep only rows whose mask entry is `true`.
    ///
    /// # Panics
    ///
    /// Debug-asserts that the mask length equals the row count.
    pub fn retain_rows(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.n_rows);
        for col in &mut self.columns {
            col.retain_rows(keep);
        }
        self.n_rows = keep.iter().filter(|&&k| k).count();
    }
}

fn is_missing_marker(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell.trim())
}

/// `Some(NaN)` for missing markers, `Some(x)` for floats, `None` otherwise.
fn parse_numeric_cell(cell: &str) -> Option<f64> {
    if is_missing_marker(cell) {
        return Some(f64::NAN);
    }
    cell.trim().parse::<f64>().ok()
}

fn retain_by_mask<T>(values: &mut Vec<T>, keep: &[bool]) {
    let mut i = 0;
    values.retain(|_| {
        let k = keep.get(i).copied().unwrap_or(false);
        i += 1;
        k
    });
}

/// Integral values are written without a fractional part.
fn format_number(x: f64) -> String {
    if x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{}", x as i64)
    } else {
        format!("{x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
ID,precipitacao_mm_24h,tipo_solo
1,120.5,Argiloso
2,,Arenoso
3,80,
";

    #[test]
    fn infers_column_types() {
        let frame = Frame::from_csv_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(frame.n_rows(), 3);
        assert_eq!(frame.n_columns(), 3);

        let precip = frame.column("precipitacao_mm_24h").unwrap();
        assert!(precip.is_numeric());
        assert_eq!(precip.value_at(0), Some(120.5));
        assert!(precip.is_missing(1));

        let soil = frame.column("tipo_solo").unwrap();
        assert!(!soil.is_numeric());
        assert_eq!(soil.text_at(0).as_deref(), Some("Argiloso"));
        assert!(soil.is_missing(2));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let data = "a,b\n1,2\n3\n";
        let err = Frame::from_csv_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, FrameError::Csv(_)));
    }

    #[test]
    fn duplicate_headers_are_rejected() {
        let data = "a,a\n1,2\n";
        let err = Frame::from_csv_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, FrameError::DuplicateColumn(name) if name == "a"));
    }

    #[test]
    fn retain_rows_applies_to_every_column() {
        let mut frame = Frame::from_csv_reader(SAMPLE.as_bytes()).unwrap();
        frame.retain_rows(&[true, false, true]);
        assert_eq!(frame.n_rows(), 2);
        assert_eq!(frame.column("ID").unwrap().value_at(1), Some(3.0));
        assert!(frame.column("tipo_solo").unwrap().is_missing(1));
    }

    #[test]
    fn push_column_checks_length() {
        let mut frame = Frame::from_csv_reader(SAMPLE.as_bytes()).unwrap();
        let err = frame.push_column(Column::numeric("x", vec![1.0])).unwrap_err();
        assert!(matches!(err, FrameError::RowCountMismatch { expected: 3, got: 1, .. }));
    }

    #[test]
    fn write_csv_round_trips_values() {
        let frame = Frame::from_csv_reader(SAMPLE.as_bytes()).unwrap();
        let mut out = Vec::new();
        frame.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "ID,precipitacao_mm_24h,tipo_solo\n1,120.5,Argiloso\n2,,Arenoso\n3,80,\n"
        );
    }
}
