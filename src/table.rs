//! Tabular input / output.
//!
//! A workbook is either a single CSV file or a directory with one
//! `<SHEET>.csv` per sheet. Columns are addressed by header name. Rows keep
//! a 1-based number for reporting; no index column is written.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::{EnricherError, IoResultExt, Result};

/// Workbook + sheet pair naming one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLocation {
    pub workbook: PathBuf,
    pub sheet: String,
}

impl TableLocation {
    pub fn new(workbook: impl Into<PathBuf>, sheet: impl Into<String>) -> Self {
        Self {
            workbook: workbook.into(),
            sheet: sheet.into(),
        }
    }

    /// The CSV file backing this sheet.
    pub fn csv_path(&self) -> PathBuf {
        if self.workbook.is_dir() {
            self.workbook.join(format!("{}.csv", self.sheet))
        } else {
            self.workbook.clone()
        }
    }
}

impl fmt::Display for TableLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.workbook.display(), self.sheet)
    }
}

/// One data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    number: usize,
    fields: Vec<String>,
}

impl Row {
    /// 1-based position of the row below the header.
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn get(&self, column: usize) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, column: usize, value: impl Into<String>) {
        if self.fields.len() <= column {
            self.fields.resize(column + 1, String::new());
        }
        self.fields[column] = value.into();
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

/// Header plus rows of a single sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Load the sheet named by `location`.
    pub fn load(location: &TableLocation) -> Result<Self> {
        Self::read(&location.csv_path())
    }

    pub fn read(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).with_path(path.display().to_string(), "open")?;
        Self::from_reader(file, &path.display().to_string())
    }

    /// Parse CSV with a header line. Short rows are padded with empty cells;
    /// rows longer than the header are rejected.
    pub fn from_reader<R: io::Read>(reader: R, location: &str) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| EnricherError::csv(location, e))?
            .iter()
            .map(String::from)
            .collect();

        let mut table = Table::new(headers);
        for (idx, record) in rdr.records().enumerate() {
            let record = record.map_err(|e| EnricherError::csv(location, e))?;
            if record.len() > table.headers.len() {
                return Err(EnricherError::table(
                    location,
                    format!(
                        "row {} has {} fields but the header has {}",
                        idx + 1,
                        record.len(),
                        table.headers.len()
                    ),
                ));
            }
            table.push_row(record.iter().map(String::from).collect());
        }
        Ok(table)
    }

    /// Write to `path`, creating or truncating it.
    pub fn write(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path).with_path(path.display().to_string(), "create")?;
        self.to_writer(file, &path.display().to_string())
    }

    pub fn to_writer<W: io::Write>(&self, writer: W, location: &str) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.headers)
            .map_err(|e| EnricherError::csv(location, e))?;
        for row in &self.rows {
            wtr.write_record(&row.fields)
                .map_err(|e| EnricherError::csv(location, e))?;
        }
        wtr.flush().with_path(location, "flush")?;
        Ok(())
    }

    /// Append a row; it is padded to the header width.
    pub fn push_row(&mut self, mut fields: Vec<String>) {
        if fields.len() < self.headers.len() {
            fields.resize(self.headers.len(), String::new());
        }
        let number = self.rows.len() + 1;
        self.rows.push(Row { number, fields });
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of `name`, or `MissingColumn` naming `location`.
    pub fn require_column(&self, name: &str, location: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| EnricherError::missing_column(name, location))
    }

    /// Index of `name`, appending an empty column when it does not exist.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column_index(name) {
            return idx;
        }
        self.headers.push(name.to_string());
        let width = self.headers.len();
        for row in &mut self.rows {
            row.fields.resize(width, String::new());
        }
        width - 1
    }

    /// Drop `name` if present and re-append it, empty, as the last column.
    pub fn reset_column_last(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column_index(name) {
            self.headers.remove(idx);
            for row in &mut self.rows {
                if idx < row.fields.len() {
                    row.fields.remove(idx);
                }
            }
        }
        self.ensure_column(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "\
Case,Video URL,DNS IP,Abuse contact
1,https://a.example/v/1,10.0.0.1,old@a.example
2,b.example:8080,,
3
";

    fn sample() -> Table {
        Table::from_reader(SHEET.as_bytes(), "sample").unwrap()
    }

    #[test]
    fn reads_headers_and_pads_short_rows() {
        let t = sample();
        assert_eq!(t.headers(), ["Case", "Video URL", "DNS IP", "Abuse contact"]);
        assert_eq!(t.len(), 3);
        assert_eq!(t.rows()[2].fields().len(), 4);
        assert_eq!(t.rows()[2].get(1), "");
        assert_eq!(t.rows()[0].number(), 1);
        assert_eq!(t.rows()[2].number(), 3);
    }

    #[test]
    fn rejects_rows_wider_than_header() {
        let err = Table::from_reader("a,b\n1,2,3\n".as_bytes(), "wide.csv").unwrap_err();
        assert!(err.to_string().contains("wide.csv"));
    }

    #[test]
    fn missing_column_is_reported() {
        let t = sample();
        assert_eq!(t.require_column("Video URL", "sample").unwrap(), 1);
        let err = t.require_column("URL", "sample").unwrap_err();
        assert!(matches!(err, EnricherError::MissingColumn { .. }));
    }

    #[test]
    fn ensure_column_appends_once() {
        let mut t = sample();
        let org = t.ensure_column("Responsible Org");
        assert_eq!(org, 4);
        assert_eq!(t.ensure_column("Responsible Org"), 4);
        assert!(t.rows().iter().all(|r| r.fields().len() == 5));
        assert_eq!(t.ensure_column("Abuse contact"), 3);
    }

    #[test]
    fn reset_column_moves_it_last_and_clears_it() {
        let mut t = sample();
        let ip = t.reset_column_last("DNS IP");
        assert_eq!(ip, 3);
        assert_eq!(t.headers(), ["Case", "Video URL", "Abuse contact", "DNS IP"]);
        assert_eq!(t.rows()[0].get(2), "old@a.example");
        assert_eq!(t.rows()[0].get(3), "");
    }

    #[test]
    fn writes_csv_with_quoting() {
        let mut t = Table::new(vec!["Video URL".into(), "Responsible Org".into()]);
        t.push_row(vec!["https://x.example/".into(), "Example, Inc.".into()]);
        let mut out = Vec::new();
        t.to_writer(&mut out, "mem").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Video URL,Responsible Org\nhttps://x.example/,\"Example, Inc.\"\n"
        );
    }

    #[test]
    fn directory_workbook_selects_sheet_file() {
        let dir = tempfile::tempdir().unwrap();
        let loc = TableLocation::new(dir.path(), "INVESTIGATION");
        assert_eq!(loc.csv_path(), dir.path().join("INVESTIGATION.csv"));

        let file = dir.path().join("single.csv");
        std::fs::write(&file, "Video URL\n").unwrap();
        let loc = TableLocation::new(&file, "ignored");
        assert_eq!(loc.csv_path(), file);
    }

    #[test]
    fn load_reads_sheet_from_directory_workbook() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("MARCH.csv"),
            "Video URL,Notes\nhttps://a.example/1,x\n",
        )
        .unwrap();

        let table = Table::load(&TableLocation::new(dir.path(), "MARCH")).unwrap();
        assert_eq!(table.headers(), ["Video URL", "Notes"]);
        assert_eq!(table.len(), 1);

        let missing = Table::load(&TableLocation::new(dir.path(), "APRIL")).unwrap_err();
        assert!(matches!(missing, EnricherError::Io { .. }));
    }
}
