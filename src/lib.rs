//! # inkwell-xlsx
//!
//! Minimal reader and writer for OOXML spreadsheet (.xlsx) packages.
//!
//! Every cell is text. Writing produces a small, valid package of
//! inline-string cells; reading resolves the workbook, its relationships and
//! the shared strings table and returns each sheet as rows or as records
//! keyed by a header row.
//!
//! ## Quick Start
//!
//! ```no_run
//! use inkwell_xlsx::Excel;
//!
//! let mut excel = Excel::new();
//! excel.file("my-file.xlsx");
//!
//! excel.write("Contacts", [["Name", "Age"], ["John Doe", "31"]])?;
//! excel.write("Products", [["Product", "Price"], ["Laptop", "1000"]])?;
//!
//! // ["Contacts", "Products"]
//! let names = excel.sheets()?;
//!
//! // Every sheet, plain rows
//! let all = excel.read(None::<usize>, false)?;
//!
//! // One sheet by name or position, first row as keys
//! let contacts = excel.read("Contacts", true)?;
//! let products = excel.read(1usize, true)?;
//! # Ok::<(), inkwell_xlsx::Error>(())
//! ```
//!
//! ## Lower-level APIs
//!
//! ```no_run
//! use inkwell_xlsx::model::{Sheet, SheetSelector, Workbook};
//! use inkwell_xlsx::options::ReadOptions;
//! use inkwell_xlsx::xlsx::{XlsxParser, XlsxWriter};
//!
//! let workbook = Workbook::new().with_sheet(Sheet::new("Data", [["a", "b"]]));
//! let bytes = XlsxWriter::new().to_bytes(&workbook)?;
//!
//! let parser = XlsxParser::from_bytes(bytes)?;
//! let data = parser.read(&SheetSelector::All, &ReadOptions::default())?;
//! # Ok::<(), inkwell_xlsx::Error>(())
//! ```

pub mod cellref;
pub mod container;
pub mod error;
pub mod excel;
pub mod model;
pub mod options;
pub mod xlsx;
pub mod xml;

// Re-exports
pub use container::{Container, Relationship, Relationships};
pub use error::{Error, Result};
pub use excel::Excel;
pub use model::{Record, Sheet, SheetData, SheetMapEntry, SheetSelector, Workbook};
pub use options::{Compression, GapPolicy, ReadOptions, WriteOptions};
pub use xlsx::{XlsxParser, XlsxWriter};

use indexmap::IndexMap;
use std::path::Path;

/// Write a workbook to `path`, replacing the file.
///
/// # Example
///
/// ```no_run
/// use inkwell_xlsx::{write_file, Sheet, Workbook};
///
/// let workbook = Workbook::new().with_sheet(Sheet::new("Data", [["x"]]));
/// write_file(&workbook, "data.xlsx")?;
/// # Ok::<(), inkwell_xlsx::Error>(())
/// ```
pub fn write_file(workbook: &Workbook, path: impl AsRef<Path>) -> Result<()> {
    XlsxWriter::new().write_file(workbook, path)
}

/// Read every sheet of `path` as plain rows.
///
/// # Example
///
/// ```no_run
/// let sheets = inkwell_xlsx::read_file("data.xlsx")?;
/// for (name, data) in &sheets {
///     println!("{}: {} rows", name, data.len());
/// }
/// # Ok::<(), inkwell_xlsx::Error>(())
/// ```
pub fn read_file(path: impl AsRef<Path>) -> Result<IndexMap<String, SheetData>> {
    XlsxParser::open(path)?.read(&SheetSelector::All, &ReadOptions::default())
}

/// Read every sheet of an in-memory package as plain rows.
pub fn read_bytes(data: &[u8]) -> Result<IndexMap<String, SheetData>> {
    XlsxParser::from_bytes(data.to_vec())?.read(&SheetSelector::All, &ReadOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_round_trip() {
        let workbook = Workbook::new().with_sheet(Sheet::new("Data", [["a", "b"], ["c", "d"]]));
        let bytes = XlsxWriter::new().to_bytes(&workbook).unwrap();

        let sheets = read_bytes(&bytes).unwrap();
        assert_eq!(sheets["Data"].as_rows().unwrap(), &[vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn test_read_bytes_rejects_garbage() {
        assert!(matches!(read_bytes(b"PK but not really"), Err(Error::ArchiveOpen(_))));
    }
}
