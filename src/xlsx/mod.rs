//! XLSX package reading and writing.
//!
//! Writing produces the fixed part set below; reading consumes the same set
//! plus an optional shared strings table.
//!
//! ```text
//! [Content_Types].xml
//! _rels/.rels
//! xl/workbook.xml
//! xl/_rels/workbook.xml.rels
//! xl/styles.xml
//! xl/worksheets/sheet1.xml ... sheetN.xml
//! xl/sharedStrings.xml        (read only)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use inkwell_xlsx::model::SheetSelector;
//! use inkwell_xlsx::options::ReadOptions;
//! use inkwell_xlsx::xlsx::XlsxParser;
//!
//! let parser = XlsxParser::open("spreadsheet.xlsx")?;
//! for (name, data) in parser.read(&SheetSelector::All, &ReadOptions::default())? {
//!     println!("{}: {} rows", name, data.len());
//! }
//! # Ok::<(), inkwell_xlsx::Error>(())
//! ```

mod parser;
mod shared_strings;
mod styles;
mod workbook;
mod worksheet;
mod writer;

pub use parser::{read_sheet_names, XlsxParser};
pub use shared_strings::SharedStrings;
pub use styles::styles;
pub use workbook::{parse_relationship_map, parse_sheet_list, resolve_sheet_map, SheetInfo};
pub use worksheet::{parse_rows, parse_sheet_data, rows_to_records};
pub use writer::{
    content_types, generate_parts, root_relationships, workbook, workbook_relationships,
    worksheet, XlsxWriter,
};

/// Content types manifest.
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
/// Package relationships.
pub const ROOT_RELS_PART: &str = "_rels/.rels";
/// Workbook part.
pub const WORKBOOK_PART: &str = "xl/workbook.xml";
/// Workbook relationships.
pub const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
/// Stylesheet.
pub const STYLES_PART: &str = "xl/styles.xml";
/// Default location of the shared strings table.
pub const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

/// Path of the worksheet part for the 1-based sheet `index`.
pub fn sheet_part_path(index: usize) -> String {
    format!("xl/worksheets/sheet{}.xml", index)
}
