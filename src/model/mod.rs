//! Tabular data model shared by the reader and the writer.
//!
//! The write side is a [`Workbook`] of named [`Sheet`]s holding text rows.
//! The read side locates sheets through [`SheetMapEntry`] values and returns
//! [`SheetData`], either as plain rows or as records keyed by a header row.

mod sheet_data;
mod workbook;

pub use sheet_data::*;
pub use workbook::*;
