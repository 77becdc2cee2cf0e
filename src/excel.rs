//! File-level handle combining the reader and the writer.

use crate::container::Container;
use crate::error::{Error, Result};
use crate::model::{Sheet, SheetData, SheetSelector, Workbook};
use crate::options::{GapPolicy, ReadOptions, WriteOptions};
use crate::xlsx::{parse_rows, read_sheet_names, XlsxParser, XlsxWriter};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// A target file plus the sheets written to it so far.
///
/// Every [`write`](Excel::write) rebuilds the whole package from the
/// accumulated sheets and replaces the target. Every read reopens the target
/// from disk; nothing is cached between calls.
///
/// # Example
///
/// ```no_run
/// use inkwell_xlsx::Excel;
///
/// let mut excel = Excel::new();
/// excel.file("contacts.xlsx");
/// excel.write("Contacts", [["Name", "Age"], ["John", "31"]])?;
///
/// let data = excel.read("Contacts", true)?;
/// println!("{:?}", data["Contacts"]);
/// # Ok::<(), inkwell_xlsx::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Excel {
    target: Option<PathBuf>,
    workbook: Workbook,
    write_options: WriteOptions,
}

impl Excel {
    /// Create a handle with no target and no sheets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handle for an existing file, carrying over its sheets so
    /// later writes append to them.
    ///
    /// Sheets are loaded with [`GapPolicy::Fill`] so cell positions survive
    /// the rewrite.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let parser = XlsxParser::open(path)?;

        let mut workbook = Workbook::new();
        for entry in parser.sheet_map() {
            let xml = parser.container().read_xml(&entry.path)?;
            workbook.add_sheet(Sheet {
                name: entry.name.clone(),
                rows: parse_rows(&xml, parser.shared_strings(), GapPolicy::Fill)?,
            });
        }

        Ok(Self {
            target: Some(path.to_path_buf()),
            workbook,
            write_options: WriteOptions::default(),
        })
    }

    /// Set the target file. No I/O happens until the next read or write.
    pub fn file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.target = Some(path.into());
        self
    }

    /// The current target file.
    pub fn target(&self) -> Option<&Path> {
        self.target.as_deref()
    }

    /// Set the options used for writing.
    pub fn with_write_options(mut self, options: WriteOptions) -> Self {
        self.write_options = options;
        self
    }

    /// Sheets accumulated by this handle.
    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    fn require_target(&self) -> Result<&Path> {
        self.target.as_deref().ok_or(Error::TargetNotSet)
    }

    /// Append a sheet and rewrite the target with every accumulated sheet.
    ///
    /// If the write fails the sheet is not kept, so the handle still mirrors
    /// the file on disk.
    pub fn write<R, C>(&mut self, name: impl Into<String>, rows: R) -> Result<()>
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let target = self.require_target()?.to_path_buf();

        self.workbook.add_sheet(Sheet::new(name, rows));
        let result = XlsxWriter::with_options(self.write_options.clone())
            .write_file(&self.workbook, &target);

        if result.is_err() {
            self.workbook.sheets.pop();
        }
        result
    }

    /// Read sheets from the target.
    ///
    /// An index past the last sheet or an unknown name returns an empty map.
    pub fn read(
        &self,
        selector: impl Into<SheetSelector>,
        use_first_row_as_keys: bool,
    ) -> Result<IndexMap<String, SheetData>> {
        let options = ReadOptions::new().with_header(use_first_row_as_keys);
        self.read_with_options(selector, &options)
    }

    /// Read sheets from the target with explicit options.
    pub fn read_with_options(
        &self,
        selector: impl Into<SheetSelector>,
        options: &ReadOptions,
    ) -> Result<IndexMap<String, SheetData>> {
        let parser = XlsxParser::open(self.require_target()?)?;
        parser.read(&selector.into(), options)
    }

    /// Sheet names of the target in workbook order.
    pub fn sheets(&self) -> Result<Vec<String>> {
        let container = Container::open(self.require_target()?)?;
        read_sheet_names(&container)
    }
}
