//! XLSX package reader.

use super::shared_strings::SharedStrings;
use super::workbook::{parse_relationship_map, parse_sheet_list, resolve_sheet_map};
use super::worksheet::parse_sheet_data;
use super::{SHARED_STRINGS_PART, WORKBOOK_PART, WORKBOOK_RELS_PART};
use crate::container::Container;
use crate::error::Result;
use crate::model::{SheetData, SheetMapEntry, SheetSelector};
use crate::options::ReadOptions;
use indexmap::IndexMap;
use std::path::Path;

/// Parser for xlsx packages.
///
/// Opening the parser reads the workbook, its relationships and the shared
/// strings once; worksheets are parsed on demand.
pub struct XlsxParser {
    container: Container,
    sheets: Vec<SheetMapEntry>,
    shared_strings: SharedStrings,
}

impl XlsxParser {
    /// Open an xlsx file for parsing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let container = Container::open(path)?;
        Self::from_container(container)
    }

    /// Create a parser from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let container = Container::from_bytes(data)?;
        Self::from_container(container)
    }

    /// Create a parser from an opened container.
    pub fn from_container(container: Container) -> Result<Self> {
        let sheet_list = parse_sheet_list(&container.read_xml(WORKBOOK_PART)?)?;
        let relationships = parse_relationship_map(&container.read_xml(WORKBOOK_RELS_PART)?)?;
        let sheets = resolve_sheet_map(&sheet_list, &relationships)?;

        let shared_strings_path = relationships
            .by_type_suffix("/sharedStrings")
            .next()
            .map(|rel| Container::resolve_path(WORKBOOK_PART, &rel.target))
            .unwrap_or_else(|| SHARED_STRINGS_PART.to_string());
        let shared_strings = SharedStrings::parse_optional(
            container.read_optional_xml(&shared_strings_path)?.as_deref(),
        )?;

        log::debug!(
            "resolved {} sheets, {} shared strings",
            sheets.len(),
            shared_strings.len()
        );

        Ok(Self {
            container,
            sheets,
            shared_strings,
        })
    }

    /// Sheets in workbook order.
    pub fn sheet_map(&self) -> &[SheetMapEntry] {
        &self.sheets
    }

    /// Get sheet names.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Get the number of sheets.
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Shared strings of the package.
    pub fn shared_strings(&self) -> &SharedStrings {
        &self.shared_strings
    }

    /// Get a reference to the container.
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Parse one located sheet.
    pub fn read_sheet(&self, sheet: &SheetMapEntry, options: &ReadOptions) -> Result<SheetData> {
        let xml = self.container.read_xml(&sheet.path)?;
        parse_sheet_data(&xml, &self.shared_strings, options)
    }

    /// Parse the selected sheets, keyed by sheet name in workbook order.
    ///
    /// A selector matching nothing yields an empty map.
    pub fn read(
        &self,
        selector: &SheetSelector,
        options: &ReadOptions,
    ) -> Result<IndexMap<String, SheetData>> {
        let mut data = IndexMap::new();
        for sheet in selector.select(&self.sheets) {
            data.insert(sheet.name.clone(), self.read_sheet(sheet, options)?);
        }
        Ok(data)
    }
}

impl std::fmt::Debug for XlsxParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XlsxParser")
            .field("sheets", &self.sheets)
            .field("shared_strings", &self.shared_strings.len())
            .finish()
    }
}

/// Sheet names declared by the workbook part, without resolving their parts.
pub fn read_sheet_names(container: &Container) -> Result<Vec<String>> {
    let sheets = parse_sheet_list(&container.read_xml(WORKBOOK_PART)?)?;
    Ok(sheets.into_iter().map(|s| s.name).collect())
}
