//! XLSX package generation.
//!
//! The part generators are pure functions from an already built
//! [`Workbook`] to XML text. [`XlsxWriter`] strings them together, zips the
//! result in memory and commits it to disk in a single rename.

use super::styles::styles;
use super::{
    sheet_part_path, CONTENT_TYPES_PART, ROOT_RELS_PART, STYLES_PART, WORKBOOK_PART,
    WORKBOOK_RELS_PART,
};
use crate::cellref::cell_reference;
use crate::container::build_archive;
use crate::error::Result;
use crate::model::Workbook;
use crate::options::WriteOptions;
use crate::xml::escape;
use indexmap::IndexMap;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PACKAGE_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_WORKSHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const REL_STYLES: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

const CT_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
const CT_XML: &str = "application/xml";
const CT_WORKBOOK: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const CT_WORKSHEET: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";

/// The `[Content_Types].xml` part.
pub fn content_types(sheet_count: usize) -> String {
    let mut xml = String::with_capacity(512 + sheet_count * 160);
    xml.push_str(XML_DECLARATION);
    xml.push_str(&format!(r#"<Types xmlns="{}">"#, NS_CONTENT_TYPES));
    xml.push_str(&format!(
        r#"<Default Extension="rels" ContentType="{}"/>"#,
        CT_RELATIONSHIPS
    ));
    xml.push_str(&format!(r#"<Default Extension="xml" ContentType="{}"/>"#, CT_XML));
    xml.push_str(&format!(
        r#"<Override PartName="/{}" ContentType="{}"/>"#,
        WORKBOOK_PART, CT_WORKBOOK
    ));
    for index in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Override PartName="/{}" ContentType="{}"/>"#,
            sheet_part_path(index),
            CT_WORKSHEET
        ));
    }
    xml.push_str(&format!(
        r#"<Override PartName="/{}" ContentType="{}"/>"#,
        STYLES_PART, CT_STYLES
    ));
    xml.push_str("</Types>");
    xml
}

/// The `_rels/.rels` part, pointing the package at its workbook.
pub fn root_relationships() -> String {
    format!(
        r#"{}<Relationships xmlns="{}"><Relationship Id="rId1" Type="{}" Target="{}"/></Relationships>"#,
        XML_DECLARATION, NS_PACKAGE_RELATIONSHIPS, REL_OFFICE_DOCUMENT, WORKBOOK_PART
    )
}

/// The `xl/workbook.xml` part.
///
/// Sheet `n` (1-based) gets `sheetId="n"` and `r:id="rIdn"`.
pub fn workbook<S: AsRef<str>>(sheet_names: &[S]) -> String {
    let mut xml = String::with_capacity(256 + sheet_names.len() * 64);
    xml.push_str(XML_DECLARATION);
    xml.push_str(&format!(
        r#"<workbook xmlns="{}" xmlns:r="{}"><sheets>"#,
        NS_MAIN, NS_RELATIONSHIPS
    ));
    for (i, name) in sheet_names.iter().enumerate() {
        let position = i + 1;
        xml.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape(name.as_ref()),
            position,
            position
        ));
    }
    xml.push_str("</sheets></workbook>");
    xml
}

/// The `xl/_rels/workbook.xml.rels` part.
///
/// `rId1..rIdN` point at the worksheets in order; `rId(N+1)` at the styles.
pub fn workbook_relationships(sheet_count: usize) -> String {
    let mut xml = String::with_capacity(256 + sheet_count * 160);
    xml.push_str(XML_DECLARATION);
    xml.push_str(&format!(r#"<Relationships xmlns="{}">"#, NS_PACKAGE_RELATIONSHIPS));
    for index in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="{}" Target="worksheets/sheet{}.xml"/>"#,
            index, REL_WORKSHEET, index
        ));
    }
    xml.push_str(&format!(
        r#"<Relationship Id="rId{}" Type="{}" Target="styles.xml"/>"#,
        sheet_count + 1,
        REL_STYLES
    ));
    xml.push_str("</Relationships>");
    xml
}

/// A worksheet part holding `rows` as inline-string cells.
///
/// Empty values are not emitted; the row element is still written so row
/// numbers stay stable.
pub fn worksheet(rows: &[Vec<String>]) -> String {
    let mut xml = String::with_capacity(256 + rows.len() * 64);
    xml.push_str(XML_DECLARATION);
    xml.push_str(&format!(r#"<worksheet xmlns="{}">"#, NS_MAIN));

    if rows.is_empty() {
        xml.push_str("<sheetData/>");
    } else {
        xml.push_str("<sheetData>");
        for (row_index, row) in rows.iter().enumerate() {
            let row_number = row_index + 1;
            xml.push_str(&format!(r#"<row r="{}">"#, row_number));
            for (column, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                let space = if value.trim() != value.as_str() {
                    r#" xml:space="preserve""#
                } else {
                    ""
                };
                xml.push_str(&format!(
                    r#"<c r="{}" t="inlineStr"><is><t{}>{}</t></is></c>"#,
                    cell_reference(column, row_index),
                    space,
                    escape(value)
                ));
            }
            xml.push_str("</row>");
        }
        xml.push_str("</sheetData>");
    }

    xml.push_str("</worksheet>");
    xml
}

/// Every part of the package for `workbook`, in archive order.
pub fn generate_parts(workbook: &Workbook) -> IndexMap<String, String> {
    let sheet_count = workbook.len();
    let mut parts = IndexMap::with_capacity(5 + sheet_count);

    parts.insert(CONTENT_TYPES_PART.to_string(), content_types(sheet_count));
    parts.insert(ROOT_RELS_PART.to_string(), root_relationships());
    parts.insert(WORKBOOK_PART.to_string(), self::workbook(&workbook.sheet_names()));
    parts.insert(
        WORKBOOK_RELS_PART.to_string(),
        workbook_relationships(sheet_count),
    );
    parts.insert(STYLES_PART.to_string(), styles());

    for (i, sheet) in workbook.sheets.iter().enumerate() {
        parts.insert(sheet_part_path(i + 1), worksheet(&sheet.rows));
    }

    parts
}

/// Writer for xlsx packages.
///
/// # Example
///
/// ```no_run
/// use inkwell_xlsx::model::{Sheet, Workbook};
/// use inkwell_xlsx::xlsx::XlsxWriter;
///
/// let workbook = Workbook::new().with_sheet(Sheet::new("Contacts", [["Name", "Age"]]));
/// XlsxWriter::new().write_file(&workbook, "contacts.xlsx")?;
/// # Ok::<(), inkwell_xlsx::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct XlsxWriter {
    options: WriteOptions,
}

impl XlsxWriter {
    /// Create a writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with the given options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Build the complete package in memory.
    pub fn to_bytes(&self, workbook: &Workbook) -> Result<Vec<u8>> {
        if workbook.is_empty() {
            log::warn!("writing a workbook without sheets");
        }
        build_archive(&generate_parts(workbook), self.options.compression)
    }

    /// Write the package to `path`, replacing any existing file.
    ///
    /// The bytes go to a temporary file next to the target which is then
    /// renamed over it, so a failed write leaves the previous file intact.
    pub fn write_file(&self, workbook: &Workbook, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes(workbook)?;

        commit(stage(path, &bytes)?, path)?;

        log::debug!(
            "wrote {} sheets to {}",
            workbook.len(),
            path.display()
        );
        Ok(())
    }
}

/// Write `bytes` to a temporary file in the directory of `target`.
fn stage(target: &Path, bytes: &[u8]) -> Result<NamedTempFile> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    Ok(staged)
}

/// Rename a staged file over `target`.
fn commit(staged: NamedTempFile, target: &Path) -> Result<()> {
    staged.persist(target)?;
    Ok(())
}
