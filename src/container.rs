//! ZIP container abstraction for xlsx packages.
//!
//! Reading goes through [`Container`], which owns the archive for the length
//! of one operation; dropping it releases the archive on every exit path.
//! Writing goes through [`build_archive`], which assembles the whole package
//! in memory.

use crate::error::{Error, Result};
use crate::options::Compression;
use crate::xml::{Element, PACKAGE_RELATIONSHIPS};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;

/// A relationship entry from a .rels part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path, usually relative to the source part
    pub target: String,
    /// Whether the target lives outside the package
    pub external: bool,
}

/// Relationships parsed from a .rels part, in document order.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    entries: Vec<Relationship>,
    by_id: HashMap<String, usize>,
}

impl Relationships {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a .rels part.
    ///
    /// Entries without an `Id` are skipped. A repeated id keeps the first entry.
    pub fn parse(xml: &str) -> Result<Self> {
        let root = Element::parse(xml)?;
        let mut rels = Self::new();

        for element in root.children(PACKAGE_RELATIONSHIPS, "Relationship") {
            let Some(id) = element.attr("Id").filter(|id| !id.is_empty()) else {
                continue;
            };

            rels.add(Relationship {
                id: id.to_string(),
                rel_type: element.attr("Type").unwrap_or_default().to_string(),
                target: element.attr("Target").unwrap_or_default().to_string(),
                external: element
                    .attr("TargetMode")
                    .is_some_and(|mode| mode.eq_ignore_ascii_case("external")),
            });
        }

        Ok(rels)
    }

    /// Add a relationship.
    pub fn add(&mut self, rel: Relationship) {
        if self.by_id.contains_key(&rel.id) {
            log::warn!("duplicate relationship id {}, keeping the first", rel.id);
            return;
        }
        self.by_id.insert(rel.id.clone(), self.entries.len());
        self.entries.push(rel);
    }

    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id).map(|&idx| &self.entries[idx])
    }

    /// Target of the relationship with the given ID.
    pub fn target(&self, id: &str) -> Option<&str> {
        self.get(id).map(|rel| rel.target.as_str())
    }

    /// Relationships whose type URI ends with `suffix` (e.g. `"/worksheet"`).
    pub fn by_type_suffix<'a>(&'a self, suffix: &'a str) -> impl Iterator<Item = &'a Relationship> {
        self.entries
            .iter()
            .filter(move |rel| rel.rel_type.ends_with(suffix))
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rewrite a UTF-16 encoding declaration to UTF-8 once the text is decoded.
fn fix_xml_encoding_declaration(content: String) -> String {
    if !content.starts_with("<?xml") {
        return content;
    }
    let Some(end) = content.find("?>") else {
        return content;
    };

    let declaration = content[..end + 2]
        .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
        .replace("encoding='UTF-16'", "encoding='UTF-8'")
        .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
        .replace("encoding='utf-16'", "encoding='UTF-8'");

    format!("{}{}", declaration, &content[end + 2..])
}

/// Decode an XML part, handling UTF-8 (with or without BOM) and UTF-16 LE/BE.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8(rest.to_vec())
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))),
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes).map(fix_xml_encoding_declaration),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes).map(fix_xml_encoding_declaration),
        _ => match String::from_utf8(bytes.to_vec()) {
            Ok(s) => Ok(s),
            // ASCII markup in UTF-16 leaves every other byte zero.
            Err(_) if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 => {
                decode_utf16(bytes, u16::from_le_bytes)
            }
            Err(_) if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 => {
                decode_utf16(bytes, u16::from_be_bytes)
            }
            Err(_) => Ok(String::from_utf8_lossy(bytes).into_owned()),
        },
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Read handle over an xlsx package.
pub struct Container {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl Container {
    /// Open a package from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use inkwell_xlsx::container::Container;
    ///
    /// let container = Container::open("book.xlsx")?;
    /// assert!(container.exists("xl/workbook.xml"));
    /// # Ok::<(), inkwell_xlsx::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Open a package held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data))
            .map_err(|e| Error::ArchiveOpen(e.to_string()))?;
        log::debug!("opened package with {} parts", archive.len());
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Read the raw bytes of a part.
    pub fn read_part(&self, path: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive.by_name(path).map_err(|err| match err {
            zip::result::ZipError::FileNotFound => Error::PartNotFound(path.to_string()),
            other => Error::from(other),
        })?;

        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Read a part as XML text.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        decode_xml_bytes(&self.read_part(path)?)
    }

    /// Read a part that may legitimately be absent.
    pub fn read_optional_xml(&self, path: &str) -> Result<Option<String>> {
        match self.read_xml(path) {
            Ok(xml) => Ok(Some(xml)),
            Err(Error::PartNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Check if a part exists.
    pub fn exists(&self, path: &str) -> bool {
        let archive = self.archive.borrow();
        let found = archive.file_names().any(|n| n == path);
        found
    }

    /// List all part names.
    pub fn list_files(&self) -> Vec<String> {
        let archive = self.archive.borrow();
        archive.file_names().map(String::from).collect()
    }

    /// Read relationships of a part, e.g. `xl/workbook.xml` reads
    /// `xl/_rels/workbook.xml.rels`.
    pub fn read_relationships(&self, part_path: &str) -> Result<Relationships> {
        Relationships::parse(&self.read_xml(&Self::rels_path(part_path))?)
    }

    /// Path of the .rels part belonging to `part_path`.
    pub fn rels_path(part_path: &str) -> String {
        match part_path.trim_start_matches('/').rsplit_once('/') {
            Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
            None if part_path.is_empty() || part_path == "/" => "_rels/.rels".to_string(),
            None => format!("_rels/{}.rels", part_path),
        }
    }

    /// Resolve a relationship target against the part that declares it.
    pub fn resolve_path(base: &str, relative: &str) -> String {
        if let Some(stripped) = relative.strip_prefix('/') {
            return stripped.to_string();
        }

        let mut segments: Vec<&str> = base.split('/').collect();
        // Drop the file name of the base part.
        segments.pop();

        for segment in relative.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                other => segments.push(other),
            }
        }

        segments.join("/")
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("files", &self.list_files().len())
            .finish()
    }
}

/// Build a ZIP archive holding exactly `parts`, in order, as UTF-8 text.
pub fn build_archive(parts: &IndexMap<String, String>, compression: Compression) -> Result<Vec<u8>> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(compression.into());

    for (path, content) in parts {
        zip.start_file(path.as_str(), options)?;
        zip.write_all(content.as_bytes())?;
    }

    let bytes = zip.finish()?.into_inner();
    log::debug!("built package: {} parts, {} bytes", parts.len(), bytes.len());
    Ok(bytes)
}
