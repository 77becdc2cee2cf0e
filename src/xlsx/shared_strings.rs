//! XLSX shared strings parsing.

use crate::error::Result;
use crate::xml::{Element, SPREADSHEETML};

/// Shared strings table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedStrings {
    /// All strings in order
    strings: Vec<String>,
}

impl SharedStrings {
    /// Parse shared strings from XML content.
    ///
    /// Plain items (`<si><t>`) and rich-text items (`<si><r><t>`) are both
    /// flattened to their text; phonetic runs are skipped.
    pub fn parse(xml: &str) -> Result<Self> {
        let root = Element::parse(xml)?;

        let strings = root.children(SPREADSHEETML, "si").map(rich_text).collect();

        Ok(Self { strings })
    }

    /// Parse the part if present; an absent part is an empty table.
    pub fn parse_optional(xml: Option<&str>) -> Result<Self> {
        match xml {
            Some(xml) => Self::parse(xml),
            None => Ok(Self::default()),
        }
    }

    /// Get a string by index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(|s| s.as_str())
    }

    /// Get the count of shared strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

/// Text of a string item (`<si>` or an inline `<is>`).
pub(crate) fn rich_text(item: &Element) -> String {
    item.elements()
        .filter_map(|part| {
            if part.is(SPREADSHEETML, "t") {
                Some(part.text())
            } else if part.is(SPREADSHEETML, "r") {
                part.child(SPREADSHEETML, "t").map(Element::text)
            } else {
                None
            }
        })
        .collect()
}

impl From<Vec<String>> for SharedStrings {
    fn from(strings: Vec<String>) -> Self {
        Self { strings }
    }
}
