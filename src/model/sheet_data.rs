//! Read-side model: located sheets, selectors and parsed data.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A sheet located inside an existing package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetMapEntry {
    /// `sheetId` from the workbook part
    pub id: String,
    /// Sheet name
    pub name: String,
    /// Part path of the worksheet inside the archive
    pub path: String,
}

/// One data row keyed by the header row.
pub type Record = IndexMap<String, String>;

/// Cell data of one sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SheetData {
    /// Plain rows of values
    Rows(Vec<Vec<String>>),
    /// Rows keyed by the first row
    Records(Vec<Record>),
}

impl SheetData {
    /// Number of rows (records do not count the header).
    pub fn len(&self) -> usize {
        match self {
            SheetData::Rows(rows) => rows.len(),
            SheetData::Records(records) => records.len(),
        }
    }

    /// Check if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Plain rows, if read without a header.
    pub fn as_rows(&self) -> Option<&[Vec<String>]> {
        match self {
            SheetData::Rows(rows) => Some(rows),
            SheetData::Records(_) => None,
        }
    }

    /// Records, if read with a header.
    pub fn as_records(&self) -> Option<&[Record]> {
        match self {
            SheetData::Records(records) => Some(records),
            SheetData::Rows(_) => None,
        }
    }
}

/// Which sheets a read should return.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SheetSelector {
    /// Every sheet, in workbook order
    #[default]
    All,
    /// The sheet at a zero-based position
    ByIndex(usize),
    /// Every sheet with this name
    ByName(String),
}

impl From<usize> for SheetSelector {
    fn from(index: usize) -> Self {
        SheetSelector::ByIndex(index)
    }
}

impl From<&str> for SheetSelector {
    fn from(name: &str) -> Self {
        SheetSelector::ByName(name.to_string())
    }
}

impl From<String> for SheetSelector {
    fn from(name: String) -> Self {
        SheetSelector::ByName(name)
    }
}

impl<T: Into<SheetSelector>> From<Option<T>> for SheetSelector {
    fn from(selector: Option<T>) -> Self {
        selector.map_or(SheetSelector::All, Into::into)
    }
}

/// Interpret a dynamically typed selector: `null` selects all sheets, a
/// non-negative integer selects by position and a string by name.
impl TryFrom<&serde_json::Value> for SheetSelector {
    type Error = Error;

    fn try_from(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Null => Ok(SheetSelector::All),
            serde_json::Value::String(name) => Ok(SheetSelector::ByName(name.clone())),
            serde_json::Value::Number(n) => n
                .as_u64()
                .and_then(|i| usize::try_from(i).ok())
                .map(SheetSelector::ByIndex)
                .ok_or_else(|| Error::InvalidSelector(n.to_string())),
            other => Err(Error::InvalidSelector(other.to_string())),
        }
    }
}

impl SheetSelector {
    /// Pick the matching entries from a sheet map.
    ///
    /// An index past the end or an unknown name selects nothing.
    pub fn select<'a>(&self, sheets: &'a [SheetMapEntry]) -> Vec<&'a SheetMapEntry> {
        match self {
            SheetSelector::All => sheets.iter().collect(),
            SheetSelector::ByIndex(index) => sheets.get(*index).into_iter().collect(),
            SheetSelector::ByName(name) => sheets.iter().filter(|s| &s.name == name).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entries() -> Vec<SheetMapEntry> {
        ["Contacts", "Products"]
            .iter()
            .enumerate()
            .map(|(i, name)| SheetMapEntry {
                id: (i + 1).to_string(),
                name: name.to_string(),
                path: format!("xl/worksheets/sheet{}.xml", i + 1),
            })
            .collect()
    }

    #[test]
    fn test_select() {
        let sheets = entries();
        assert_eq!(SheetSelector::All.select(&sheets).len(), 2);
        assert_eq!(SheetSelector::ByIndex(1).select(&sheets)[0].name, "Products");
        assert!(SheetSelector::ByIndex(2).select(&sheets).is_empty());
        assert_eq!(SheetSelector::from("Contacts").select(&sheets)[0].id, "1");
        assert!(SheetSelector::from("Missing").select(&sheets).is_empty());
    }

    #[test]
    fn test_selector_from_json() {
        assert_eq!(SheetSelector::try_from(&json!(null)).unwrap(), SheetSelector::All);
        assert_eq!(
            SheetSelector::try_from(&json!(3)).unwrap(),
            SheetSelector::ByIndex(3)
        );
        assert_eq!(
            SheetSelector::try_from(&json!("Contacts")).unwrap(),
            SheetSelector::ByName("Contacts".to_string())
        );
        assert!(matches!(
            SheetSelector::try_from(&json!(-1)),
            Err(Error::InvalidSelector(_))
        ));
        assert!(matches!(
            SheetSelector::try_from(&json!(1.5)),
            Err(Error::InvalidSelector(_))
        ));
        assert!(matches!(
            SheetSelector::try_from(&json!([0])),
            Err(Error::InvalidSelector(_))
        ));
    }

    #[test]
    fn test_selector_from_option() {
        assert_eq!(SheetSelector::from(None::<usize>), SheetSelector::All);
        assert_eq!(SheetSelector::from(Some(0usize)), SheetSelector::ByIndex(0));
    }

    #[test]
    fn test_serialize_untagged() {
        let rows = SheetData::Rows(vec![vec!["a".to_string()]]);
        assert_eq!(serde_json::to_string(&rows).unwrap(), r#"[["a"]]"#);

        let mut record = Record::new();
        record.insert("Name".to_string(), "John".to_string());
        record.insert("Age".to_string(), "31".to_string());
        let records = SheetData::Records(vec![record]);
        assert_eq!(
            serde_json::to_string(&records).unwrap(),
            r#"[{"Name":"John","Age":"31"}]"#
        );
    }
}
