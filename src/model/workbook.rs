//! Write-side workbook model.

use serde::{Deserialize, Serialize};

/// A named sheet of text rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    /// Sheet name as shown on the tab
    pub name: String,

    /// Rows of cell values, first row first
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Create a sheet from anything that yields rows of string-like values.
    pub fn new<R, C>(name: impl Into<String>, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            name: name.into(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }
}

/// An ordered collection of sheets to be written as one package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workbook {
    /// Sheets in tab order
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Create an empty workbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sheet.
    pub fn add_sheet(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    /// Append a sheet, builder style.
    pub fn with_sheet(mut self, sheet: Sheet) -> Self {
        self.add_sheet(sheet);
        self
    }

    /// Sheet names in tab order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Number of sheets.
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    /// Check if the workbook has no sheets.
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_from_str_rows() {
        let sheet = Sheet::new("Contacts", [["Name", "Age"], ["John", "31"]]);
        assert_eq!(sheet.name, "Contacts");
        assert_eq!(sheet.rows[1], vec!["John".to_string(), "31".to_string()]);
    }

    #[test]
    fn test_workbook_order() {
        let workbook = Workbook::new()
            .with_sheet(Sheet::new("First", Vec::<Vec<String>>::new()))
            .with_sheet(Sheet::new("Second", Vec::<Vec<String>>::new()));

        assert_eq!(workbook.sheet_names(), vec!["First", "Second"]);
        assert_eq!(workbook.len(), 2);
    }
}
