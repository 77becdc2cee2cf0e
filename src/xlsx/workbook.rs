//! Workbook part parsing and sheet map resolution.

use super::WORKBOOK_PART;
use crate::container::{Container, Relationships};
use crate::error::{Error, Result};
use crate::model::SheetMapEntry;
use crate::xml::{Element, OFFICE_RELATIONSHIPS, SPREADSHEETML};

/// A `<sheet>` declaration from `xl/workbook.xml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetInfo {
    /// `sheetId` attribute
    pub sheet_id: String,
    /// `name` attribute
    pub name: String,
    /// `r:id` attribute, resolved through the workbook relationships
    pub rel_id: String,
}

/// Read the `<sheets>/<sheet>` list of a workbook part in document order.
pub fn parse_sheet_list(xml: &str) -> Result<Vec<SheetInfo>> {
    let root = Element::parse(xml)?;
    if !root.is(SPREADSHEETML, "workbook") {
        return Err(Error::XmlParse(format!(
            "expected <workbook> root, found <{}>",
            root.name.local
        )));
    }

    let sheets = root
        .children(SPREADSHEETML, "sheets")
        .flat_map(|sheets| sheets.children(SPREADSHEETML, "sheet"))
        .map(|sheet| SheetInfo {
            sheet_id: sheet.attr("sheetId").unwrap_or_default().to_string(),
            name: sheet.attr("name").unwrap_or_default().to_string(),
            rel_id: sheet
                .attr_ns(OFFICE_RELATIONSHIPS, "id")
                .unwrap_or_default()
                .to_string(),
        })
        .collect();

    Ok(sheets)
}

/// Read the relationship id → target map of `xl/_rels/workbook.xml.rels`.
pub fn parse_relationship_map(xml: &str) -> Result<Relationships> {
    Relationships::parse(xml)
}

/// Join the sheet list with the workbook relationships.
///
/// Targets are resolved against `xl/workbook.xml`, so the usual relative
/// target `worksheets/sheet1.xml` becomes `xl/worksheets/sheet1.xml`.
pub fn resolve_sheet_map(
    sheets: &[SheetInfo],
    relationships: &Relationships,
) -> Result<Vec<SheetMapEntry>> {
    sheets
        .iter()
        .map(|sheet| {
            let target = relationships
                .target(&sheet.rel_id)
                .ok_or_else(|| Error::RelationshipNotFound(sheet.rel_id.clone()))?;

            Ok(SheetMapEntry {
                id: sheet.sheet_id.clone(),
                name: sheet.name.clone(),
                path: Container::resolve_path(WORKBOOK_PART, target),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKBOOK_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"
          xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <bookViews><workbookView/></bookViews>
  <sheets>
    <sheet name="Summary" sheetId="4" r:id="rId2"/>
    <sheet name="A &amp; B" sheetId="9" r:id="rId1"/>
  </sheets>
</workbook>"#;

    const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="/xl/worksheets/sheet2.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

    #[test]
    fn test_parse_sheet_list() {
        let sheets = parse_sheet_list(WORKBOOK_XML).unwrap();
        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[0].name, "Summary");
        assert_eq!(sheets[0].sheet_id, "4");
        assert_eq!(sheets[0].rel_id, "rId2");
        assert_eq!(sheets[1].name, "A & B");
    }

    #[test]
    fn test_other_relationship_prefix() {
        let xml = r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"
            xmlns:rel="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
            <sheets><sheet name="S" sheetId="1" rel:id="rId5"/></sheets></workbook>"#;
        let sheets = parse_sheet_list(xml).unwrap();
        assert_eq!(sheets[0].rel_id, "rId5");
    }

    #[test]
    fn test_wrong_root() {
        assert!(matches!(
            parse_sheet_list("<worksheet/>"),
            Err(Error::XmlParse(_))
        ));
    }

    #[test]
    fn test_resolve_sheet_map() {
        let sheets = parse_sheet_list(WORKBOOK_XML).unwrap();
        let rels = parse_relationship_map(RELS_XML).unwrap();
        let map = resolve_sheet_map(&sheets, &rels).unwrap();

        assert_eq!(
            map,
            vec![
                SheetMapEntry {
                    id: "4".to_string(),
                    name: "Summary".to_string(),
                    path: "xl/worksheets/sheet2.xml".to_string(),
                },
                SheetMapEntry {
                    id: "9".to_string(),
                    name: "A & B".to_string(),
                    path: "xl/worksheets/sheet1.xml".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_missing_relationship() {
        let sheets = vec![SheetInfo {
            sheet_id: "1".to_string(),
            name: "Orphan".to_string(),
            rel_id: "rId42".to_string(),
        }];
        let rels = parse_relationship_map(RELS_XML).unwrap();

        let err = resolve_sheet_map(&sheets, &rels).unwrap_err();
        assert!(matches!(err, Error::RelationshipNotFound(ref id) if id == "rId42"));
    }
}
