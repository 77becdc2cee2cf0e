//! Worksheet part parsing.

use super::shared_strings::{rich_text, SharedStrings};
use crate::cellref::{column_letters_to_number, split_cell_reference, MAX_COLUMN};
use crate::error::Result;
use crate::model::{Record, SheetData};
use crate::options::{GapPolicy, ReadOptions};
use crate::xml::{Element, SPREADSHEETML};
use std::collections::BTreeMap;

/// Parse a worksheet part into sheet data.
///
/// With `use_first_row_as_keys`, the first non-empty row becomes the keys
/// and every later row becomes a [`Record`]: missing trailing values are
/// empty strings and values beyond the last key are dropped.
pub fn parse_sheet_data(
    xml: &str,
    shared_strings: &SharedStrings,
    options: &ReadOptions,
) -> Result<SheetData> {
    let rows = parse_rows(xml, shared_strings, options.gap_policy)?;

    if options.use_first_row_as_keys {
        Ok(SheetData::Records(rows_to_records(rows)))
    } else {
        Ok(SheetData::Rows(rows))
    }
}

/// Parse the `<sheetData>` rows of a worksheet part in document order.
pub fn parse_rows(
    xml: &str,
    shared_strings: &SharedStrings,
    gap_policy: GapPolicy,
) -> Result<Vec<Vec<String>>> {
    let root = Element::parse(xml)?;
    let Some(sheet_data) = root.child(SPREADSHEETML, "sheetData") else {
        return Ok(Vec::new());
    };

    let rows = sheet_data
        .children(SPREADSHEETML, "row")
        .map(|row| {
            let cells = row_cells(row, shared_strings);
            match gap_policy {
                GapPolicy::Compact => cells.into_values().collect(),
                GapPolicy::Fill => fill_gaps(cells),
            }
        })
        .collect();

    Ok(rows)
}

/// Cells of one row keyed by zero-based column. A later cell with the same
/// column replaces an earlier one.
fn row_cells(row: &Element, shared_strings: &SharedStrings) -> BTreeMap<usize, String> {
    let mut cells = BTreeMap::new();
    let mut next_column = 0;

    for cell in row.children(SPREADSHEETML, "c") {
        let column = cell
            .attr("r")
            .and_then(reference_column)
            .unwrap_or(next_column);
        next_column = column + 1;

        cells.insert(column, cell_value(cell, shared_strings));
    }

    cells
}

/// Column of a cell reference, or `None` when it has no letters or lies
/// beyond the last worksheet column.
fn reference_column(reference: &str) -> Option<usize> {
    let (letters, _) = split_cell_reference(reference);
    if letters.is_empty() {
        return None;
    }

    match column_letters_to_number(&letters) {
        Some(column) if column <= MAX_COLUMN => Some(column),
        _ => {
            log::warn!("cell reference {:?} is out of range, using position", reference);
            None
        }
    }
}

fn fill_gaps(cells: BTreeMap<usize, String>) -> Vec<String> {
    let width = cells.keys().next_back().map_or(0, |last| last + 1);
    let mut values = vec![String::new(); width];
    for (column, value) in cells {
        values[column] = value;
    }
    values
}

/// Text value of a `<c>` element according to its `t` attribute.
fn cell_value(cell: &Element, shared_strings: &SharedStrings) -> String {
    let raw = || {
        cell.child(SPREADSHEETML, "v")
            .map(Element::text)
            .unwrap_or_default()
    };

    match cell.attr("t") {
        Some("s") => {
            let raw = raw();
            match raw.trim().parse::<usize>() {
                Ok(index) => shared_strings.get(index).unwrap_or_default().to_string(),
                Err(_) => {
                    log::warn!("shared string index {:?} is not a number", raw);
                    String::new()
                }
            }
        }
        Some("inlineStr") => cell
            .child(SPREADSHEETML, "is")
            .map(rich_text)
            .unwrap_or_default(),
        _ => raw(),
    }
}

/// Combine rows with the first non-empty row as keys.
pub fn rows_to_records(rows: Vec<Vec<String>>) -> Vec<Record> {
    let mut rows = rows.into_iter().skip_while(Vec::is_empty);
    let Some(keys) = rows.next() else {
        return Vec::new();
    };

    rows.map(|values| {
        if values.len() > keys.len() {
            log::warn!(
                "row has {} values but the header has {} keys, dropping the rest",
                values.len(),
                keys.len()
            );
        }

        let mut values = values.into_iter();
        keys.iter()
            .map(|key| (key.clone(), values.next().unwrap_or_default()))
            .collect()
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(rows: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
            rows
        )
    }

    fn strings(values: &[&str]) -> SharedStrings {
        SharedStrings::from(values.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn test_cell_types() {
        let xml = sheet(
            r#"<row r="1">
                <c r="A1" t="s"><v>2</v></c>
                <c r="B1" t="inlineStr"><is><t>inline</t></is></c>
                <c r="C1"><v>42.5</v></c>
                <c r="D1" t="b"><v>1</v></c>
                <c r="E1" t="str"><f>A1</f><v>formula text</v></c>
            </row>"#,
        );
        let shared = strings(&["zero", "one", "two"]);

        let rows = parse_rows(&xml, &shared, GapPolicy::Compact).unwrap();
        assert_eq!(
            rows,
            vec![vec!["two", "inline", "42.5", "1", "formula text"]]
        );
    }

    #[test]
    fn test_shared_string_out_of_range() {
        let xml = sheet(r#"<row r="1"><c r="A1" t="s"><v>9</v></c><c r="B1" t="s"><v>x</v></c></row>"#);
        let rows = parse_rows(&xml, &strings(&["only"]), GapPolicy::Compact).unwrap();
        assert_eq!(rows, vec![vec!["", ""]]);
    }

    #[test]
    fn test_compaction() {
        let xml = sheet(
            r#"<row r="1"><c r="A1"><v>a</v></c><c r="C1"><v>c</v></c></row>
               <row r="2"><c r="B2"><v>b</v></c></row>"#,
        );

        let rows = parse_rows(&xml, &SharedStrings::default(), GapPolicy::Compact).unwrap();
        assert_eq!(rows, vec![vec!["a", "c"], vec!["b"]]);

        let rows = parse_rows(&xml, &SharedStrings::default(), GapPolicy::Fill).unwrap();
        assert_eq!(rows, vec![vec!["a", "", "c"], vec!["", "b"]]);
    }

    #[test]
    fn test_cells_sorted_by_column() {
        let xml = sheet(r#"<row r="1"><c r="AA1"><v>late</v></c><c r="B1"><v>early</v></c></row>"#);
        let rows = parse_rows(&xml, &SharedStrings::default(), GapPolicy::Compact).unwrap();
        assert_eq!(rows, vec![vec!["early", "late"]]);
    }

    #[test]
    fn test_cells_without_reference() {
        let xml = sheet(r#"<row><c><v>a</v></c><c r="C1"><v>c</v></c><c><v>d</v></c></row>"#);
        let rows = parse_rows(&xml, &SharedStrings::default(), GapPolicy::Fill).unwrap();
        assert_eq!(rows, vec![vec!["a", "", "c", "d"]]);
    }

    #[test]
    fn test_out_of_range_reference_uses_position() {
        let xml = sheet(
            r#"<row r="1"><c r="A1"><v>a</v></c><c r="ZZZZZZZ1"><v>far</v></c><c r="ZZZZZZZZZZZZZZZ1"><v>farther</v></c></row>
               <row r="2"><c r="XFD2"><v>last</v></c></row>"#,
        );

        let rows = parse_rows(&xml, &SharedStrings::default(), GapPolicy::Compact).unwrap();
        assert_eq!(rows[0], vec!["a", "far", "farther"]);
        assert_eq!(rows[1], vec!["last"]);

        let rows = parse_rows(&xml, &SharedStrings::default(), GapPolicy::Fill).unwrap();
        assert_eq!(rows[0], vec!["a", "far", "farther"]);
        assert_eq!(rows[1].len(), MAX_COLUMN + 1);
        assert_eq!(rows[1][MAX_COLUMN], "last");
    }

    #[test]
    fn test_empty_row_kept() {
        let xml = sheet(r#"<row r="1"/><row r="2"><c r="A2"><v>x</v></c></row>"#);
        let rows = parse_rows(&xml, &SharedStrings::default(), GapPolicy::Compact).unwrap();
        assert_eq!(rows, vec![vec![], vec!["x".to_string()]]);
    }

    #[test]
    fn test_no_sheet_data() {
        let xml = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"/>"#;
        let rows = parse_rows(xml, &SharedStrings::default(), GapPolicy::Compact).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_header_mode() {
        let xml = sheet(
            r#"<row r="1"><c r="A1" t="inlineStr"><is><t>Name</t></is></c><c r="B1" t="inlineStr"><is><t>Age</t></is></c></row>
               <row r="2"><c r="A2" t="inlineStr"><is><t>John</t></is></c><c r="B2" t="inlineStr"><is><t>31</t></is></c></row>"#,
        );
        let data = parse_sheet_data(
            &xml,
            &SharedStrings::default(),
            &ReadOptions::new().with_header(true),
        )
        .unwrap();

        let records = data.as_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["Name"], "John");
        assert_eq!(records[0]["Age"], "31");
        assert_eq!(
            records[0].keys().collect::<Vec<_>>(),
            vec!["Name", "Age"]
        );
    }

    #[test]
    fn test_records_length_mismatch() {
        let rows = vec![
            vec![],
            vec!["a".to_string(), "b".to_string()],
            vec!["1".to_string()],
            vec!["1".to_string(), "2".to_string(), "3".to_string()],
        ];
        let records = rows_to_records(rows);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["a"], "1");
        assert_eq!(records[0]["b"], "");
        assert_eq!(records[1].len(), 2);
        assert_eq!(records[1]["b"], "2");
    }

    #[test]
    fn test_records_header_only() {
        let records = rows_to_records(vec![vec!["a".to_string()]]);
        assert!(records.is_empty());
        assert!(rows_to_records(Vec::new()).is_empty());
    }
}
