//! Minimal stylesheet for written packages.

/// The `xl/styles.xml` part.
///
/// One font, one fill, one border and one cell format: the least a package
/// needs for spreadsheet applications to open it without repair. Every cell
/// written by this crate uses style index `0`.
pub fn styles() -> String {
    String::from(concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        "\n",
        r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        r#"<fonts count="1"><font><sz val="11"/><color theme="1"/><name val="Calibri"/><family val="2"/></font></fonts>"#,
        r#"<fills count="1"><fill><patternFill patternType="none"/></fill></fills>"#,
        r#"<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>"#,
        r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#,
        r#"<cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs>"#,
        r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#,
        r#"<dxfs count="0"/>"#,
        r#"<tableStyles count="0" defaultTableStyle="TableStyleMedium9" defaultPivotStyle="PivotStyleLight16"/>"#,
        "</styleSheet>",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::{Element, SPREADSHEETML};

    #[test]
    fn test_styles_counts() {
        let root = Element::parse(&styles()).unwrap();
        assert!(root.is(SPREADSHEETML, "styleSheet"));

        for (list, item) in [
            ("fonts", "font"),
            ("fills", "fill"),
            ("borders", "border"),
            ("cellXfs", "xf"),
        ] {
            let list = root.child(SPREADSHEETML, list).unwrap();
            assert_eq!(list.attr("count"), Some("1"));
            assert_eq!(list.children(SPREADSHEETML, item).count(), 1);
        }
    }
}
