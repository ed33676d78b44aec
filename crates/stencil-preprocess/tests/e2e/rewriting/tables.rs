//! Table and autofilter ranges

use pretty_assertions::assert_eq;

use crate::{inline_cell, part_xml, row, sheet_xml, Template, TABLE_REL_TYPE};

const SHEET_RELS: &str = "xl/worksheets/_rels/sheet1.xml.rels";
const TABLE: &str = r#"<table id="1" ref="A1:C5"><autoFilter ref="A1:C5"/></table>"#;

fn sheet_rels(relationships: &[(&str, &str)]) -> String {
    let entries: String = relationships
        .iter()
        .enumerate()
        .map(|(i, (rel_type, target))| {
            format!(r#"<Relationship Id="rId{}" Type="{rel_type}" Target="{target}"/>"#, i + 1)
        })
        .collect();
    format!(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{entries}</Relationships>"#
    )
}

fn sheet_body() -> String {
    format!("<sheetData>{}</sheetData>", row(1, &inline_cell("A1", "Id")))
}

#[test]
fn test_tables_get_range_placeholders() {
    let rels = sheet_rels(&[
        (TABLE_REL_TYPE, "../tables/table1.xml"),
        (TABLE_REL_TYPE, "/xl/tables/table2.xml"),
    ]);
    let (package, report) = Template::new()
        .sheet(&sheet_body())
        .part(SHEET_RELS, &rels)
        .part("xl/tables/table1.xml", TABLE)
        .part("xl/tables/table2.xml", r#"<table id="2" ref="E1:F3"/>"#)
        .preprocess();

    assert!(sheet_xml(&package, 1).contains(concat!(
        "<tablesUpdated>",
        r#"<tableUpdated file="xl/tables/table1.xml" ref="{{xlsxSData type='newCellRef' originalCellRef='A1:C5'}}">"#,
        r#"<autoFilterRef ref="{{xlsxSData type='newCellRef' originalCellRef='A1:C5'}}"/>"#,
        "</tableUpdated>",
        r#"<tableUpdated file="xl/tables/table2.xml" ref="{{xlsxSData type='newCellRef' originalCellRef='E1:F3'}}"/>"#,
        "</tablesUpdated></sheetData>"
    )));
    // table parts are left to the expansion engine
    assert_eq!(part_xml(&package, "xl/tables/table1.xml"), TABLE);
    assert_eq!(report.tables, 2);
}

#[test]
fn test_other_relationships_are_ignored() {
    let rels = sheet_rels(&[(
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing",
        "../drawings/drawing1.xml",
    )]);
    let (package, report) = Template::new()
        .sheet(&sheet_body())
        .part(SHEET_RELS, &rels)
        .preprocess();

    assert!(!sheet_xml(&package, 1).contains("tablesUpdated"));
    assert_eq!(report.tables, 0);
}
