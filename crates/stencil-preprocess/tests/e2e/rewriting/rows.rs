//! Rows, cell references, dimension and plain content

use pretty_assertions::assert_eq;
use stencil_preprocess::PreprocessOptions;

use crate::{cell_ref, inline_cell, mixed_info, row, sheet_xml, single_value_info, Template};

#[test]
fn test_plain_row_becomes_directives() {
    let body = format!(
        "<sheetData>{}</sheetData>",
        row(1, &format!("{}{}", inline_cell("A1", "Name"), r#"<c r="B1"><v>42</v></c>"#))
    );
    let (package, report) = Template::new().sheet(&body).preprocess();

    let expected = [
        "<worksheet>",
        "<xlsxRemove>{{#xlsxSData type='root'}}</xlsxRemove>",
        "<sheetData>",
        "<xlsxRemove>{{#xlsxSData type='row' originalRowNumber=1}}</xlsxRemove>",
        r#"<row r="{{xlsxSData type='rowNumber'}}">"#,
        &format!(r#"<c r="{}" t="inlineStr"><is><t>Name</t></is></c>"#, cell_ref("A1")),
        &format!(r#"<c r="{}"><v>42</v></c>"#, cell_ref("B1")),
        "</row>",
        "<xlsxRemove>{{/xlsxSData}}</xlsxRemove>",
        "<formulasUpdated><items>{{xlsxSData type='formulas'}}</items></formulasUpdated>",
        "</sheetData>",
        "<xlsxRemove>{{/xlsxSData}}</xlsxRemove>",
        "</worksheet>",
    ]
    .concat();
    assert_eq!(sheet_xml(&package, 1), expected);

    assert_eq!(report.worksheets, 1);
    assert_eq!(report.rows, 1);
    assert_eq!(report.cells, 2);
    assert_eq!(report.loops, 0);
}

#[test]
fn test_every_row_and_cell_is_rewritten() {
    let body = format!(
        "<sheetData>{}{}</sheetData>",
        row(1, &inline_cell("A1", "Header")),
        row(3, r#"<c r="A3" s="2"/><c r="C3" t="b"><v>1</v></c>"#)
    );
    let (package, report) = Template::new().sheet(&body).preprocess();
    let xml = sheet_xml(&package, 1);

    assert!(xml.contains("originalRowNumber=1}}"));
    assert!(xml.contains("originalRowNumber=3}}"));
    assert!(!xml.contains(r#"r="1""#));
    assert!(xml.contains(&format!(r#"<c r="{}" s="2"/>"#, cell_ref("A3"))));
    assert!(xml.contains(&format!(r#"<c r="{}" t="b"><v>1</v></c>"#, cell_ref("C3"))));
    assert_eq!(report.rows, 2);
    assert_eq!(report.cells, 3);
}

#[test]
fn test_empty_sheet_data_still_gets_placeholders() {
    let (package, report) = Template::new().sheet("<sheetData/>").preprocess();

    assert_eq!(
        sheet_xml(&package, 1),
        concat!(
            "<worksheet>",
            "<xlsxRemove>{{#xlsxSData type='root'}}</xlsxRemove>",
            "<sheetData><formulasUpdated><items>{{xlsxSData type='formulas'}}</items></formulasUpdated></sheetData>",
            "<xlsxRemove>{{/xlsxSData}}</xlsxRemove>",
            "</worksheet>"
        )
    );
    assert_eq!(report.worksheets, 1);
    assert_eq!(report.rows, 0);
}

#[test]
fn test_dimension_placeholder() {
    let body = format!(
        r#"<dimension ref="B2:D4"/><sheetData>{}</sheetData>"#,
        row(2, &inline_cell("B2", "x"))
    );
    let template = Template::new().sheet(&body);

    let (package, _) = template.preprocess();
    let xml = sheet_xml(&package, 1);
    assert!(xml.contains(r#"<dimension ref="B2:D4"/>"#));
    assert!(xml.contains(
        r#"<dimensionUpdated ref="B2:{{@meta.lastCellRef}}"/></sheetData>"#
    ));

    let options = PreprocessOptions {
        update_dimension: false,
        ..Default::default()
    };
    let (package, result) = template.try_preprocess(options);
    result.unwrap();
    assert!(!sheet_xml(&package, 1).contains("dimensionUpdated"));
}

#[test]
fn test_single_expression_cell() {
    let body = format!("<sheetData>{}</sheetData>", row(1, &inline_cell("A1", "{{name}}")));
    let (package, _) = Template::new().sheet(&body).preprocess();

    assert!(sheet_xml(&package, 1).contains(&format!(
        r#"<c r="{}" t="inlineStr" __detectCellContent__="true">{}</c>"#,
        cell_ref("A1"),
        single_value_info("name")
    )));
}

#[test]
fn test_mixed_content_cell() {
    let body = format!(
        "<sheetData>{}</sheetData>",
        row(1, &inline_cell("A1", "Total: {{total}} EUR"))
    );
    let (package, _) = Template::new().sheet(&body).preprocess();

    assert!(sheet_xml(&package, 1).contains(&format!(
        r#"<c r="{}" t="inlineStr" __detectCellContent__="true">{}</c>"#,
        cell_ref("A1"),
        mixed_info("Total: {{total}} EUR")
    )));
}

#[test]
fn test_text_without_directives_is_untouched() {
    let body = format!(
        "<sheetData>{}</sheetData>",
        row(1, &inline_cell("A1", "{ not a call }"))
    );
    let (package, _) = Template::new().sheet(&body).preprocess();
    let xml = sheet_xml(&package, 1);

    assert!(xml.contains("<is><t>{ not a call }</t></is>"));
    assert!(!xml.contains("__detectCellContent__"));
}

#[test]
fn test_every_worksheet_is_rewritten() {
    let first = format!("<sheetData>{}</sheetData>", row(1, &inline_cell("A1", "one")));
    let second = format!("<sheetData>{}</sheetData>", row(5, &inline_cell("E5", "two")));
    let (package, report) = Template::new().sheet(&first).sheet(&second).preprocess();

    assert_eq!(report.worksheets, 2);
    assert!(sheet_xml(&package, 1).contains(&cell_ref("A1")));
    assert!(sheet_xml(&package, 2).contains(&cell_ref("E5")));
}
