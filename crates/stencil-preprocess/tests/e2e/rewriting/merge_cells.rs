//! Merged ranges

use pretty_assertions::assert_eq;

use crate::{inline_cell, row, sheet_xml, Template};

fn template() -> Template {
    let loop_row = row(
        2,
        &[
            inline_cell("A2", "Label"),
            inline_cell("B2", "{{#each items}}{{a}}"),
            inline_cell("C2", "{{b}}"),
            inline_cell("D2", "{{c}}{{/each}}"),
            inline_cell("F2", "Note"),
        ]
        .concat(),
    );
    let plain_row = row(5, &inline_cell("A5", "Merged"));
    let merges = r#"<mergeCells count="4"><mergeCell ref="B2:C2"/><mergeCell ref="F2:G2"/><mergeCell ref="A5:B5"/><mergeCell ref="H9:I9"/></mergeCells>"#;
    Template::new().sheet(&format!("<sheetData>{loop_row}{plain_row}</sheetData>{merges}"))
}

#[test]
fn test_merge_cells_placeholder() {
    let (package, _) = template().preprocess();
    let xml = sheet_xml(&package, 1);

    assert!(xml.contains(concat!(
        "<formulasUpdated><items>{{xlsxSData type='formulas'}}</items></formulasUpdated>",
        "<mergeCellsUpdated><items>{{xlsxSData type='mergeCells'}}</items></mergeCellsUpdated>",
        "</sheetData>"
    )));
    // the original merge list stays in place
    assert!(xml.contains(r#"<mergeCell ref="H9:I9"/></mergeCells></worksheet>"#));
}

#[test]
fn test_merges_on_loop_row() {
    let (package, _) = template().preprocess();

    assert!(sheet_xml(&package, 1).contains(concat!(
        r#"<mergeCellUpdated><mergeCell ref="{{xlsxSData type='mergeCell' originalCellRefRange='B2:C2' fromLoop=true}}"/></mergeCellUpdated>"#,
        "<xlsxRemove>{{#if @first}}</xlsxRemove>",
        r#"<mergeCellUpdated><mergeCell ref="{{xlsxSData type='mergeCell' originalCellRefRange='F2:G2'}}"/></mergeCellUpdated>"#,
        "<xlsxRemove>{{/if}}</xlsxRemove>",
        "</row>"
    )));
}

#[test]
fn test_merge_on_plain_row() {
    let (package, report) = template().preprocess();
    let xml = sheet_xml(&package, 1);

    assert!(xml.contains(concat!(
        r#"<mergeCellUpdated><mergeCell ref="{{xlsxSData type='mergeCell' originalCellRefRange='A5:B5'}}"/></mergeCellUpdated>"#,
        "</row>"
    )));
    // no cell anchors H9:I9
    assert!(!xml.contains("originalCellRefRange='H9:I9'"));
    assert_eq!(report.merge_cells, 3);
}

#[test]
fn test_sheet_without_merges_has_no_placeholder() {
    let body = format!("<sheetData>{}</sheetData>", row(1, &inline_cell("A1", "x")));
    let (package, report) = Template::new().sheet(&body).preprocess();

    assert!(!sheet_xml(&package, 1).contains("mergeCellsUpdated"));
    assert_eq!(report.merge_cells, 0);
}
