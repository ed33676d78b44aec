//! Loop markers stored in the shared-string table

use pretty_assertions::assert_eq;

use crate::{cell_ref, mixed_info, part_xml, row, shared_cell, sheet_xml, single_value_info, Template};

fn template() -> Template {
    let loop_row = row(
        3,
        &[shared_cell("A3", 0), shared_cell("B3", 1), shared_cell("C3", 2)].concat(),
    );
    // the second sheet reuses the loop-close entry outside any loop
    let reuse_row = row(1, &shared_cell("A1", 1));
    Template::new()
        .shared_strings(&["{{#each people}}{{name}}", "{{age}}{{/each}}", "Static"])
        .sheet(&format!("<sheetData>{loop_row}</sheetData>"))
        .sheet(&format!("<sheetData>{reuse_row}</sheetData>"))
}

#[test]
fn test_boundary_entries_are_blanked_after_the_pass() {
    let (package, report) = template().preprocess();

    assert_eq!(
        part_xml(&package, "xl/sharedStrings.xml"),
        "<sst><si><t/></si><si><t/></si><si><t>Static</t></si></sst>"
    );
    assert_eq!(report.blanked_shared_strings, 2);
    assert_eq!(report.loops, 1);
}

#[test]
fn test_boundary_cells_are_decomposed_without_markers() {
    let (package, _) = template().preprocess();
    let xml = sheet_xml(&package, 1);

    assert!(xml.contains("{{#xlsxSData people type='loop' start=3 }}"));
    assert!(xml.contains(&format!(
        r#"<c r="{}" t="s" __detectCellContent__="true">{}</c>"#,
        cell_ref("A3"),
        single_value_info("name")
    )));
    assert!(xml.contains(&format!(
        r#"<c r="{}" t="s" __detectCellContent__="true">{}</c>"#,
        cell_ref("B3"),
        single_value_info("age")
    )));
    // static shared cell after the loop keeps its index and is guarded
    assert!(xml.contains(&format!(
        r#"<xlsxRemove>{{{{#if @first}}}}</xlsxRemove><c r="{}" t="s"><v>2</v></c><xlsxRemove>{{{{/if}}}}</xlsxRemove>"#,
        cell_ref("C3")
    )));
}

#[test]
fn test_later_sheets_read_original_entry_text() {
    let (package, _) = template().preprocess();

    assert!(sheet_xml(&package, 2).contains(&format!(
        r#"<c r="{}" t="s" __detectCellContent__="true">{}</c>"#,
        cell_ref("A1"),
        mixed_info("{{age}}{{/each}}")
    )));
}

#[test]
fn test_styled_entry_keeps_other_runs() {
    let sst = r#"<sst><si><r><t>{{#each items}}{{a}}</t></r><r><t> bold</t></r></si><si><t>{{/each}}</t></si></sst>"#;
    let cells = [shared_cell("A1", 0), shared_cell("B1", 1)].concat();
    let (package, report) = Template::new()
        .sheet(&format!("<sheetData>{}</sheetData>", row(1, &cells)))
        .part("xl/sharedStrings.xml", sst)
        .preprocess();

    assert_eq!(report.blanked_shared_strings, 2);
    assert_eq!(
        part_xml(&package, "xl/sharedStrings.xml"),
        r#"<sst><si><r><t/></r><r><t> bold</t></r></si><si><t/></si></sst>"#
    );
}
