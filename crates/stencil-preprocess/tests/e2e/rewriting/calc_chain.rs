//! Calculation chain entries and full recalculation

use pretty_assertions::assert_eq;

use crate::{cell_ref, part_xml, row, sheet_xml, Template};

fn template() -> Template {
    let cells = r#"<c r="D5"><f>SUM(A5:C5)</f><v>6</v></c><c r="E5"><f>D5*2</f><v>12</v></c><c r="F5"><v>1</v></c>"#;
    Template::new()
        .sheet_with_id(3, &format!("<sheetData>{}</sheetData>", row(5, cells)))
        .calc_chain(r#"<c r="D5" i="3"/><c r="E5"/><c r="F5" i="1"/>"#)
}

#[test]
fn test_chain_entries_keep_original_reference() {
    let (package, _) = template().preprocess();

    assert_eq!(
        part_xml(&package, "xl/calcChain.xml"),
        r#"<calcChain><c r="D5" i="3" oldR="D5"/><c r="E5" oldR="E5"/><c r="F5" i="1" oldR="F5"/></calcChain>"#
    );
}

#[test]
fn test_chain_entries_are_copied_into_their_cells() {
    let (package, report) = template().preprocess();
    let xml = sheet_xml(&package, 1);

    assert!(xml.contains(&format!(
        r#"<c r="{0}"><calcChainCellUpdated><c r="{0}" i="3" oldR="D5"/></calcChainCellUpdated><formulaUpdated>"#,
        cell_ref("D5")
    )));
    // inherits sheet id 3 from the entry before it
    assert!(xml.contains(&format!(
        r#"<c r="{0}"><calcChainCellUpdated><c r="{0}" oldR="E5"/></calcChainCellUpdated>"#,
        cell_ref("E5")
    )));
    // F5 of sheet 1 is not this sheet's entry
    assert!(xml.contains(&format!(r#"<c r="{}"><v>1</v></c>"#, cell_ref("F5"))));
    assert_eq!(report.calc_chain_cells, 2);
}

#[test]
fn test_workbook_forces_full_calc_on_load() {
    let (package, _) = template()
        .workbook_tail("<definedNames/><extLst/>")
        .preprocess();

    assert!(part_xml(&package, "xl/workbook.xml")
        .contains(r#"<definedNames/><calcPr fullCalcOnLoad="1"/><extLst/></workbook>"#));
}

#[test]
fn test_existing_calc_pr_is_updated() {
    let (package, _) = template()
        .workbook_tail(r#"<calcPr calcId="191029"/>"#)
        .preprocess();

    assert!(part_xml(&package, "xl/workbook.xml")
        .contains(r#"<calcPr calcId="191029" fullCalcOnLoad="1"/></workbook>"#));
}
