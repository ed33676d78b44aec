//! Per-row rewriting

use stencil_core::CellRef;
use stencil_xlsx::{Document, NodeId};
use tracing::debug;

use super::{close_after, content, formulas, open_before, ranges, wrap, SheetScope};
use crate::cell::{classify, CellInfo, CellKind, ValueLocation};
use crate::directive::{self, FIRST_ONLY_CLOSE, FIRST_ONLY_OPEN};
use crate::error::{PreprocessError, PreprocessResult};
use crate::loops::{LoopBoundary, LoopDetector, LoopMarkers, LoopSpan};
use crate::pass::PassReport;
use crate::shared_strings::SharedStringCleanup;

/// A formula cell queued until the rest of the row is rewritten
pub(super) struct QueuedFormula {
    /// Reference as written in the source
    pub original: String,
    pub reference: CellRef,
    pub info: CellInfo,
}

/// Row wrapper markers placed around the `<row>` element
struct RowMarkers {
    open: NodeId,
    close: NodeId,
}

pub(super) fn rewrite_row(
    scope: &SheetScope<'_>,
    doc: &mut Document,
    row: NodeId,
    cleanup: &mut SharedStringCleanup,
    report: &mut PassReport,
) -> PreprocessResult<()> {
    let row_number = parse_row_number(scope.path, doc.attribute(row, "r"))?;

    let (open, close) = wrap(doc, row, &directive::row_open(row_number), directive::CLOSE);
    let markers = RowMarkers { open, close };
    doc.set_attribute(row, "r", directive::row_number());

    let cells = doc.children_named(row, "c");
    let mut detector = LoopDetector::new(scope.ctx.markers, scope.path, row_number);
    let mut content_cells = Vec::new();
    let mut formula_cells = Vec::new();
    let mut merge_ranges = Vec::new();
    let mut calc_entries = Vec::new();

    for &cell in &cells {
        let original = doc
            .attribute(cell, "r")
            .map(str::to_string)
            .ok_or_else(|| missing_cell_reference(row_number))?;
        let reference = CellRef::parse(&original)?;
        doc.set_attribute(cell, "r", directive::cell_ref(&original));

        if let Some(entry) = scope.ctx.calc_chain.find(&scope.sheet.id, &original) {
            calc_entries.push((cell, entry, original.clone()));
        }

        if let Some(info) = classify(doc, cell, &original, scope.ctx.strings)? {
            match info.kind {
                kind if kind.is_string() => {
                    detector.feed(cell, reference, &info)?;
                    if info.text.contains("{{") && info.text.contains("}}") {
                        content_cells.push((cell, info));
                    }
                }
                CellKind::FormulaAsString => {
                    if info.recovered_from_error {
                        doc.set_attribute(cell, "t", "str");
                    }
                    formula_cells.push(QueuedFormula {
                        original: original.clone(),
                        reference,
                        info,
                    });
                }
                _ => {}
            }
        }

        if let Some(range) = scope.merges.iter().find(|range| is_anchored_at(range, &original)) {
            merge_ranges.push(range.as_str());
        }
        report.cells += 1;
    }

    let span = detector.finish()?;
    if let Some(span) = &span {
        apply_loop(scope.ctx.markers, doc, &cells, span, &markers, row_number, cleanup);
        report.loops += 1;
    }

    for (cell, info) in content_cells {
        let text = boundary_free_text(scope.ctx.markers, cell, &info, span.as_ref());
        content::decompose(doc, cell, &info, &text);
    }

    for range in merge_ranges {
        ranges::append_merge(doc, row, range, span.as_ref())?;
        report.merge_cells += 1;
    }

    for (cell, entry, original) in calc_entries {
        scope.ctx.calc_chain.copy_into(doc, cell, entry, &original);
        report.calc_chain_cells += 1;
    }

    for queued in &formula_cells {
        formulas::rewrite_formula(doc, queued, span.as_ref());
        report.formulas += 1;
    }

    report.rows += 1;
    Ok(())
}

fn parse_row_number(path: &str, raw: Option<&str>) -> PreprocessResult<u32> {
    raw.and_then(|r| r.parse::<u32>().ok())
        .filter(|&number| number > 0)
        .ok_or_else(|| PreprocessError::MalformedRow {
            path: path.to_string(),
            row: raw.map(str::to_string),
        })
}

fn missing_cell_reference(row: u32) -> PreprocessError {
    PreprocessError::MalformedReference(stencil_core::Error::InvalidReference {
        reference: format!("<cell without r in row {row}>"),
        reason: "missing cell reference",
    })
}

/// A merge range is queued on the cell at its top-left corner
fn is_anchored_at(range: &str, cell: &str) -> bool {
    range
        .strip_prefix(cell)
        .map_or(false, |rest| rest.starts_with(':'))
}

/// Strip the loop markers, guard static siblings and wrap the row in the
/// loop directive
fn apply_loop(
    markers: &LoopMarkers,
    doc: &mut Document,
    cells: &[NodeId],
    span: &LoopSpan,
    row: &RowMarkers,
    row_number: u32,
    cleanup: &mut SharedStringCleanup,
) {
    debug!(
        row = row_number,
        start = %span.start.reference,
        end = %span.end.reference,
        expression = %span.expression,
        "wrapping loop row"
    );

    strip_boundary(doc, &span.start, |text| markers.strip_open(text), cleanup);
    strip_boundary(doc, &span.end, LoopMarkers::strip_close, cleanup);

    let before_start = doc.previous_element_sibling(span.start.cell);
    let after_end = doc.next_element_sibling(span.end.cell);

    if let (Some(last_static), Some(&first)) = (before_start, cells.first()) {
        open_before(doc, first, FIRST_ONLY_OPEN);
        close_after(doc, last_static, FIRST_ONLY_CLOSE);
    }
    if let (Some(first_static), Some(&last)) = (after_end, cells.last()) {
        open_before(doc, first_static, FIRST_ONLY_OPEN);
        close_after(doc, last, FIRST_ONLY_CLOSE);
    }

    open_before(doc, row.open, &directive::loop_open(&span.expression, row_number));
    close_after(doc, row.close, directive::CLOSE);
}

/// Remove a marker from a boundary cell. Shared-string entries are blanked
/// whole once every sheet is done; inline text is edited directly.
fn strip_boundary(
    doc: &mut Document,
    boundary: &LoopBoundary,
    strip: impl Fn(&str) -> String,
    cleanup: &mut SharedStringCleanup,
) {
    match boundary.info.value {
        ValueLocation::SharedString { index, .. } => cleanup.schedule(index),
        ValueLocation::Sheet(node) => {
            let text = strip(&doc.text(node));
            doc.set_text(node, text);
        }
    }
}

/// Cell text as the expansion engine should see it, without loop markers
fn boundary_free_text(
    markers: &LoopMarkers,
    cell: NodeId,
    info: &CellInfo,
    span: Option<&LoopSpan>,
) -> String {
    match span {
        Some(span) if span.start.cell == cell => markers.strip_open(&info.text),
        Some(span) if span.end.cell == cell => LoopMarkers::strip_close(&info.text),
        _ => info.text.clone(),
    }
}
