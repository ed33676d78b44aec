//! Worksheet rewriting
//!
//! Turns every coordinate-bearing attribute and value of a worksheet into a
//! directive call and tags loop spans, merge ranges, formulas and
//! calculation-chain entries so the expansion engine can recompute them.

mod calc_chain;
mod content;
mod formulas;
mod ranges;
mod row;

pub use calc_chain::{stamp_original_refs, CalcChainIndex};

use stencil_xlsx::{Document, NodeId, Package};
use tracing::debug;

use crate::directive::{self, WRAPPER_TAG};
use crate::error::{PreprocessError, PreprocessResult};
use crate::loops::LoopMarkers;
use crate::options::PreprocessOptions;
use crate::pass::PassReport;
use crate::shared_strings::{SharedStringCleanup, SharedStringTable};
use crate::sheet::{SheetInfo, WorkbookIndex};

/// Package-wide state shared by every worksheet rewrite
///
/// Borrows the package while the worksheet documents are detached from it,
/// so the other parts can be read while a sheet is mutated.
pub struct SheetContext<'a> {
    pub package: &'a Package,
    pub options: &'a PreprocessOptions,
    pub markers: &'a LoopMarkers,
    pub workbook: &'a WorkbookIndex,
    pub strings: &'a SharedStringTable<'a>,
    pub calc_chain: &'a CalcChainIndex<'a>,
}

/// One worksheet being rewritten
struct SheetScope<'a> {
    ctx: &'a SheetContext<'a>,
    path: &'a str,
    sheet: SheetInfo,
    /// `ref` of every `mergeCell` of the sheet
    merges: Vec<String>,
}

/// Rewrite one worksheet document in place
pub fn rewrite_worksheet(
    ctx: &SheetContext<'_>,
    path: &str,
    doc: &mut Document,
    cleanup: &mut SharedStringCleanup,
    report: &mut PassReport,
) -> PreprocessResult<()> {
    let sheet_data = doc
        .first_descendant_named(doc.root(), "sheetData")
        .ok_or_else(|| PreprocessError::SheetDataMissing {
            path: path.to_string(),
        })?;

    let sheet = ctx
        .workbook
        .resolve(path)
        .ok_or_else(|| PreprocessError::SheetInfoNotFound {
            path: path.to_string(),
        })?;
    debug!(path, sheet = %sheet.name, id = %sheet.id, "rewriting worksheet");

    wrap(doc, sheet_data, &directive::root_open(), directive::CLOSE);
    append_items(doc, sheet_data, "formulasUpdated", directive::formulas());

    let merges = ranges::merge_ranges(doc);
    if doc.first_descendant_named(doc.root(), "mergeCells").is_some() {
        append_items(doc, sheet_data, "mergeCellsUpdated", directive::merge_cells());
    }
    if ctx.options.update_dimension {
        ranges::append_dimension(doc, sheet_data);
    }
    report.tables += ranges::append_tables(ctx, path, doc, sheet_data)?;

    let scope = SheetScope {
        ctx,
        path,
        sheet,
        merges,
    };
    for row in doc.children_named(sheet_data, "row") {
        row::rewrite_row(&scope, doc, row, cleanup, report)?;
    }

    report.worksheets += 1;
    Ok(())
}

/// Insert `<xlsxRemove>text</xlsxRemove>` right before `node`
fn open_before(doc: &mut Document, node: NodeId, text: &str) -> NodeId {
    let marker = doc.create_text_element(WRAPPER_TAG, text);
    doc.insert_before(node, marker);
    marker
}

/// Insert `<xlsxRemove>text</xlsxRemove>` right after `node`
fn close_after(doc: &mut Document, node: NodeId, text: &str) -> NodeId {
    let marker = doc.create_text_element(WRAPPER_TAG, text);
    doc.insert_after(node, marker);
    marker
}

/// Surround a node with directive markers; returns the two marker nodes
fn wrap(doc: &mut Document, node: NodeId, open: &str, close: &str) -> (NodeId, NodeId) {
    (open_before(doc, node, open), close_after(doc, node, close))
}

/// Append `<name><items>text</items></name>` to `parent`
fn append_items(doc: &mut Document, parent: NodeId, name: &str, text: String) {
    let placeholder = doc.create_element(name);
    let items = doc.create_text_element("items", text);
    doc.append_child(placeholder, items);
    doc.append_child(parent, placeholder);
}
