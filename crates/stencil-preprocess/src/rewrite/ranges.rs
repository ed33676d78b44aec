//! Merge, dimension and table ranges

use stencil_core::CellRange;
use stencil_xlsx::path::{rels_for_part, resolve_target};
use stencil_xlsx::{Document, NodeId};
use tracing::{debug, warn};

use super::{wrap, SheetContext};
use crate::directive::{self, FIRST_ONLY_CLOSE, FIRST_ONLY_OPEN};
use crate::error::{PreprocessError, PreprocessResult};
use crate::loops::LoopSpan;
use crate::sheet::{relationships, TABLE_REL_TYPE};

/// `ref` of every `mergeCell` under the sheet's `mergeCells`
pub(super) fn merge_ranges(doc: &Document) -> Vec<String> {
    let Some(merge_cells) = doc.first_descendant_named(doc.root(), "mergeCells") else {
        return Vec::new();
    };
    doc.descendants_named(merge_cells, "mergeCell")
        .into_iter()
        .filter_map(|merge| doc.attribute(merge, "ref").map(str::to_string))
        .collect()
}

/// Append `<mergeCellUpdated><mergeCell ref="..."/></mergeCellUpdated>` to
/// the row. On a loop row, a merge outside the loop is emitted for the first
/// iteration only.
pub(super) fn append_merge(
    doc: &mut Document,
    row: NodeId,
    range: &str,
    span: Option<&LoopSpan>,
) -> PreprocessResult<()> {
    let from_loop = match span {
        Some(span) => span.owns(&CellRange::parse(range)?.start),
        None => false,
    };

    let wrapper = doc.create_element("mergeCellUpdated");
    let merge = doc.create_element("mergeCell");
    doc.set_attribute(merge, "ref", directive::merge_cell(range, from_loop));
    doc.append_child(wrapper, merge);
    doc.append_child(row, wrapper);

    if span.is_some() && !from_loop {
        wrap(doc, wrapper, FIRST_ONLY_OPEN, FIRST_ONLY_CLOSE);
    }
    Ok(())
}

/// Append `<dimensionUpdated>` keeping the top-left corner of the
/// original dimension
pub(super) fn append_dimension(doc: &mut Document, sheet_data: NodeId) {
    let Some(dimension) = doc.first_descendant_named(doc.root(), "dimension") else {
        return;
    };
    let start = match doc.attribute(dimension, "ref") {
        Some(range) => range.split(':').next().unwrap_or(range).to_string(),
        None => {
            warn!("dimension without ref, assuming A1");
            "A1".to_string()
        }
    };

    let updated = doc.create_element("dimensionUpdated");
    doc.set_attribute(updated, "ref", directive::dimension(&start));
    doc.append_child(sheet_data, updated);
}

/// Append `<tablesUpdated>` for the tables linked from the worksheet's
/// relationship part; returns the number of tables
pub(super) fn append_tables(
    ctx: &SheetContext<'_>,
    path: &str,
    doc: &mut Document,
    sheet_data: NodeId,
) -> PreprocessResult<usize> {
    let Some(rels) = ctx.package.document(&rels_for_part(path)) else {
        return Ok(0);
    };
    let tables: Vec<_> = relationships(rels)
        .into_iter()
        .filter(|rel| rel.rel_type == TABLE_REL_TYPE)
        .collect();
    if tables.is_empty() {
        return Ok(0);
    }

    let updated = doc.create_element("tablesUpdated");
    for rel in &tables {
        let table_path = resolve_target(path, &rel.target);
        let table = ctx
            .package
            .document(&table_path)
            .ok_or_else(|| PreprocessError::TableNotFound {
                path: table_path.clone(),
                sheet: path.to_string(),
            })?;
        debug!(table = %table_path, "rewriting table ranges");

        let table_ref = table
            .document_element()
            .and_then(|el| table.attribute(el, "ref"))
            .unwrap_or_default();

        let table_updated = doc.create_element("tableUpdated");
        doc.set_attribute(table_updated, "file", table_path.as_str());
        doc.set_attribute(table_updated, "ref", directive::new_cell_ref(table_ref));

        if let Some(auto_filter) = table.first_descendant_named(table.root(), "autoFilter") {
            let filter_ref = table.attribute(auto_filter, "ref").unwrap_or_default();
            let auto_filter_ref = doc.create_element("autoFilterRef");
            doc.set_attribute(auto_filter_ref, "ref", directive::new_cell_ref(filter_ref));
            doc.append_child(table_updated, auto_filter_ref);
        }

        doc.append_child(updated, table_updated);
    }
    doc.append_child(sheet_data, updated);

    Ok(tables.len())
}
