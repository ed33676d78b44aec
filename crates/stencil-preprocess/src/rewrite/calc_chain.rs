//! Calculation chain bookkeeping

use std::collections::HashMap;

use stencil_xlsx::{Document, NodeId};
use tracing::warn;

use crate::directive;

/// Record the current `r` of every calc-chain entry in `oldR`, before any
/// worksheet is rewritten. Returns the number of entries stamped.
pub fn stamp_original_refs(doc: &mut Document) -> usize {
    let mut stamped = 0;
    for entry in doc.descendants_named(doc.root(), "c") {
        if let Some(reference) = doc.attribute(entry, "r").map(str::to_string) {
            doc.set_attribute(entry, "oldR", reference);
            stamped += 1;
        }
    }
    stamped
}

/// Calc-chain entries keyed by sheet id and original reference
///
/// An entry without `i` belongs to the same sheet as the entry before it.
#[derive(Debug, Default)]
pub struct CalcChainIndex<'a> {
    doc: Option<&'a Document>,
    entries: HashMap<String, HashMap<String, NodeId>>,
}

impl<'a> CalcChainIndex<'a> {
    pub fn new(doc: Option<&'a Document>) -> Self {
        let mut entries: HashMap<String, HashMap<String, NodeId>> = HashMap::new();

        if let Some(chain) = doc {
            let mut sheet_id: Option<&str> = None;
            for entry in chain.descendants_named(chain.root(), "c") {
                if let Some(id) = chain.attribute(entry, "i") {
                    sheet_id = Some(id);
                }
                let (Some(sheet), Some(reference)) = (sheet_id, chain.attribute(entry, "r")) else {
                    warn!("skipping calc chain entry without sheet id or reference");
                    continue;
                };
                entries
                    .entry(sheet.to_string())
                    .or_default()
                    .entry(reference.to_string())
                    .or_insert(entry);
            }
        }

        Self { doc, entries }
    }

    /// Number of indexed entries
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find(&self, sheet_id: &str, reference: &str) -> Option<NodeId> {
        self.entries.get(sheet_id)?.get(reference).copied()
    }

    /// Copy a chain entry into the cell it describes, as the cell's first
    /// child: `<calcChainCellUpdated><c r="{{...}}" oldR="B7"/></calcChainCellUpdated>`
    pub fn copy_into(&self, doc: &mut Document, cell: NodeId, entry: NodeId, original: &str) {
        let Some(chain) = self.doc else {
            return;
        };
        let copy = doc.import(chain, entry);
        doc.set_attribute(copy, "r", directive::cell_ref(original));
        doc.set_attribute(copy, "oldR", original);

        let wrapper = doc.create_element("calcChainCellUpdated");
        doc.append_child(wrapper, copy);
        doc.prepend_child(cell, wrapper);
    }
}
