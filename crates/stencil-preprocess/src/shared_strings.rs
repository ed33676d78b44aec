//! Shared-string table access and deferred cleanup

use std::collections::BTreeSet;

use stencil_xlsx::{Document, NodeId};
use tracing::debug;

/// Read view over the `si` entries of `xl/sharedStrings.xml`
#[derive(Debug, Clone)]
pub struct SharedStringTable<'a> {
    doc: Option<&'a Document>,
    entries: Vec<NodeId>,
}

impl<'a> SharedStringTable<'a> {
    pub fn new(doc: Option<&'a Document>) -> Self {
        let entries = doc
            .map(|doc| doc.descendants_named(doc.root(), "si"))
            .unwrap_or_default();
        Self { doc, entries }
    }

    /// A table with no entries, for packages without a shared-string part
    pub fn empty() -> Self {
        Self::new(None)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.entries.len()
    }

    /// The authoritative text node of an entry: its first `t` descendant.
    /// Styled entries wrap their text in `r/t` runs.
    pub fn text_node(&self, index: usize) -> Option<NodeId> {
        let doc = self.doc?;
        let entry = *self.entries.get(index)?;
        doc.first_descendant_named(entry, "t")
    }

    pub fn text(&self, index: usize) -> Option<String> {
        let doc = self.doc?;
        self.text_node(index).map(|node| doc.text(node))
    }
}

/// Shared-string entries to blank once every worksheet has been rewritten
///
/// Entries may be referenced from several sheets, so they are only blanked
/// after all sheets have read their original text.
#[derive(Debug, Clone, Default)]
pub struct SharedStringCleanup {
    indices: BTreeSet<usize>,
}

impl SharedStringCleanup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an entry for blanking; scheduling twice blanks once
    pub fn schedule(&mut self, index: usize) {
        self.indices.insert(index);
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// Empty the authoritative text of every scheduled entry.
    /// Returns the number of entries blanked.
    pub fn drain(self, doc: &mut Document) -> usize {
        let entries = doc.descendants_named(doc.root(), "si");
        let mut blanked = 0;
        for index in self.indices {
            let Some(&entry) = entries.get(index) else {
                continue;
            };
            if let Some(text) = doc.first_descendant_named(entry, "t") {
                debug!(index, "blanking shared string used as loop boundary");
                doc.set_text(text, "");
                blanked += 1;
            }
        }
        blanked
    }
}
