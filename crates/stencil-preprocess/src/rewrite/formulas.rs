//! Formula cell rewriting

use stencil_xlsx::Document;
use tracing::debug;

use super::row::QueuedFormula;
use crate::cell::ValueLocation;
use crate::directive;
use crate::loops::LoopSpan;

/// Replace the formula text with the formula directive and move the `f`
/// element into a `<formulaUpdated>` wrapper at its original position
pub(super) fn rewrite_formula(doc: &mut Document, queued: &QueuedFormula, span: Option<&LoopSpan>) {
    let ValueLocation::Sheet(formula) = queued.info.value else {
        return;
    };
    let from_loop = span.map_or(false, |span| span.owns(&queued.reference));
    debug!(cell = %queued.original, from_loop, "rewriting formula");

    doc.set_attribute(formula, "formulaIndex", directive::formula_index());
    doc.set_text(
        formula,
        directive::formula(&queued.original, &queued.info.text, from_loop),
    );

    let wrapper = doc.create_element("formulaUpdated");
    doc.replace(formula, wrapper);
    doc.append_child(wrapper, formula);
}
