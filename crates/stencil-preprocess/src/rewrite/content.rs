//! Cell content decomposition

use stencil_xlsx::{Document, NodeId};

use crate::cell::CellInfo;
use crate::directive::{self, classify_content, CellContent, DETECT_CONTENT_ATTR, WRAPPER_TAG};

/// Replace the content node of a templated cell with the facets the
/// expansion engine evaluates:
///
/// ```xml
/// <info>
///   <xlsxRemove>{{#xlsxSData type='cellValue'}}</xlsxRemove>
///   <raw>{{#xlsxSData type='cellValueRaw' }}TEXT{{/xlsxSData}}</raw>
///   <type>{{xlsxSData type='cellValueType' }}</type>
///   <content>{{xlsxSData type='cellContent' }}</content>
///   <xlsxRemove>{{/xlsxSData}}</xlsxRemove>
/// </info>
/// ```
///
/// Text that is exactly one expression passes it as `value` instead of
/// carrying a `raw` facet.
pub(super) fn decompose(doc: &mut Document, cell: NodeId, info: &CellInfo, text: &str) {
    doc.set_attribute(cell, DETECT_CONTENT_ATTR, "true");

    let single = match classify_content(text) {
        CellContent::Single(expression) => Some(expression),
        CellContent::Mixed => None,
    };

    let facets = doc.create_element("info");
    let open = doc.create_text_element(WRAPPER_TAG, directive::cell_value_open(single));
    doc.append_child(facets, open);

    if single.is_none() {
        let raw = doc.create_text_element("raw", directive::cell_value_raw(text));
        doc.append_child(facets, raw);
    }

    let value_type = doc.create_text_element("type", directive::cell_value_type());
    doc.append_child(facets, value_type);
    let content = doc.create_text_element("content", directive::cell_content());
    doc.append_child(facets, content);
    let close = doc.create_text_element(WRAPPER_TAG, directive::CLOSE);
    doc.append_child(facets, close);

    doc.replace(info.content, facets);
}
