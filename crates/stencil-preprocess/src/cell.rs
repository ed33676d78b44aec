//! Cell value classification

use once_cell::sync::Lazy;
use regex::Regex;
use stencil_xlsx::{Document, NodeId};

use crate::error::{PreprocessError, PreprocessResult};
use crate::shared_strings::SharedStringTable;

/// Plain numeric literal as Excel stores it in an untyped cell
static NUMBER_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]+(\.[0-9]+)?(E-[0-9]+)?$").expect("number literal regex must compile")
});

/// Value kind of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Boolean,
    Date,
    Number,
    InlineString,
    SharedString,
    /// Formula stored as text (`t="str"`, or an untyped cell with `f`)
    FormulaAsString,
    /// Error literal without a formula
    FormulaError,
}

impl CellKind {
    /// Whether the cell text is template text that may carry directives
    pub fn is_string(self) -> bool {
        matches!(self, CellKind::InlineString | CellKind::SharedString)
    }
}

/// Where the literal value of a cell lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueLocation {
    /// A node of the worksheet document
    Sheet(NodeId),
    /// The authoritative `t` node of a shared-string entry
    SharedString { index: usize, node: NodeId },
}

/// Classification result of a cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellInfo {
    pub kind: CellKind,
    /// Literal text of the value
    pub text: String,
    pub value: ValueLocation,
    /// Child of the cell that holds the value and is replaced when the
    /// content is decomposed
    pub content: NodeId,
    /// `t="e"` cell whose formula was recovered
    pub recovered_from_error: bool,
}

impl CellInfo {
    fn sheet(kind: CellKind, doc: &Document, value: NodeId, content: NodeId) -> Self {
        Self {
            kind,
            text: doc.text(value),
            value: ValueLocation::Sheet(value),
            content,
            recovered_from_error: false,
        }
    }
}

/// Classify a cell element
///
/// Returns `None` for a cell without child nodes. `reference` is the
/// original cell reference, used for error reporting.
pub fn classify(
    doc: &Document,
    cell: NodeId,
    reference: &str,
    strings: &SharedStringTable<'_>,
) -> PreprocessResult<Option<CellInfo>> {
    if doc.children(cell).is_empty() {
        return Ok(None);
    }

    let info = match doc.attribute(cell, "t").filter(|t| !t.is_empty()) {
        Some(explicit) => classify_typed(doc, cell, explicit, strings)?,
        None => classify_untyped(doc, cell),
    };

    info.map(Some)
        .ok_or_else(|| PreprocessError::UnrecognizedCellValue {
            cell: reference.to_string(),
        })
}

fn classify_typed(
    doc: &Document,
    cell: NodeId,
    explicit: &str,
    strings: &SharedStringTable<'_>,
) -> PreprocessResult<Option<CellInfo>> {
    let info = match explicit {
        "b" | "d" | "n" => {
            let kind = match explicit {
                "b" => CellKind::Boolean,
                "d" => CellKind::Date,
                _ => CellKind::Number,
            };
            doc.child_element(cell, "v")
                .map(|v| CellInfo::sheet(kind, doc, v, v))
        }
        "inlineStr" => inline_string(doc, cell),
        "s" => shared_string(doc, cell, strings)?,
        "str" => doc
            .child_element(cell, "f")
            .map(|f| CellInfo::sheet(CellKind::FormulaAsString, doc, f, f)),
        "e" => match doc.child_element(cell, "f") {
            Some(f) => Some(CellInfo {
                recovered_from_error: true,
                ..CellInfo::sheet(CellKind::FormulaAsString, doc, f, f)
            }),
            None => doc
                .child_element(cell, "v")
                .map(|v| CellInfo::sheet(CellKind::FormulaError, doc, v, v)),
        },
        _ => None,
    };
    Ok(info)
}

fn classify_untyped(doc: &Document, cell: NodeId) -> Option<CellInfo> {
    if let Some(info) = inline_string(doc, cell) {
        return Some(info);
    }
    if let Some(f) = doc.child_element(cell, "f") {
        return Some(CellInfo::sheet(CellKind::FormulaAsString, doc, f, f));
    }
    doc.child_element(cell, "v")
        .filter(|&v| NUMBER_LITERAL.is_match(&doc.text(v)))
        .map(|v| CellInfo::sheet(CellKind::Number, doc, v, v))
}

fn inline_string(doc: &Document, cell: NodeId) -> Option<CellInfo> {
    let is = doc.child_element(cell, "is")?;
    let t = doc.child_element(is, "t")?;
    Some(CellInfo::sheet(CellKind::InlineString, doc, t, is))
}

fn shared_string(
    doc: &Document,
    cell: NodeId,
    strings: &SharedStringTable<'_>,
) -> PreprocessResult<Option<CellInfo>> {
    let v = doc.child_element(cell, "v");
    let raw = v.map(|v| doc.text(v)).unwrap_or_default();
    let index = raw
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|&index| strings.contains(index))
        .ok_or_else(|| PreprocessError::SharedStringIndex { index: raw.clone() })?;

    // A validated index implies a `v` child
    let Some(v) = v else {
        return Ok(None);
    };
    Ok(strings.text_node(index).map(|node| CellInfo {
        kind: CellKind::SharedString,
        text: strings.text(index).unwrap_or_default(),
        value: ValueLocation::SharedString { index, node },
        content: v,
        recovered_from_error: false,
    }))
}
