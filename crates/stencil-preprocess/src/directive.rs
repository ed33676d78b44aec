//! Directive vocabulary shared with the expansion engine
//!
//! Every directive call the pass emits is spelled here and nowhere else.
//! The expansion engine recognizes exactly these calls, so the text must
//! stay stable.
//!
//! The module also holds the tokenizer that splits cell text on `{{ ... }}`
//! boundaries, used to tell a cell holding one whole expression apart from
//! a cell mixing literal text and calls.

/// Name of the helper that receives every coordinate directive
pub const HELPER: &str = "xlsxSData";

/// Element wrapping directive text placed between structural nodes; the
/// expansion engine unwraps it after rendering
pub const WRAPPER_TAG: &str = "xlsxRemove";

/// Closes any `{{#xlsxSData ...}}` block
pub const CLOSE: &str = "{{/xlsxSData}}";

/// Opens a block rendered only for the first loop iteration
pub const FIRST_ONLY_OPEN: &str = "{{#if @first}}";

/// Closes [`FIRST_ONLY_OPEN`]
pub const FIRST_ONLY_CLOSE: &str = "{{/if}}";

/// Prefix of a loop-open marker written by template authors
pub const LOOP_OPEN_PREFIX: &str = "{{#each";

/// Loop-close marker written by template authors
pub const LOOP_CLOSE: &str = "{{/each}}";

/// Attribute flagging a cell whose content was decomposed into facets
pub const DETECT_CONTENT_ATTR: &str = "__detectCellContent__";

pub fn root_open() -> String {
    format!("{{{{#{HELPER} type='root'}}}}")
}

pub fn formulas() -> String {
    format!("{{{{{HELPER} type='formulas'}}}}")
}

pub fn merge_cells() -> String {
    format!("{{{{{HELPER} type='mergeCells'}}}}")
}

/// New `ref` of the sheet dimension; the top-left corner never moves
pub fn dimension(start: &str) -> String {
    format!("{start}:{{{{@meta.lastCellRef}}}}")
}

pub fn row_open(original_row: u32) -> String {
    format!("{{{{#{HELPER} type='row' originalRowNumber={original_row}}}}}")
}

pub fn row_number() -> String {
    format!("{{{{{HELPER} type='rowNumber'}}}}")
}

pub fn cell_ref(original: &str) -> String {
    format!("{{{{{HELPER} type='cellRef' originalCellRef='{original}'}}}}")
}

/// New reference of a table or autofilter range
pub fn new_cell_ref(original: &str) -> String {
    format!("{{{{{HELPER} type='newCellRef' originalCellRef='{original}'}}}}")
}

/// Loop block around a row wrapper; `expression` is the text the template
/// author wrote after `#each`
pub fn loop_open(expression: &str, start_row: u32) -> String {
    format!("{{{{#{HELPER} {expression} type='loop' start={start_row} }}}}")
}

pub fn merge_cell(range: &str, from_loop: bool) -> String {
    let mut content = format!("type='mergeCell' originalCellRefRange='{range}'");
    if from_loop {
        content.push_str(" fromLoop=true");
    }
    format!("{{{{{HELPER} {content}}}}}")
}

/// Wraps `text` in single quotes, escaping backslashes and quotes
pub fn quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        if matches!(ch, '\'' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('\'');
    out
}

pub fn formula(cell: &str, formula: &str, from_loop: bool) -> String {
    let mut content = format!(
        "type='formula' originalCellRef='{cell}' originalFormula={}",
        quoted(formula)
    );
    if from_loop {
        content.push_str(" fromLoop=true");
    }
    format!("{{{{{HELPER} {content}}}}}")
}

pub fn formula_index() -> String {
    format!("{{{{{HELPER} type='formulaIndex'}}}}")
}

/// Opens the value facet. A cell holding a single expression passes it
/// as `value` so the engine keeps its type.
pub fn cell_value_open(value: Option<&str>) -> String {
    match value {
        Some(expression) if expression.contains(' ') => {
            format!("{{{{#{HELPER} type='cellValue' value=({expression})}}}}")
        }
        Some(expression) => format!("{{{{#{HELPER} type='cellValue' value={expression}}}}}"),
        None => format!("{{{{#{HELPER} type='cellValue'}}}}"),
    }
}

/// Raw capture of mixed literal/directive text
pub fn cell_value_raw(text: &str) -> String {
    format!("{{{{#{HELPER} type='cellValueRaw' }}}}{text}{CLOSE}")
}

pub fn cell_value_type() -> String {
    format!("{{{{{HELPER} type='cellValueType' }}}}")
}

pub fn cell_content() -> String {
    format!("{{{{{HELPER} type='cellContent' }}}}")
}

/// A piece of cell text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text outside any call
    Literal(&'a str),
    /// A `{{ ... }}` or `{{{ ... }}}` call
    Call(Call<'a>),
}

/// One directive call found in cell text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call<'a> {
    /// Full call text including braces
    pub raw: &'a str,
    /// Text between the braces
    pub body: &'a str,
    /// Written with triple braces
    pub triple: bool,
}

impl<'a> Call<'a> {
    /// Helper name of a block call (`{{#each items}}` -> `each`)
    pub fn block(&self) -> Option<&'a str> {
        let rest = self.body.strip_prefix('#')?;
        let name_len = rest
            .bytes()
            .take_while(|b| b.is_ascii_lowercase())
            .count();
        if name_len == 0 || rest.as_bytes().get(name_len) != Some(&b' ') {
            return None;
        }
        Some(&rest[..name_len])
    }

    /// A plain expression call: starts with a lowercase letter and has no
    /// line breaks or braces
    pub fn expression(&self) -> Option<&'a str> {
        let body = self.body;
        let starts_lower = body.bytes().next().map_or(false, |b| b.is_ascii_lowercase());
        let clean = !body.contains(['\n', '\r', '}']);
        (starts_lower && clean).then_some(body)
    }
}

/// Split text on `{{ ... }}` boundaries. A stray `}` right after the
/// closing braces belongs to the call. An unterminated `{{` and
/// everything after it is literal text.
pub fn tokenize(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut pos = 0;

    while let Some(offset) = text[pos..].find("{{") {
        let open = pos + offset;
        let triple = text[open + 2..].starts_with('{');
        let body_start = open + if triple { 3 } else { 2 };

        let Some(close_offset) = text[body_start..].find("}}") else {
            break;
        };
        let close = body_start + close_offset;
        let mut end = close + 2;
        if text[end..].starts_with('}') {
            end += 1;
        }

        if open > pos {
            segments.push(Segment::Literal(&text[pos..open]));
        }
        segments.push(Segment::Call(Call {
            raw: &text[open..end],
            body: &text[body_start..close],
            triple,
        }));
        pos = end;
    }

    if pos < text.len() {
        segments.push(Segment::Literal(&text[pos..]));
    }
    segments
}

/// How cell text is exposed to the expansion engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellContent<'a> {
    /// The whole text is one plain expression call
    Single(&'a str),
    /// Literal text and calls are interleaved
    Mixed,
}

pub fn classify_content(text: &str) -> CellContent<'_> {
    match tokenize(text).as_slice() {
        [Segment::Call(call)] if call.block().is_none() => match call.expression() {
            Some(expression) => CellContent::Single(expression),
            None => CellContent::Mixed,
        },
        _ => CellContent::Mixed,
    }
}
