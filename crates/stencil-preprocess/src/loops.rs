//! Loop span detection
//!
//! A row holds at most one loop span. The span opens at the first string
//! cell carrying a `{{#each <expr>}}` marker without a `{{/each}}` in the
//! same text and closes at the next string cell carrying `{{/each}}`.

use std::ops::Range;

use regex::Regex;
use stencil_core::{CellRange, CellRef};
use stencil_xlsx::NodeId;
use tracing::debug;

use crate::cell::CellInfo;
use crate::directive::{LOOP_CLOSE, LOOP_OPEN_PREFIX};
use crate::error::{PreprocessError, PreprocessResult};

/// Bounded `{{#each <expr>}}` marker pattern
#[derive(Debug, Clone)]
pub struct LoopMarkers {
    open: Regex,
}

/// A matched open marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenMarker<'t> {
    /// Byte range of the whole marker in the cell text
    pub range: Range<usize>,
    /// Text between `#each ` and the closing braces
    pub expression: &'t str,
}

impl LoopMarkers {
    /// Build the marker pattern; the expression holds no braces and at most
    /// `max_expression_len` characters
    pub fn new(max_expression_len: usize) -> PreprocessResult<Self> {
        let pattern = format!(r"\{{\{{#each ([^{{}}]{{0,{max_expression_len}}})\}}\}}");
        Ok(Self {
            open: Regex::new(&pattern)?,
        })
    }

    /// First open marker in the text
    pub fn find_open<'t>(&self, text: &'t str) -> Option<OpenMarker<'t>> {
        let captures = self.open.captures(text)?;
        let whole = captures.get(0)?;
        let expression = captures.get(1)?;
        Some(OpenMarker {
            range: whole.range(),
            expression: expression.as_str(),
        })
    }

    /// Text with the first open marker removed
    pub fn strip_open(&self, text: &str) -> String {
        self.open.replacen(text, 1, "").into_owned()
    }

    /// Text with the first close marker removed
    pub fn strip_close(text: &str) -> String {
        text.replacen(LOOP_CLOSE, "", 1)
    }
}

/// One end of a loop span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopBoundary {
    pub cell: NodeId,
    pub reference: CellRef,
    pub info: CellInfo,
}

/// The repeated part of a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopSpan {
    pub start: LoopBoundary,
    pub end: LoopBoundary,
    /// Expression written after `#each`, kept verbatim
    pub expression: String,
}

impl LoopSpan {
    /// Whether a cell belongs to the loop: its column lies between the
    /// boundary columns and it sits on the loop row
    pub fn owns(&self, cell: &CellRef) -> bool {
        self.columns().spans_column(cell.column) && cell.row == self.start.reference.row
    }

    /// Range from the start boundary to the end boundary
    pub fn columns(&self) -> CellRange {
        CellRange::new(self.start.reference, self.end.reference)
    }
}

#[derive(Debug)]
enum State {
    Scanning,
    InSpan {
        start: LoopBoundary,
        expression: String,
    },
    Closed(LoopSpan),
}

/// Per-row loop state machine
#[derive(Debug)]
pub struct LoopDetector<'a> {
    markers: &'a LoopMarkers,
    path: &'a str,
    row: u32,
    state: State,
}

impl<'a> LoopDetector<'a> {
    pub fn new(markers: &'a LoopMarkers, path: &'a str, row: u32) -> Self {
        Self {
            markers,
            path,
            row,
            state: State::Scanning,
        }
    }

    /// Feed the next string cell of the row
    pub fn feed(&mut self, cell: NodeId, reference: CellRef, info: &CellInfo) -> PreprocessResult<()> {
        let text = info.text.as_str();
        let has_open = text.contains(LOOP_OPEN_PREFIX);
        let has_close = text.contains(LOOP_CLOSE);

        let state = std::mem::replace(&mut self.state, State::Scanning);
        self.state = match state {
            State::InSpan { start, expression } if has_close => {
                debug!(row = self.row, cell = %reference, "loop closed");
                State::Closed(LoopSpan {
                    start,
                    end: LoopBoundary {
                        cell,
                        reference,
                        info: info.clone(),
                    },
                    expression,
                })
            }
            State::InSpan { .. } | State::Closed(_) if has_open && !has_close => {
                return Err(PreprocessError::NestedLoop {
                    path: self.path.to_string(),
                    row: self.row,
                    cell: reference.to_string(),
                });
            }
            State::Scanning if has_open && !has_close => {
                let marker = self.markers.find_open(text).ok_or_else(|| PreprocessError::MalformedLoop {
                    path: self.path.to_string(),
                    cell: reference.to_string(),
                })?;
                debug!(row = self.row, cell = %reference, expression = marker.expression, "loop opened");
                State::InSpan {
                    expression: marker.expression.to_string(),
                    start: LoopBoundary {
                        cell,
                        reference,
                        info: info.clone(),
                    },
                }
            }
            other => other,
        };
        Ok(())
    }

    /// End of row: the closed span, if any
    pub fn finish(self) -> PreprocessResult<Option<LoopSpan>> {
        match self.state {
            State::Scanning => Ok(None),
            State::Closed(span) => Ok(Some(span)),
            State::InSpan { .. } => Err(PreprocessError::UnterminatedLoop {
                path: self.path.to_string(),
                row: self.row,
            }),
        }
    }
}
