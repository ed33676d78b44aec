//! Cell reference and range types

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell reference (e.g., "A1", "XFD1048576")
///
/// Both coordinates are 1-based, matching the text form: `A` is column 1 and
/// the digits are the row number as written. Only the canonical form is
/// accepted (uppercase letters, no `$` markers, no leading zeros) so that
/// parsing and formatting are exact inverses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    /// Column number (A=1, Z=26, AA=27, ..., XFD=16384)
    pub column: u32,
    /// Row number (1-based)
    pub row: u32,
}

impl CellRef {
    /// Create a new cell reference, checking the Excel limits
    pub fn new(column: u32, row: u32) -> Result<Self> {
        if column == 0 || column > MAX_COLS {
            return Err(Error::ColumnOutOfBounds(column as u64, MAX_COLS));
        }
        if row == 0 || row > MAX_ROWS {
            return Err(Error::RowOutOfBounds(row as u64, MAX_ROWS));
        }
        Ok(Self { column, row })
    }

    /// Parse a cell reference from A1-style notation
    ///
    /// # Examples
    /// ```
    /// use stencil_core::CellRef;
    ///
    /// let cell = CellRef::parse("B7").unwrap();
    /// assert_eq!(cell.column, 2);
    /// assert_eq!(cell.row, 7);
    ///
    /// assert!(CellRef::parse("7B").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::invalid(s, "empty reference"));
        }

        let bytes = s.as_bytes();
        let split = bytes
            .iter()
            .position(|b| !b.is_ascii_uppercase())
            .unwrap_or(bytes.len());

        if split == 0 {
            return Err(Error::invalid(s, "no column letters"));
        }

        let digits = &s[split..];
        if digits.is_empty() {
            return Err(Error::invalid(s, "no row number"));
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::invalid(s, "row number is not decimal"));
        }
        if digits.starts_with('0') {
            return Err(Error::invalid(s, "row number has a leading zero"));
        }

        let column = letters_to_column(&s[..split])?;
        let row: u64 = digits
            .parse()
            .map_err(|_| Error::invalid(s, "row number too large"))?;

        if row > MAX_ROWS as u64 {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS));
        }

        Ok(Self {
            column,
            row: row as u32,
        })
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        let mut result = column_to_letters(self.column);
        result.push_str(&self.row.to_string());
        result
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Convert a 1-based column number to letters (1 = A, 26 = Z, 27 = AA, etc.)
pub fn column_to_letters(column: u32) -> String {
    let mut result = Vec::new();
    let mut n = column;

    while n > 0 {
        n -= 1;
        result.push(b'A' + (n % 26) as u8);
        n /= 26;
    }

    result.reverse();
    String::from_utf8(result).unwrap_or_default()
}

/// Convert column letters to a 1-based column number (A = 1, Z = 26, AA = 27, etc.)
pub fn letters_to_column(letters: &str) -> Result<u32> {
    if letters.is_empty() {
        return Err(Error::invalid(letters, "empty column letters"));
    }

    let mut column: u64 = 0;
    for b in letters.bytes() {
        if !b.is_ascii_uppercase() {
            return Err(Error::invalid(letters, "column letters must be A-Z"));
        }
        column = column * 26 + (b - b'A' + 1) as u64;
        if column > MAX_COLS as u64 {
            return Err(Error::ColumnOutOfBounds(column, MAX_COLS));
        }
    }

    Ok(column as u32)
}

/// A range of cells (e.g., "A1:B10")
///
/// The two corners are kept as written; merge and table ranges are always
/// stored top-left first, and [`CellRange::start`] is the anchor cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    /// Start (anchor) reference
    pub start: CellRef,
    /// End reference
    pub end: CellRef,
}

impl CellRange {
    /// Create a new cell range
    pub fn new(start: CellRef, end: CellRef) -> Self {
        Self { start, end }
    }

    /// Create a single-cell range
    pub fn single(cell: CellRef) -> Self {
        Self {
            start: cell,
            end: cell,
        }
    }

    /// Parse a range from A1:B10 notation
    pub fn parse(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((start, end)) => Ok(Self::new(CellRef::parse(start)?, CellRef::parse(end)?)),
            None => Ok(Self::single(CellRef::parse(s)?)),
        }
    }

    /// Check if a column lies between the start and end columns (inclusive)
    pub fn spans_column(&self, column: u32) -> bool {
        let (low, high) = if self.start.column <= self.end.column {
            (self.start.column, self.end.column)
        } else {
            (self.end.column, self.start.column)
        };
        column >= low && column <= high
    }

    /// Format as A1:B10 string
    pub fn to_a1_string(&self) -> String {
        if self.start == self.end {
            self.start.to_a1_string()
        } else {
            format!("{}:{}", self.start, self.end)
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
