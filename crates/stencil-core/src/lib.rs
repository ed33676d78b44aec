//! # stencil-core
//!
//! Core types for the sheet-stencil crates.
//!
//! This crate provides the coordinate codec used throughout the workspace:
//! - [`CellRef`] - A 1-based (column, row) pair and its `B7` text form
//! - [`CellRange`] - A `top-left:bottom-right` pair such as a merge range
//!
//! ## Example
//!
//! ```rust
//! use stencil_core::CellRef;
//!
//! let cell = CellRef::parse("AB12").unwrap();
//! assert_eq!(cell.column, 28);
//! assert_eq!(cell.row, 12);
//! assert_eq!(cell.to_string(), "AB12");
//! ```

pub mod coord;
pub mod error;

pub use coord::{column_to_letters, letters_to_column, CellRange, CellRef};
pub use error::{Error, Result};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u32 = 16_384;
