//! # stencil-xlsx
//!
//! XLSX package plumbing for sheet-stencil: an owned XML tree with integer
//! node handles, a reader and writer for it, and a package container that
//! loads and saves the zip archive part by part.

pub mod dom;
pub mod error;
pub mod package;
pub mod path;
pub mod reader;
pub mod writer;

pub use dom::{Document, NodeId, NodeKind};
pub use error::{XlsxError, XlsxResult};
pub use package::{Package, Part, PartContent};
