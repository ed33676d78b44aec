//! # stencil-preprocess
//!
//! Injects template directives into an XLSX package so a templating engine
//! can expand repeated rows without breaking the package's internal
//! cross-references.
//!
//! Every worksheet is rewritten once: row numbers, cell references, merge
//! ranges, table ranges, formulas and calculation-chain entries become
//! `xlsxSData` directive calls keyed by their original coordinates, and
//! `{{#each}} ... {{/each}}` spans written by template authors become loop
//! blocks around the row.
//!
//! ## Example
//!
//! ```rust,no_run
//! use stencil_xlsx::Package;
//!
//! let mut package = Package::read_file("template.xlsx")?;
//! let report = stencil_preprocess::preprocess(&mut package)?;
//! println!("{report}");
//! package.write_file("template.prepared.xlsx")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cell;
pub mod directive;
pub mod error;
pub mod loops;
pub mod options;
pub mod pass;
pub mod rewrite;
pub mod shared_strings;
pub mod sheet;

pub use cell::{classify, CellInfo, CellKind, ValueLocation};
pub use error::{PreprocessError, PreprocessResult};
pub use loops::{LoopDetector, LoopMarkers, LoopSpan};
pub use options::PreprocessOptions;
pub use pass::{preprocess, PassReport, Preprocessor};
pub use shared_strings::{SharedStringCleanup, SharedStringTable};
pub use sheet::{SheetInfo, WorkbookIndex};
