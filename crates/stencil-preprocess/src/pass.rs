//! Pass orchestration

use std::fmt;

use stencil_xlsx::{Document, Package};
use tracing::{debug, info};

use crate::error::PreprocessResult;
use crate::loops::LoopMarkers;
use crate::options::PreprocessOptions;
use crate::rewrite::{rewrite_worksheet, stamp_original_refs, CalcChainIndex, SheetContext};
use crate::shared_strings::{SharedStringCleanup, SharedStringTable};
use crate::sheet::WorkbookIndex;

/// Children of `<workbook>` that must follow `<calcPr>`
const CALC_PR_SUCCESSORS: &[&str] = &[
    "oleSize",
    "customWorkbookViews",
    "pivotCaches",
    "smartTagPr",
    "smartTagTypes",
    "webPublishing",
    "fileRecoveryPr",
    "webPublishObjects",
    "extLst",
];

/// What a pass rewrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    pub worksheets: usize,
    pub rows: usize,
    pub cells: usize,
    pub loops: usize,
    pub merge_cells: usize,
    pub formulas: usize,
    /// Calc-chain entries copied into their cells
    pub calc_chain_cells: usize,
    pub tables: usize,
    pub blanked_shared_strings: usize,
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} worksheets, {} rows, {} cells, {} loops, {} merge cells, {} formulas, \
             {} calc chain cells, {} tables, {} blanked shared strings",
            self.worksheets,
            self.rows,
            self.cells,
            self.loops,
            self.merge_cells,
            self.formulas,
            self.calc_chain_cells,
            self.tables,
            self.blanked_shared_strings
        )
    }
}

/// Runs the directive injection pass over a package
///
/// # Example
///
/// ```rust
/// use stencil_preprocess::{PreprocessOptions, Preprocessor};
/// use stencil_xlsx::Package;
///
/// let mut package = Package::new();
/// let report = Preprocessor::new(PreprocessOptions::default())
///     .run(&mut package)
///     .unwrap();
/// assert_eq!(report.worksheets, 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    options: PreprocessOptions,
}

impl Preprocessor {
    pub fn new(options: PreprocessOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PreprocessOptions {
        &self.options
    }

    /// Rewrite every worksheet of the package in place
    ///
    /// On error the package is left partially rewritten and must be
    /// discarded.
    pub fn run(&self, package: &mut Package) -> PreprocessResult<PassReport> {
        let markers = LoopMarkers::new(self.options.max_loop_expression_len)?;

        if let Some(chain) = package.document_mut(&self.options.calc_chain_part()) {
            let stamped = stamp_original_refs(chain);
            debug!(stamped, "stamped calc chain entries");
        }
        if let Some(workbook) = package.document_mut(&self.options.workbook_part()) {
            force_full_calc_on_load(workbook);
        }

        let names: Vec<String> = package
            .parts()
            .iter()
            .filter(|part| self.options.is_worksheet_part(&part.name) && part.document().is_some())
            .map(|part| part.name.clone())
            .collect();
        let mut sheets: Vec<(String, Document)> = names
            .into_iter()
            .filter_map(|name| package.take_document(&name).map(|doc| (name, doc)))
            .collect();

        let mut report = PassReport::default();
        let mut cleanup = SharedStringCleanup::new();
        let outcome = self.rewrite_sheets(package, &markers, &mut sheets, &mut cleanup, &mut report);
        for (name, doc) in sheets {
            package.restore_document(&name, doc);
        }
        outcome?;

        if !cleanup.is_empty() {
            if let Some(strings) = package.document_mut(&self.options.shared_strings_part()) {
                report.blanked_shared_strings = cleanup.drain(strings);
            }
        }

        info!(%report, "preprocessing finished");
        Ok(report)
    }

    fn rewrite_sheets(
        &self,
        package: &Package,
        markers: &LoopMarkers,
        sheets: &mut [(String, Document)],
        cleanup: &mut SharedStringCleanup,
        report: &mut PassReport,
    ) -> PreprocessResult<()> {
        let workbook = WorkbookIndex::from_package(package, &self.options);
        let strings = SharedStringTable::new(package.document(&self.options.shared_strings_part()));
        let calc_chain = CalcChainIndex::new(package.document(&self.options.calc_chain_part()));
        debug!(
            sheets = workbook.len(),
            shared_strings = strings.len(),
            calc_chain = calc_chain.len(),
            "package indices built"
        );

        let ctx = SheetContext {
            package,
            options: &self.options,
            markers,
            workbook: &workbook,
            strings: &strings,
            calc_chain: &calc_chain,
        };
        for (path, doc) in sheets.iter_mut() {
            rewrite_worksheet(&ctx, path, doc, cleanup, report)?;
        }
        Ok(())
    }
}

/// Run the pass with default options
pub fn preprocess(package: &mut Package) -> PreprocessResult<PassReport> {
    Preprocessor::default().run(package)
}

/// Set `calcPr/@fullCalcOnLoad`, creating `calcPr` at its schema position
/// when the workbook has none
fn force_full_calc_on_load(doc: &mut Document) {
    let Some(workbook) = doc.document_element() else {
        return;
    };

    let calc_pr = match doc.child_element(workbook, "calcPr") {
        Some(calc_pr) => calc_pr,
        None => {
            let successor = doc.element_children(workbook).find(|&child| {
                doc.name(child)
                    .map_or(false, |name| CALC_PR_SUCCESSORS.contains(&name))
            });
            let calc_pr = doc.create_element("calcPr");
            match successor {
                Some(successor) => doc.insert_before(successor, calc_pr),
                None => doc.append_child(workbook, calc_pr),
            }
            calc_pr
        }
    };
    doc.set_attribute(calc_pr, "fullCalcOnLoad", "1");
}
