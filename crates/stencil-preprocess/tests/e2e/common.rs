//! Common utilities for preprocessing E2E tests.
//!
//! [`Template`] assembles a minimal but complete package: content types,
//! workbook, workbook relationships and one part per worksheet. Worksheets
//! are written without a declaration so serialized output compares as
//! plain strings.

use stencil_preprocess::{PassReport, PreprocessOptions, PreprocessResult, Preprocessor};
use stencil_xlsx::Package;

const CONTENT_TYPES: &str = r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#;

const WORKSHEET_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";

pub const TABLE_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/table";

/// In-memory template package builder
#[derive(Debug, Default)]
pub struct Template {
    /// (sheetId, worksheet xml)
    sheets: Vec<(u32, String)>,
    shared_strings: Option<Vec<String>>,
    calc_chain: Option<String>,
    workbook_tail: String,
    parts: Vec<(String, String)>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a worksheet whose sheetId is its 1-based position
    pub fn sheet(self, body: &str) -> Self {
        let id = self.sheets.len() as u32 + 1;
        self.sheet_with_id(id, body)
    }

    /// Add a worksheet with an explicit sheetId; `body` is the content of
    /// the `<worksheet>` element
    pub fn sheet_with_id(mut self, id: u32, body: &str) -> Self {
        self.sheets.push((id, format!("<worksheet>{body}</worksheet>")));
        self
    }

    /// Shared-string table with one plain `<si><t>` entry per string
    pub fn shared_strings(mut self, entries: &[&str]) -> Self {
        self.shared_strings = Some(entries.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn calc_chain(mut self, entries: &str) -> Self {
        self.calc_chain = Some(format!("<calcChain>{entries}</calcChain>"));
        self
    }

    /// Extra children of `<workbook>` after `<sheets>`
    pub fn workbook_tail(mut self, xml: &str) -> Self {
        self.workbook_tail = xml.to_string();
        self
    }

    /// Any other part, added after the generated ones
    pub fn part(mut self, name: &str, xml: &str) -> Self {
        self.parts.push((name.to_string(), xml.to_string()));
        self
    }

    pub fn build(&self) -> Package {
        let mut sheets_xml = String::new();
        let mut rels_xml = String::new();
        for (position, (id, _)) in self.sheets.iter().enumerate() {
            let n = position + 1;
            sheets_xml.push_str(&format!(r#"<sheet name="Sheet{n}" sheetId="{id}" r:id="rId{n}"/>"#));
            rels_xml.push_str(&format!(
                r#"<Relationship Id="rId{n}" Type="{WORKSHEET_REL_TYPE}" Target="worksheets/sheet{n}.xml"/>"#
            ));
        }

        let workbook = format!(
            r#"<workbook xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{sheets_xml}</sheets>{}</workbook>"#,
            self.workbook_tail
        );
        let workbook_rels = format!(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels_xml}</Relationships>"#
        );

        let mut parts: Vec<(String, String)> = vec![
            ("[Content_Types].xml".to_string(), CONTENT_TYPES.to_string()),
            ("xl/workbook.xml".to_string(), workbook),
            ("xl/_rels/workbook.xml.rels".to_string(), workbook_rels),
        ];
        for (position, (_, xml)) in self.sheets.iter().enumerate() {
            parts.push((format!("xl/worksheets/sheet{}.xml", position + 1), xml.clone()));
        }
        if let Some(entries) = &self.shared_strings {
            let si: String = entries
                .iter()
                .map(|text| format!("<si><t>{text}</t></si>"))
                .collect();
            parts.push(("xl/sharedStrings.xml".to_string(), format!("<sst>{si}</sst>")));
        }
        if let Some(chain) = &self.calc_chain {
            parts.push(("xl/calcChain.xml".to_string(), chain.clone()));
        }
        parts.extend(self.parts.iter().cloned());

        Package::from_xml_parts(parts.iter().map(|(name, xml)| (name.as_str(), xml.as_str())))
            .expect("template parts must parse")
    }

    /// Build and run the pass with default options
    pub fn preprocess(&self) -> (Package, PassReport) {
        let mut package = self.build();
        let report = stencil_preprocess::preprocess(&mut package).expect("preprocessing failed");
        (package, report)
    }

    /// Build and run the pass, returning the outcome
    pub fn try_preprocess(&self, options: PreprocessOptions) -> (Package, PreprocessResult<PassReport>) {
        let mut package = self.build();
        let result = Preprocessor::new(options).run(&mut package);
        (package, result)
    }
}

/// Serialized XML of a part
pub fn part_xml(package: &Package, name: &str) -> String {
    package
        .document(name)
        .unwrap_or_else(|| panic!("missing part {name}"))
        .to_xml()
}

/// Serialized XML of the n-th (1-based) worksheet
pub fn sheet_xml(package: &Package, n: usize) -> String {
    part_xml(package, &format!("xl/worksheets/sheet{n}.xml"))
}

/// `<row>` with the given cells
pub fn row(r: u32, cells: &str) -> String {
    format!(r#"<row r="{r}">{cells}</row>"#)
}

pub fn inline_cell(r: &str, text: &str) -> String {
    format!(r#"<c r="{r}" t="inlineStr"><is><t>{text}</t></is></c>"#)
}

pub fn shared_cell(r: &str, index: usize) -> String {
    format!(r#"<c r="{r}" t="s"><v>{index}</v></c>"#)
}

/// Rewritten `r` attribute value of a cell
pub fn cell_ref(r: &str) -> String {
    format!("{{{{xlsxSData type='cellRef' originalCellRef='{r}'}}}}")
}

/// Decomposed content of a cell holding exactly one expression
pub fn single_value_info(expression: &str) -> String {
    format!(
        "<info><xlsxRemove>{{{{#xlsxSData type='cellValue' value={expression}}}}}</xlsxRemove>\
         <type>{{{{xlsxSData type='cellValueType' }}}}</type>\
         <content>{{{{xlsxSData type='cellContent' }}}}</content>\
         <xlsxRemove>{{{{/xlsxSData}}}}</xlsxRemove></info>"
    )
}

/// Decomposed content of a cell mixing literal text and expressions
pub fn mixed_info(text: &str) -> String {
    format!(
        "<info><xlsxRemove>{{{{#xlsxSData type='cellValue'}}}}</xlsxRemove>\
         <raw>{{{{#xlsxSData type='cellValueRaw' }}}}{text}{{{{/xlsxSData}}}}</raw>\
         <type>{{{{xlsxSData type='cellValueType' }}}}</type>\
         <content>{{{{xlsxSData type='cellContent' }}}}</content>\
         <xlsxRemove>{{{{/xlsxSData}}}}</xlsxRemove></info>"
    )
}
