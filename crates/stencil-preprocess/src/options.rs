//! Preprocessing options

/// Options for the preprocessing pass
#[derive(Debug, Clone)]
pub struct PreprocessOptions {
    /// Folder of the workbook parts; worksheet paths are resolved relative
    /// to it (default: `xl/`)
    pub xml_root: String,
    /// Longest expression accepted inside a `{{#each ...}}` marker
    pub max_loop_expression_len: usize,
    /// Append a `<dimensionUpdated>` placeholder for the sheet dimension
    pub update_dimension: bool,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            xml_root: "xl/".to_string(),
            max_loop_expression_len: 500,
            update_dimension: true,
        }
    }
}

impl PreprocessOptions {
    /// Workbook definition part
    pub fn workbook_part(&self) -> String {
        format!("{}workbook.xml", self.xml_root)
    }

    /// Relationship part of the workbook
    pub fn workbook_rels_part(&self) -> String {
        format!("{}_rels/workbook.xml.rels", self.xml_root)
    }

    pub fn shared_strings_part(&self) -> String {
        format!("{}sharedStrings.xml", self.xml_root)
    }

    pub fn calc_chain_part(&self) -> String {
        format!("{}calcChain.xml", self.xml_root)
    }

    /// Whether a part is a worksheet (`<xml_root>worksheets/<name>.xml`)
    pub fn is_worksheet_part(&self, name: &str) -> bool {
        name.strip_prefix(self.xml_root.as_str())
            .and_then(|rest| rest.strip_prefix("worksheets/"))
            .map_or(false, |file_name| {
                file_name.ends_with(".xml") && !file_name.contains('/')
            })
    }
}
