//! Worksheet identity resolution
//!
//! A worksheet part is tied to its sheet declaration through the workbook
//! relationship part: the relationship whose target is the worksheet
//! carries the id that the `<sheet r:id="...">` element points at.

use stencil_xlsx::path::resolve_target;
use stencil_xlsx::{Document, Package};

use crate::options::PreprocessOptions;

pub const WORKSHEET_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
pub const TABLE_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/table";

/// Declared identity of a worksheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetInfo {
    /// `sheetId` of the sheet declaration
    pub id: String,
    pub name: String,
    pub relationship_id: String,
    /// Part path relative to the XML root (`worksheets/sheet1.xml`)
    pub path: String,
}

/// One `<Relationship>` entry of a `.rels` part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
}

/// Read the `Relationship` entries of a relationship part
pub fn relationships(doc: &Document) -> Vec<Relationship> {
    doc.descendants_named(doc.root(), "Relationship")
        .into_iter()
        .map(|rel| Relationship {
            id: doc.attribute(rel, "Id").unwrap_or_default().to_string(),
            rel_type: doc.attribute(rel, "Type").unwrap_or_default().to_string(),
            target: doc.attribute(rel, "Target").unwrap_or_default().to_string(),
        })
        .collect()
}

#[derive(Debug, Clone)]
struct SheetDeclaration {
    id: String,
    name: String,
    relationship_id: String,
}

/// Sheet declarations and worksheet relationships of a workbook
#[derive(Debug, Clone, Default)]
pub struct WorkbookIndex {
    xml_root: String,
    workbook_part: String,
    sheets: Vec<SheetDeclaration>,
    relationships: Vec<Relationship>,
}

impl WorkbookIndex {
    /// Build the index from the workbook and workbook relationship parts.
    /// Missing parts leave the index empty.
    pub fn from_package(package: &Package, options: &PreprocessOptions) -> Self {
        let workbook_part = options.workbook_part();

        let sheets: Vec<SheetDeclaration> = package
            .document(&workbook_part)
            .map(|doc| {
                doc.descendants_named(doc.root(), "sheet")
                    .into_iter()
                    .map(|sheet| SheetDeclaration {
                        id: doc.attribute(sheet, "sheetId").unwrap_or_default().to_string(),
                        name: doc.attribute(sheet, "name").unwrap_or_default().to_string(),
                        relationship_id: relationship_id(doc, sheet).unwrap_or_default().to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let worksheet_rels: Vec<Relationship> = package
            .document(&options.workbook_rels_part())
            .map(relationships)
            .unwrap_or_default()
            .into_iter()
            .filter(|rel| rel.rel_type == WORKSHEET_REL_TYPE)
            .collect();

        Self {
            xml_root: options.xml_root.clone(),
            workbook_part,
            sheets,
            relationships: worksheet_rels,
        }
    }

    /// Number of sheet declarations
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Resolve a worksheet part path (`xl/worksheets/sheet1.xml`)
    pub fn resolve(&self, path: &str) -> Option<SheetInfo> {
        let relationship = self
            .relationships
            .iter()
            .find(|rel| resolve_target(&self.workbook_part, &rel.target) == path)?;

        let sheet = self
            .sheets
            .iter()
            .find(|sheet| sheet.relationship_id == relationship.id)?;

        Some(SheetInfo {
            id: sheet.id.clone(),
            name: sheet.name.clone(),
            relationship_id: relationship.id.clone(),
            path: path.strip_prefix(self.xml_root.as_str()).unwrap_or(path).to_string(),
        })
    }
}

/// The relationship id of a sheet declaration. The namespace prefix is
/// `r` in practice, but any prefix bound to the id attribute is accepted.
fn relationship_id(doc: &Document, sheet: stencil_xlsx::NodeId) -> Option<&str> {
    doc.attribute(sheet, "r:id").or_else(|| {
        doc.attributes(sheet)
            .iter()
            .find(|(key, _)| key.ends_with(":id"))
            .map(|(_, value)| value.as_str())
    })
}
