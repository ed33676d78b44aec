//! Package container
//!
//! A [`Package`] is the ordered list of parts of an XLSX archive. XML parts
//! are held as mutable [`Document`] trees; everything else is opaque bytes.

use crate::dom::Document;
use crate::error::{XlsxError, XlsxResult};
use crate::reader::parse_part;

/// Content of a package part
#[derive(Debug, Clone)]
pub enum PartContent {
    /// Parsed XML part
    Xml(Document),
    /// Any other part (images, binary blobs, ...)
    Binary(Vec<u8>),
}

/// A named part of a package
#[derive(Debug, Clone)]
pub struct Part {
    /// Zip entry name, e.g. `xl/worksheets/sheet1.xml`
    pub name: String,
    pub content: PartContent,
}

impl Part {
    pub fn document(&self) -> Option<&Document> {
        match &self.content {
            PartContent::Xml(doc) => Some(doc),
            PartContent::Binary(_) => None,
        }
    }

    pub fn document_mut(&mut self) -> Option<&mut Document> {
        match &mut self.content {
            PartContent::Xml(doc) => Some(doc),
            PartContent::Binary(_) => None,
        }
    }
}

/// An XLSX package
#[derive(Debug, Clone, Default)]
pub struct Package {
    parts: Vec<Part>,
}

impl Package {
    /// Create an empty package
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a package from in-memory XML parts, in the given order
    pub fn from_xml_parts<'a, I>(parts: I) -> XlsxResult<Package>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut package = Package::new();
        for (name, xml) in parts {
            package.insert(name, PartContent::Xml(parse_part(name, xml)?));
        }
        Ok(package)
    }

    /// Add a part, replacing the content of an existing part with the same name
    pub fn insert(&mut self, name: impl Into<String>, content: PartContent) {
        let name = name.into();
        match self.position(&name) {
            Some(index) => self.parts[index].content = content,
            None => self.parts.push(Part { name, content }),
        }
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Index of the part with the given name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.parts.iter().position(|part| part.name == name)
    }

    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|part| part.name == name)
    }

    /// Parsed document of an XML part
    pub fn document(&self, name: &str) -> Option<&Document> {
        self.part(name).and_then(Part::document)
    }

    pub fn document_mut(&mut self, name: &str) -> Option<&mut Document> {
        self.parts
            .iter_mut()
            .find(|part| part.name == name)
            .and_then(Part::document_mut)
    }

    /// Like [`Package::document`], but a missing part is an error
    pub fn require_document(&self, name: &str) -> XlsxResult<&Document> {
        self.document(name)
            .ok_or_else(|| XlsxError::MissingPart(name.to_string()))
    }

    /// Move the document of an XML part out of the package, leaving an empty
    /// document in its place until [`Package::restore_document`] is called
    pub fn take_document(&mut self, name: &str) -> Option<Document> {
        self.document_mut(name).map(std::mem::take)
    }

    /// Put a document back into an XML part
    pub fn restore_document(&mut self, name: &str, doc: Document) {
        match self.document_mut(name) {
            Some(slot) => *slot = doc,
            None => self.insert(name, PartContent::Xml(doc)),
        }
    }
}
