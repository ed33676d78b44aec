//! XLSX reader

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::dom::{Document, NodeId};
use crate::error::{XlsxError, XlsxResult};
use crate::package::{Package, PartContent};

/// Parts whose content is parsed into a [`Document`]
fn is_xml_part(name: &str) -> bool {
    name.ends_with(".xml") || name.ends_with(".rels")
}

impl Document {
    /// Parse an XML string into a document
    pub fn parse(xml: &str) -> XlsxResult<Document> {
        parse_part("<memory>", xml)
    }
}

/// Parse the XML content of a named part
pub fn parse_part(part: &str, xml: &str) -> XlsxResult<Document> {
    let xml_err = |source: quick_xml::Error| XlsxError::Xml {
        part: part.to_string(),
        source,
    };

    let mut xml_reader = Reader::from_str(xml);
    xml_reader.trim_text(false);

    let mut doc = Document::new();
    let mut stack: Vec<NodeId> = vec![doc.root()];

    loop {
        let parent = *stack.last().unwrap_or(&doc.root());
        match xml_reader.read_event().map_err(xml_err)? {
            Event::Decl(e) => {
                doc.set_declaration(Some(String::from_utf8_lossy(&e).into_owned()));
            }
            Event::Start(e) => {
                let element = doc.create_element(&String::from_utf8_lossy(e.name().as_ref()));
                for attr in e.attributes() {
                    let attr = attr.map_err(|err| xml_err(err.into()))?;
                    let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                    let value = attr.unescape_value().map_err(xml_err)?;
                    doc.set_attribute(element, &key, value.into_owned());
                }
                doc.append_child(parent, element);
                stack.push(element);
            }
            Event::Empty(e) => {
                let element = doc.create_element(&String::from_utf8_lossy(e.name().as_ref()));
                for attr in e.attributes() {
                    let attr = attr.map_err(|err| xml_err(err.into()))?;
                    let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                    let value = attr.unescape_value().map_err(xml_err)?;
                    doc.set_attribute(element, &key, value.into_owned());
                }
                doc.append_child(parent, element);
            }
            Event::End(_) => {
                if stack.len() > 1 {
                    stack.pop();
                }
            }
            Event::Text(e) => {
                let text = e.unescape().map_err(xml_err)?;
                // Whitespace between top-level nodes carries nothing
                if parent == doc.root() && text.trim().is_empty() {
                    continue;
                }
                if !text.is_empty() {
                    let node = doc.create_text(text.into_owned());
                    doc.append_child(parent, node);
                }
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                let node = doc.create_text(text);
                doc.append_child(parent, node);
            }
            Event::Comment(e) => {
                let node = doc.create_comment(String::from_utf8_lossy(&e).into_owned());
                doc.append_child(parent, node);
            }
            Event::PI(e) => {
                let node = doc.create_raw(format!("<?{}?>", String::from_utf8_lossy(&e)));
                doc.append_child(parent, node);
            }
            Event::DocType(e) => {
                let node = doc.create_raw(format!("<!DOCTYPE {}>", String::from_utf8_lossy(&e)));
                doc.append_child(parent, node);
            }
            Event::Eof => break,
        }
    }

    if doc.document_element().is_none() {
        return Err(XlsxError::InvalidFormat(format!(
            "{part} has no document element"
        )));
    }

    Ok(doc)
}

impl Package {
    /// Read a package from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Package> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Read a package from a reader
    ///
    /// XML parts (`.xml`, `.rels`) are parsed into documents; every other
    /// entry is kept as raw bytes. Entry order is preserved.
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Package> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let mut package = Package::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();

            // Skip directory entries
            if name.ends_with('/') {
                continue;
            }

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;

            let content = if is_xml_part(&name) {
                let xml = String::from_utf8(contents).map_err(|source| XlsxError::Utf8 {
                    part: name.clone(),
                    source,
                })?;
                PartContent::Xml(parse_part(&name, &xml)?)
            } else {
                PartContent::Binary(contents)
            };

            tracing::trace!("Loaded part {name}");
            package.insert(name, content);
        }

        Ok(package)
    }
}
