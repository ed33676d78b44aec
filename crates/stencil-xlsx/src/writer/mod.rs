//! XLSX writer

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use crate::dom::{Document, NodeId, NodeKind};
use crate::error::XlsxResult;
use crate::package::{Package, PartContent};

/// Escape character data. Quotes are left alone so directive text such as
/// `type='row'` stays readable by the template engine.
fn escape_text(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

/// Escape an attribute value for a double-quoted attribute
fn escape_attribute(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            _ => out.push(c),
        }
    }
}

impl Document {
    /// Serialize the document to an XML string
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        if let Some(declaration) = self.declaration() {
            out.push_str("<?");
            out.push_str(declaration);
            out.push_str("?>\n");
        }
        for &child in self.children(self.root()) {
            self.write_node(child, &mut out);
        }
        out
    }

    /// Serialize a single node and its subtree
    pub fn node_to_xml(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            NodeKind::Root => {
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
            }
            NodeKind::Element { name, attributes } => {
                out.push('<');
                out.push_str(name);
                for (key, value) in attributes {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    escape_attribute(value, out);
                    out.push('"');
                }

                let children = self.children(id);
                if children.is_empty() {
                    out.push_str("/>");
                    return;
                }

                out.push('>');
                for &child in children {
                    self.write_node(child, out);
                }
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
            NodeKind::Text(text) => escape_text(text, out),
            NodeKind::Comment(body) => {
                out.push_str("<!--");
                out.push_str(body);
                out.push_str("-->");
            }
            NodeKind::Raw(markup) => out.push_str(markup),
        }
    }
}

impl Package {
    /// Write the package to a file path
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> XlsxResult<()> {
        let file = File::create(path)?;
        self.write(file)
    }

    /// Write the package to a writer, one zip entry per part in package order
    pub fn write<W: Write + Seek>(&self, writer: W) -> XlsxResult<()> {
        let mut zip = zip::ZipWriter::new(writer);

        for part in self.parts() {
            let options = zip::write::SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated);
            zip.start_file(part.name.as_str(), options)?;
            match &part.content {
                PartContent::Xml(doc) => zip.write_all(doc.to_xml().as_bytes())?,
                PartContent::Binary(bytes) => zip.write_all(bytes)?,
            }
        }

        zip.finish()?;
        Ok(())
    }
}
