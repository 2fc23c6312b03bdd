//! JSON interchange for autoglue.
//!
//! - [`Deserializer`] builds an entity tree from a [`Document`], reporting
//!   problems to a diagnostic queue and skipping the offending elements.
//! - [`Serializer`] is a binding generator that writes the used part of a
//!   tree back out through an [`ElementWriter`].
//! - [`InterchangeSource`] loads a document as a backend's glue step.

mod document;
mod error;
mod reader;
mod source;
mod writer;

use std::io::Write;
use std::path::Path;

pub use document::{Document, Element, ElementKind, Parameter, FORMAT_VERSION};
pub use error::{InterchangeError, Result};
pub use reader::{export, Deserializer};
pub use source::InterchangeSource;
pub use writer::{serialize, ElementWriter, JsonWriter, Serializer};

pub fn parse_document(text: &str) -> Result<Document> {
    Ok(serde_json::from_str(text)?)
}

pub fn read_document(path: &Path) -> Result<Document> {
    let text = std::fs::read_to_string(path).map_err(|source| InterchangeError::Read {
        path: path.to_owned(),
        source,
    })?;
    parse_document(&text)
}

/// Pretty-printed JSON with a trailing newline.
pub fn write_document<W: Write>(document: &Document, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, document)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

pub fn write_document_file(document: &Document, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|source| InterchangeError::Write {
        path: path.to_owned(),
        source,
    })?;
    write_document(document, std::io::BufWriter::new(file))
}
