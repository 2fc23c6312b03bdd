//! Documents as backend glue.

use std::path::Path;

use ag_diagnostic::queue::DiagnosticQueue;
use ag_diagnostic::ErrorGuaranteed;
use ag_generate::GlueSource;
use ag_ir::EntityTree;

use crate::document::Document;
use crate::reader::{export, Deserializer};
use crate::{read_document, Result};

/// Loads a document into the backend's tree, then applies extra exports.
pub struct InterchangeSource {
    document: Document,
    exports: Vec<String>,
    export_all: bool,
}

impl InterchangeSource {
    pub fn new(document: Document) -> Self {
        InterchangeSource {
            document,
            exports: Vec::new(),
            export_all: false,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(Self::new(read_document(path)?))
    }

    /// Names to export on top of the document's own.
    #[must_use]
    pub fn with_exports(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.exports.extend(names);
        self
    }

    /// Mark the whole tree used after loading.
    #[must_use]
    pub fn export_all(mut self, export_all: bool) -> Self {
        self.export_all = export_all;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl GlueSource for InterchangeSource {
    fn generate_glue(
        &mut self,
        tree: &mut EntityTree,
        diagnostics: &mut DiagnosticQueue,
    ) -> std::result::Result<(), ErrorGuaranteed> {
        let loaded = Deserializer::new(tree, diagnostics).load(&self.document);
        let exported = export(tree, diagnostics, self.exports.iter().map(String::as_str));
        if self.export_all {
            let root = tree.root();
            tree.use_all(root);
        }
        loaded?;
        exported?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, reason = "tests use expect for brevity")]
mod tests;
