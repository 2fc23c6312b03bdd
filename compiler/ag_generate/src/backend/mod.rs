//! The backend: an entity tree plus its one-shot glue step.
//!
//! Glue is whatever the native side needs before any binding can be emitted
//! (loading a description, registering extra entities, marking exports).
//! It runs at most once per backend no matter how many generators are run
//! over it, and its outcome is sticky: a failed glue step fails every later
//! generation pass without running again.

use ag_diagnostic::queue::DiagnosticQueue;
use ag_diagnostic::ErrorGuaranteed;
use ag_ir::{EntityId, EntityTree};

/// Produces the glue for a backend's tree.
pub trait GlueSource {
    /// Populate or adjust `tree`. Problems are reported to `diagnostics`;
    /// return `Err` only when generation must not proceed.
    fn generate_glue(
        &mut self,
        tree: &mut EntityTree,
        diagnostics: &mut DiagnosticQueue,
    ) -> Result<(), ErrorGuaranteed>;
}

impl<F> GlueSource for F
where
    F: FnMut(&mut EntityTree, &mut DiagnosticQueue) -> Result<(), ErrorGuaranteed>,
{
    fn generate_glue(
        &mut self,
        tree: &mut EntityTree,
        diagnostics: &mut DiagnosticQueue,
    ) -> Result<(), ErrorGuaranteed> {
        self(tree, diagnostics)
    }
}

pub struct Backend {
    tree: EntityTree,
    source: Option<Box<dyn GlueSource>>,
    diagnostics: DiagnosticQueue,
    /// `None` until glue has run.
    glue: Option<Result<(), ErrorGuaranteed>>,
}

impl Backend {
    /// A backend whose tree is already complete. Its glue step only
    /// finalizes concrete types.
    pub fn new(tree: EntityTree) -> Self {
        Backend {
            tree,
            source: None,
            diagnostics: DiagnosticQueue::new(),
            glue: None,
        }
    }

    pub fn with_source(tree: EntityTree, source: impl GlueSource + 'static) -> Self {
        Backend {
            source: Some(Box::new(source)),
            ..Backend::new(tree)
        }
    }

    #[inline]
    pub fn tree(&self) -> &EntityTree {
        &self.tree
    }

    #[inline]
    pub fn tree_mut(&mut self) -> &mut EntityTree {
        &mut self.tree
    }

    #[inline]
    pub fn root(&self) -> EntityId {
        self.tree.root()
    }

    pub fn diagnostics(&self) -> &DiagnosticQueue {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut DiagnosticQueue {
        &mut self.diagnostics
    }

    pub fn is_glue_generated(&self) -> bool {
        self.glue.is_some()
    }

    /// Run the glue step unless it has already run, then return its outcome.
    ///
    /// A successful glue step is followed by concrete-type finalization,
    /// so usage must be settled by the time this returns.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn ensure_glue_generated(&mut self) -> Result<(), ErrorGuaranteed> {
        if let Some(outcome) = self.glue {
            return outcome;
        }

        let outcome = match self.source.as_mut() {
            Some(source) => source.generate_glue(&mut self.tree, &mut self.diagnostics),
            None => Ok(()),
        };
        if outcome.is_ok() {
            self.tree.finalize_concrete_types();
        } else {
            tracing::debug!(
                errors = self.diagnostics.error_count(),
                "glue generation failed"
            );
        }
        self.glue = Some(outcome);
        outcome
    }
}
