//! Name → workflow variant registry.
//!
//! Built once at startup; the ingestor validates submission workflow
//! names against it and the dispatch worker resolves variants through
//! it. Unknown names never reach the queue.

use std::collections::HashMap;
use std::sync::Arc;

use crate::Workflow;

/// Registry mapping workflow names to their implementations.
#[derive(Default)]
pub struct WorkflowRegistry {
    workflows: HashMap<&'static str, Arc<dyn Workflow>>,
}

impl WorkflowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a variant under its own name. Re-registering a name
    /// replaces the previous variant.
    pub fn register(&mut self, workflow: Arc<dyn Workflow>) {
        self.workflows.insert(workflow.name(), workflow);
    }

    /// Look up a variant by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Workflow>> {
        self.workflows.get(name).cloned()
    }

    /// Whether a variant is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.workflows.contains_key(name)
    }

    /// Registered `(name, configuration_version)` pairs, sorted by name.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let mut entries: Vec<_> = self
            .workflows
            .values()
            .map(|w| (w.name(), w.configuration_version().to_string()))
            .collect();
        entries.sort_by_key(|(name, _)| *name);
        entries
    }

    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }
}
