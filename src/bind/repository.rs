//! Binding Repository
//!
//! Registrations are kept in insertion order and scanned front to back, so
//! when several patterns match the same stack the earliest one wins.

use std::sync::Arc;

use crate::xpath::{PathElement, PathPattern, Scope};

/// Ordered `(pattern, destination)` registrations
#[derive(Debug, Clone)]
pub struct BindingRepository<D> {
    entries: Vec<(Arc<PathPattern>, D)>,
}

impl<D> Default for BindingRepository<D> {
    fn default() -> Self {
        BindingRepository {
            entries: Vec::new(),
        }
    }
}

impl<D> BindingRepository<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a registration; duplicates are kept
    pub fn register(&mut self, pattern: Arc<PathPattern>, destination: D) {
        self.entries.push((pattern, destination));
    }

    /// First destination whose pattern matches the stack
    pub fn resolve(&self, stack: &[PathElement], scope: Option<Scope<'_>>) -> Option<&D> {
        self.entries
            .iter()
            .find(|(pattern, _)| pattern.matches(stack, scope))
            .map(|(_, destination)| destination)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Arc<PathPattern>, D)> {
        self.entries.iter()
    }
}
