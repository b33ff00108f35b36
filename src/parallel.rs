//! Parallel Batch Binding
//!
//! Uses Rayon to bind many documents against one shared binder.

use rayon::prelude::*;
use tracing::debug;

use crate::bind::Binder;
use crate::error::BindError;

/// Bind every document, returning results in input order
pub fn bind_all<T, D>(binder: &Binder<T>, documents: &[D]) -> Vec<Result<T, BindError>>
where
    T: Send + 'static,
    D: AsRef<[u8]> + Sync,
{
    debug!(
        type_name = %binder.descriptor().name(),
        documents = documents.len(),
        "binding batch"
    );
    documents
        .par_iter()
        .map(|document| binder.parse_bytes(document.as_ref()))
        .collect()
}

/// Bind every document, stopping at the first failure
pub fn try_bind_all<T, D>(binder: &Binder<T>, documents: &[D]) -> Result<Vec<T>, BindError>
where
    T: Send + 'static,
    D: AsRef<[u8]> + Sync,
{
    documents
        .par_iter()
        .map(|document| binder.parse_bytes(document.as_ref()))
        .collect()
}
