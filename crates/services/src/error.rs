//! Shared error types for the services crate.

use thiserror::Error;

use storage::store::StoreError;
use study_core::model::IdentifierPath;

/// Errors emitted by `ActivityService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ActivityError {
    #[error("no context found at path {path}")]
    ContextNotFound { path: IdentifierPath },

    #[error("no current activity at path {path}")]
    NoActivity { path: IdentifierPath },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors emitted by `Reconciler`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReconcileError {
    #[error("no content model found at path {path}")]
    ContextModelNotFound { path: IdentifierPath },

    #[error(transparent)]
    Store(#[from] StoreError),
}
