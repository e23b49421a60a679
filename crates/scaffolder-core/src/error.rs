//! Typed errors callers branch on
//!
//! Everything else travels as `anyhow::Error` with context attached.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// The user backed out of an interactive prompt or declined to overwrite
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Template directory not found: {}", .0.display())]
    TemplateRootMissing(PathBuf),
}

impl ScaffoldError {
    /// True when `err` (or anything in its chain) is a cancellation
    pub fn is_cancelled(err: &anyhow::Error) -> bool {
        err.chain().any(|cause| {
            matches!(
                cause.downcast_ref::<ScaffoldError>(),
                Some(ScaffoldError::Cancelled)
            )
        })
    }
}
