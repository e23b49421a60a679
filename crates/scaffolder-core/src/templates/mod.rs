//! Template discovery, rendering and materialization
//!
//! This module provides:
//! - Template root resolution (flag, environment, built-in default)
//! - Glob expansion against the template root
//! - Rendering of `.hbs` templates with language-aware output names
//! - Writing the selected files into the new project

pub mod materializer;
pub mod render;

use crate::error::ScaffoldError;
use crate::fs::ensure_dir;
use crate::product::ProductConfig;
use anyhow::{Context, Result};
use include_dir::{Dir, DirEntry};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub use materializer::{create_project, expand_globs, materialize, prepare_target, CreatedProject};
pub use render::{destination_name, destination_path, is_template, Renderer, TEMPLATE_TAG};

/// Template tree used for one run.
///
/// Built-in templates are unpacked into a temporary directory that is
/// removed when this value is dropped.
#[derive(Debug)]
pub struct TemplateRoot {
    path: PathBuf,
    unpacked: Option<TempDir>,
}

impl TemplateRoot {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the tree came from `--template-dir` or the env override
    pub fn is_local(&self) -> bool {
        self.unpacked.is_none()
    }
}

/// Locate the template root: explicit path, then the product's env var, then
/// the templates built into the binary
pub fn resolve_template_root<C: ProductConfig>(
    config: &C,
    template_dir: Option<&Path>,
) -> Result<TemplateRoot> {
    let local = template_dir
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(config.template_dir_env()).map(PathBuf::from));

    if let Some(root) = local {
        if !root.is_dir() {
            return Err(ScaffoldError::TemplateRootMissing(root).into());
        }
        tracing::debug!(root = %root.display(), "using local template root");
        return Ok(TemplateRoot {
            path: root,
            unpacked: None,
        });
    }

    let unpacked = TempDir::new().context("Failed to create a directory for templates")?;
    unpack(config.builtin_templates(), unpacked.path())?;
    tracing::debug!(root = %unpacked.path().display(), "unpacked built-in templates");

    Ok(TemplateRoot {
        path: unpacked.path().to_path_buf(),
        unpacked: Some(unpacked),
    })
}

/// Write an embedded tree below `dest`; entry paths are relative to the embedded root
fn unpack(dir: &Dir<'_>, dest: &Path) -> Result<()> {
    for entry in dir.entries() {
        let path = dest.join(entry.path());
        match entry {
            DirEntry::Dir(sub) => {
                ensure_dir(&path)?;
                unpack(sub, dest)?;
            }
            DirEntry::File(file) => {
                if let Some(parent) = path.parent() {
                    ensure_dir(parent)?;
                }
                std::fs::write(&path, file.contents())
                    .with_context(|| format!("Failed to write template: {}", path.display()))?;
            }
        }
    }
    Ok(())
}
