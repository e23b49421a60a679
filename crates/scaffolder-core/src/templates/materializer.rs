//! Turning selected template files into a project tree

use crate::fs::{empty_dir, ensure_dir, is_dir_empty, normalize_path};
use crate::selector::{RenderContext, Selection};
use crate::templates::render::{destination_path, is_template, Renderer};
use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use walkdir::WalkDir;

/// Hidden files match, `*` stays within one path segment
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Summary of a finished materialization
#[derive(Debug, Clone)]
pub struct CreatedProject {
    /// `<target>/<project name>`
    pub project_dir: PathBuf,
    /// Every file written, absolute, sorted
    pub files: Vec<PathBuf>,
}

/// Resolve `globs` against `template_root` into sorted file paths relative to it.
///
/// Empty entries are ignored. `dir/**` selects every file below `dir`, including
/// the ones directly inside it. Entries starting with `!` remove matching paths
/// from the whole result; `!dir/` and `!dir/**` both drop everything under `dir`.
pub fn expand_globs(template_root: &Path, globs: &[String]) -> Result<Vec<PathBuf>> {
    let mut includes = Vec::new();
    let mut excludes = Vec::new();

    for glob in globs.iter().map(|g| g.trim()).filter(|g| !g.is_empty()) {
        match glob.strip_prefix('!') {
            Some(negated) => {
                let negated = recursive_base(negated);
                for pattern in [negated.to_string(), format!("{}/**/*", negated)] {
                    excludes.push(
                        Pattern::new(&pattern)
                            .with_context(|| format!("Invalid glob pattern: !{}", negated))?,
                    );
                }
            }
            None => includes.push(files_below(glob)),
        }
    }

    let root_pattern = Pattern::escape(&template_root.to_string_lossy());
    let mut matched = BTreeSet::new();

    for include in &includes {
        let full = format!("{}/{}", root_pattern, include);
        let entries = glob::glob_with(&full, MATCH_OPTIONS)
            .with_context(|| format!("Invalid glob pattern: {}", include))?;

        for entry in entries {
            let path = entry.with_context(|| format!("Failed to expand {}", include))?;
            if path.is_dir() {
                for file in WalkDir::new(&path) {
                    let file = file.with_context(|| format!("Failed to walk {}", path.display()))?;
                    if !file.file_type().is_dir() {
                        insert_relative(&mut matched, template_root, file.path());
                    }
                }
            } else {
                insert_relative(&mut matched, template_root, &path);
            }
        }
    }

    let files: Vec<PathBuf> = matched
        .into_iter()
        .filter(|rel| {
            !excludes
                .iter()
                .any(|pattern| pattern.matches_path_with(rel, MATCH_OPTIONS))
        })
        .collect();

    tracing::debug!(
        root = %template_root.display(),
        patterns = globs.len(),
        files = files.len(),
        "expanded template globs"
    );
    Ok(files)
}

/// `dir/**` and `dir/` both name the directory `dir`
fn recursive_base(glob: &str) -> &str {
    let glob = glob.trim_end_matches('/');
    glob.strip_suffix("/**").unwrap_or(glob).trim_end_matches('/')
}

/// A trailing `**` only matches directories in `glob`; `**/*` reaches the files too
fn files_below(glob: &str) -> String {
    if glob == "**" || glob.ends_with("/**") {
        format!("{}/*", glob)
    } else {
        glob.to_string()
    }
}

fn insert_relative(set: &mut BTreeSet<PathBuf>, root: &Path, path: &Path) {
    if let Ok(rel) = path.strip_prefix(root) {
        set.insert(rel.to_path_buf());
    }
}

/// Empty `target` when it has content and overwriting was authorized.
///
/// The directory itself stays, so the current directory can be a target.
pub fn prepare_target(target: &Path, overwrite: bool) -> Result<()> {
    if overwrite && !is_dir_empty(target)? {
        tracing::debug!(target = %target.display(), "removing existing content");
        empty_dir(target)?;
    }
    Ok(())
}

/// Write every file in `files` (relative to `template_root`) below `project_dir`.
///
/// Each file is written by its own task. All tasks are awaited before
/// returning, and the first failure is reported once they have all finished.
pub async fn materialize(
    template_root: &Path,
    project_dir: &Path,
    files: &[PathBuf],
    context: &RenderContext,
) -> Result<Vec<PathBuf>> {
    let data =
        Arc::new(serde_json::to_value(context).context("Failed to build template context")?);
    let renderer = Arc::new(Renderer::new());
    let suffix = context.options.language_suffix();

    let mut tasks = JoinSet::new();
    for rel in files {
        let source = template_root.join(rel);
        let dest = project_dir.join(destination_path(rel, suffix));
        let renderer = Arc::clone(&renderer);
        let data = Arc::clone(&data);

        tasks.spawn_blocking(move || {
            write_file(&renderer, &source, &dest, &data)?;
            Ok::<_, anyhow::Error>(dest)
        });
    }

    let mut written = Vec::with_capacity(files.len());
    let mut first_error: Option<anyhow::Error> = None;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(dest)) => written.push(dest),
            Ok(Err(e)) => {
                first_error.get_or_insert(e);
            }
            Err(e) => {
                first_error.get_or_insert(anyhow::Error::new(e).context("File write task failed"));
            }
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }

    written.sort();
    Ok(written)
}

fn write_file(
    renderer: &Renderer,
    source: &Path,
    dest: &Path,
    data: &serde_json::Value,
) -> Result<()> {
    if let Some(parent) = dest.parent() {
        ensure_dir(parent)?;
    }

    if is_template(source) {
        let content = renderer.render_file(source, data)?;
        fs::write(dest, content)
            .with_context(|| format!("Failed to write file: {}", dest.display()))?;
        tracing::debug!(dest = %dest.display(), "rendered");
    } else {
        copy_path(source, dest)?;
        tracing::debug!(dest = %dest.display(), "copied");
    }

    Ok(())
}

/// Byte-for-byte copy; directories are copied recursively
fn copy_path(source: &Path, dest: &Path) -> Result<()> {
    if source.is_dir() {
        ensure_dir(dest)?;
        for entry in
            fs::read_dir(source).with_context(|| format!("Failed to read {}", source.display()))?
        {
            let entry = entry?;
            copy_path(&entry.path(), &dest.join(entry.file_name()))?;
        }
        return Ok(());
    }

    fs::copy(source, dest)
        .with_context(|| format!("Failed to copy {} to {}", source.display(), dest.display()))?;
    Ok(())
}

/// Steps 1-4 of project creation: expand, prepare the target, write files
pub async fn create_project(
    template_root: &Path,
    target_dir: &Path,
    selection: &Selection,
) -> Result<CreatedProject> {
    let files = expand_globs(template_root, &selection.globs)?;

    let target_dir = normalize_path(target_dir);
    prepare_target(&target_dir, selection.context.options.should_overwrite())?;

    let project_dir = target_dir.join(selection.context.options.project_name());
    ensure_dir(&project_dir)?;

    let files = materialize(template_root, &project_dir, &files, &selection.context).await?;

    Ok(CreatedProject { project_dir, files })
}
