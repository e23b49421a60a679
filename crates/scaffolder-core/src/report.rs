//! Follow-up commands printed after a project is created

use crate::runtime::PackageManager;
use std::path::{Path, PathBuf};

/// Shell commands to run next: `cd` (when needed), install, dev server
pub fn next_steps(project_dir: &Path, cwd: &Path, package_manager: PackageManager) -> Vec<String> {
    let mut steps = Vec::new();

    if project_dir != cwd {
        let shown = display_path(project_dir, cwd);
        let shown = shown.to_string_lossy();
        if shown.contains(char::is_whitespace) {
            steps.push(format!("cd \"{}\"", shown));
        } else {
            steps.push(format!("cd {}", shown));
        }
    }

    steps.push(package_manager.install_command());
    steps.push(package_manager.dev_command());

    steps
}

/// `path` relative to `cwd` when it lives below it, otherwise unchanged
fn display_path(path: &Path, cwd: &Path) -> PathBuf {
    path.strip_prefix(cwd)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}
