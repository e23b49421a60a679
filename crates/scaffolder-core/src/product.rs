//! Product configuration trait for CLI binaries
//!
//! This trait defines the interface a scaffolding binary implements to
//! configure where templates and package versions come from and how the
//! result is presented.

use crate::report;
use crate::runtime::PackageManager;
use include_dir::Dir;
use std::path::{Path, PathBuf};

/// Configuration trait for a scaffolding CLI product
///
/// Each product defines:
/// - Product identity (name, display name)
/// - Built-in template tree and its local override
/// - Package registry location and its override
/// - Post-setup instructions
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Template tree compiled into the binary, used when no override is given
    fn builtin_templates(&self) -> &'static Dir<'static>;

    /// Environment variable naming a local template directory to use instead
    fn template_dir_env(&self) -> &'static str;

    /// Base URL of the npm-compatible registry used for version lookups
    fn default_registry_url(&self) -> &'static str {
        "https://registry.npmjs.org"
    }

    /// Environment variable name for overriding the registry URL
    fn registry_url_env(&self) -> &'static str;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, project_dir: &Path, package_manager: PackageManager) -> Vec<String> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        report::next_steps(project_dir, &cwd, package_manager)
    }

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}
