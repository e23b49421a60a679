//! Scaffolder Core - Shared library for Vue project scaffolding CLIs
//!
//! This library provides everything needed to assemble a new Vue project from a
//! template tree and a static feature catalog. A binary supplies a
//! [`ProductConfig`] and the command-line flags; the library does the rest.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Directory helpers, the asset catalog, registry
//!   lookups, glob expansion and template rendering
//! - **Layer 2: Workflow Orchestration** - [`Options`] resolution, [`select_assets`]
//!   and [`create_project`] for custom UIs
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use scaffolder_core::{AssetCatalog, DependencyResolver, NpmRegistry, Options};
//!
//! let options = Options::resolve(&flags, Answers::default());
//! let mut resolver = DependencyResolver::new(NpmRegistry::from_config(&MyConfig)?);
//! let selection = select_assets(&options, AssetCatalog::builtin(), &mut resolver).await;
//! let created = create_project(&template_root, &target_dir, &selection).await?;
//! ```

pub mod catalog;
pub mod error;
pub mod fs;
pub mod logging;
pub mod options;
pub mod product;
pub mod registry;
pub mod report;
pub mod runtime;
pub mod selector;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use catalog::{AssetCatalog, AssetEntry, DependencySpec, Feature, Script};
pub use error::ScaffoldError;
pub use options::{Answers, E2eTesting, OptionFlags, Options};
pub use product::ProductConfig;
pub use registry::{DependencyResolver, NpmRegistry, PackageDeps, VersionLookup};
pub use runtime::{check_package_managers, PackageManager};
pub use selector::{select_assets, RenderContext, Selection};
pub use templates::{create_project, resolve_template_root, CreatedProject, TemplateRoot};

#[cfg(feature = "tui")]
pub use tui::run;
