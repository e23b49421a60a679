//! Turn resolved options into template globs and a render context

use crate::catalog::{AssetCatalog, Feature, Script};
use crate::options::Options;
use crate::registry::{DependencyResolver, PackageDeps, VersionLookup};
use serde::Serialize;

/// Excludes the example unit tests when Vitest is declined
pub const UNIT_TEST_EXCLUDE: &str = "!src/components/__tests__/**";

/// Data handed to every rendered template
#[derive(Debug, Clone, Serialize)]
pub struct RenderContext {
    #[serde(flatten)]
    pub options: Options,
    pub package: PackageDeps,
    pub scripts: Vec<Script>,
}

/// Result of asset selection
#[derive(Debug, Clone)]
pub struct Selection {
    /// Glob patterns relative to the template root, in selection order
    pub globs: Vec<String>,
    pub context: RenderContext,
}

/// Collect globs, dependencies and scripts for base plus every enabled feature
pub async fn select_assets<L: VersionLookup>(
    options: &Options,
    catalog: &AssetCatalog,
    resolver: &mut DependencyResolver<L>,
) -> Selection {
    let mut globs = Vec::new();
    let mut package = PackageDeps::default();
    let mut scripts = Vec::new();

    let features = std::iter::once(Feature::Base).chain(options.enabled_features());
    for feature in features {
        let Some(entry) = catalog.entry(feature) else {
            tracing::debug!(%feature, "feature has no catalog entry");
            continue;
        };
        tracing::debug!(%feature, globs = entry.glob.len(), "selecting feature assets");

        globs.extend(entry.glob.iter().cloned());
        resolver.resolve_into(&entry.dependencies, &mut package).await;
        scripts.extend(entry.scripts.iter().cloned());
    }

    if !options.needs(Feature::Vitest) {
        globs.push(UNIT_TEST_EXCLUDE.to_string());
    }

    Selection {
        globs,
        context: RenderContext {
            options: options.clone(),
            package,
            scripts,
        },
    }
}
