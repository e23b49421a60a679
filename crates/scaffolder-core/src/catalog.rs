//! Asset catalog types and the catalog shipped with the crate

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// The catalog bundled into the binary
const BUILTIN_CATALOG: &str = include_str!("../catalog.yaml");

/// Catalog keys. `Base` is always selected; every other key is gated by an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Base,
    TypeScript,
    Jsx,
    Router,
    Pinia,
    Vitest,
    Cypress,
    CypressCt,
    Playwright,
    Eslint,
    Prettier,
}

impl Feature {
    /// Every catalog key, base first
    pub const ALL: [Feature; 11] = [
        Feature::Base,
        Feature::TypeScript,
        Feature::Jsx,
        Feature::Router,
        Feature::Pinia,
        Feature::Vitest,
        Feature::Cypress,
        Feature::CypressCt,
        Feature::Playwright,
        Feature::Eslint,
        Feature::Prettier,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Feature::Base => "base",
            Feature::TypeScript => "typescript",
            Feature::Jsx => "jsx",
            Feature::Router => "router",
            Feature::Pinia => "pinia",
            Feature::Vitest => "vitest",
            Feature::Cypress => "cypress",
            Feature::CypressCt => "cypressct",
            Feature::Playwright => "playwright",
            Feature::Eslint => "eslint",
            Feature::Prettier => "prettier",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A package a feature pulls into package.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySpec {
    /// npm package name
    pub name: String,

    /// `true` for `dependencies`, `false` for `devDependencies`
    pub runtime: bool,
}

/// A package.json script entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub name: String,
    pub command: String,
}

/// Everything one feature contributes to a project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetEntry {
    /// Glob patterns relative to the template root; `!` prefix excludes
    #[serde(default)]
    pub glob: Vec<String>,

    /// Packages in declaration order
    #[serde(default)]
    pub dependencies: Vec<DependencySpec>,

    /// package.json scripts in declaration order
    #[serde(default)]
    pub scripts: Vec<Script>,
}

/// The full feature -> assets table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetCatalog {
    entries: HashMap<Feature, AssetEntry>,
}

impl AssetCatalog {
    /// Parse a catalog from YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse asset catalog")
    }

    /// The catalog embedded at build time, parsed once per process
    pub fn builtin() -> &'static AssetCatalog {
        static CATALOG: OnceLock<AssetCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| {
            // Covered by `test_builtin_catalog_parses`; the YAML is fixed at compile time
            AssetCatalog::from_yaml(BUILTIN_CATALOG).expect("built-in asset catalog is valid")
        })
    }

    pub fn entry(&self, feature: Feature) -> Option<&AssetEntry> {
        self.entries.get(&feature)
    }

    /// Features declared in this catalog, in `Feature::ALL` order
    pub fn features(&self) -> Vec<Feature> {
        Feature::ALL
            .into_iter()
            .filter(|f| self.entries.contains_key(f))
            .collect()
    }
}

impl FromIterator<(Feature, AssetEntry)> for AssetCatalog {
    fn from_iter<I: IntoIterator<Item = (Feature, AssetEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
