//! Package version lookup against an npm-compatible registry
//!
//! Every dependency named by a selected feature is looked up once; the
//! latest published version becomes a caret range in the generated
//! package.json. A failed lookup leaves the version empty and the run
//! carries on.

use crate::catalog::DependencySpec;
use crate::product::ProductConfig;
use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::OnceLock;
use url::Url;

/// Source of "latest published version" answers
pub trait VersionLookup {
    /// Latest version of `package`, or `None` when it can't be determined
    fn latest_version(&self, package: &str) -> impl Future<Output = Option<String>> + Send;
}

/// A dependency with its resolved version range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDependency {
    pub name: String,
    pub version: String,
}

/// Runtime and development dependency lists, in selection order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDeps {
    pub dependencies: Vec<ResolvedDependency>,
    pub dev_dependencies: Vec<ResolvedDependency>,
}

/// Resolves dependency specs to versioned entries, one lookup per distinct package
pub struct DependencyResolver<L> {
    lookup: L,
    cache: HashMap<String, String>,
}

impl<L: VersionLookup> DependencyResolver<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            cache: HashMap::new(),
        }
    }

    /// `^<latest>` for `package`, or an empty string if the lookup failed
    pub async fn version_range(&mut self, package: &str) -> String {
        if let Some(range) = self.cache.get(package) {
            return range.clone();
        }

        let range = match self.lookup.latest_version(package).await {
            Some(version) => format!("^{}", version),
            None => String::new(),
        };
        self.cache.insert(package.to_string(), range.clone());
        range
    }

    /// Append `specs` to `deps`, keeping their order within each list
    pub async fn resolve_into(&mut self, specs: &[DependencySpec], deps: &mut PackageDeps) {
        for spec in specs {
            let resolved = ResolvedDependency {
                name: spec.name.clone(),
                version: self.version_range(&spec.name).await,
            };
            if spec.runtime {
                deps.dependencies.push(resolved);
            } else {
                deps.dev_dependencies.push(resolved);
            }
        }
    }

    pub async fn resolve(&mut self, specs: &[DependencySpec]) -> PackageDeps {
        let mut deps = PackageDeps::default();
        self.resolve_into(specs, &mut deps).await;
        deps
    }
}

/// Incremental scan of a registry response body for its `version` field
#[derive(Debug, Default)]
struct VersionScanner {
    buffer: String,
}

impl VersionScanner {
    fn pattern() -> &'static Regex {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        PATTERN.get_or_init(|| {
            Regex::new(r#""version"\s*:\s*"([^"\s]+)""#).expect("version pattern compiles")
        })
    }

    /// Feed the next chunk; returns the version once the field has been seen
    fn feed(&mut self, chunk: &[u8]) -> Option<String> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));
        Self::pattern()
            .captures(&self.buffer)
            .map(|caps| caps[1].to_string())
    }
}

/// Version lookup over HTTP
pub struct NpmRegistry {
    client: reqwest::Client,
    base_url: Url,
}

impl NpmRegistry {
    /// Create a registry client with a custom user agent
    pub fn new(base_url: Url, user_agent: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url,
        }
    }

    /// Create a registry client from a product config, honoring its env override
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let url_str = std::env::var(config.registry_url_env())
            .unwrap_or_else(|_| config.default_registry_url().to_string());
        let url =
            Url::parse(&url_str).with_context(|| format!("Invalid registry URL: {}", url_str))?;
        Ok(Self::new(url, config.user_agent()))
    }

    /// `<base>/<package>/latest`; scoped names keep their `/` encoded
    fn package_url(&self, package: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("URL cannot have path segments: {}", self.base_url))?
            .pop_if_empty()
            .push(package)
            .push("latest");
        Ok(url)
    }

    /// Stream the metadata document and stop reading as soon as the version shows up
    async fn fetch_version(&self, package: &str) -> Result<Option<String>> {
        let url = self.package_url(package)?;
        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch package metadata from {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Failed to fetch package metadata from {}: HTTP {}",
                url,
                response.status()
            );
        }

        let mut scanner = VersionScanner::default();
        while let Some(chunk) = response
            .chunk()
            .await
            .with_context(|| format!("Failed to read response from {}", url))?
        {
            if let Some(version) = scanner.feed(&chunk) {
                // Dropping the response here closes the connection early
                return Ok(Some(version));
            }
        }

        Ok(None)
    }
}

impl VersionLookup for NpmRegistry {
    async fn latest_version(&self, package: &str) -> Option<String> {
        match self.fetch_version(package).await {
            Ok(Some(version)) if semver::Version::parse(&version).is_ok() => {
                tracing::debug!(package, %version, "resolved package version");
                Some(version)
            }
            Ok(Some(version)) => {
                tracing::debug!(package, %version, "registry returned a non-semver version");
                None
            }
            Ok(None) => {
                tracing::debug!(package, "no version field in registry response");
                None
            }
            Err(e) => {
                tracing::debug!(package, error = %format!("{:#}", e), "version lookup failed");
                None
            }
        }
    }
}
