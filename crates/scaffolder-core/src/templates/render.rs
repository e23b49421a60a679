//! Template rendering and output file naming

use anyhow::{Context, Result};
use handlebars::Handlebars;
use std::path::{Path, PathBuf};

/// Extension marking a file as a template
pub const TEMPLATE_TAG: &str = "hbs";

/// Extensions left alone when a template is renamed
const DATA_EXTENSIONS: &[&str] = &[
    "json", "html", "vue", "md", "cjs", "mjs", "yaml", "yml", "css",
];

/// Whether `path` is a template (rendered) rather than a static file (copied)
pub fn is_template(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == TEMPLATE_TAG)
}

/// Output file name for a template file name.
///
/// The tag is dropped and the script extension follows the project language:
/// `main.hbs` -> `main.ts`, `HelloWorld.spec.hbs` -> `HelloWorld.spec.ts`,
/// `App.jsx.hbs` -> `App.tsx`, `package.json.hbs` -> `package.json`.
pub fn destination_name(file_name: &str, suffix: &str) -> String {
    let stem = file_name
        .strip_suffix(&format!(".{}", TEMPLATE_TAG))
        .unwrap_or(file_name);

    match stem.rsplit_once('.') {
        Some((base, ext)) if !base.is_empty() => match ext {
            "js" | "ts" => format!("{}.{}", base, suffix),
            "jsx" | "tsx" => format!("{}.{}x", base, suffix),
            ext if DATA_EXTENSIONS.contains(&ext) => stem.to_string(),
            _ => format!("{}.{}", stem, suffix),
        },
        _ => format!("{}.{}", stem, suffix),
    }
}

/// Destination path (relative to the project root) for a source path relative to the template root
pub fn destination_path(relative: &Path, suffix: &str) -> PathBuf {
    if !is_template(relative) {
        return relative.to_path_buf();
    }
    match relative.file_name().and_then(|name| name.to_str()) {
        Some(name) => relative.with_file_name(destination_name(name, suffix)),
        None => relative.to_path_buf(),
    }
}

/// Handlebars renderer configured for source code output
pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Renderer {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        // Output is code, not HTML
        registry.register_escape_fn(handlebars::no_escape);
        Self { registry }
    }

    /// Render template text against `data`
    pub fn render_str(&self, template: &str, data: &serde_json::Value) -> Result<String> {
        Ok(self.registry.render_template(template, data)?)
    }

    /// Read and render the template at `source`
    pub fn render_file(&self, source: &Path, data: &serde_json::Value) -> Result<String> {
        let template = std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read template: {}", source.display()))?;
        self.render_str(&template, data)
            .with_context(|| format!("Failed to render template: {}", source.display()))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
