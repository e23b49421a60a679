//! The options record that drives asset selection and template rendering
//!
//! Options are resolved once per run from three layers, highest first:
//! explicit command-line flags, interactive answers, built-in defaults.
//! The derived flags (`needsCypress`, `needsCypressCT`, `needsPlaywright`)
//! are computed from the primary ones and can't be set directly.

use crate::catalog::Feature;
use crate::runtime::PackageManager;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::sync::OnceLock;

/// Project name used when neither a flag nor an answer supplies one
pub const DEFAULT_PROJECT_NAME: &str = "vue-project";

/// End-to-end testing choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum E2eTesting {
    #[default]
    None,
    Cypress,
    Playwright,
}

impl E2eTesting {
    pub fn display_name(&self) -> &'static str {
        match self {
            E2eTesting::None => "No",
            E2eTesting::Cypress => "Cypress",
            E2eTesting::Playwright => "Playwright",
        }
    }
}

// Templates test `{{#if needsE2eTesting}}`, so "no e2e" has to be falsy
impl Serialize for E2eTesting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            E2eTesting::None => serializer.serialize_bool(false),
            E2eTesting::Cypress => serializer.serialize_str("cypress"),
            E2eTesting::Playwright => serializer.serialize_str("playwright"),
        }
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct OptionFlags {
    pub project_name: Option<String>,
    pub package_name: Option<String>,
    pub package_manager: Option<PackageManager>,
    /// Skip every feature prompt and take defaults for anything not flagged
    pub defaults: bool,
    pub force: bool,
    pub typescript: bool,
    pub jsx: bool,
    pub router: bool,
    pub pinia: bool,
    /// Shortcut for `vitest` + `cypress`
    pub tests: bool,
    pub vitest: bool,
    pub cypress: bool,
    pub playwright: bool,
    pub eslint: bool,
    /// ESLint with Prettier; implies `eslint`
    pub prettier: bool,
}

impl OptionFlags {
    pub fn e2e_flag(&self) -> Option<E2eTesting> {
        if self.tests || self.cypress {
            Some(E2eTesting::Cypress)
        } else if self.playwright {
            Some(E2eTesting::Playwright)
        } else {
            None
        }
    }

    pub fn vitest_flag(&self) -> bool {
        self.tests || self.vitest
    }

    pub fn eslint_flag(&self) -> bool {
        self.eslint || self.prettier
    }
}

/// Answers gathered interactively; `None` means the question wasn't asked
#[derive(Debug, Clone, Default)]
pub struct Answers {
    pub project_name: Option<String>,
    pub should_overwrite: Option<bool>,
    pub package_name: Option<String>,
    pub needs_type_script: Option<bool>,
    pub needs_jsx: Option<bool>,
    pub needs_router: Option<bool>,
    pub needs_pinia: Option<bool>,
    pub needs_vitest: Option<bool>,
    pub needs_e2e_testing: Option<E2eTesting>,
    pub needs_eslint: Option<bool>,
    pub needs_prettier: Option<bool>,
    pub package_manager: Option<PackageManager>,
}

/// Resolved, immutable options for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    project_name: String,
    should_overwrite: bool,
    package_name: String,
    needs_type_script: bool,
    needs_jsx: bool,
    needs_router: bool,
    needs_pinia: bool,
    needs_vitest: bool,
    needs_e2e_testing: E2eTesting,
    needs_eslint: bool,
    needs_prettier: bool,
    package_manager: PackageManager,
    needs_cypress: bool,
    #[serde(rename = "needsCypressCT")]
    needs_cypress_ct: bool,
    needs_playwright: bool,
}

impl Options {
    /// Merge flags over answers over defaults, then compute the derived flags
    pub fn resolve(flags: &OptionFlags, answers: Answers) -> Self {
        let project_name = flags
            .project_name
            .clone()
            .or(answers.project_name)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string());

        let package_name = flags
            .package_name
            .clone()
            .or(answers.package_name)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| to_valid_package_name(&project_name));

        let needs_eslint = flags.eslint_flag() || answers.needs_eslint.unwrap_or(false);
        // Prettier is only offered on top of ESLint
        let needs_prettier =
            needs_eslint && (flags.prettier || answers.needs_prettier.unwrap_or(false));

        let mut options = Self {
            project_name,
            should_overwrite: flags.force || answers.should_overwrite.unwrap_or(false),
            package_name,
            needs_type_script: flags.typescript || answers.needs_type_script.unwrap_or(false),
            needs_jsx: flags.jsx || answers.needs_jsx.unwrap_or(false),
            needs_router: flags.router || answers.needs_router.unwrap_or(false),
            needs_pinia: flags.pinia || answers.needs_pinia.unwrap_or(false),
            needs_vitest: flags.vitest_flag() || answers.needs_vitest.unwrap_or(false),
            needs_e2e_testing: flags
                .e2e_flag()
                .or(answers.needs_e2e_testing)
                .unwrap_or_default(),
            needs_eslint,
            needs_prettier,
            package_manager: flags
                .package_manager
                .or(answers.package_manager)
                .unwrap_or_default(),
            needs_cypress: false,
            needs_cypress_ct: false,
            needs_playwright: false,
        };
        options.derive(flags);
        options
    }

    fn derive(&mut self, flags: &OptionFlags) {
        self.needs_cypress = flags.cypress || self.needs_e2e_testing == E2eTesting::Cypress;
        self.needs_cypress_ct = self.needs_cypress && !self.needs_vitest;
        self.needs_playwright =
            flags.playwright || self.needs_e2e_testing == E2eTesting::Playwright;
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn should_overwrite(&self) -> bool {
        self.should_overwrite
    }

    pub fn e2e_testing(&self) -> E2eTesting {
        self.needs_e2e_testing
    }

    pub fn package_manager(&self) -> PackageManager {
        self.package_manager
    }

    /// Whether the catalog entry for `feature` belongs in this project
    pub fn needs(&self, feature: Feature) -> bool {
        match feature {
            Feature::Base => true,
            Feature::TypeScript => self.needs_type_script,
            Feature::Jsx => self.needs_jsx,
            Feature::Router => self.needs_router,
            Feature::Pinia => self.needs_pinia,
            Feature::Vitest => self.needs_vitest,
            Feature::Cypress => self.needs_cypress,
            Feature::CypressCt => self.needs_cypress_ct,
            Feature::Playwright => self.needs_playwright,
            Feature::Eslint => self.needs_eslint,
            Feature::Prettier => self.needs_prettier,
        }
    }

    /// Optional features that are switched on, in record order (base excluded)
    pub fn enabled_features(&self) -> Vec<Feature> {
        Feature::ALL
            .into_iter()
            .filter(|f| *f != Feature::Base && self.needs(*f))
            .collect()
    }

    /// Extension for generated script files
    pub fn language_suffix(&self) -> &'static str {
        if self.needs_type_script {
            "ts"
        } else {
            "js"
        }
    }
}

fn package_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:@[a-z0-9\-*~][a-z0-9\-*._~]*/)?[a-z0-9\-~][a-z0-9\-._~]*$")
            .expect("package name pattern compiles")
    })
}

/// Whether `name` is acceptable as an npm package name
pub fn is_valid_package_name(name: &str) -> bool {
    package_name_pattern().is_match(name)
}

/// Turn a project name into something npm accepts
pub fn to_valid_package_name(project_name: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    static INVALID: OnceLock<Regex> = OnceLock::new();
    let whitespace = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("pattern compiles"));
    let invalid = INVALID.get_or_init(|| Regex::new(r"[^a-z0-9\-~]+").expect("pattern compiles"));

    let lowered = project_name.trim().to_lowercase();
    let dashed = whitespace.replace_all(&lowered, "-");
    let stripped = dashed
        .strip_prefix(|c: char| c == '.' || c == '_')
        .unwrap_or(&dashed);
    let name = invalid.replace_all(stripped, "-");

    if name.is_empty() {
        DEFAULT_PROJECT_NAME.to_string()
    } else {
        name.into_owned()
    }
}
