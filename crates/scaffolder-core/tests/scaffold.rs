//! End-to-end scaffolding against the shipped templates and catalog

use regex::Regex;
use scaffolder_core::templates::expand_globs;
use scaffolder_core::{
    create_project, select_assets, Answers, AssetCatalog, DependencyResolver, E2eTesting, Feature,
    OptionFlags, Options, VersionLookup,
};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Offline registry with fixed versions
struct FixedVersions(HashMap<&'static str, &'static str>);

impl FixedVersions {
    fn new() -> Self {
        Self(HashMap::from([
            ("vue", "3.4.21"),
            ("vite", "5.1.6"),
            ("@vitejs/plugin-vue", "5.0.4"),
            ("vue-router", "4.3.0"),
            ("typescript", "5.4.2"),
            ("cypress", "13.7.0"),
        ]))
    }
}

impl VersionLookup for FixedVersions {
    async fn latest_version(&self, package: &str) -> Option<String> {
        self.0.get(package).map(|v| v.to_string())
    }
}

fn template_root() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../../templates"))
}

async fn scaffold(options: &Options, target: &Path) -> PathBuf {
    let mut resolver = DependencyResolver::new(FixedVersions::new());
    let selection = select_assets(options, AssetCatalog::builtin(), &mut resolver).await;
    create_project(&template_root(), target, &selection)
        .await
        .unwrap()
        .project_dir
}

#[tokio::test]
async fn typescript_router_project() {
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join("proj");
    fs::create_dir(&target).unwrap();

    let flags = OptionFlags {
        typescript: true,
        router: true,
        ..Default::default()
    };
    let options = Options::resolve(&flags, Answers::default());
    let project = scaffold(&options, &target).await;

    assert_eq!(project, target.join("vue-project"));
    assert!(project.join("src/main.ts").is_file());
    assert!(project.join("src/router/index.ts").is_file());
    assert!(project.join("src/views/HomeView.vue").is_file());
    assert!(project.join("tsconfig.json").is_file());
    assert!(project.join("vite.config.ts").is_file());
    assert!(project.join(".gitignore").is_file());

    assert!(!project.join("src/main.js").exists());
    assert!(!project.join("src/components/__tests__").exists());
    assert!(!project.join("src/stores").exists());
    assert!(!project.join("cypress").exists());
    assert!(!project.join("e2e").exists());
    assert!(!project.join("cypress.config.ts").exists());
    assert!(!project.join("playwright.config.ts").exists());

    let main = fs::read_to_string(project.join("src/main.ts")).unwrap();
    assert!(main.contains("app.use(router)"));
    assert!(!main.contains("createPinia"));

    let html = fs::read_to_string(project.join("index.html")).unwrap();
    assert!(html.contains("/src/main.ts"));
}

#[tokio::test]
async fn rendered_package_json_is_valid() {
    let tmp = TempDir::new().unwrap();
    let flags = OptionFlags {
        typescript: true,
        router: true,
        eslint: true,
        package_name: Some("my-app".to_string()),
        ..Default::default()
    };
    let options = Options::resolve(&flags, Answers::default());
    let project = scaffold(&options, tmp.path()).await;

    let content = fs::read_to_string(project.join("package.json")).unwrap();
    let manifest: serde_json::Value = serde_json::from_str(&content).unwrap();

    assert_eq!(manifest["name"], "my-app");
    assert_eq!(manifest["dependencies"]["vue"], "^3.4.21");
    assert_eq!(manifest["dependencies"]["vue-router"], "^4.3.0");
    assert_eq!(manifest["devDependencies"]["typescript"], "^5.4.2");
    // Not in the fixed table: lookup failed, version left empty
    assert_eq!(manifest["devDependencies"]["eslint"], "");
    assert_eq!(manifest["scripts"]["dev"], "vite");
    assert_eq!(manifest["scripts"]["type-check"], "vue-tsc --noEmit");
    assert!(manifest["scripts"]["lint"]
        .as_str()
        .unwrap()
        .starts_with("eslint"));
}

#[tokio::test]
async fn cypress_without_vitest_uses_component_testing() {
    let tmp = TempDir::new().unwrap();
    let answers = Answers {
        needs_e2e_testing: Some(E2eTesting::Cypress),
        needs_vitest: Some(false),
        ..Default::default()
    };
    let options = Options::resolve(&OptionFlags::default(), answers);
    assert!(options.needs(Feature::Cypress));
    assert!(options.needs(Feature::CypressCt));

    let project = scaffold(&options, tmp.path()).await;

    assert!(project.join("cypress/component/HelloWorld.cy.js").is_file());
    assert!(project.join("cypress/support/component.js").is_file());
    assert!(project.join("cypress/support/component-index.html").is_file());
    assert!(project.join("cypress/e2e/example.cy.js").is_file());
    assert!(!project.join("src/components/__tests__").exists());

    let config = fs::read_to_string(project.join("cypress.config.js")).unwrap();
    assert!(config.contains("component: {"));
}

#[tokio::test]
async fn cypress_with_vitest_uses_plain_scaffold() {
    let tmp = TempDir::new().unwrap();
    let flags = OptionFlags {
        tests: true,
        ..Default::default()
    };
    let options = Options::resolve(&flags, Answers::default());
    let project = scaffold(&options, tmp.path()).await;

    assert!(project.join("cypress/e2e/example.cy.js").is_file());
    assert!(project
        .join("src/components/__tests__/HelloWorld.spec.js")
        .is_file());
    assert!(!project.join("cypress/component").exists());

    let config = fs::read_to_string(project.join("cypress.config.js")).unwrap();
    assert!(!config.contains("component:"));
}

#[tokio::test]
async fn static_assets_are_byte_identical() {
    let tmp = TempDir::new().unwrap();
    let options = Options::resolve(&OptionFlags::default(), Answers::default());
    let project = scaffold(&options, tmp.path()).await;

    for rel in ["public/favicon.ico", "src/components/HelloWorld.vue", ".gitignore"] {
        assert_eq!(
            fs::read(project.join(rel)).unwrap(),
            fs::read(template_root().join(rel)).unwrap(),
            "{} differs",
            rel
        );
    }
}

#[tokio::test]
async fn force_overwrite_wipes_existing_target() {
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join("existing");
    fs::create_dir_all(target.join("old")).unwrap();
    fs::write(target.join("old/stale.txt"), "stale").unwrap();

    let flags = OptionFlags {
        force: true,
        ..Default::default()
    };
    let options = Options::resolve(&flags, Answers::default());
    let project = scaffold(&options, &target).await;

    assert!(!target.join("old").exists());
    assert!(project.join("package.json").is_file());
}

#[tokio::test]
async fn without_overwrite_existing_files_are_kept() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("notes.txt"), "mine").unwrap();

    let options = Options::resolve(&OptionFlags::default(), Answers::default());
    let project = scaffold(&options, tmp.path()).await;

    assert_eq!(fs::read_to_string(tmp.path().join("notes.txt")).unwrap(), "mine");
    assert!(project.join("package.json").is_file());
}

#[tokio::test]
async fn force_into_dot_target_empties_it_in_place() {
    let tmp = TempDir::new().unwrap();
    let work = tmp.path().join("work");
    fs::create_dir_all(work.join("src")).unwrap();
    fs::write(work.join("notes.txt"), "mine").unwrap();

    let flags = OptionFlags {
        force: true,
        ..Default::default()
    };
    let options = Options::resolve(&flags, Answers::default());
    let project = scaffold(&options, &work.join(".")).await;

    assert_eq!(project, work.join("vue-project"));
    assert!(!work.join("notes.txt").exists());
    assert!(!work.join("src").exists());
    assert!(project.join("package.json").is_file());
}

#[tokio::test]
async fn cur_dir_segments_in_target_are_ignored() {
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join(".").join("apps").join(".").join("web");

    let options = Options::resolve(&OptionFlags::default(), Answers::default());
    let project = scaffold(&options, &target).await;

    assert_eq!(project, tmp.path().join("apps/web/vue-project"));
    assert!(project.join("index.html").is_file());
}

#[test]
fn every_catalog_glob_selects_a_template_file() {
    let catalog = AssetCatalog::builtin();
    for feature in catalog.features() {
        let entry = catalog.entry(feature).unwrap();
        for glob in entry.glob.iter().filter(|g| !g.starts_with('!')) {
            let files = expand_globs(&template_root(), std::slice::from_ref(glob)).unwrap();
            assert!(!files.is_empty(), "{} glob {} selects nothing", feature, glob);
        }
    }
}

#[tokio::test]
async fn typescript_lint_stack_declares_its_packages() {
    let tmp = TempDir::new().unwrap();
    let flags = OptionFlags {
        typescript: true,
        vitest: true,
        prettier: true,
        ..Default::default()
    };
    let options = Options::resolve(&flags, Answers::default());
    let project = scaffold(&options, tmp.path()).await;

    let declared = declared_packages(&project);
    for package in [
        "@rushstack/eslint-patch",
        "@typescript-eslint/parser",
        "@types/jsdom",
        "@vue/eslint-config-prettier",
        "eslint-plugin-vue",
    ] {
        assert!(declared.contains(package), "{} missing from package.json", package);
    }
}

#[tokio::test]
async fn generated_sources_only_use_declared_packages() {
    let everything = OptionFlags {
        typescript: true,
        jsx: true,
        router: true,
        pinia: true,
        vitest: true,
        playwright: true,
        prettier: true,
        ..Default::default()
    };
    let component_testing = OptionFlags {
        cypress: true,
        eslint: true,
        ..Default::default()
    };

    for flags in [everything, component_testing] {
        let tmp = TempDir::new().unwrap();
        let options = Options::resolve(&flags, Answers::default());
        let project = scaffold(&options, tmp.path()).await;

        let declared = declared_packages(&project);
        for (file, package) in used_packages(&project) {
            assert!(
                declared.contains(&package),
                "{} uses {} but package.json does not declare it",
                file.display(),
                package
            );
        }
    }
}

fn declared_packages(project: &Path) -> BTreeSet<String> {
    let content = fs::read_to_string(project.join("package.json")).unwrap();
    let manifest: serde_json::Value = serde_json::from_str(&content).unwrap();
    ["dependencies", "devDependencies"]
        .iter()
        .filter_map(|key| manifest[key].as_object())
        .flat_map(|deps| deps.keys().cloned())
        .collect()
}

/// Packages named by imports, requires, parser/extends settings and tsconfig types
fn used_packages(project: &Path) -> Vec<(PathBuf, String)> {
    let specifier =
        Regex::new(r#"(?:from\s+|require\(|parser:\s*|"extends":\s*)['"]([^'"]+)['"]"#).unwrap();
    let types = Regex::new(r#""types":\s*\[([^\]]*)\]"#).unwrap();
    let quoted = Regex::new(r#""([^"]+)""#).unwrap();

    let mut used = Vec::new();
    for entry in walkdir::WalkDir::new(project) {
        let entry = entry.unwrap();
        if !entry.file_type().is_file() || entry.path().ends_with("package.json") {
            continue;
        }
        let Ok(content) = fs::read_to_string(entry.path()) else {
            continue;
        };

        for caps in specifier.captures_iter(&content) {
            if let Some(package) = package_of(&caps[1]) {
                used.push((entry.path().to_path_buf(), package));
            }
        }
        if let Some(caps) = types.captures(&content) {
            for name in quoted.captures_iter(&caps[1]) {
                used.push((entry.path().to_path_buf(), format!("@types/{}", &name[1])));
            }
        }
    }
    used
}

/// `@scope/name/sub` -> `@scope/name`, `name/sub` -> `name`; relative and builtin paths -> None
fn package_of(specifier: &str) -> Option<String> {
    if specifier.starts_with('.') || specifier.starts_with("@/") || specifier.contains(':') {
        return None;
    }
    let take = if specifier.starts_with('@') { 2 } else { 1 };
    Some(specifier.split('/').take(take).collect::<Vec<_>>().join("/"))
}
