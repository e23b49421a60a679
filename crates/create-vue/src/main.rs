//! create-vue - Project scaffolding for Vue applications

use anyhow::Result;
use clap::Parser;
use include_dir::{include_dir, Dir};
use scaffolder_core::runtime::PackageManager;
use scaffolder_core::tui::CreateArgs;
use scaffolder_core::{OptionFlags, ProductConfig, ScaffoldError};
use std::path::PathBuf;

static TEMPLATES: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/../../templates");

/// create-vue product configuration
#[derive(Clone)]
pub struct CreateVueConfig;

impl ProductConfig for CreateVueConfig {
    fn name(&self) -> &'static str {
        "create-vue"
    }

    fn display_name(&self) -> &'static str {
        "Vue.js - The Progressive JavaScript Framework"
    }

    fn builtin_templates(&self) -> &'static Dir<'static> {
        &TEMPLATES
    }

    fn template_dir_env(&self) -> &'static str {
        "CREATE_VUE_TEMPLATE_DIR"
    }

    fn registry_url_env(&self) -> &'static str {
        "CREATE_VUE_REGISTRY"
    }

    fn cli_description(&self) -> &'static str {
        "CLI for scaffolding Vue projects"
    }

    fn user_agent(&self) -> &'static str {
        concat!("create-vue/", env!("CARGO_PKG_VERSION"))
    }
}

#[derive(Parser, Debug)]
#[command(name = "create-vue")]
#[command(about = "CLI for scaffolding Vue projects")]
#[command(version)]
pub struct Args {
    /// Directory to create the project in
    #[arg(default_value = ".")]
    pub target_dir: PathBuf,

    /// Project name (folder created inside the target directory)
    #[arg(long = "project-name")]
    pub project_name: Option<String>,

    /// package.json name
    #[arg(long = "package-name")]
    pub package_name: Option<String>,

    /// Package manager used in the printed instructions
    #[arg(long = "package-manager", value_enum)]
    pub package_manager: Option<PackageManager>,

    /// Skip feature prompts and use defaults for anything not flagged
    #[arg(long)]
    pub default: bool,

    /// Add TypeScript
    #[arg(long, visible_alias = "ts")]
    pub typescript: bool,

    /// Add JSX support
    #[arg(long)]
    pub jsx: bool,

    /// Add Vue Router
    #[arg(long, visible_alias = "vue-router")]
    pub router: bool,

    /// Add Pinia
    #[arg(long)]
    pub pinia: bool,

    /// Add Vitest and Cypress
    #[arg(long, visible_alias = "with-tests")]
    pub tests: bool,

    /// Add Vitest for unit testing
    #[arg(long)]
    pub vitest: bool,

    /// Add Cypress for end-to-end testing
    #[arg(long)]
    pub cypress: bool,

    /// Add Playwright for end-to-end testing
    #[arg(long)]
    pub playwright: bool,

    /// Add ESLint
    #[arg(long)]
    pub eslint: bool,

    /// Add ESLint with Prettier
    #[arg(long = "eslint-with-prettier", visible_alias = "prettier")]
    pub eslint_with_prettier: bool,

    /// Remove existing files in the target directory without asking
    #[arg(long)]
    pub force: bool,

    /// Local directory to use for templates instead of the built-in ones (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<Args> for CreateArgs {
    fn from(args: Args) -> Self {
        CreateArgs {
            target_dir: Some(args.target_dir),
            template_dir: args.template_dir,
            flags: OptionFlags {
                project_name: args.project_name,
                package_name: args.package_name,
                package_manager: args.package_manager,
                defaults: args.default,
                force: args.force,
                typescript: args.typescript,
                jsx: args.jsx,
                router: args.router,
                pinia: args.pinia,
                tests: args.tests,
                vitest: args.vitest,
                cypress: args.cypress,
                playwright: args.playwright,
                eslint: args.eslint,
                prettier: args.eslint_with_prettier,
            },
            yes: args.yes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    scaffolder_core::logging::init();

    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let config = CreateVueConfig;

    let result = scaffolder_core::run(&config, args.into()).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    match result {
        Err(e) if ScaffoldError::is_cancelled(&e) => {
            eprintln!("{} Operation cancelled", console::style("✖").red());
            std::process::exit(1);
        }
        other => other,
    }
}
