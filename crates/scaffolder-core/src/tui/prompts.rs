//! Charm-style CLI prompts using cliclack

use crate::catalog::AssetCatalog;
use crate::error::ScaffoldError;
use crate::fs::{is_dir_empty, normalize_path};
use crate::options::{
    is_valid_package_name, to_valid_package_name, Answers, E2eTesting, OptionFlags, Options,
    DEFAULT_PROJECT_NAME,
};
use crate::product::ProductConfig;
use crate::registry::{DependencyResolver, NpmRegistry};
use crate::runtime::{check_package_managers, PackageManager};
use crate::selector::select_assets;
use crate::templates::{self, create_project};
use anyhow::Result;
use colored::Colorize;
use std::io;
use std::path::{Path, PathBuf};

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Directory the project folder is created in (defaults to the current directory)
    pub target_dir: Option<PathBuf>,

    /// Local directory to use for templates instead of the built-in location
    pub template_dir: Option<PathBuf>,

    /// Feature flags and values given on the command line
    pub flags: OptionFlags,

    /// Never prompt; take flags and defaults as they are
    pub yes: bool,
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs) -> Result<()> {
    cliclack::intro(config.display_name())?;

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let target_dir = resolve_target(&cwd, args.target_dir.as_deref());

    // Step 1: Locate templates before asking anything
    let template_root = templates::resolve_template_root(config, args.template_dir.as_deref())?;
    if template_root.is_local() {
        cliclack::log::info(format!(
            "Using local templates from {}",
            template_root.path().display()
        ))?;
    }

    // Step 2: Collect options
    let interactive = !args.yes && console::user_attended();
    let options = collect_options(&args, &target_dir, &cwd, interactive)?;

    // Step 3: Select assets and resolve package versions
    let spinner = cliclack::spinner();
    spinner.start("Resolving package versions...");
    let registry = NpmRegistry::from_config(config)?;
    let mut resolver = DependencyResolver::new(registry);
    let selection = select_assets(&options, AssetCatalog::builtin(), &mut resolver).await;
    let package = &selection.context.package;
    spinner.stop(format!(
        "Resolved {} packages",
        package.dependencies.len() + package.dev_dependencies.len()
    ));

    // Step 4: Create project
    let spinner = cliclack::spinner();
    spinner.start("Scaffolding project...");
    let created = match create_project(template_root.path(), &target_dir, &selection).await {
        Ok(created) => created,
        Err(e) => {
            spinner.error("Failed to scaffold project");
            return Err(e);
        }
    };
    spinner.stop(format!(
        "Created {} files in {}",
        created.files.len(),
        created.project_dir.display()
    ));

    // Step 5: Show next steps
    print_next_steps(config, &created.project_dir, options.package_manager())?;

    Ok(())
}

/// Absolute target directory without `.` segments
fn resolve_target(cwd: &Path, target_dir: Option<&Path>) -> PathBuf {
    match target_dir {
        Some(dir) => normalize_path(&cwd.join(dir)),
        None => cwd.to_path_buf(),
    }
}

/// Map a prompt's Esc / Ctrl-C into a cancellation
fn cancellable<T>(result: io::Result<T>) -> Result<T> {
    result.map_err(|e| {
        if e.kind() == io::ErrorKind::Interrupted {
            ScaffoldError::Cancelled.into()
        } else {
            anyhow::Error::new(e)
        }
    })
}

fn toggle(prompt: &str) -> Result<bool> {
    cancellable(cliclack::confirm(prompt).initial_value(false).interact())
}

/// Gather answers for everything not already given as a flag
fn collect_options(
    args: &CreateArgs,
    target_dir: &Path,
    cwd: &Path,
    interactive: bool,
) -> Result<Options> {
    let flags = &args.flags;
    let target_empty = is_dir_empty(target_dir)?;

    if !interactive {
        if !target_empty && !flags.force {
            cliclack::log::warning(format!(
                "{} is not empty; existing files are kept (use --force to remove them)",
                target_dir.display()
            ))?;
        }
        return Ok(Options::resolve(flags, Answers::default()));
    }

    let mut answers = Answers::default();

    if flags.project_name.is_none() {
        let name: String = cancellable(
            cliclack::input("Project name:")
                .placeholder(DEFAULT_PROJECT_NAME)
                .default_input(DEFAULT_PROJECT_NAME)
                .interact(),
        )?;
        answers.project_name = Some(name.trim().to_string());
    }

    if !target_empty && !flags.force {
        answers.should_overwrite = Some(confirm_overwrite(target_dir, cwd, |prompt| {
            cliclack::confirm(prompt).initial_value(false).interact()
        })?);
    }

    if flags.package_name.is_none() {
        let project_name = flags
            .project_name
            .as_deref()
            .or(answers.project_name.as_deref())
            .unwrap_or(DEFAULT_PROJECT_NAME);
        let suggested = to_valid_package_name(project_name);
        let name: String = cancellable(
            cliclack::input("Package name:")
                .placeholder(&suggested)
                .default_input(&suggested)
                .validate(|input: &String| {
                    if is_valid_package_name(input.trim()) {
                        Ok(())
                    } else {
                        Err("Invalid package.json name")
                    }
                })
                .interact(),
        )?;
        answers.package_name = Some(name.trim().to_string());
    }

    if !flags.defaults {
        collect_features(flags, &mut answers)?;
    }

    if flags.package_manager.is_none() {
        answers.package_manager = select_package_manager()?;
    }

    Ok(Options::resolve(flags, answers))
}

/// Ask before wiping a non-empty target; declining cancels the whole run
fn confirm_overwrite<F>(target_dir: &Path, cwd: &Path, confirm: F) -> Result<bool>
where
    F: FnOnce(&str) -> io::Result<bool>,
{
    let dir_for_prompt = if target_dir == cwd {
        "Current directory".to_string()
    } else {
        format!("Target directory \"{}\"", target_dir.display())
    };
    let prompt = format!(
        "{} is not empty. Remove existing files and continue?",
        dir_for_prompt
    );

    if !cancellable(confirm(&prompt))? {
        return Err(ScaffoldError::Cancelled.into());
    }
    Ok(true)
}

fn collect_features(flags: &OptionFlags, answers: &mut Answers) -> Result<()> {
    if !flags.typescript {
        answers.needs_type_script = Some(toggle("Add TypeScript?")?);
    }
    if !flags.jsx {
        answers.needs_jsx = Some(toggle("Add JSX Support?")?);
    }
    if !flags.router {
        answers.needs_router = Some(toggle(
            "Add Vue Router for Single Page Application development?",
        )?);
    }
    if !flags.pinia {
        answers.needs_pinia = Some(toggle("Add Pinia for state management?")?);
    }
    if !flags.vitest_flag() {
        answers.needs_vitest = Some(toggle("Add Vitest for Unit Testing?")?);
    }

    if flags.e2e_flag().is_none() {
        let cypress_hint = if answers.needs_vitest.unwrap_or(false) {
            ""
        } else {
            "also supports unit testing with Cypress Component Testing"
        };
        let choice = cancellable(
            cliclack::select("Add an End-to-End Testing Solution?")
                .item(E2eTesting::None, E2eTesting::None.display_name(), "")
                .item(
                    E2eTesting::Cypress,
                    E2eTesting::Cypress.display_name(),
                    cypress_hint,
                )
                .item(
                    E2eTesting::Playwright,
                    E2eTesting::Playwright.display_name(),
                    "",
                )
                .initial_value(E2eTesting::None)
                .interact(),
        )?;
        answers.needs_e2e_testing = Some(choice);
    }

    if !flags.eslint_flag() {
        answers.needs_eslint = Some(toggle("Add ESLint for code quality?")?);
    }

    let eslint_selected = flags.eslint_flag() || answers.needs_eslint.unwrap_or(false);
    if !flags.prettier && eslint_selected {
        answers.needs_prettier = Some(toggle("Add Prettier for code formatting?")?);
    }

    Ok(())
}

/// Offer only the package managers that answered `--version`
fn select_package_manager() -> Result<Option<PackageManager>> {
    let available: Vec<PackageManager> = check_package_managers()
        .into_iter()
        .filter(|info| info.available)
        .map(|info| info.manager)
        .collect();

    match available.as_slice() {
        [] => {
            cliclack::log::warning("No package manager detected, defaulting to npm")?;
            Ok(None)
        }
        [only] => Ok(Some(*only)),
        many => {
            let mut select = cliclack::select("Package manager:");
            for manager in many {
                select = select.item(*manager, manager.display_name(), "");
            }
            Ok(Some(cancellable(select.interact())?))
        }
    }
}

fn print_next_steps<C: ProductConfig>(
    config: &C,
    project_dir: &Path,
    package_manager: PackageManager,
) -> Result<()> {
    let steps = config.next_steps(project_dir, package_manager);

    println!();
    println!("  {}", "Done. Now run:".green().bold());
    println!();

    for step in &steps {
        println!("    {}", step.cyan());
    }
    println!();

    cliclack::outro("Happy coding!")?;

    Ok(())
}
