//! Package manager detection for npm, pnpm, Yarn and Bun

use serde::Serialize;
use std::fmt;
use std::process::Command;

/// Supported JavaScript package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    pub const ALL: [PackageManager; 4] = [
        PackageManager::Npm,
        PackageManager::Pnpm,
        PackageManager::Yarn,
        PackageManager::Bun,
    ];

    /// Binary name, also what users type in the shell
    pub fn command(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "Yarn",
            PackageManager::Bun => "Bun",
        }
    }

    /// Command that installs the project's dependencies
    pub fn install_command(&self) -> String {
        format!("{} install", self.command())
    }

    /// Command that starts the dev server (npm needs `run` for custom scripts)
    pub fn dev_command(&self) -> String {
        match self {
            PackageManager::Npm => "npm run dev".to_string(),
            other => format!("{} dev", other.command()),
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Package manager detection result
#[derive(Debug, Clone)]
pub struct PackageManagerInfo {
    pub manager: PackageManager,
    pub version: Option<String>,
    pub available: bool,
}

/// Run `<manager> --version`; a spawn failure or non-zero exit means unavailable
pub fn check_package_manager(manager: PackageManager) -> PackageManagerInfo {
    let output = Command::new(manager.command()).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            tracing::debug!(manager = manager.command(), %version, "package manager found");
            PackageManagerInfo {
                manager,
                version: Some(version),
                available: true,
            }
        }
        _ => {
            tracing::debug!(manager = manager.command(), "package manager unavailable");
            PackageManagerInfo {
                manager,
                version: None,
                available: false,
            }
        }
    }
}

/// Probe every supported package manager, in `PackageManager::ALL` order
pub fn check_package_managers() -> Vec<PackageManagerInfo> {
    PackageManager::ALL
        .into_iter()
        .map(check_package_manager)
        .collect()
}
