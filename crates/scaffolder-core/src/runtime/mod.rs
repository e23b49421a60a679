//! Runtime detection
//!
//! Probes which JavaScript package managers are installed so the
//! manager prompt only offers usable choices.

pub mod check;

pub use check::{check_package_manager, check_package_managers, PackageManager, PackageManagerInfo};
