//! Interactive option collection and the create workflow (cliclack)
//!
//! Only compiled with the `tui` feature.

#[cfg(feature = "tui")]
mod prompts;

#[cfg(feature = "tui")]
pub use prompts::{run, CreateArgs};
