//! Command-line interface layer.
//!
//! - `args`: clap argument definitions
//! - `run`: scan, translate, and sync for one invocation
//! - `report`: cargo-style issue output and the update summary

use anyhow::Result;

pub mod args;
mod exit_status;
pub mod report;
pub mod run;

pub use args::Arguments;
pub use exit_status::ExitStatus;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let outcome = run::run(&args)?;
    report::print(&outcome, args.verbose);
    Ok(ExitStatus::Success)
}
