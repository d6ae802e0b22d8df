//! Command line interface for swagexpand.
//!
//! **This crate is not semver compliant**. The version is locked to the root
//! `swagexpand` crate version. If you choose to depend directly on this crate,
//! you do so at your own risk of breakage.

mod commands;
mod util;

pub use util::print_error;

use crate::commands::{expand::ExpandCommand, show::ShowCommand};
use clap::Parser;
use std::{path::PathBuf, process::ExitCode};
use swagexpand_config::Config;

const COMMAND_NAME: &str = "swagexpand";

#[derive(Debug, Parser)]
#[clap(
    author,
    version,
    about,
    name = COMMAND_NAME,
    long_about = "Inline every local `$ref` pointer in an OpenAPI/Swagger \
    document, producing a single self-contained document"
)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,
    /// Subcommand to execute
    #[command(subcommand)]
    pub subcommand: CliCommand,
}

impl Args {
    /// Alias for [clap::Parser::parse]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

/// Arguments that are available to all subcommands
#[derive(Debug, Parser)]
pub struct GlobalArgs {
    /// Configuration file. If omitted, use `$SWAGEXPAND_CONFIG_PATH`, or
    /// `config.yml` in the platform's config directory
    #[clap(long, short, global = true)]
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    /// Path to the config file that will be loaded
    fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::path)
    }

    /// Load the config file, falling back to defaults if it doesn't exist
    fn load_config(&self) -> anyhow::Result<Config> {
        Config::load_file(&self.config_path())
    }
}

/// A CLI subcommand
#[derive(Clone, Debug, clap::Subcommand)]
pub enum CliCommand {
    Expand(ExpandCommand),
    Show(ShowCommand),
}

impl CliCommand {
    /// Execute this CLI subcommand
    pub fn execute(self, global: GlobalArgs) -> anyhow::Result<ExitCode> {
        match self {
            Self::Expand(command) => command.execute(global),
            Self::Show(command) => command.execute(global),
        }
    }
}

/// An executable subcommand. This trait isn't strictly necessary because we do
/// static dispatch via the command enum, but it's helpful to enforce a
/// consistent interface for each subcommand.
trait Subcommand {
    /// Execute the subcommand
    fn execute(self, global: GlobalArgs) -> anyhow::Result<ExitCode>;
}
