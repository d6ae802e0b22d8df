use crate::{GlobalArgs, Subcommand, util::print_yaml};
use clap::Parser;
use std::process::ExitCode;
use swagexpand_util::paths;

/// Print meta information about swagexpand (config, file paths)
#[derive(Clone, Debug, Parser)]
pub struct ShowCommand {
    #[command(subcommand)]
    target: ShowTarget,
}

#[derive(Copy, Clone, Debug, clap::Subcommand)]
enum ShowTarget {
    /// Print the path of files that swagexpand uses
    Paths {
        /// Print the path for just a single target
        target: Option<PathsTarget>,
    },
    /// Print global configuration
    ///
    /// This loads the config and re-stringifies it, so it will print exactly
    /// what swagexpand will use in action.
    Config,
}

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum PathsTarget {
    Config,
    Log,
}

impl Subcommand for ShowCommand {
    fn execute(self, global: GlobalArgs) -> anyhow::Result<ExitCode> {
        match self.target {
            ShowTarget::Paths { target: None } => {
                println!("Config: {}", global.config_path().display());
                println!("Log file: {}", paths::log_file().display());
            }
            ShowTarget::Paths {
                target: Some(PathsTarget::Config),
            } => println!("{}", global.config_path().display()),
            ShowTarget::Paths {
                target: Some(PathsTarget::Log),
            } => println!("{}", paths::log_file().display()),
            ShowTarget::Config => {
                let config = global.load_config()?;
                print_yaml(&config)?;
            }
        }
        Ok(ExitCode::SUCCESS)
    }
}
