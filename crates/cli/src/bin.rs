//! Test-only binary for CLI integration tests. The real binary lives in the
//! root crate, and also sets up logging.

use std::process::ExitCode;
use swagexpand_cli::Args;

fn main() -> ExitCode {
    let args = Args::parse();
    args.subcommand.execute(args.global).unwrap_or_else(|error| {
        swagexpand_cli::print_error(&error);
        ExitCode::FAILURE
    })
}
