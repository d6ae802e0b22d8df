//! Inline every local `$ref` pointer in an OpenAPI/Swagger document. The
//! expansion itself lives in `swagexpand_core`; this is just the binary.

use anyhow::Context;
use std::{fs::File, process::ExitCode};
use swagexpand_cli::{Args, print_error};
use swagexpand_util::paths;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::EnvFilter, prelude::*};

fn main() -> ExitCode {
    let args = Args::parse();

    // Logging isn't critical, so a failure here shouldn't stop the command
    if let Err(error) = initialize_tracing() {
        print_error(&error);
    }

    args.subcommand.execute(args.global).unwrap_or_else(|error| {
        print_error(&error);
        ExitCode::FAILURE
    })
}

/// Set up tracing to log to a file. stdout and stderr belong to the command
/// output, so logs stay out of them. Filter with `RUST_LOG`.
fn initialize_tracing() -> anyhow::Result<()> {
    let path = paths::log_file();
    paths::create_parent(&path).with_context(|| {
        format!("Error creating log directory for {}", path.display())
    })?;
    let log_file = File::create(&path).with_context(|| {
        format!("Error creating log file {}", path.display())
    })?;
    let file_subscriber = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        );
    tracing_subscriber::registry().with(file_subscriber).init();
    Ok(())
}
