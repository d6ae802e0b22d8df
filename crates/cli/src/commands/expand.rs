use crate::{GlobalArgs, Subcommand};
use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::{
    fs::File,
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};
use swagexpand_core::{
    Expander, Node, Pointer, SiblingPolicy,
    document::{self, Format},
};
use swagexpand_util::ResultTraced;
use tracing::info;

/// Stand-in for stdin in the input position
const STDIN: &str = "-";

/// Expand every `$ref` in a document and print the result
///
/// Only pointers relative to the document root (`#/definitions/Pet`) are
/// supported. A reference that leads back to itself is an error.
#[derive(Clone, Debug, Parser)]
pub struct ExpandCommand {
    /// YAML or JSON document to expand. Omit or pass `-` to read from stdin
    input: Option<PathBuf>,
    /// Expand just the node at this pointer instead of the whole document,
    /// e.g. `#/definitions/Pet`
    #[clap(long, short)]
    pointer: Option<Pointer>,
    /// Output format [default: from config, or yaml]
    #[clap(long, short)]
    format: Option<OutputFormat>,
    /// Write the expanded document to this file [default: stdout]
    #[clap(long, short)]
    output: Option<PathBuf>,
    /// Drop keys alongside a `$ref` instead of failing
    #[clap(long)]
    discard_siblings: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Yaml,
    /// Pretty-printed JSON. Fails if the document has non-string keys
    Json,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Yaml => Self::Yaml,
            OutputFormat::Json => Self::Json,
        }
    }
}

impl Subcommand for ExpandCommand {
    fn execute(self, global: GlobalArgs) -> anyhow::Result<ExitCode> {
        let config = global.load_config()?;
        let mut options = config.expand_options();
        if self.discard_siblings {
            options.siblings = SiblingPolicy::Discard;
        }
        let format = self.format.map(Format::from).unwrap_or(config.format);

        let input = self
            .input
            .as_deref()
            .filter(|path| *path != Path::new(STDIN));
        let source = input
            .map(|path| format!("`{}`", path.display()))
            .unwrap_or_else(|| "stdin".into());
        info!(
            %source, pointer = ?self.pointer, %format, ?options,
            "Expanding document"
        );
        let document = load(input)
            .traced()
            .with_context(|| format!("Error loading document from {source}"))?;

        let expander = Expander::new(options);
        let expanded = match &self.pointer {
            Some(pointer) => expander.expand_pointer(&document, pointer),
            None => expander.expand(&document),
        }
        .traced()
        .with_context(|| format!("Error expanding {source}"))?;

        // Write the output
        let writer: Box<dyn Write> = match &self.output {
            Some(output_file) => Box::new(
                File::options()
                    .create(true)
                    .truncate(true)
                    .write(true)
                    .open(output_file)
                    .with_context(|| {
                        format!(
                            "Error opening output file `{}`",
                            output_file.display()
                        )
                    })?,
            ),
            None => Box::new(io::stdout()),
        };
        document::write(&expanded, format, writer)
            .context("Error writing expanded document")?;

        Ok(ExitCode::SUCCESS)
    }
}

/// Load the input document from a file, or stdin if there's no path
fn load(path: Option<&Path>) -> Result<Node, document::LoadError> {
    match path {
        Some(path) => document::load_file(path),
        None => document::load_reader(io::stdin().lock()),
    }
}
