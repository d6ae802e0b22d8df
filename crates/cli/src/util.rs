use serde::Serialize;
use std::io;

/// Print an error chain to stderr
pub fn print_error(error: &anyhow::Error) {
    eprintln!("{error}");
    error
        .chain()
        .skip(1)
        .for_each(|cause| eprintln!("  {cause}"));
}

/// Serialize data to YAML and print it
pub fn print_yaml<T: Serialize>(value: &T) -> anyhow::Result<()> {
    serde_yaml::to_writer(io::stdout(), value).map_err(anyhow::Error::from)
}
