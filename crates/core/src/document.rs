//! Load documents from YAML or JSON, and write them back out

use crate::Node;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::{
    fs::File,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::info;

/// Load a document from a file. JSON is a subset of YAML, so the same parser
/// handles both.
pub fn load_file(path: &Path) -> Result<Node, LoadError> {
    info!(?path, "Loading document");
    let file = File::open(path).map_err(|error| LoadError::Io {
        path: path.to_owned(),
        error,
    })?;
    load_reader(file).map_err(|error| match error {
        // Attach the path to read errors
        LoadError::Read(error) => LoadError::Io {
            path: path.to_owned(),
            error,
        },
        error => error,
    })
}

/// Load a document from a reader, such as stdin
pub fn load_reader(mut reader: impl Read) -> Result<Node, LoadError> {
    let mut text = String::new();
    reader.read_to_string(&mut text).map_err(LoadError::Read)?;
    load_str(&text)
}

/// Parse a document from a YAML or JSON string. A document with no content is
/// treated as an empty mapping rather than null.
pub fn load_str(text: &str) -> Result<Node, LoadError> {
    if is_blank(text) {
        return Ok(Node::empty());
    }
    let value: Value = serde_yaml::from_str(text)?;
    Ok(value.into())
}

/// Does the document contain nothing but comments? A `---` document start
/// marker doesn't count as content.
fn is_blank(text: &str) -> bool {
    let is_comment = |line: &str| line.is_empty() || line.starts_with('#');
    text.lines().all(|line| {
        let line = line.trim();
        match line.strip_prefix("---") {
            Some("") => true,
            // `---foo` is a plain scalar, but `--- # foo` is just a marker
            Some(rest) => {
                rest.starts_with(char::is_whitespace)
                    && is_comment(rest.trim_start())
            }
            None => is_comment(line),
        }
    })
}

/// Output format for an expanded document
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    #[default]
    #[display("yaml")]
    Yaml,
    /// Pretty-printed JSON
    #[display("json")]
    Json,
}

/// Serialize a document to a string in the given format. The output always
/// ends with a newline.
pub fn to_string(node: &Node, format: Format) -> Result<String, WriteError> {
    match format {
        Format::Yaml => Ok(serde_yaml::to_string(node)?),
        Format::Json => {
            let mut json = serde_json::to_string_pretty(node)?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Serialize a document into a writer in the given format
pub fn write(
    node: &Node,
    format: Format,
    mut writer: impl Write,
) -> Result<(), WriteError> {
    let output = to_string(node, format)?;
    writer.write_all(output.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Error loading a document
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Error reading `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        error: io::Error,
    },

    /// Reading from a non-file source failed
    #[error("Error reading document")]
    Read(#[source] io::Error),

    #[error("Invalid YAML/JSON")]
    Parse(#[from] serde_yaml::Error),
}

/// Error serializing a document
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Error serializing document as YAML")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON only allows string keys, so some YAML documents can't be
    /// converted
    #[error("Error serializing document as JSON")]
    Json(#[from] serde_json::Error),

    #[error("Error writing document")]
    Io(#[from] io::Error),
}
