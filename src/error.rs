use std::path::PathBuf;
use thiserror::Error;

/// A single failed pre-flight check. Several can be reported together.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Error: directory of sounds {} not found.", .0.display())]
    MissingDirectory(PathBuf),
    #[error("Error: description file {} not found.", .0.display())]
    MissingDescriptionFile(PathBuf),
    #[error("Error: missing tags.")]
    MissingTags,
    #[error("Error: geotag {0} not valid.")]
    InvalidGeotag(String),
    #[error("Error: pattern {pattern} not valid: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

#[derive(Debug, Error)]
pub enum BulkerError {
    #[error("{}", join_messages(.0))]
    Validation(Vec<ValidationError>),
    #[error("Description file text encoding not supported.")]
    UnsupportedEncoding { path: PathBuf, tried: Vec<String> },
    #[error("Error: description file {} could not be read: {source}", .path.display())]
    DescriptionUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Error: directory of sounds {} could not be listed: {source}", .path.display())]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("Error: writing file {} failed.", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BulkerError {
    /// User-facing messages, one per problem.
    pub fn messages(&self) -> Vec<String> {
        match self {
            BulkerError::Validation(errors) => errors.iter().map(|e| e.to_string()).collect(),
            other => vec![other.to_string()],
        }
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("\n")
}
