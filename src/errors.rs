use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain the text of a file for directive extraction.
///
/// Never fatal: the traversal turns it into a diagnostic and treats the file
/// as having no includes.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Error accessing file {file}: {source}")]
    Io { file: PathBuf, source: std::io::Error },
}

#[derive(Debug, Error)]
pub enum IncludeTreeError {
    #[error("No directory {0}")]
    NoSuchDirectory(PathBuf),

    #[error("Invalid configuration in {file}: {message}")]
    Config { file: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
