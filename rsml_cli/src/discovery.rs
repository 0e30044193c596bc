//! Locating and reading documents

use crate::error::CliError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const DOCUMENT_EXTENSION: &str = "rsml";

/// `path` itself when it is a file, otherwise every `*.rsml` file below it,
/// sorted
pub fn discover_documents(path: &Path) -> Result<Vec<PathBuf>, CliError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(CliError::Unreadable {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file or directory"),
        });
    }

    let mut documents = Vec::new();
    for entry in WalkDir::new(path).follow_links(true) {
        let entry = entry.map_err(|error| CliError::Unreadable {
            path: error.path().unwrap_or(path).to_path_buf(),
            source: error.into(),
        })?;
        if entry.file_type().is_file() && has_document_extension(entry.path()) {
            documents.push(entry.into_path());
        }
    }

    if documents.is_empty() {
        return Err(CliError::NoDocuments {
            path: path.to_path_buf(),
        });
    }
    documents.sort();
    log::debug!("discovered {} documents under {}", documents.len(), path.display());
    Ok(documents)
}

fn has_document_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case(DOCUMENT_EXTENSION))
}

pub fn read_document(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Unreadable {
        path: path.to_path_buf(),
        source,
    })
}
