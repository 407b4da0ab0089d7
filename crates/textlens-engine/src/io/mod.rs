use crate::editing::Document;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load a plain text file as a document, one block per line
pub fn read_document(path: &Path) -> Result<Document, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let content = content.replace("\r\n", "\n");
    log::debug!("read {} ({} chars)", path.display(), content.chars().count());
    Ok(Document::from_text(&content))
}

/// Write the document's text, creating parent directories as needed
pub fn write_document(path: &Path, doc: &Document) -> Result<(), IoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, doc.text())?;
    Ok(())
}
