use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid preview uri: {0}")]
    InvalidUri(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Highlight(#[from] highlighter::HighlightError),
}
