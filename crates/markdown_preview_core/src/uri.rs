//! The `markdown` URI scheme addressing a preview of a source document.

use crate::error::PreviewError;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use url::Url;

/// Scheme of the virtual preview documents.
pub const PREVIEW_SCHEME: &str = "markdown";

const PATH_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Address of a preview, `markdown://` followed by the path of the source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewUri {
    path: String,
}

impl PreviewUri {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_string_lossy().into_owned(),
        }
    }

    /// Builds the preview address of a source document reported by the editor.
    ///
    /// `uri` is usually a `file://` URI, a bare path is accepted as well.
    pub fn from_document_uri(uri: &str) -> Result<Self, PreviewError> {
        match Url::parse(uri) {
            Ok(url) if url.scheme() == "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|()| PreviewError::InvalidUri(uri.to_string()))?;
                Ok(Self::from_path(path))
            }
            Ok(url) if url.scheme().len() > 1 => {
                let path = percent_decode_str(url.path())
                    .decode_utf8()
                    .map_err(|_| PreviewError::InvalidUri(uri.to_string()))?;
                Ok(Self {
                    path: path.into_owned(),
                })
            }
            // Bare path, or a windows drive letter parsed as a scheme.
            _ => Ok(Self::from_path(uri)),
        }
    }

    /// Returns `true` if `uri` belongs to the preview scheme.
    pub fn is_preview_uri(uri: &str) -> bool {
        split_scheme(uri).is_some()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path of the source file on disk.
    pub fn fs_path(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }
}

fn split_scheme(uri: &str) -> Option<&str> {
    let (scheme, rest) = uri.split_once(':')?;
    scheme
        .eq_ignore_ascii_case(PREVIEW_SCHEME)
        .then(|| rest.strip_prefix("//").unwrap_or(rest))
}

impl FromStr for PreviewUri {
    type Err = PreviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let encoded = split_scheme(s).ok_or_else(|| PreviewError::InvalidUri(s.to_string()))?;
        let path = percent_decode_str(encoded)
            .decode_utf8()
            .map_err(|_| PreviewError::InvalidUri(s.to_string()))?;
        if path.is_empty() {
            return Err(PreviewError::InvalidUri(s.to_string()));
        }
        Ok(Self {
            path: path.into_owned(),
        })
    }
}

impl fmt::Display for PreviewUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{PREVIEW_SCHEME}://{}",
            utf8_percent_encode(&self.path, PATH_ENCODE_SET)
        )
    }
}
