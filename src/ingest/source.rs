//! The uploaded file handle fed into the pipeline.

use std::borrow::Cow;
use std::path::Path;

use crate::ingest::error::{IngestError, IngestResult};
use crate::ingest::parser::file_extension;

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// An in-memory file: its name (for format sniffing and the title fallback)
/// and its raw bytes.
#[derive(Debug, Clone)]
pub struct SourceFile {
    name: String,
    bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk. The name is the final path component.
    pub fn read(path: &Path) -> IngestResult<Self> {
        let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Content decoded as UTF-8, replacing invalid sequences. A leading
    /// byte-order mark is dropped.
    pub fn text(&self) -> Cow<'_, str> {
        let bytes = self.bytes.strip_prefix(UTF8_BOM).unwrap_or(&self.bytes[..]);
        String::from_utf8_lossy(bytes)
    }

    /// Lower-cased extension, if the name has one.
    pub fn extension(&self) -> Option<String> {
        file_extension(&self.name)
    }
}
