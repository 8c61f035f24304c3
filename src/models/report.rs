use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// UploadResult — Parsed report payload returned by `/upload-pdf`
// ---------------------------------------------------------------------------

/// Opaque JSON returned by the upload endpoint, persisted verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadResult(pub Value);

impl UploadResult {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Look up a top-level field of the parsed report.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl From<Value> for UploadResult {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

// ---------------------------------------------------------------------------
// ReportFile — A user-selected monthly report
// ---------------------------------------------------------------------------

const PDF_MAGIC: &[u8] = b"%PDF-";

/// File picked for upload: its display name and raw bytes.
#[derive(Debug, Clone)]
pub struct ReportFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ReportFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("report.pdf")
            .to_string();
        Ok(Self { name, bytes })
    }

    /// Accepted when the name carries a `.pdf` extension or the content starts
    /// with the PDF header.
    pub fn is_pdf(&self) -> bool {
        let by_name = Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        by_name || self.bytes.starts_with(PDF_MAGIC)
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
