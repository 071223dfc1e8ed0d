//! Upload inputs and per-file upload outcomes.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// A file ready to be sent as one `file` part of an upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            data,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read a file from disk, guessing its content type from the extension
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("{} has no file name", path.display()),
                )
            })?;
        let content_type = mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string());

        Ok(Self {
            filename,
            content_type,
            data,
        })
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Server outcome for one uploaded file.
///
/// `deduplicated` means the server already stored identical content and
/// only added a new reference to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct UploadResult {
    #[serde(default)]
    pub message: String,
    pub filename: String,
    pub size: u64,
    pub hash: String,
    #[serde(default)]
    pub deduplicated: bool,
}

/// Counts of new versus deduplicated files in one upload batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub new_files: usize,
    pub deduplicated: usize,
}

impl UploadSummary {
    pub fn from_results(results: &[UploadResult]) -> Self {
        let deduplicated = results.iter().filter(|r| r.deduplicated).count();
        Self {
            new_files: results.len() - deduplicated,
            deduplicated,
        }
    }

    pub fn display(&self) -> String {
        if self.deduplicated > 0 {
            format!(
                "{} new files uploaded, {} duplicates detected",
                self.new_files, self.deduplicated
            )
        } else {
            format!("{} new files uploaded", self.new_files)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, deduplicated: bool) -> UploadResult {
        UploadResult {
            message: String::new(),
            filename: name.to_string(),
            size: 3,
            hash: "abc".to_string(),
            deduplicated,
        }
    }

    #[test]
    fn test_parse_upload_result_without_dedup_flag() {
        let json = r#"{"message":"stored","filename":"a.txt","size":5,"hash":"deadbeef"}"#;
        let parsed: UploadResult = serde_json::from_str(json).unwrap();
        assert!(!parsed.deduplicated);
        assert_eq!(parsed.hash, "deadbeef");
    }

    #[test]
    fn test_upload_summary() {
        let results = vec![result("a", false), result("b", true), result("c", false)];
        let summary = UploadSummary::from_results(&results);
        assert_eq!(summary.new_files, 2);
        assert_eq!(summary.deduplicated, 1);
        assert_eq!(summary.display(), "2 new files uploaded, 1 duplicates detected");

        let fresh = UploadSummary::from_results(&[result("a", false)]);
        assert_eq!(fresh.display(), "1 new files uploaded");
    }

    #[tokio::test]
    async fn test_upload_file_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let file = UploadFile::from_path(&path).await.unwrap();
        assert_eq!(file.filename, "notes.txt");
        assert_eq!(file.content_type.as_deref(), Some("text/plain"));
        assert_eq!(file.size(), 5);
    }

    #[tokio::test]
    async fn test_upload_file_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = UploadFile::from_path(dir.path().join("missing.bin"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
