//! Stored file references and paginated listings.

use serde::{Deserialize, Serialize};

/// Server-assigned file identifier
pub type FileId = i64;

/// A file reference owned by a user.
///
/// The client never derives size or hash information itself; everything
/// here is reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct FileItem {
    pub id: FileId,
    pub filename: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub created_at: String,
    pub is_public: bool,
}

/// Coarse grouping of MIME types for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    Image,
    Video,
    Audio,
    Document,
    Archive,
    Code,
    Other,
}

impl FileCategory {
    pub fn from_mime(mime_type: &str) -> Self {
        if mime_type.starts_with("image/") {
            FileCategory::Image
        } else if mime_type.starts_with("video/") {
            FileCategory::Video
        } else if mime_type.starts_with("audio/") {
            FileCategory::Audio
        } else if mime_type.contains("pdf") || mime_type.starts_with("text/") {
            FileCategory::Document
        } else if mime_type.contains("zip") || mime_type.contains("rar") {
            FileCategory::Archive
        } else if mime_type.contains("javascript")
            || mime_type.contains("html")
            || mime_type.contains("css")
        {
            FileCategory::Code
        } else {
            FileCategory::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileCategory::Image => "image",
            FileCategory::Video => "video",
            FileCategory::Audio => "audio",
            FileCategory::Document => "document",
            FileCategory::Archive => "archive",
            FileCategory::Code => "code",
            FileCategory::Other => "file",
        }
    }
}

impl FileItem {
    pub fn category(&self) -> FileCategory {
        FileCategory::from_mime(&self.mime_type)
    }

    pub fn visibility_display(&self) -> &'static str {
        if self.is_public {
            "public"
        } else {
            "private"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_files: u64,
}

impl Pagination {
    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    /// True when the page numbers are consistent with the file count
    pub fn is_consistent(&self) -> bool {
        self.total_files == 0 || (1 <= self.current_page && self.current_page <= self.total_pages)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_files: 0,
        }
    }
}

/// Response shape shared by own, public, and search listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct FileListResponse {
    pub files: Vec<FileItem>,
    pub pagination: Pagination,
}

/// Outcome of removing a file reference.
///
/// `physical_file_deleted` is true only when the last reference to the
/// stored content was removed and the content itself was purged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct DeleteFileResponse {
    pub message: String,
    pub physical_file_deleted: bool,
}

impl DeleteFileResponse {
    pub fn outcome_display(&self) -> &'static str {
        if self.physical_file_deleted {
            "File deleted and removed from storage"
        } else {
            "File reference deleted"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct VisibilityResponse {
    pub message: String,
    pub is_public: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_list_response() {
        let json = r#"{
            "files": [{
                "id": 7,
                "filename": "report.pdf",
                "size_bytes": 2048,
                "mime_type": "application/pdf",
                "created_at": "2024-03-05T10:00:00Z",
                "is_public": false
            }],
            "pagination": {"currentPage": 1, "totalPages": 3, "totalFiles": 41}
        }"#;

        let resp: FileListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.files.len(), 1);
        assert_eq!(resp.files[0].id, 7);
        assert_eq!(resp.files[0].category(), FileCategory::Document);
        assert_eq!(resp.files[0].visibility_display(), "private");
        assert_eq!(resp.pagination.total_files, 41);
        assert!(resp.pagination.has_next_page());
        assert!(!resp.pagination.has_previous_page());
        assert!(resp.pagination.is_consistent());
    }

    #[test]
    fn test_file_category_from_mime() {
        assert_eq!(FileCategory::from_mime("image/png"), FileCategory::Image);
        assert_eq!(FileCategory::from_mime("video/mp4"), FileCategory::Video);
        assert_eq!(FileCategory::from_mime("audio/mpeg"), FileCategory::Audio);
        assert_eq!(FileCategory::from_mime("text/plain"), FileCategory::Document);
        assert_eq!(FileCategory::from_mime("application/zip"), FileCategory::Archive);
        assert_eq!(FileCategory::from_mime("application/x-rar-compressed"), FileCategory::Archive);
        assert_eq!(FileCategory::from_mime("application/javascript"), FileCategory::Code);
        assert_eq!(FileCategory::from_mime("application/octet-stream"), FileCategory::Other);
        // text/html is a document before it is code
        assert_eq!(FileCategory::from_mime("text/html"), FileCategory::Document);
    }

    #[test]
    fn test_pagination_consistency() {
        let empty = Pagination {
            current_page: 1,
            total_pages: 0,
            total_files: 0,
        };
        assert!(empty.is_consistent());

        let past_end = Pagination {
            current_page: 4,
            total_pages: 3,
            total_files: 50,
        };
        assert!(!past_end.is_consistent());
        assert!(!past_end.has_next_page());
    }

    #[test]
    fn test_delete_outcome_display() {
        let purged = DeleteFileResponse {
            message: "ok".into(),
            physical_file_deleted: true,
        };
        assert_eq!(purged.outcome_display(), "File deleted and removed from storage");

        let kept = DeleteFileResponse {
            message: "ok".into(),
            physical_file_deleted: false,
        };
        assert_eq!(kept.outcome_display(), "File reference deleted");
    }
}
