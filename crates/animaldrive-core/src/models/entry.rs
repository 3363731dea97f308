use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Server-assigned folder identifier.
pub type FolderId = i64;

/// Server-assigned file identifier.
pub type FileId = i64;

// =============================================================================
// Folder
// =============================================================================

/// A folder as reported by the backend.
///
/// `parent_id == None` marks a root folder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<FolderId>,
}

impl Folder {
    pub fn new(id: FolderId, name: impl Into<String>, parent_id: Option<FolderId>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id,
        }
    }
}

// =============================================================================
// File
// =============================================================================

/// A stored file as reported by the backend.
///
/// The well-known metadata fields are typed; every other field the server
/// sends is kept verbatim in `extra` so nothing is lost on a round trip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub id: FileId,
    /// Name the file was uploaded with (display name)
    pub original_name: String,
    #[serde(default)]
    pub folder_id: Option<FolderId>,
    /// Server-side storage name
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Size in bytes
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Remaining server metadata
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl File {
    pub fn new(id: FileId, original_name: impl Into<String>, folder_id: Option<FolderId>) -> Self {
        Self {
            id,
            original_name: original_name.into(),
            folder_id,
            filename: None,
            mime_type: None,
            size: None,
            created_at: None,
            extra: Map::new(),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Name shown to the user.
    pub fn display_name(&self) -> &str {
        &self.original_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_from_server_json() {
        let json = r#"{"id":3,"name":"Photos","parentId":null,"userId":"u1"}"#;
        let folder: Folder = serde_json::from_str(json).unwrap();
        assert_eq!(folder, Folder::new(3, "Photos", None));
    }

    #[test]
    fn test_folder_serializes_null_parent() {
        let json = serde_json::to_value(Folder::new(1, "Docs", None)).unwrap();
        assert_eq!(json["parentId"], Value::Null);
    }

    #[test]
    fn test_file_keeps_unknown_metadata() {
        let json = r#"{
            "id": 1,
            "originalName": "a.png",
            "folderId": 5,
            "mimeType": "image/png",
            "size": 2048,
            "shareToken": "abc"
        }"#;
        let file: File = serde_json::from_str(json).unwrap();
        assert_eq!(file.id, 1);
        assert_eq!(file.display_name(), "a.png");
        assert_eq!(file.folder_id, Some(5));
        assert_eq!(file.mime_type.as_deref(), Some("image/png"));
        assert_eq!(file.size, Some(2048));
        assert_eq!(file.extra.get("shareToken"), Some(&Value::from("abc")));
    }

    #[test]
    fn test_file_minimal_json() {
        let file: File = serde_json::from_str(r#"{"id":7,"originalName":"x"}"#).unwrap();
        assert_eq!(file, File::new(7, "x", None));
    }
}
