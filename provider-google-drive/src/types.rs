//! Wire types for the Drive v3 files API.

use serde::Deserialize;

/// One file resource as returned by `files.list`.
///
/// `size` arrives as a decimal string; folders and some Google-native types
/// omit it entirely.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub md5_checksum: Option<String>,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub modified_time: Option<String>,
}

impl DriveFile {
    /// Declared size in bytes, when present and well-formed.
    pub fn size_bytes(&self) -> Option<u64> {
        self.size.as_deref().and_then(|s| s.parse().ok())
    }
}

/// One page of a `files.list` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListResponse {
    #[serde(default)]
    pub files: Vec<DriveFile>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_list_deserializes_camel_case() {
        let json = r#"{
            "files": [
                {
                    "id": "abc123",
                    "name": "rose.jpg",
                    "size": "204800",
                    "md5Checksum": "d41d8cd98f00b204e9800998ecf8427e",
                    "createdTime": "2024-05-01T10:00:00.000Z",
                    "modifiedTime": "2024-05-02T10:00:00.000Z"
                }
            ],
            "nextPageToken": "tok"
        }"#;

        let page: FileListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.files.len(), 1);
        assert_eq!(page.next_page_token.as_deref(), Some("tok"));

        let file = &page.files[0];
        assert_eq!(file.size_bytes(), Some(204800));
        assert_eq!(
            file.md5_checksum.as_deref(),
            Some("d41d8cd98f00b204e9800998ecf8427e")
        );
    }

    #[test]
    fn test_folder_entry_has_no_size_or_checksum() {
        let json = r#"{"files": [{"id": "f1", "name": "Blackwork"}]}"#;
        let page: FileListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.files[0].size_bytes(), None);
        assert!(page.files[0].md5_checksum.is_none());
        assert!(page.next_page_token.is_none());
    }
}
