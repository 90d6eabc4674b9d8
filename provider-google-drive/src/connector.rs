//! Drive v3 connector implementing the sync engine's `RemoteSource` seam.
//!
//! All filtering happens server-side through `files.list` queries: folder
//! listings are restricted to direct folder children of the configured root,
//! image listings to a fixed MIME whitelist, and trashed entries are excluded
//! in both. Listings are paged at 1000 entries per call and followed by an
//! advisory pacing delay.

use crate::error::{DriveError, Result};
use crate::http::{HttpClient, HttpMethod, HttpRequest};
use crate::types::{DriveFile, FileListResponse};
use async_trait::async_trait;
use bytes::Bytes;
use core_sync::{RemoteFolder, RemoteImage, RemoteSource};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

const FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";
const PAGE_SIZE: &str = "1000";
const LIST_FIELDS: &str =
    "nextPageToken, files(id, name, size, createdTime, modifiedTime, md5Checksum)";

/// MIME types accepted when listing folder contents.
pub const IMAGE_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Read-only Drive client scoped to one root folder.
pub struct DriveConnector {
    http_client: Arc<dyn HttpClient>,
    access_token: String,
    root_folder_id: String,
    listing_delay: Duration,
}

impl DriveConnector {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        access_token: String,
        root_folder_id: String,
        listing_delay: Duration,
    ) -> Self {
        Self {
            http_client,
            access_token,
            root_folder_id,
            listing_delay,
        }
    }

    /// Run a `files.list` query to completion, following page tokens.
    async fn list_all(&self, query: &str, order_by: Option<&str>) -> Result<Vec<DriveFile>> {
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params: Vec<(&str, &str)> = vec![
                ("q", query),
                ("fields", LIST_FIELDS),
                ("pageSize", PAGE_SIZE),
            ];
            if let Some(order_by) = order_by {
                params.push(("orderBy", order_by));
            }
            if let Some(ref token) = page_token {
                params.push(("pageToken", token));
            }

            let query_string = serde_urlencoded::to_string(&params)
                .map_err(|e| DriveError::Parse(format!("encoding query: {}", e)))?;
            let request = HttpRequest::new(HttpMethod::Get, format!("{}?{}", FILES_URL, query_string))
                .bearer_token(&self.access_token);

            let response = self.http_client.execute(request).await?;
            if !response.is_success() {
                return Err(DriveError::ApiError {
                    status_code: response.status,
                    message: response.text(),
                });
            }

            let page: FileListResponse = response.json()?;
            files.extend(page.files);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        // Advisory pacing between listing calls, not a rate limiter.
        if !self.listing_delay.is_zero() {
            tokio::time::sleep(self.listing_delay).await;
        }

        debug!(count = files.len(), "Listing complete");
        Ok(files)
    }
}

/// Escape single quotes for embedding in a Drive query string literal.
fn escape_query_value(value: &str) -> String {
    value.replace('\'', "\\'")
}

fn image_mime_clause() -> String {
    let clauses: Vec<String> = IMAGE_MIME_TYPES
        .iter()
        .map(|mime| format!("mimeType = '{}'", mime))
        .collect();
    format!("({})", clauses.join(" or "))
}

#[async_trait]
impl RemoteSource for DriveConnector {
    #[instrument(skip(self))]
    async fn list_style_folders(&self) -> core_sync::Result<Vec<RemoteFolder>> {
        let query = format!(
            "'{}' in parents and mimeType = '{}' and trashed = false",
            escape_query_value(&self.root_folder_id),
            FOLDER_MIME_TYPE
        );

        let files = self.list_all(&query, None).await?;
        Ok(files
            .into_iter()
            .map(|f| RemoteFolder {
                id: f.id,
                name: f.name,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn list_images(&self, folder_id: &str) -> core_sync::Result<Vec<RemoteImage>> {
        let query = format!(
            "'{}' in parents and {} and trashed = false",
            escape_query_value(folder_id),
            image_mime_clause()
        );

        let files = self.list_all(&query, Some("modifiedTime desc")).await?;
        Ok(files
            .into_iter()
            .map(|f| RemoteImage {
                size: f.size_bytes(),
                checksum: f.md5_checksum,
                created_time: f.created_time.unwrap_or_default(),
                modified_time: f.modified_time.unwrap_or_default(),
                id: f.id,
                name: f.name,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn download(&self, file_id: &str) -> core_sync::Result<Bytes> {
        let request = HttpRequest::new(
            HttpMethod::Get,
            format!("{}/{}?alt=media", FILES_URL, file_id),
        )
        .bearer_token(&self.access_token);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(core_sync::SyncError::from)?;

        if !response.is_success() {
            return Err(DriveError::ApiError {
                status_code: response.status,
                message: response.text(),
            }
            .into());
        }

        Ok(response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use mockall::mock;

    mock! {
        Http {}

        #[async_trait]
        impl HttpClient for Http {
            async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
        }
    }

    fn connector(http: MockHttp) -> DriveConnector {
        DriveConnector::new(
            Arc::new(http),
            "tok".to_string(),
            "root-id".to_string(),
            Duration::ZERO,
        )
    }

    fn page(body: &'static str) -> HttpResponse {
        HttpResponse {
            status: 200,
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[tokio::test]
    async fn test_folder_listing_query_and_mapping() {
        let mut http = MockHttp::new();
        http.expect_execute()
            .withf(|req| {
                req.method == HttpMethod::Get
                    && req.url.starts_with(FILES_URL)
                    && req.url.contains("google-apps.folder")
                    && req.url.contains("trashed")
                    && req.url.contains("pageSize=1000")
                    && req.headers.get("Authorization") == Some(&"Bearer tok".to_string())
            })
            .times(1)
            .returning(|_| {
                Ok(page(
                    r#"{"files": [{"id": "f1", "name": "Blackwork"}, {"id": "f2", "name": "Anime"}]}"#,
                ))
            });

        let folders = connector(http).list_style_folders().await.unwrap();
        assert_eq!(folders.len(), 2);
        assert_eq!(folders[0].id, "f1");
        assert_eq!(folders[0].name, "Blackwork");
    }

    #[tokio::test]
    async fn test_listing_follows_page_tokens() {
        let mut http = MockHttp::new();
        http.expect_execute()
            .withf(|req| !req.url.contains("pageToken"))
            .times(1)
            .returning(|_| {
                Ok(page(
                    r#"{"files": [{"id": "f1", "name": "A"}], "nextPageToken": "tok2"}"#,
                ))
            });
        http.expect_execute()
            .withf(|req| req.url.contains("pageToken=tok2"))
            .times(1)
            .returning(|_| Ok(page(r#"{"files": [{"id": "f2", "name": "B"}]}"#)));

        let folders = connector(http).list_style_folders().await.unwrap();
        assert_eq!(folders.len(), 2);
        assert_eq!(folders[1].id, "f2");
    }

    #[tokio::test]
    async fn test_image_listing_filters_and_orders() {
        let mut http = MockHttp::new();
        http.expect_execute()
            .withf(|req| {
                req.url.contains("orderBy=modifiedTime+desc")
                    && req.url.contains("image")
                    && !req.url.contains("google-apps.folder")
            })
            .times(1)
            .returning(|_| {
                Ok(page(
                    r#"{"files": [{
                        "id": "img1",
                        "name": "rose.jpg",
                        "size": "1024",
                        "md5Checksum": "abc",
                        "createdTime": "2024-05-01T10:00:00.000Z",
                        "modifiedTime": "2024-05-02T10:00:00.000Z"
                    }]}"#,
                ))
            });

        let images = connector(http).list_images("folder-1").await.unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].size, Some(1024));
        assert_eq!(images[0].checksum.as_deref(), Some("abc"));
        assert_eq!(images[0].modified_time, "2024-05-02T10:00:00.000Z");
    }

    #[tokio::test]
    async fn test_api_error_surfaces_without_retry() {
        let mut http = MockHttp::new();
        http.expect_execute().times(1).returning(|_| {
            Ok(HttpResponse {
                status: 403,
                body: Bytes::from_static(b"rate limit"),
            })
        });

        let err = connector(http).list_style_folders().await.unwrap_err();
        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn test_download_uses_alt_media() {
        let mut http = MockHttp::new();
        http.expect_execute()
            .withf(|req| req.url == format!("{}/img1?alt=media", FILES_URL))
            .times(1)
            .returning(|_| {
                Ok(HttpResponse {
                    status: 200,
                    body: Bytes::from_static(b"jpegbytes"),
                })
            });

        let data = connector(http).download("img1").await.unwrap();
        assert_eq!(&data[..], b"jpegbytes");
    }

    #[test]
    fn test_query_value_escaping() {
        assert_eq!(escape_query_value("it's"), "it\\'s");
    }
}
