//! Drive v3 over HTTP
//!
//! Implements [`DriveApi`] on top of the host [`HttpClient`]. One call is one
//! request: no retries, no backoff, and any non-2xx status surfaces as
//! [`ProviderFailure::Api`] carrying the message Google sent back.

use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bytes::{BufMut, Bytes, BytesMut};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::api::{DriveApi, ListRequest, MediaContent, PermissionRequest};
use crate::error::{ApiResult, ProviderFailure};
use crate::types::{ApiErrorResponse, DriveFile, FilesListResponse, NewFile, Permission};

/// Google Drive API base URL
pub const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Google Drive upload base URL
pub const DRIVE_UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3";

/// Per-request timeout used unless configured otherwise
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP implementation of [`DriveApi`]
pub struct HttpDriveApi {
    http_client: Arc<dyn HttpClient>,
    api_base: String,
    upload_base: String,
    timeout: Duration,
}

impl HttpDriveApi {
    /// Client against the public Google endpoints
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self::with_endpoints(http_client, DRIVE_API_BASE, DRIVE_UPLOAD_BASE)
    }

    pub fn with_endpoints(
        http_client: Arc<dyn HttpClient>,
        api_base: impl Into<String>,
        upload_base: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            upload_base: upload_base.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn request(&self, method: HttpMethod, url: String, access_token: &str) -> HttpRequest {
        HttpRequest::new(method, url)
            .bearer_token(access_token)
            .header("Accept", "application/json")
            .timeout(self.timeout)
    }

    fn file_url(&self, file_id: &str) -> String {
        format!("{}/files/{}", self.api_base, urlencoding::encode(file_id))
    }

    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        let method = request.method;
        let response = self.http_client.execute(request).await?;

        if response.is_success() {
            debug!(?method, status = response.status, "Drive request succeeded");
            Ok(response)
        } else {
            Err(api_error(&response))
        }
    }
}

/// Map a non-2xx response to a failure, preferring Google's own message.
fn api_error(response: &HttpResponse) -> ProviderFailure {
    let message = serde_json::from_slice::<ApiErrorResponse>(&response.body)
        .ok()
        .and_then(|e| e.error.message)
        .unwrap_or_else(|| String::from_utf8_lossy(&response.body).trim().to_string());

    warn!(status = response.status, message = %message, "Drive request failed");

    ProviderFailure::Api {
        status: response.status,
        message,
    }
}

/// Decode a JSON body, treating an empty body as an absent result.
fn parse_optional<T: DeserializeOwned>(response: &HttpResponse, what: &str) -> ApiResult<Option<T>> {
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    serde_json::from_slice(&response.body)
        .map(Some)
        .map_err(|e| ProviderFailure::Parse(format!("Failed to parse {}: {}", what, e)))
}

/// Assemble a `multipart/related` body of JSON metadata followed by media.
fn multipart_body(boundary: &str, metadata: &[u8], content: &MediaContent) -> Bytes {
    let mut body = BytesMut::with_capacity(metadata.len() + content.data.len() + 256);

    body.put_slice(format!("--{}\r\n", boundary).as_bytes());
    body.put_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.put_slice(metadata);
    body.put_slice(format!("\r\n--{}\r\n", boundary).as_bytes());
    body.put_slice(format!("Content-Type: {}\r\n\r\n", content.mime_type).as_bytes());
    body.put_slice(&content.data);
    body.put_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    body.freeze()
}

#[async_trait]
impl DriveApi for HttpDriveApi {
    #[instrument(skip(self, access_token), fields(query = %request.query))]
    async fn list_files(
        &self,
        access_token: &str,
        request: &ListRequest,
    ) -> ApiResult<Option<FilesListResponse>> {
        let mut url = format!(
            "{}/files?q={}&spaces={}&fields={}",
            self.api_base,
            urlencoding::encode(&request.query),
            urlencoding::encode(&request.spaces),
            urlencoding::encode(&request.fields)
        );

        if let Some(page_size) = request.page_size {
            url.push_str(&format!("&pageSize={}", page_size));
        }
        if let Some(page_token) = &request.page_token {
            url.push_str(&format!("&pageToken={}", urlencoding::encode(page_token)));
        }

        let response = self
            .send(self.request(HttpMethod::Get, url, access_token))
            .await?;

        parse_optional(&response, "files list response")
    }

    #[instrument(skip(self, access_token, metadata), fields(name = %metadata.name))]
    async fn create_file(
        &self,
        access_token: &str,
        metadata: &NewFile,
        fields: &str,
    ) -> ApiResult<Option<DriveFile>> {
        let url = format!(
            "{}/files?fields={}",
            self.api_base,
            urlencoding::encode(fields)
        );
        let request = self
            .request(HttpMethod::Post, url, access_token)
            .json(metadata)?;

        let response = self.send(request).await?;
        parse_optional(&response, "created file")
    }

    #[instrument(
        skip(self, access_token, metadata, content),
        fields(name = %metadata.name, mime_type = %content.mime_type, size = content.data.len())
    )]
    async fn create_file_with_content(
        &self,
        access_token: &str,
        metadata: &NewFile,
        content: MediaContent,
        fields: &str,
    ) -> ApiResult<Option<DriveFile>> {
        let url = format!(
            "{}/files?uploadType=multipart&fields={}",
            self.upload_base,
            urlencoding::encode(fields)
        );

        let metadata = serde_json::to_vec(metadata)
            .map_err(|e| ProviderFailure::Parse(format!("Failed to encode file metadata: {}", e)))?;
        let boundary = format!("drive_facade_{}", Uuid::new_v4().simple());
        let body = multipart_body(&boundary, &metadata, &content);

        let request = self
            .request(HttpMethod::Post, url, access_token)
            .header(
                "Content-Type",
                format!("multipart/related; boundary={}", boundary),
            )
            .body(body);

        let response = self.send(request).await?;
        parse_optional(&response, "uploaded file")
    }

    #[instrument(skip(self, access_token, sink), fields(file_id = %file_id))]
    async fn download_media(
        &self,
        access_token: &str,
        file_id: &str,
        sink: &mut BytesMut,
    ) -> ApiResult<()> {
        let url = format!("{}?alt=media", self.file_url(file_id));
        let response = self
            .send(self.request(HttpMethod::Get, url, access_token))
            .await?;

        sink.extend_from_slice(&response.body);
        debug!(bytes = response.body.len(), "Downloaded file content");
        Ok(())
    }

    #[instrument(skip(self, access_token), fields(file_id = %file_id))]
    async fn delete_file(&self, access_token: &str, file_id: &str) -> ApiResult<()> {
        let url = self.file_url(file_id);
        self.send(self.request(HttpMethod::Delete, url, access_token))
            .await?;
        Ok(())
    }

    #[instrument(skip(self, access_token), fields(file_id = %file_id))]
    async fn create_permission(
        &self,
        access_token: &str,
        file_id: &str,
        permission: &PermissionRequest,
        fields: &str,
    ) -> ApiResult<Option<Permission>> {
        let url = format!(
            "{}/permissions?fields={}",
            self.file_url(file_id),
            urlencoding::encode(fields)
        );
        let request = self
            .request(HttpMethod::Post, url, access_token)
            .json(permission)?;

        let response = self.send(request).await?;
        parse_optional(&response, "permission")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::BridgeError;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        Http {}

        #[async_trait]
        impl HttpClient for Http {
            async fn execute(&self, request: HttpRequest) -> bridge_traits::error::Result<HttpResponse>;
        }
    }

    fn response(status: u16, body: &'static str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body),
        }
    }

    fn api(mock_http: MockHttp) -> HttpDriveApi {
        HttpDriveApi::new(Arc::new(mock_http))
    }

    #[tokio::test]
    async fn test_list_files_builds_query_url() {
        let mut mock_http = MockHttp::new();

        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(req.method, HttpMethod::Get);
            assert_eq!(
                req.headers.get("Authorization").map(String::as_str),
                Some("Bearer tok")
            );
            assert!(req.url.starts_with("https://www.googleapis.com/drive/v3/files?q="));
            assert!(req
                .url
                .contains("q=mimeType%21%3D%27application%2Fvnd.google-apps.folder%27"));
            assert!(req.url.contains("&spaces=drive"));
            assert!(req.url.contains("&pageSize=20"));
            assert!(req.url.contains("&pageToken=abc%2Fdef"));
            assert_eq!(req.timeout, Some(DEFAULT_TIMEOUT));

            Ok(response(
                200,
                r#"{
                    "files": [{"id": "f1", "name": "a.txt", "createdTime": "2024-01-01T00:00:00Z"}],
                    "nextPageToken": "next"
                }"#,
            ))
        });

        let request = ListRequest::new(
            "mimeType!='application/vnd.google-apps.folder' and 'F' in parents",
            "drive",
            "nextPageToken, files(id, name, parents, createdTime)",
        )
        .page_size(20)
        .page_token(Some("abc/def".to_string()));

        let page = api(mock_http)
            .list_files("tok", &request)
            .await
            .unwrap()
            .unwrap();

        let files = page.files.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].id.as_deref(), Some("f1"));
        assert_eq!(page.next_page_token.as_deref(), Some("next"));
    }

    #[tokio::test]
    async fn test_list_files_without_paging() {
        let mut mock_http = MockHttp::new();

        mock_http.expect_execute().times(1).returning(|req| {
            assert!(!req.url.contains("pageSize"));
            assert!(!req.url.contains("pageToken"));
            Ok(response(200, r#"{"files": []}"#))
        });

        let page = api(mock_http)
            .list_files("tok", &ListRequest::new("q", "drive", "id"))
            .await
            .unwrap()
            .unwrap();

        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_uses_google_message() {
        let mut mock_http = MockHttp::new();

        mock_http.expect_execute().times(1).returning(|_| {
            Ok(response(
                404,
                r#"{"error": {"code": 404, "message": "File not found: missing."}}"#,
            ))
        });

        let err = api(mock_http).delete_file("tok", "missing").await.unwrap_err();

        match err {
            ProviderFailure::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "File not found: missing.");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_status_with_plain_body() {
        let mut mock_http = MockHttp::new();

        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(response(502, "Bad Gateway\n")));

        let err = api(mock_http)
            .list_files("tok", &ListRequest::new("q", "drive", "id"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProviderFailure::Api { status: 502, ref message } if message == "Bad Gateway"
        ));
    }

    #[tokio::test]
    async fn test_transport_error_is_not_retried() {
        let mut mock_http = MockHttp::new();

        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Err(BridgeError::OperationFailed("connection reset".to_string())));

        let err = api(mock_http).delete_file("tok", "f1").await.unwrap_err();
        assert!(matches!(err, ProviderFailure::Bridge(_)));
    }

    #[tokio::test]
    async fn test_create_folder() {
        let mut mock_http = MockHttp::new();

        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(req.method, HttpMethod::Post);
            assert_eq!(req.url, "https://www.googleapis.com/drive/v3/files?fields=id");
            let body: serde_json::Value = serde_json::from_slice(req.body.as_ref().unwrap()).unwrap();
            assert_eq!(
                body,
                serde_json::json!({
                    "name": "childFolder",
                    "mimeType": "application/vnd.google-apps.folder",
                    "parents": ["P"]
                })
            );
            Ok(response(200, r#"{"id": "C"}"#))
        });

        let metadata = NewFile {
            name: "childFolder".to_string(),
            mime_type: Some("application/vnd.google-apps.folder".to_string()),
            parents: vec!["P".to_string()],
        };

        let created = api(mock_http)
            .create_file("tok", &metadata, "id")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(created.id.as_deref(), Some("C"));
    }

    #[tokio::test]
    async fn test_create_with_empty_body_is_absent() {
        let mut mock_http = MockHttp::new();

        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(response(200, "")));

        let metadata = NewFile {
            name: "x".to_string(),
            mime_type: None,
            parents: vec![],
        };

        let created = api(mock_http)
            .create_file("tok", &metadata, "id")
            .await
            .unwrap();

        assert!(created.is_none());
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_failure() {
        let mut mock_http = MockHttp::new();

        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(response(200, "{not json")));

        let err = api(mock_http)
            .list_files("tok", &ListRequest::new("q", "drive", "id"))
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderFailure::Parse(_)));
    }

    #[tokio::test]
    async fn test_multipart_upload() {
        let mut mock_http = MockHttp::new();

        mock_http.expect_execute().times(1).returning(|req| {
            assert!(req.url.starts_with(
                "https://www.googleapis.com/upload/drive/v3/files?uploadType=multipart&fields="
            ));

            let content_type = req.headers.get("Content-Type").unwrap();
            let boundary = content_type
                .strip_prefix("multipart/related; boundary=")
                .unwrap()
                .to_string();

            let body = String::from_utf8(req.body.as_ref().unwrap().to_vec()).unwrap();
            assert!(body.starts_with(&format!("--{}\r\n", boundary)));
            assert!(body.contains(r#""name":"notes.txt""#));
            assert!(body.contains(r#""parents":["F1"]"#));
            assert!(body.contains("Content-Type: text/plain\r\n\r\nhello drive"));
            assert!(body.ends_with(&format!("\r\n--{}--\r\n", boundary)));

            Ok(response(
                200,
                r#"{"id": "u1", "name": "notes.txt", "parents": ["F1"], "createdTime": "2024-05-01T10:00:00Z"}"#,
            ))
        });

        let metadata = NewFile {
            name: "notes.txt".to_string(),
            mime_type: None,
            parents: vec!["F1".to_string()],
        };
        let content = MediaContent {
            mime_type: "text/plain".to_string(),
            data: Bytes::from_static(b"hello drive"),
        };

        let created = api(mock_http)
            .create_file_with_content("tok", &metadata, content, "id, name, parents, createdTime")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(created.id.as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn test_download_appends_to_sink() {
        let mut mock_http = MockHttp::new();

        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(req.url, "https://www.googleapis.com/drive/v3/files/file%201?alt=media");
            Ok(HttpResponse {
                status: 200,
                headers: HashMap::new(),
                body: Bytes::from(vec![1, 2, 3, 4, 5]),
            })
        });

        let mut sink = BytesMut::new();
        api(mock_http)
            .download_media("tok", "file 1", &mut sink)
            .await
            .unwrap();

        assert_eq!(&sink[..], &[1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_delete_accepts_no_content() {
        let mut mock_http = MockHttp::new();

        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(req.method, HttpMethod::Delete);
            assert_eq!(req.url, "https://www.googleapis.com/drive/v3/files/f1");
            Ok(response(204, ""))
        });

        api(mock_http).delete_file("tok", "f1").await.unwrap();
    }

    #[tokio::test]
    async fn test_create_permission() {
        let mut mock_http = MockHttp::new();

        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(
                req.url,
                "https://www.googleapis.com/drive/v3/files/f1/permissions?fields=id"
            );
            let body: serde_json::Value = serde_json::from_slice(req.body.as_ref().unwrap()).unwrap();
            assert_eq!(body, serde_json::json!({"type": "anyone", "role": "reader"}));
            Ok(response(200, r#"{"id": "anyoneWithLink"}"#))
        });

        let permission = api(mock_http)
            .create_permission("tok", "f1", &PermissionRequest::anyone_reader(), "id")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(permission.id.as_deref(), Some("anyoneWithLink"));
    }

    #[tokio::test]
    async fn test_custom_endpoints() {
        let mut mock_http = MockHttp::new();

        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(req.url, "http://localhost:8080/drive/files/f1");
            assert_eq!(req.timeout, Some(Duration::from_secs(5)));
            Ok(response(204, ""))
        });

        let api = HttpDriveApi::with_endpoints(
            Arc::new(mock_http),
            "http://localhost:8080/drive/",
            "http://localhost:8080/upload",
        )
        .with_timeout(Duration::from_secs(5));

        api.delete_file("tok", "f1").await.unwrap();
    }
}
