//! HTTP transport for the document server's `/upload` and `/query` endpoints.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, multipart};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Failures that prevent a reply from being interpreted.
///
/// Error statuses are not transport failures: they arrive as a [`Reply`] whose body carries the
/// server's `detail`/`error` fields.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The selected file could not be read from disk.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The request could not be built, sent, or answered.
    #[error("request to {url} failed: {source}")]
    Request {
        /// Endpoint that was contacted.
        url: String,
        /// Underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },
    /// The reply body was not JSON.
    #[error("response from {url} (status {status}) was not valid JSON: {source}")]
    Decode {
        /// Endpoint that answered.
        url: String,
        /// HTTP status of the undecodable reply.
        status: StatusCode,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
    /// The HTTP client itself could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// A single file ready to be sent in the multipart `file` field.
#[derive(Debug, Clone)]
pub struct FileAttachment {
    /// Base name reported to the server.
    pub file_name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl FileAttachment {
    /// Read a file from disk, keeping only its base name.
    pub async fn read(path: &Path) -> Result<Self, TransportError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| TransportError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { file_name, bytes })
    }
}

/// JSON body of `POST /query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRequest {
    /// Question text exactly as submitted.
    pub query: String,
}

/// HTTP status paired with the decoded JSON body.
#[derive(Debug, Clone)]
pub struct Reply {
    /// Status returned by the server.
    pub status: StatusCode,
    /// Parsed JSON body.
    pub body: Value,
}

impl Reply {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Interface to the document server used by the submission handlers.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Send one file as multipart form data.
    async fn upload(&self, file: FileAttachment) -> Result<Reply, TransportError>;

    /// Send a query as JSON.
    async fn query(&self, request: &QueryRequest) -> Result<Reply, TransportError>;
}

/// `reqwest`-backed implementation of [`Backend`].
pub struct HttpBackend {
    pub(crate) client: Client,
    pub(crate) base_url: String,
}

impl HttpBackend {
    /// Build a backend for the given server, with an optional per-request timeout.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder =
            Client::builder().user_agent(concat!("docquery/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(TransportError::Client)?;
        let base_url = base_url.trim_end_matches('/').to_string();
        tracing::debug!(url = %base_url, timeout = ?timeout, "Initialized HTTP backend");
        Ok(Self { client, base_url })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(
        &self,
        url: String,
        request: reqwest::RequestBuilder,
    ) -> Result<Reply, TransportError> {
        let response = request.send().await.map_err(|source| TransportError::Request {
            url: url.clone(),
            source,
        })?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|source| TransportError::Request {
                url: url.clone(),
                source,
            })?;
        let body = serde_json::from_slice(&bytes).map_err(|source| TransportError::Decode {
            url: url.clone(),
            status,
            source,
        })?;
        tracing::debug!(url = %url, status = status.as_u16(), "Received reply");
        Ok(Reply { status, body })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn upload(&self, file: FileAttachment) -> Result<Reply, TransportError> {
        let url = self.endpoint("upload");
        let part = multipart::Part::bytes(file.bytes).file_name(file.file_name);
        let form = multipart::Form::new().part("file", part);
        let request = self.client.post(&url).multipart(form);
        self.send(url, request).await
    }

    async fn query(&self, request: &QueryRequest) -> Result<Reply, TransportError> {
        let url = self.endpoint("query");
        let builder = self.client.post(&url).json(request);
        self.send(url, builder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};
    use serde_json::json;

    fn backend(server: &MockServer) -> HttpBackend {
        HttpBackend {
            client: Client::builder()
                .user_agent("docquery-test")
                .build()
                .expect("client"),
            base_url: server.base_url(),
        }
    }

    #[tokio::test]
    async fn upload_sends_multipart_file_field() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/upload")
                    .body_contains("name=\"file\"")
                    .body_contains("filename=\"notes.md\"")
                    .body_contains("# Notes");
                then.status(200)
                    .json_body(json!({ "message": "File uploaded and processed successfully" }));
            })
            .await;

        let reply = backend(&server)
            .upload(FileAttachment {
                file_name: "notes.md".into(),
                bytes: b"# Notes".to_vec(),
            })
            .await
            .expect("reply");

        mock.assert();
        assert!(reply.is_success());
        assert_eq!(
            reply.body["message"],
            "File uploaded and processed successfully"
        );
    }

    #[tokio::test]
    async fn query_posts_json_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/query")
                    .header("content-type", "application/json")
                    .json_body(json!({ "query": "What is chunking?" }));
                then.status(200).json_body(json!({ "response": "Splitting text." }));
            })
            .await;

        let reply = backend(&server)
            .query(&QueryRequest {
                query: "What is chunking?".into(),
            })
            .await
            .expect("reply");

        mock.assert();
        assert_eq!(reply.body["response"], "Splitting text.");
    }

    #[tokio::test]
    async fn error_statuses_are_replies_not_failures() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/upload");
                then.status(400).json_body(json!({ "detail": "Invalid file type" }));
            })
            .await;

        let reply = backend(&server)
            .upload(FileAttachment {
                file_name: "image.png".into(),
                bytes: vec![0x89, 0x50],
            })
            .await
            .expect("reply");

        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert!(!reply.is_success());
        assert_eq!(reply.body["detail"], "Invalid file type");
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/query");
                then.status(502).body("<html>Bad Gateway</html>");
            })
            .await;

        let error = backend(&server)
            .query(&QueryRequest {
                query: "hello".into(),
            })
            .await
            .expect_err("decode failure");

        assert!(
            matches!(error, TransportError::Decode { status, .. } if status == StatusCode::BAD_GATEWAY)
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_a_request_error() {
        let backend = HttpBackend::new("http://127.0.0.1:9/", None).expect("backend");
        assert_eq!(backend.base_url(), "http://127.0.0.1:9");

        let error = backend
            .query(&QueryRequest {
                query: "hello".into(),
            })
            .await
            .expect_err("connection failure");

        assert!(matches!(error, TransportError::Request { url, .. } if url == "http://127.0.0.1:9/query"));
    }

    #[tokio::test]
    async fn attachment_keeps_base_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.txt");
        std::fs::write(&path, "body").expect("write fixture");

        let attachment = FileAttachment::read(&path).await.expect("attachment");
        assert_eq!(attachment.file_name, "report.txt");
        assert_eq!(attachment.bytes, b"body");

        let missing = FileAttachment::read(&dir.path().join("missing.txt")).await;
        assert!(matches!(missing, Err(TransportError::ReadFile { .. })));
    }
}
