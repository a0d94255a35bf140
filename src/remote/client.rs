//! HTTP client for the remote inpainting service

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::capture::image::Snapshot;
use crate::session::results::ResultSet;

/// Multipart field the service reads the photo from
const UPLOAD_FIELD: &str = "file";
/// Filename attached to the multipart part
const UPLOAD_FILENAME: &str = "captured_image.jpg";
/// Processing endpoint under the configured base URL
const PROCESS_PATH: &str = "/process_image";

/// Inpainting a 1024x1024 photo can take a while on a CPU-only service
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Why a submission failed.
///
/// Every variant lands the session in the Failed state; the split only
/// matters for diagnostics.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The round trip never completed (DNS, refused connection, timeout)
    #[error("could not reach the inpainting service: {0}")]
    Transport(#[from] reqwest::Error),
    /// The service answered with a non-success status
    #[error("inpainting service returned {status}: {detail}")]
    Rejected { status: StatusCode, detail: String },
    /// The body was not the expected JSON shape
    #[error("inpainting service response was malformed: {0}")]
    MalformedResponse(String),
}

/// Client for one inpainting service endpoint
#[derive(Clone, Debug)]
pub struct InpaintClient {
    client: Client,
    base_url: String,
}

impl InpaintClient {
    /// Create a client for the service rooted at `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self, UploadError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(UploadError::Transport)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// Full URL submissions are posted to
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, PROCESS_PATH)
    }

    /// Submit one snapshot and wait for the three result images.
    ///
    /// Either all three come back or the whole call fails; there is no
    /// partial result.
    pub async fn process(&self, snapshot: &Snapshot) -> Result<ResultSet, UploadError> {
        let part = Part::bytes(snapshot.jpeg.clone())
            .file_name(UPLOAD_FILENAME)
            .mime_str("image/jpeg")
            .map_err(UploadError::Transport)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let url = self.endpoint();
        log::debug!("posting {} byte snapshot to {url}", snapshot.jpeg.len());
        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = short_detail(&response.text().await.unwrap_or_default());
            return Err(UploadError::Rejected { status, detail });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|err| UploadError::MalformedResponse(err.to_string()))
    }
}

/// Error bodies can be whole HTML pages; keep only a log-friendly prefix
fn short_detail(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "(no body)".to_string();
    }
    if trimmed.chars().count() > 200 {
        let mut detail: String = trimmed.chars().take(200).collect();
        detail.push_str("...");
        detail
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use image::RgbaImage;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;
    use crate::session::results::ResultKind;

    fn snapshot() -> Snapshot {
        let img = RgbaImage::from_pixel(6, 6, image::Rgba([200, 60, 20, 255]));
        Snapshot::from_rgba(&img).unwrap()
    }

    fn json_response(body: &str) -> String {
        format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
        )
    }

    /// Serve exactly one request, reply with `response`, return the raw
    /// request bytes.
    async fn serve_once(response: String) -> (String, JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                if let Some(total) = expected_request_len(&request) {
                    if request.len() >= total {
                        break;
                    }
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            request
        });
        (format!("http://{addr}"), handle)
    }

    fn expected_request_len(buf: &[u8]) -> Option<usize> {
        let headers_end = buf.windows(4).position(|w| w == b"\r\n\r\n")? + 4;
        let head = std::str::from_utf8(&buf[..headers_end]).ok()?;
        let length = head.lines().find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.trim().eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })?;
        Some(headers_end + length)
    }

    #[tokio::test]
    async fn test_process_posts_multipart_and_parses_results() {
        let body = r#"{"base_image":"AAAA","image_with_hole":"BBBB","prediction":"CCCC"}"#;
        let (base_url, server) = serve_once(json_response(body)).await;

        let client = InpaintClient::new(&base_url).unwrap();
        let results = client.process(&snapshot()).await.unwrap();
        assert_eq!(results.base_image, "AAAA");
        assert_eq!(results.image_with_hole, "BBBB");
        assert_eq!(
            results.data_uri(ResultKind::Prediction),
            "data:image/jpeg;base64,CCCC"
        );

        let request = server.await.unwrap();
        let head_len = request.windows(4).position(|w| w == b"\r\n\r\n").unwrap();
        let head = std::str::from_utf8(&request[..head_len]).unwrap();
        assert!(head.starts_with("POST /process_image HTTP/1.1"));

        let request_text = String::from_utf8_lossy(&request);
        assert!(request_text.contains(r#"name="file""#));
        assert!(request_text.contains(r#"filename="captured_image.jpg""#));
        assert!(request_text.contains("image/jpeg"));
        // The JPEG payload itself travels in the body.
        assert!(request.windows(2).any(|w| w == [0xFF, 0xD8]));
    }

    #[tokio::test]
    async fn test_non_success_status_is_rejected_with_detail() {
        let response =
            "HTTP/1.1 500 INTERNAL SERVER ERROR\r\ncontent-length: 14\r\nconnection: close\r\n\r\nmodel exploded"
                .to_string();
        let (base_url, server) = serve_once(response).await;

        let client = InpaintClient::new(&base_url).unwrap();
        let err = client.process(&snapshot()).await.unwrap_err();
        match err {
            UploadError::Rejected { status, detail } => {
                assert_eq!(status.as_u16(), 500);
                assert_eq!(detail, "model exploded");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unparseable_body_is_malformed() {
        let (base_url, server) = serve_once(json_response("this is not json")).await;
        let client = InpaintClient::new(&base_url).unwrap();
        let err = client.process(&snapshot()).await.unwrap_err();
        assert!(matches!(err, UploadError::MalformedResponse(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_field_is_malformed() {
        let (base_url, server) = serve_once(json_response(r#"{"base_image":"QUFB"}"#)).await;
        let client = InpaintClient::new(&base_url).unwrap();
        let err = client.process(&snapshot()).await.unwrap_err();
        match err {
            UploadError::MalformedResponse(detail) => assert!(detail.contains("missing field")),
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport() {
        // Grab a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = InpaintClient::new(format!("http://{addr}")).unwrap();
        let err = client.process(&snapshot()).await.unwrap_err();
        assert!(matches!(err, UploadError::Transport(_)));
    }

    #[test]
    fn test_endpoint_ignores_trailing_slash() {
        let client = InpaintClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.endpoint(), "http://localhost:5000/process_image");
    }

    #[test]
    fn test_short_detail_caps_long_bodies() {
        assert_eq!(short_detail("  boom  "), "boom");
        assert_eq!(short_detail(""), "(no body)");
        let long = "x".repeat(500);
        let detail = short_detail(&long);
        assert!(detail.len() < 250);
        assert!(detail.ends_with("..."));
    }
}
