//! HTTP client for the conversion server

use crate::error::{ClientError, Result};
use crate::types::{Conversion, ConvertRequest, ConvertResponse, ServerReply, UploadResponse};
use crate::validation::FileCandidate;
use futures::StreamExt;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Clone, Debug)]
pub struct ApiClient {
    base: Url,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = parse_base(base_url)?;
        Ok(Self { base, client: reqwest::Client::new() })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve a server-relative path (`/static/images/x.png`) or pass through
    /// an absolute URL.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| ClientError::Server(format!("Invalid URL {path}: {e}")))
    }

    /// `POST /upload` with the file as multipart field `file`
    pub async fn upload(&self, file: &FileCandidate) -> Result<UploadResponse> {
        let bytes = tokio::fs::read(&file.path).await?;
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file.file_name())
            .mime_str(&file.mime_type())?;
        let form = reqwest::multipart::Form::new().part("file", part);

        info!(path = %file.path.display(), size = file.size, "Uploading image");
        let response = self
            .client
            .post(self.resolve("/upload")?)
            .multipart(form)
            .send()
            .await?;
        Self::read_reply(response).await
    }

    /// `POST /convert` for the stored filename
    pub async fn convert(&self, filename: &str, conversion: Conversion) -> Result<ConvertResponse> {
        let body = ConvertRequest { filename: filename.to_string(), conversion };
        debug!(?body, "Requesting conversion");
        let response = self
            .client
            .post(self.resolve("/convert")?)
            .json(&body)
            .send()
            .await?;
        Self::read_reply(response).await
    }

    /// Fetch image bytes for display
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(self.resolve(url)?).send().await?;
        let response = response.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Stream `download_path` (a `/download/...` URL) to `dest`, reporting
    /// `(downloaded, total)` as chunks arrive. Stops early when `token` fires.
    pub async fn download_to(
        &self,
        download_path: &str,
        dest: &Path,
        token: &CancellationToken,
        mut progress: impl FnMut(u64, u64),
    ) -> Result<u64> {
        let response = self.client.get(self.resolve(download_path)?).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            // The server reports encoder failures as `{error}`
            let message = match response.json::<ServerReply<serde_json::Value>>().await {
                Ok(ServerReply::Error { error }) => error,
                _ => format!("HTTP {status}"),
            };
            return Err(ClientError::Server(message));
        }

        let total = response.content_length().unwrap_or(0);
        let mut file = tokio::fs::File::create(dest).await?;
        let result = Self::stream_body(response, &mut file, token, total, &mut progress).await;
        drop(file);

        match result {
            Ok(downloaded) => {
                info!(dest = %dest.display(), bytes = downloaded, "Download complete");
                Ok(downloaded)
            }
            Err(e) => {
                // Never leave a truncated file behind
                tokio::fs::remove_file(dest).await.ok();
                Err(e)
            }
        }
    }

    async fn stream_body(
        response: reqwest::Response,
        file: &mut tokio::fs::File,
        token: &CancellationToken,
        total: u64,
        progress: &mut impl FnMut(u64, u64),
    ) -> Result<u64> {
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    return Err(ClientError::Io(std::io::Error::new(
                        std::io::ErrorKind::Interrupted,
                        "download cancelled",
                    )));
                }
                chunk = stream.next() => {
                    match chunk {
                        Some(Ok(data)) => {
                            file.write_all(&data).await?;
                            downloaded += data.len() as u64;
                            progress(downloaded, total);
                        }
                        Some(Err(e)) => return Err(e.into()),
                        None => break,
                    }
                }
            }
        }

        file.flush().await?;
        Ok(downloaded)
    }

    /// The body decides the outcome: error replies arrive with 4xx/5xx
    /// statuses but still carry JSON.
    async fn read_reply<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let reply: ServerReply<T> = response.json().await?;
        match reply {
            ServerReply::Ok(payload) => Ok(payload),
            ServerReply::Error { error } => {
                debug!(%status, %error, "Server reported error");
                Err(ClientError::Server(error))
            }
        }
    }
}

fn parse_base(base_url: &str) -> Result<Url> {
    let trimmed = base_url.trim().trim_end_matches('/');
    Url::parse(&format!("{trimmed}/"))
        .map_err(|e| ClientError::Server(format!("Invalid server URL {base_url}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_paths() {
        let client = ApiClient::new("http://127.0.0.1:5000").unwrap();
        assert_eq!(
            client.resolve("/static/images/a.png").unwrap().as_str(),
            "http://127.0.0.1:5000/static/images/a.png"
        );
        assert_eq!(
            client
                .resolve("/download/a.png?format=PNG&quality=90")
                .unwrap()
                .as_str(),
            "http://127.0.0.1:5000/download/a.png?format=PNG&quality=90"
        );
    }

    #[test]
    fn test_resolve_absolute_passthrough() {
        let client = ApiClient::new("http://localhost:5000/").unwrap();
        assert_eq!(
            client.resolve("http://cdn.example/static/images/b.jpg").unwrap().as_str(),
            "http://cdn.example/static/images/b.jpg"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(ApiClient::new("not a url").is_err());
        assert!(ApiClient::new("http://").is_err());
        assert!(ApiClient::new("").is_err());
    }

    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    /// Accept one connection, read the full request, answer with `response`.
    /// The handle resolves to the raw request bytes.
    async fn serve_once(response: Vec<u8>) -> (String, tokio::task::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            while !request_complete(&request) {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(&response).await.unwrap();
            socket.shutdown().await.ok();
            request
        });
        (format!("http://{addr}"), handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let head = String::from_utf8_lossy(&request[..end]).to_ascii_lowercase();
        let body_len = request.len() - (end + 4);
        if let Some(len) = head.lines().find_map(|l| l.strip_prefix("content-length:")) {
            return body_len >= len.trim().parse::<usize>().unwrap_or(0);
        }
        if head.contains("transfer-encoding: chunked") {
            return request.ends_with(b"0\r\n\r\n");
        }
        true
    }

    fn http_response(status: &str, content_type: &str, body: &str) -> Vec<u8> {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .into_bytes()
    }

    fn temp_image(name: &str) -> FileCandidate {
        let dir = std::env::temp_dir().join("image-studio-api-tests");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, b"\x89PNG fake").unwrap();
        FileCandidate { path, mime: Some("image/png".to_string()), size: 9 }
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_file_field() {
        let body = r#"{"original": "/static/images/cat.png", "converted": {}, "text": null}"#;
        let (base, server) = serve_once(http_response("200 OK", "application/json", body)).await;
        let client = ApiClient::new(&base).unwrap();

        let response = client.upload(&temp_image("cat.png")).await.unwrap();
        assert_eq!(response.original, "/static/images/cat.png");

        let request = String::from_utf8_lossy(&server.await.unwrap()).to_string();
        assert!(request.starts_with("POST /upload "));
        assert!(request.to_ascii_lowercase().contains("content-type: multipart/form-data"));
        assert!(request.contains(r#"name="file"; filename="cat.png""#));
        assert!(request.contains("Content-Type: image/png"));
    }

    #[tokio::test]
    async fn test_error_body_wins_over_status() {
        let message = "Invalid file type. Please upload an image file.";
        let body = format!(r#"{{"error": "{message}"}}"#);
        let (base, server) = serve_once(http_response("400 Bad Request", "application/json", &body)).await;
        let client = ApiClient::new(&base).unwrap();

        let err = client.upload(&temp_image("bad.png")).await.unwrap_err();
        assert!(matches!(err, ClientError::Server(ref m) if m == message));
        assert_eq!(err.user_message("fallback"), message);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_non_json_error_uses_transport_fallback() {
        let fallback = "An error occurred while processing your image. Please try again.";
        let (base, server) =
            serve_once(http_response("413 Payload Too Large", "text/html", "<h1>Too large</h1>")).await;
        let client = ApiClient::new(&base).unwrap();

        let err = client.upload(&temp_image("huge.png")).await.unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
        assert_eq!(err.user_message(fallback), fallback);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_convert_posts_json() {
        let body = r#"{"converted": "/static/images/converted_1.jpg"}"#;
        let (base, server) = serve_once(http_response("200 OK", "application/json", body)).await;
        let client = ApiClient::new(&base).unwrap();

        let response = client
            .convert("abc.png", Conversion::enhance_from_percent(200))
            .await
            .unwrap();
        assert_eq!(response.converted, "/static/images/converted_1.jpg");

        let request = String::from_utf8_lossy(&server.await.unwrap()).to_string();
        assert!(request.starts_with("POST /convert "));
        assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
        assert!(request.contains(r#""filename":"abc.png""#));
        assert!(request.contains(r#""type":"enhance""#));
    }

    #[tokio::test]
    async fn test_truncated_download_removes_partial_file() {
        let mut response =
            b"HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: 1000\r\nConnection: close\r\n\r\n"
                .to_vec();
        response.extend_from_slice(&[7u8; 10]);
        let (base, server) = serve_once(response).await;
        let client = ApiClient::new(&base).unwrap();

        let dir = std::env::temp_dir().join("image-studio-api-tests");
        std::fs::create_dir_all(&dir).unwrap();
        let dest = dir.join("truncated.png");
        let _ = std::fs::remove_file(&dest);

        let token = CancellationToken::new();
        let result = client
            .download_to("/download/abc.png?format=PNG&quality=95", &dest, &token, |_, _| {})
            .await;
        server.await.unwrap();

        assert!(result.is_err());
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_download_writes_file() {
        let (base, server) = serve_once(http_response("200 OK", "image/jpeg", "jpegbytes")).await;
        let client = ApiClient::new(&base).unwrap();

        let dir = std::env::temp_dir().join("image-studio-api-tests");
        std::fs::create_dir_all(&dir).unwrap();
        let dest = dir.join("complete.jpg");

        let mut last = (0, 0);
        let token = CancellationToken::new();
        let written = client
            .download_to("/download/abc.jpg?format=JPEG&quality=95", &dest, &token, |done, total| {
                last = (done, total)
            })
            .await
            .unwrap();
        let request = String::from_utf8_lossy(&server.await.unwrap()).to_string();

        assert_eq!(written, 9);
        assert_eq!(last, (9, 9));
        assert_eq!(std::fs::read(&dest).unwrap(), b"jpegbytes");
        assert!(request.starts_with("GET /download/abc.jpg?format=JPEG&quality=95 "));
        std::fs::remove_file(&dest).ok();
    }
}
