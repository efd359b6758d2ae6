use std::path::Path;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Response};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use url::Url;

use super::listing::{DownloadLinkBody, ResourcePage};
use super::{DiskApi, DEFAULT_BASE_URL, DOWNLOAD_CHUNK_SIZE};
use crate::error::ApiError;
use crate::models::{DirectoryListing, RemoteEntry, UserInfo};

#[derive(Debug, Clone)]
pub struct YandexDiskClient {
    http: reqwest::Client,
    base_url: String,
    auth: HeaderValue,
}

impl YandexDiskClient {
    pub fn new(token: &str) -> Result<Self, ApiError> {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(token: &str, base_url: &str) -> Result<Self, ApiError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ApiError::InvalidToken("token is empty".to_string()));
        }

        let mut auth = HeaderValue::from_str(&format!("OAuth {}", token))
            .map_err(|e| ApiError::InvalidToken(e.to_string()))?;
        auth.set_sensitive(true);

        let http = reqwest::Client::builder()
            .user_agent(concat!("diskr/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, endpoint))
            .header(AUTHORIZATION, self.auth.clone())
    }

    /// Sends the request and turns transport failures and non-2xx statuses
    /// into `ApiError`, logging the server's reply.
    async fn send(request: RequestBuilder, action: &str) -> Result<Response, ApiError> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("{} failed: {}", action, e);
                return Err(ApiError::from(e));
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::error!("{} failed: status {}, response: {}", action, status, body);
        Err(ApiError::Http {
            status: status.as_u16(),
            body,
        })
    }

    async fn stream_to_file(response: Response, local_path: &Path) -> Result<u64, ApiError> {
        let file = File::create(local_path).await?;
        let mut writer = BufWriter::with_capacity(DOWNLOAD_CHUNK_SIZE, file);
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(ApiError::from)?;
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        writer.flush().await?;
        Ok(written)
    }
}

#[async_trait]
impl DiskApi for YandexDiskClient {
    async fn user_info(&self) -> Result<UserInfo, ApiError> {
        let request = self.request(Method::GET, "/");
        let response = Self::send(request, "Fetching user info").await?;
        Ok(response.json::<UserInfo>().await?)
    }

    async fn list_directory(
        &self,
        path: &str,
        limit: u32,
        offset: u32,
    ) -> Result<DirectoryListing, ApiError> {
        tracing::debug!("Listing {} (limit {}, offset {})", path, limit, offset);
        let request = self.request(Method::GET, "/resources").query(&[
            ("path", path.to_string()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ]);
        let response = Self::send(request, "Listing files").await?;
        let page = response.json::<ResourcePage>().await?;
        Ok(page.into_listing(path, limit, offset))
    }

    async fn resource_info(&self, path: &str) -> Result<RemoteEntry, ApiError> {
        let request = self
            .request(Method::GET, "/resources")
            .query(&[("path", path)]);
        let response = Self::send(request, "Fetching resource info").await?;
        Ok(response.json::<RemoteEntry>().await?)
    }

    async fn download_link(&self, path: &str) -> Result<Url, ApiError> {
        let request = self
            .request(Method::GET, "/resources/download")
            .query(&[("path", path)]);
        let response = Self::send(request, "Fetching download link").await?;
        let body = response.json::<DownloadLinkBody>().await?;

        let href = body
            .href
            .ok_or_else(|| ApiError::InvalidResponse("download link has no href".to_string()))?;
        Url::parse(&href).map_err(|e| ApiError::InvalidResponse(format!("bad href {}: {}", href, e)))
    }

    async fn download_file(&self, remote_path: &str, local_path: &Path) -> Result<(), ApiError> {
        let href = self.download_link(remote_path).await?;

        // Pre-signed link: no OAuth header.
        let request = self.http.get(href);
        let response = Self::send(request, &format!("Downloading {}", remote_path)).await?;

        match Self::stream_to_file(response, local_path).await {
            Ok(bytes) => {
                tracing::info!("Downloaded {} -> {:?} ({} bytes)", remote_path, local_path, bytes);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Downloading {} to {:?} failed: {}", remote_path, local_path, e);
                Err(e)
            }
        }
    }

    async fn create_folder(&self, path: &str) -> bool {
        let request = self
            .request(Method::PUT, "/resources")
            .query(&[("path", path)]);
        match Self::send(request, &format!("Creating folder {}", path)).await {
            Ok(_) => {
                tracing::info!("Created folder {}", path);
                true
            }
            Err(_) => false,
        }
    }

    async fn delete_resource(&self, path: &str, permanently: bool) -> bool {
        let request = self.request(Method::DELETE, "/resources").query(&[
            ("path", path.to_string()),
            ("permanently", permanently.to_string()),
        ]);
        match Self::send(request, &format!("Deleting {}", path)).await {
            Ok(_) => {
                tracing::info!("Deleted {} (permanently: {})", path, permanently);
                true
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    /// (method + path prefix, status, body)
    type Route = (String, u16, String);

    /// Minimal HTTP/1.1 responder: answers each connection with the first
    /// route whose prefix matches the request line and records request heads.
    async fn spawn_server(listener: TcpListener, routes: Vec<Route>) -> Arc<Mutex<Vec<String>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();

        tokio::spawn(async move {
            loop {
                let (mut socket, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => return,
                };

                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = socket.read(&mut buf).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    head.extend_from_slice(&buf[..n]);
                }
                let head = String::from_utf8_lossy(&head).to_string();
                log.lock().unwrap().push(head.clone());

                let (status, body) = routes
                    .iter()
                    .find(|(prefix, _, _)| head.starts_with(prefix.as_str()))
                    .map(|(_, status, body)| (*status, body.clone()))
                    .unwrap_or((404, "{}".to_string()));

                let response = format!(
                    "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        seen
    }

    async fn bind() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        (listener, base)
    }

    fn route(prefix: &str, status: u16, body: &str) -> Route {
        (prefix.to_string(), status, body.to_string())
    }

    #[tokio::test]
    async fn user_info_sends_oauth_header() {
        let (listener, base) = bind().await;
        let seen = spawn_server(
            listener,
            vec![route(
                "GET / ",
                200,
                r#"{"user":{"login":"ivan","display_name":"Ivan"},"total_space":100,"used_space":40}"#,
            )],
        )
        .await;

        let client = YandexDiskClient::with_base_url("secret", &base).unwrap();
        let info = client.user_info().await.unwrap();

        assert_eq!(info.display_name(), "Ivan");
        assert_eq!(info.used_space, 40);
        let head = seen.lock().unwrap()[0].to_ascii_lowercase();
        assert!(head.contains("authorization: oauth secret"));
    }

    #[tokio::test]
    async fn list_directory_passes_paging_and_normalizes_embedded() {
        let (listener, base) = bind().await;
        let seen = spawn_server(
            listener,
            vec![route(
                "GET /resources?",
                200,
                r#"{"_embedded":{"items":[{"name":"a.txt","path":"disk:/a.txt","type":"file","size":3}],"total":1}}"#,
            )],
        )
        .await;

        let client = YandexDiskClient::with_base_url("t", &base).unwrap();
        let listing = client.list_directory("/", 1000, 0).await.unwrap();

        assert_eq!(listing.items.len(), 1);
        assert_eq!(listing.items[0].name, "a.txt");
        let head = &seen.lock().unwrap()[0];
        assert!(head.contains("path=%2F"));
        assert!(head.contains("limit=1000"));
        assert!(head.contains("offset=0"));
    }

    #[tokio::test]
    async fn non_success_status_carries_code_and_body() {
        let (listener, base) = bind().await;
        spawn_server(
            listener,
            vec![route("GET / ", 403, r#"{"error":"ForbiddenError"}"#)],
        )
        .await;

        let client = YandexDiskClient::with_base_url("expired", &base).unwrap();
        let err = client.user_info().await.unwrap_err();

        assert!(err.is_permission_denied());
        match err {
            ApiError::Http { status, body } => {
                assert_eq!(status, 403);
                assert!(body.contains("ForbiddenError"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let (listener, base) = bind().await;
        drop(listener);

        let client = YandexDiskClient::with_base_url("t", &base).unwrap();
        let err = client.list_directory("/", 10, 0).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn download_streams_link_without_auth_header() {
        let (listener, base) = bind().await;
        let payload = "x".repeat(DOWNLOAD_CHUNK_SIZE * 3 + 17);
        let seen = spawn_server(
            listener,
            vec![
                route(
                    "GET /resources/download?",
                    200,
                    &format!(r#"{{"href":"{}/blob/report.bin"}}"#, base),
                ),
                route("GET /blob/report.bin", 200, &payload),
            ],
        )
        .await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("report.bin");
        let client = YandexDiskClient::with_base_url("t", &base).unwrap();
        client
            .download_file("disk:/report.bin", &target)
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), payload);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].to_ascii_lowercase().contains("authorization:"));
        assert!(!seen[1].to_ascii_lowercase().contains("authorization:"));
    }

    #[tokio::test]
    async fn download_link_without_href_fails() {
        let (listener, base) = bind().await;
        spawn_server(listener, vec![route("GET /resources/download?", 200, "{}")]).await;

        let client = YandexDiskClient::with_base_url("t", &base).unwrap();
        let err = client.download_link("disk:/a").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn failed_link_resolution_writes_nothing() {
        let (listener, base) = bind().await;
        spawn_server(
            listener,
            vec![route("GET /resources/download?", 404, r#"{"error":"DiskNotFoundError"}"#)],
        )
        .await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing.txt");
        let client = YandexDiskClient::with_base_url("t", &base).unwrap();
        let err = client.download_file("disk:/missing.txt", &target).await.unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn create_and_delete_collapse_to_bool() {
        let (listener, base) = bind().await;
        let seen = spawn_server(
            listener,
            vec![
                route("PUT /resources?path=%2Fnew", 201, "{}"),
                route("PUT /resources?", 409, r#"{"error":"DiskPathPointsToExistentDirectoryError"}"#),
                route("DELETE /resources?", 204, ""),
            ],
        )
        .await;

        let client = YandexDiskClient::with_base_url("t", &base).unwrap();
        assert!(client.create_folder("/new").await);
        assert!(!client.create_folder("/exists").await);
        assert!(client.delete_resource("/old", true).await);

        let seen = seen.lock().unwrap();
        assert!(seen[2].contains("permanently=true"));
    }

    #[test]
    fn empty_token_is_rejected() {
        let err = YandexDiskClient::new("   ").unwrap_err();
        assert!(matches!(err, ApiError::InvalidToken(_)));
    }
}
