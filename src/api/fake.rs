//! In-memory `DiskApi` for tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use url::Url;

use super::DiskApi;
use crate::error::ApiError;
use crate::models::{DirectoryListing, RemoteEntry, ResourceKind, UserInfo};

#[derive(Debug, Default)]
pub struct FakeDisk {
    pub listings: HashMap<String, Vec<RemoteEntry>>,
    /// Remote path -> bytes served by `download_file`. Missing paths fail with 404.
    pub files: HashMap<String, Vec<u8>>,
    pub user: Option<UserInfo>,
    pub user_error: Option<u16>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeDisk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(mut self, path: &str, entries: Vec<RemoteEntry>) -> Self {
        self.listings.insert(path.to_string(), entries);
        self
    }

    pub fn with_file(mut self, remote_path: &str, bytes: &[u8]) -> Self {
        self.files.insert(remote_path.to_string(), bytes.to_vec());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn download_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.starts_with("download "))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

pub fn file(name: &str, size: u64) -> RemoteEntry {
    RemoteEntry {
        name: name.to_string(),
        path: format!("disk:/{}", name),
        kind: ResourceKind::File,
        size,
        modified: Some("2024-05-01T09:30:00+00:00".to_string()),
    }
}

pub fn dir(name: &str) -> RemoteEntry {
    RemoteEntry {
        name: name.to_string(),
        path: format!("disk:/{}", name),
        kind: ResourceKind::Directory,
        size: 0,
        modified: None,
    }
}

fn not_found(path: &str) -> ApiError {
    ApiError::Http {
        status: 404,
        body: format!("{} not found", path),
    }
}

#[async_trait]
impl DiskApi for FakeDisk {
    async fn user_info(&self) -> Result<UserInfo, ApiError> {
        self.record("user_info".to_string());
        match self.user_error {
            Some(status) => Err(ApiError::Http {
                status,
                body: "denied".to_string(),
            }),
            None => Ok(self.user.clone().unwrap_or_default()),
        }
    }

    async fn list_directory(
        &self,
        path: &str,
        limit: u32,
        offset: u32,
    ) -> Result<DirectoryListing, ApiError> {
        self.record(format!("list {}", path));
        let items = self.listings.get(path).cloned().ok_or_else(|| not_found(path))?;
        Ok(DirectoryListing {
            path: path.to_string(),
            total: Some(items.len() as u64),
            items,
            limit,
            offset,
        })
    }

    async fn resource_info(&self, path: &str) -> Result<RemoteEntry, ApiError> {
        self.record(format!("info {}", path));
        self.listings
            .values()
            .flatten()
            .find(|e| e.path == path)
            .cloned()
            .ok_or_else(|| not_found(path))
    }

    async fn download_link(&self, path: &str) -> Result<Url, ApiError> {
        self.record(format!("link {}", path));
        if !self.files.contains_key(path) {
            return Err(not_found(path));
        }
        Url::parse(&format!("https://downloader.example/{}", path.trim_start_matches("disk:/")))
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    async fn download_file(&self, remote_path: &str, local_path: &Path) -> Result<(), ApiError> {
        self.record(format!("download {}", remote_path));
        let bytes = self.files.get(remote_path).ok_or_else(|| not_found(remote_path))?;
        tokio::fs::write(local_path, bytes).await?;
        Ok(())
    }

    async fn create_folder(&self, path: &str) -> bool {
        self.record(format!("mkdir {}", path));
        !self.listings.contains_key(path)
    }

    async fn delete_resource(&self, path: &str, permanently: bool) -> bool {
        self.record(format!("delete {} {}", path, permanently));
        self.files.contains_key(path) || self.listings.contains_key(path)
    }
}
