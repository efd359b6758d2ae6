//! Yandex Disk REST API.
//!
//! Every HTTP interaction with the provider goes through the `DiskApi` trait.
//! The browser and the download batch only ever see `Result<_, ApiError>` or a
//! `bool`, never a transport type.

mod client;
#[cfg(test)]
pub mod fake;
mod listing;

use std::path::Path;

use async_trait::async_trait;
use url::Url;

use crate::error::ApiError;
use crate::models::{DirectoryListing, RemoteEntry, UserInfo};

pub use client::YandexDiskClient;

pub const DEFAULT_BASE_URL: &str = "https://cloud-api.yandex.net/v1/disk";
pub const DEFAULT_PAGE_LIMIT: u32 = 1000;
/// Buffer size used when streaming a download to disk.
pub const DOWNLOAD_CHUNK_SIZE: usize = 8192;

#[async_trait]
pub trait DiskApi: Send + Sync {
    /// `GET /` - account and quota information.
    async fn user_info(&self) -> Result<UserInfo, ApiError>;

    /// `GET /resources` - one page of a directory, normalized regardless of
    /// whether the server nested the items under `_embedded`.
    async fn list_directory(
        &self,
        path: &str,
        limit: u32,
        offset: u32,
    ) -> Result<DirectoryListing, ApiError>;

    /// `GET /resources` for a single resource's own metadata.
    async fn resource_info(&self, path: &str) -> Result<RemoteEntry, ApiError>;

    /// `GET /resources/download` - pre-signed link for streaming the bytes.
    async fn download_link(&self, path: &str) -> Result<Url, ApiError>;

    /// Resolves a download link and streams it into `local_path`. A partial
    /// file is left behind on failure.
    async fn download_file(&self, remote_path: &str, local_path: &Path) -> Result<(), ApiError>;

    /// `PUT /resources`. Errors are logged and collapsed into `false`.
    async fn create_folder(&self, path: &str) -> bool;

    /// `DELETE /resources`. Errors are logged and collapsed into `false`.
    async fn delete_resource(&self, path: &str, permanently: bool) -> bool;
}
