use crate::browser::transfer::BatchReport;
use crate::error::ApiError;
use crate::models::{DirectoryListing, RemoteEntry, UserInfo};

/// Completion messages sent by background tasks to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    Connected(UserInfo),
    ConnectFailed(ApiError),
    Listed(DirectoryListing),
    ListFailed { path: String, error: ApiError },
    Details(RemoteEntry),
    DetailsFailed { path: String, error: ApiError },
    DownloadProgress { done: usize, total: usize },
    DownloadFinished(BatchReport),
    FolderCreated { path: String, ok: bool },
    Deleted { path: String, permanently: bool, ok: bool },
}

impl AppEvent {
    /// Download results describe local files and outlive the connection that
    /// started them; everything else belongs to one connection.
    pub fn is_session_bound(&self) -> bool {
        !matches!(
            self,
            AppEvent::DownloadProgress { .. } | AppEvent::DownloadFinished(_)
        )
    }
}
