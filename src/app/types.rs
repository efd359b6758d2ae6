use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::api::DiskApi;
use crate::app_event::AppEvent;
use crate::browser::BrowserSession;
use crate::config::{AppConfig, ConfigManager, CredentialStore};
use crate::models::{RemoteEntry, UserInfo};

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Filter,
    Prompt(PromptKind),
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PromptKind {
    Token,
    GoToPath,
    DownloadDir,
    NewFolder,
    ConfirmDelete { path: String, permanently: bool },
}

/// Modal shown over the browser until dismissed.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDialog {
    pub title: String,
    pub message: String,
}

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub input: String,
    pub status_message: Option<(String, Instant)>,
    pub error_dialog: Option<ErrorDialog>,
    pub help_scroll_position: u16,

    pub config_manager: ConfigManager,
    pub app_config: AppConfig,
    pub credentials: CredentialStore,

    // Connection
    pub token: String,
    pub api: Option<Arc<dyn DiskApi>>,
    pub user: Option<UserInfo>,
    pub is_connecting: bool,
    /// Bumped on every connect and logout; results from older ones are dropped.
    pub connection_generation: u64,

    // Browser
    pub browser: BrowserSession,
    pub details: Option<RemoteEntry>,

    // Downloads
    pub download_dir: Option<PathBuf>,
    pub decompress: bool,
    /// (finished, total) while a batch is running
    pub download_progress: Option<(usize, usize)>,

    pub(super) event_tx: UnboundedSender<(u64, AppEvent)>,
    pub(super) event_rx: UnboundedReceiver<(u64, AppEvent)>,
}
