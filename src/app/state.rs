use crate::api::{DiskApi, YandexDiskClient};
use crate::app::types::{App, ErrorDialog, InputMode};
use crate::app_event::AppEvent;
use crate::browser::path::join_remote;
use crate::browser::transfer::run_download_batch;
use crate::browser::BrowserSession;
use crate::config::{AppConfig, ConfigManager, Credentials};
use crate::error::ApiError;
use anyhow::{Context, Result};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

const PERMISSION_HINTS: &str = "Possible causes:\n\
    • The token has expired or is invalid\n\
    • The OAuth app lacks the required permissions\n\
    • The OAuth app has not been activated\n\n\
    What to do:\n\
    • Get a new token at https://oauth.yandex.ru/\n\
    • Make sure the cloud_api:disk.read permission is granted";

impl App {
    pub fn new(config_manager: ConfigManager, app_config: AppConfig, start_path: &str) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let credentials = config_manager.credential_store();
        let download_dir = app_config.download_dir.as_ref().map(PathBuf::from);

        tracing::info!("Download directory: {:?}", download_dir);
        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            input: String::new(),
            status_message: None,
            error_dialog: None,
            help_scroll_position: 0,

            credentials,
            token: String::new(),
            api: None,
            user: None,
            is_connecting: false,
            connection_generation: 0,

            browser: BrowserSession::new(start_path),
            details: None,

            download_dir,
            decompress: app_config.decompress_zip,
            download_progress: None,

            config_manager,
            app_config,
            event_tx,
            event_rx,
        }
    }

    /// Connects right away when a token was given on the command line or saved earlier.
    pub fn startup(&mut self, cli_token: Option<String>) {
        let token = cli_token
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.credentials.get().map(|c| c.access_token));

        match token {
            Some(token) => {
                self.token = token;
                self.connect();
            }
            None => self.set_status("Not connected. Press [t] to enter an OAuth token"),
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    pub fn clear_status_message(&mut self) {
        self.status_message = None;
    }

    pub fn is_connected(&self) -> bool {
        self.api.is_some() && self.user.is_some()
    }

    pub fn is_downloading(&self) -> bool {
        self.download_progress.is_some()
    }

    /// Runs `job` on the runtime and posts its result back to the UI loop.
    fn spawn<F>(&self, job: F)
    where
        F: Future<Output = AppEvent> + Send + 'static,
    {
        let sender = self.event_tx.clone();
        let generation = self.connection_generation;
        tokio::spawn(async move {
            if sender.send((generation, job.await)).is_err() {
                tracing::warn!("UI loop is gone, dropping background result");
            }
        });
    }

    fn require_api(&mut self) -> Option<Arc<dyn DiskApi>> {
        if self.api.is_none() {
            self.set_status("Connect to Yandex Disk first");
        }
        self.api.clone()
    }

    // Connection

    pub fn connect(&mut self) {
        let token = self.token.trim().to_string();
        if token.is_empty() {
            self.set_status("Error: enter an OAuth token");
            return;
        }

        match YandexDiskClient::with_base_url(&token, &self.app_config.api_base_url) {
            Ok(client) => self.connect_with(Arc::new(client)),
            Err(e) => {
                tracing::error!("Failed to build API client: {}", e);
                self.set_status(format!("Connection error: {}", e));
            }
        }
    }

    pub fn connect_with(&mut self, api: Arc<dyn DiskApi>) {
        self.connection_generation += 1;
        self.api = Some(api.clone());
        self.user = None;
        self.is_connecting = true;
        self.set_status("Connecting to Yandex Disk...");

        self.spawn(async move {
            match api.user_info().await {
                Ok(info) => AppEvent::Connected(info),
                Err(e) => AppEvent::ConnectFailed(e),
            }
        });
    }

    pub fn save_token(&mut self) {
        let token = self.token.trim().to_string();
        if token.is_empty() {
            self.set_status("Error: enter a token to save");
            return;
        }

        let result = self.credentials.save(&Credentials {
            access_token: token,
        });
        match result {
            Ok(()) => self.set_status("Token saved"),
            Err(e) => {
                tracing::error!("Failed to save token: {:#}", e);
                self.set_status(format!("Error: failed to save token: {}", e));
            }
        }
    }

    /// Logout: drop the client, the listing and the stored token.
    pub fn clear_token(&mut self) {
        self.connection_generation += 1;
        self.token.clear();
        self.api = None;
        self.user = None;
        self.is_connecting = false;
        self.details = None;
        self.browser.clear();

        match self.credentials.clear() {
            Ok(()) => self.set_status("Token cleared"),
            Err(e) => {
                tracing::error!("Failed to clear credentials: {:#}", e);
                self.set_status(format!("Error: failed to clear token: {}", e));
            }
        }
    }

    // Navigation

    pub fn refresh(&mut self) {
        let Some(api) = self.require_api() else {
            return;
        };

        let path = self.browser.current_path.clone();
        let limit = self.app_config.page_limit;
        self.browser.is_loading = true;
        self.set_status("Loading files...");

        self.spawn(async move {
            match api.list_directory(&path, limit, 0).await {
                Ok(listing) => AppEvent::Listed(listing),
                Err(error) => AppEvent::ListFailed { path, error },
            }
        });
    }

    pub fn navigate(&mut self, path: &str) {
        if self.api.is_none() {
            self.set_status("Connect to Yandex Disk first");
            return;
        }
        self.browser.navigate(path);
        self.details = None;
        self.refresh();
    }

    pub fn navigate_up(&mut self) {
        if self.api.is_none() {
            return;
        }
        if self.browser.navigate_up().is_some() {
            self.details = None;
            self.refresh();
        }
    }

    /// Enter on a row: directories are opened, files get their metadata fetched.
    pub fn open_selected(&mut self) {
        let Some(entry) = self.browser.cursor_entry().cloned() else {
            return;
        };

        if entry.is_dir() {
            self.navigate(&entry.path);
        } else {
            self.show_details(&entry.path);
        }
    }

    pub fn show_details(&mut self, path: &str) {
        let Some(api) = self.require_api() else {
            return;
        };
        let path = path.to_string();
        self.spawn(async move {
            match api.resource_info(&path).await {
                Ok(entry) => AppEvent::Details(entry),
                Err(error) => AppEvent::DetailsFailed { path, error },
            }
        });
    }

    // Downloads

    pub fn set_download_dir(&mut self, dir: &str) -> Result<()> {
        let dir = dir.trim();
        if dir.is_empty() {
            anyhow::bail!("Download directory is empty");
        }

        let path = PathBuf::from(dir);
        std::fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        self.app_config.download_dir = Some(dir.to_string());
        if let Err(e) = self.config_manager.save_config(&self.app_config) {
            tracing::warn!("Failed to persist download dir: {:#}", e);
        }
        self.download_dir = Some(path);
        Ok(())
    }

    pub fn toggle_decompress(&mut self) {
        self.decompress = !self.decompress;
        self.set_status(if self.decompress {
            "Zip archives will be extracted"
        } else {
            "Zip archives will be kept packed"
        });
    }

    pub fn start_download(&mut self) {
        let Some(api) = self.require_api() else {
            return;
        };
        if self.is_downloading() {
            self.set_status("A download is already running");
            return;
        }
        let Some(dest_dir) = self.download_dir.clone() else {
            self.set_status("Choose a download directory first ([o])");
            return;
        };

        let tasks = self.browser.download_tasks(&dest_dir, self.decompress);
        if tasks.is_empty() {
            self.set_status("Check files ([Space]) to download");
            return;
        }

        let total = tasks.len();
        self.download_progress = Some((0, total));
        self.set_status(format!("Downloading {} files...", total));

        let progress = self.event_tx.clone();
        let generation = self.connection_generation;
        self.spawn(async move {
            let report = run_download_batch(&*api, tasks, move |done, total| {
                let _ = progress.send((generation, AppEvent::DownloadProgress { done, total }));
            })
            .await;
            AppEvent::DownloadFinished(report)
        });
    }

    pub fn open_download_dir(&mut self) {
        let Some(dir) = self.download_dir.clone() else {
            self.set_status("Choose a download directory first ([o])");
            return;
        };
        if let Err(e) = open::that(&dir) {
            tracing::error!("Failed to open {:?}: {}", dir, e);
            self.set_status(format!("Error: failed to open {}: {}", dir.display(), e));
        }
    }

    // Remote changes

    pub fn create_folder(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            self.set_status("Error: folder name is empty");
            return;
        }
        let Some(api) = self.require_api() else {
            return;
        };

        let path = join_remote(&self.browser.current_path, name);
        self.set_status(format!("Creating {}...", path));
        self.spawn(async move {
            let ok = api.create_folder(&path).await;
            AppEvent::FolderCreated { path, ok }
        });
    }

    pub fn delete(&mut self, path: &str, permanently: bool) {
        let Some(api) = self.require_api() else {
            return;
        };
        let path = path.to_string();
        self.set_status(format!("Deleting {}...", path));
        self.spawn(async move {
            let ok = api.delete_resource(&path, permanently).await;
            AppEvent::Deleted {
                path,
                permanently,
                ok,
            }
        });
    }

    pub fn copy_current_path(&mut self) {
        let path = match self.browser.cursor_entry() {
            Some(entry) => entry.path.clone(),
            None => self.browser.current_path.clone(),
        };

        let result = arboard::Clipboard::new().and_then(|mut cb| cb.set_text(path.clone()));
        match result {
            Ok(()) => self.set_status(format!("Copied {}", path)),
            Err(e) => {
                tracing::warn!("Clipboard unavailable: {}", e);
                self.set_status(format!("Error: clipboard unavailable: {}", e));
            }
        }
    }

    // Background results

    /// Applies every result that has arrived since the last frame.
    pub fn process_events(&mut self) -> bool {
        let mut changed = false;
        while let Ok((generation, event)) = self.event_rx.try_recv() {
            changed |= self.accept_event(generation, event);
        }
        changed
    }

    /// Applies `event` unless it was produced under an earlier connection.
    pub fn accept_event(&mut self, generation: u64, event: AppEvent) -> bool {
        if event.is_session_bound() && generation != self.connection_generation {
            tracing::debug!(
                "Dropping result of connection {} (now {}): {:?}",
                generation,
                self.connection_generation,
                event
            );
            return false;
        }
        self.apply_event(event);
        true
    }

    fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Connected(info) => {
                tracing::info!("Connected as {}", info.display_name());
                self.is_connecting = false;
                self.set_status(format!("Connected: {}", info.display_name()));
                self.user = Some(info);
                self.refresh();
            }
            AppEvent::ConnectFailed(error) => {
                tracing::error!("Connection failed: {}", error);
                self.is_connecting = false;
                self.api = None;
                self.set_status("Connection error");
                self.error_dialog = Some(connection_error_dialog(&error));
            }
            AppEvent::Listed(listing) => {
                let count = listing.items.len();
                if self.browser.apply_listing(listing) {
                    if count == 0 {
                        self.set_status("No files");
                    } else {
                        self.set_status(format!("Loaded {} items", count));
                    }
                }
            }
            AppEvent::ListFailed { path, error } => {
                tracing::error!("Loading {} failed: {}", path, error);
                if path == self.browser.current_path {
                    self.browser.listing_failed();
                }
                self.set_status(format!("Error loading {}: {}", path, error));
            }
            AppEvent::Details(entry) => {
                self.details = Some(entry);
            }
            AppEvent::DetailsFailed { path, error } => {
                tracing::error!("Reading details of {} failed: {}", path, error);
                self.set_status(format!("Error reading details of {}: {}", path, error));
            }
            AppEvent::DownloadProgress { done, total } => {
                self.download_progress = Some((done, total));
            }
            AppEvent::DownloadFinished(report) => {
                self.download_progress = None;
                let mut message = format!(
                    "Download finished: {} of {} files",
                    report.succeeded, report.total
                );
                if report.extracted > 0 {
                    message.push_str(&format!(", {} extracted", report.extracted));
                }
                if !report.failures.is_empty() {
                    message.push_str(&format!(" ({} failed)", report.failures.len()));
                }
                self.set_status(message);
            }
            AppEvent::FolderCreated { path, ok } => {
                if ok {
                    self.set_status(format!("Created {}", path));
                    self.refresh();
                } else {
                    self.set_status(format!("Error: failed to create {}", path));
                }
            }
            AppEvent::Deleted {
                path,
                permanently,
                ok,
            } => {
                if ok {
                    let how = if permanently { "Deleted" } else { "Moved to trash" };
                    self.set_status(format!("{}: {}", how, path));
                    self.refresh();
                } else {
                    self.set_status(format!("Error: failed to delete {}", path));
                }
            }
        }
    }
}

fn connection_error_dialog(error: &ApiError) -> ErrorDialog {
    let message = if error.is_permission_denied() {
        format!("{}\n\n{}", error, PERMISSION_HINTS)
    } else {
        error.to_string()
    };
    ErrorDialog {
        title: "Connection error".to_string(),
        message,
    }
}
