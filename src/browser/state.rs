use std::path::Path;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use super::path::{parent_path, ROOT};
use super::selection::SelectionState;
use crate::models::{DirectoryListing, DownloadTask, RemoteEntry};

/// Everything the file browser knows about the remote side: where it is,
/// what it is showing, and which rows are checked.
#[derive(Debug, Clone)]
pub struct BrowserSession {
    pub current_path: String,
    pub entries: Vec<RemoteEntry>,
    pub selection: SelectionState,
    pub total: Option<u64>,
    pub is_loading: bool,

    // Cursor over `visible`, not over `entries`
    pub cursor: usize,
    pub filter: String,
    visible: Vec<usize>,
}

impl Default for BrowserSession {
    fn default() -> Self {
        Self::new(ROOT)
    }
}

impl BrowserSession {
    pub fn new(path: &str) -> Self {
        Self {
            current_path: path.to_string(),
            entries: Vec::new(),
            selection: SelectionState::default(),
            total: None,
            is_loading: false,
            cursor: 0,
            filter: String::new(),
            visible: Vec::new(),
        }
    }

    /// Moves to `path`; the caller is expected to fetch its listing next.
    pub fn navigate(&mut self, path: &str) -> String {
        let path = path.trim();
        let path = if path.is_empty() { ROOT } else { path };
        tracing::info!("Navigating from {} to {}", self.current_path, path);
        self.current_path = path.to_string();
        self.is_loading = true;
        self.current_path.clone()
    }

    /// Parent of the current path, or `None` if already at a root.
    pub fn navigate_up(&mut self) -> Option<String> {
        let parent = parent_path(&self.current_path)?;
        Some(self.navigate(&parent))
    }

    /// Replaces the view with `listing`. Results for any other path than the
    /// current one are stale and dropped.
    pub fn apply_listing(&mut self, listing: DirectoryListing) -> bool {
        if listing.path != self.current_path {
            tracing::debug!(
                "Dropping stale listing for {} (now at {})",
                listing.path,
                self.current_path
            );
            return false;
        }

        self.selection = SelectionState::new(listing.items.iter().map(|e| e.path.clone()));
        self.entries = listing.items;
        self.total = listing.total;
        self.is_loading = false;
        self.cursor = 0;
        self.refilter();
        true
    }

    pub fn listing_failed(&mut self) {
        self.is_loading = false;
    }

    /// Forget everything shown (logout).
    pub fn clear(&mut self) {
        self.entries.clear();
        self.selection = SelectionState::default();
        self.total = None;
        self.is_loading = false;
        self.cursor = 0;
        self.visible.clear();
    }

    pub fn visible_entries(&self) -> impl Iterator<Item = &RemoteEntry> {
        self.visible.iter().filter_map(|&i| self.entries.get(i))
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn cursor_entry(&self) -> Option<&RemoteEntry> {
        self.visible
            .get(self.cursor)
            .and_then(|&i| self.entries.get(i))
    }

    pub fn select_next(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        self.cursor = (self.cursor + 1) % self.visible.len();
    }

    pub fn select_previous(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let total = self.visible.len();
        self.cursor = (self.cursor + total - 1) % total;
    }

    pub fn toggle_cursor(&mut self) -> Option<bool> {
        let id = self.cursor_entry()?.path.clone();
        self.selection.toggle(&id)
    }

    pub fn toggle_all(&mut self) {
        self.selection.toggle_all();
    }

    pub fn is_checked(&self, entry: &RemoteEntry) -> bool {
        self.selection.is_checked(&entry.path)
    }

    /// Checked rows in listing order.
    pub fn selected_entries(&self) -> Vec<&RemoteEntry> {
        self.entries
            .iter()
            .filter(|e| self.selection.is_checked(&e.path))
            .collect()
    }

    /// One task per checked row. Folders come down as zip archives, so they
    /// are saved as `<name>.zip`.
    pub fn download_tasks(&self, dest_dir: &Path, decompress: bool) -> Vec<DownloadTask> {
        self.selected_entries()
            .into_iter()
            .map(|entry| {
                let file_name = if entry.is_dir() {
                    format!("{}.zip", entry.name)
                } else {
                    entry.name.clone()
                };
                DownloadTask {
                    remote_path: entry.path.clone(),
                    local_path: dest_dir.join(file_name),
                    decompress,
                }
            })
            .collect()
    }

    pub fn set_filter(&mut self, query: &str) {
        self.filter = query.to_string();
        self.cursor = 0;
        self.refilter();
    }

    pub fn clear_filter(&mut self) {
        self.set_filter("");
    }

    fn refilter(&mut self) {
        if self.filter.is_empty() {
            self.visible = (0..self.entries.len()).collect();
        } else {
            let matcher = SkimMatcherV2::default();
            let mut scored: Vec<(i64, usize)> = self
                .entries
                .iter()
                .enumerate()
                .filter_map(|(i, e)| matcher.fuzzy_match(&e.name, &self.filter).map(|s| (s, i)))
                .collect();
            scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
            self.visible = scored.into_iter().map(|(_, i)| i).collect();
        }

        if self.cursor >= self.visible.len() {
            self.cursor = self.visible.len().saturating_sub(1);
        }
    }
}
