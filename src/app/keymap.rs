use crate::app::types::{App, InputMode, PromptKind};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

impl App {
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        // The error dialog swallows keys until dismissed
        if self.error_dialog.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.error_dialog = None;
            }
            return;
        }

        match self.input_mode.clone() {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Filter => self.handle_filter_key(key),
            InputMode::Prompt(kind) => self.handle_prompt_key(key, kind),
            InputMode::Help => self.handle_help_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.browser.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.browser.select_next(),
            KeyCode::Enter | KeyCode::Char('l') => self.open_selected(),
            KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => self.navigate_up(),
            KeyCode::Char(' ') => {
                self.browser.toggle_cursor();
            }
            KeyCode::Char('a') => self.browser.toggle_all(),
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('d') => self.start_download(),
            KeyCode::Char('z') => self.toggle_decompress(),
            KeyCode::Char('y') => self.copy_current_path(),
            KeyCode::Char('O') => self.open_download_dir(),
            KeyCode::Char('c') => self.connect(),
            KeyCode::Char('S') => self.save_token(),
            KeyCode::Char('C') => self.clear_token(),
            KeyCode::Char('/') => {
                self.input = self.browser.filter.clone();
                self.input_mode = InputMode::Filter;
            }
            KeyCode::Char('?') => {
                self.help_scroll_position = 0;
                self.input_mode = InputMode::Help;
            }
            KeyCode::Esc => {
                if !self.browser.filter.is_empty() {
                    self.browser.clear_filter();
                }
            }
            KeyCode::Char('t') => self.open_prompt(PromptKind::Token, ""),
            KeyCode::Char('g') => {
                let current = self.browser.current_path.clone();
                self.open_prompt(PromptKind::GoToPath, &current);
            }
            KeyCode::Char('o') => {
                let current = self
                    .download_dir
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                self.open_prompt(PromptKind::DownloadDir, &current);
            }
            KeyCode::Char('n') => self.open_prompt(PromptKind::NewFolder, ""),
            KeyCode::Char('x') | KeyCode::Delete => self.confirm_delete(false),
            KeyCode::Char('X') => self.confirm_delete(true),
            _ => {}
        }
    }

    fn open_prompt(&mut self, kind: PromptKind, initial: &str) {
        self.input = initial.to_string();
        self.input_mode = InputMode::Prompt(kind);
    }

    fn confirm_delete(&mut self, permanently: bool) {
        if let Some(entry) = self.browser.cursor_entry() {
            let path = entry.path.clone();
            self.open_prompt(PromptKind::ConfirmDelete { path, permanently }, "");
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input.clear();
                self.browser.clear_filter();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Up => self.browser.select_previous(),
            KeyCode::Down => self.browser.select_next(),
            KeyCode::Backspace => {
                self.input.pop();
                let query = self.input.clone();
                self.browser.set_filter(&query);
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                let query = self.input.clone();
                self.browser.set_filter(&query);
            }
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent, kind: PromptKind) {
        if let PromptKind::ConfirmDelete { path, permanently } = kind {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    self.input_mode = InputMode::Normal;
                    self.delete(&path, permanently);
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.input_mode = InputMode::Normal;
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.input.clear();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            KeyCode::Enter => {
                let value = std::mem::take(&mut self.input);
                self.input_mode = InputMode::Normal;
                self.submit_prompt(kind, value.trim());
            }
            _ => {}
        }
    }

    fn submit_prompt(&mut self, kind: PromptKind, value: &str) {
        match kind {
            PromptKind::Token => {
                self.token = value.to_string();
                self.connect();
            }
            PromptKind::GoToPath => {
                if !value.is_empty() && value != self.browser.current_path {
                    self.navigate(value);
                }
            }
            PromptKind::DownloadDir => match self.set_download_dir(value) {
                Ok(()) => self.set_status(format!("Downloads go to {}", value)),
                Err(e) => {
                    tracing::error!("Invalid download directory {}: {:#}", value, e);
                    self.set_status(format!("Error: {:#}", e));
                }
            },
            PromptKind::NewFolder => self.create_folder(value),
            PromptKind::ConfirmDelete { .. } => {}
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.help_scroll_position = self.help_scroll_position.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.help_scroll_position = self.help_scroll_position.saturating_add(1);
            }
            _ => {}
        }
    }
}
