use std::collections::HashMap;

/// Checkbox state of the rows currently on screen, keyed by remote path.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    checked: HashMap<String, bool>,
}

impl SelectionState {
    /// Every row starts unchecked.
    pub fn new<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            checked: rows.into_iter().map(|id| (id.into(), false)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.checked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checked.is_empty()
    }

    pub fn is_checked(&self, id: &str) -> bool {
        self.checked.get(id).copied().unwrap_or(false)
    }

    /// Header checkbox. An empty view is never "all checked".
    pub fn all_checked(&self) -> bool {
        !self.checked.is_empty() && self.checked.values().all(|&c| c)
    }

    pub fn checked_count(&self) -> usize {
        self.checked.values().filter(|&&c| c).count()
    }

    /// Flips one row and returns its new state; unknown rows are ignored.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let flag = self.checked.get_mut(id)?;
        *flag = !*flag;
        Some(*flag)
    }

    pub fn set(&mut self, id: &str, value: bool) {
        if let Some(flag) = self.checked.get_mut(id) {
            *flag = value;
        }
    }

    /// Sets every row to the negation of the current header state.
    pub fn toggle_all(&mut self) {
        let target = !self.all_checked();
        for flag in self.checked.values_mut() {
            *flag = target;
        }
    }
}
