use crate::config::{AvatarSide, UiConfig};

/// Result of a spawned intent, reported back to the UI loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentOutcome {
    Loaded(usize),
    Refreshed(usize),
    Added(bool),
}

#[derive(Debug, Clone)]
pub struct StatusEntry {
    pub time: String,
    pub level: &'static str,
    pub message: String,
}

/// Presentation-only state. Feed data lives in the controller.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub title: String,
    pub avatar_side: AvatarSide,
    pub selected: usize,
    pub spinner_frame: u8,
    pub pending_adds: usize,
    pub status: Option<StatusEntry>,
}

impl ViewState {
    pub fn new(ui: &UiConfig) -> Self {
        Self {
            title: ui.title.clone(),
            avatar_side: ui.avatar_side,
            selected: 0,
            spinner_frame: 0,
            pending_adds: 0,
            status: None,
        }
    }

    pub fn select_next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    /// Keep the cursor inside the list after it shrinks.
    pub fn clamp_selection(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn push_status(&mut self, level: &'static str, message: String) {
        let time = chrono::Local::now().format("%H:%M:%S").to_string();
        self.status = Some(StatusEntry { time, level, message });
    }

    pub fn record_outcome(&mut self, outcome: IntentOutcome) {
        match outcome {
            IntentOutcome::Loaded(0) => self.push_status("WARN", "No users loaded".to_string()),
            IntentOutcome::Loaded(n) => self.push_status("INFO", format!("Loaded {} users", n)),
            IntentOutcome::Refreshed(0) => {
                self.selected = 0;
                self.push_status("WARN", "Refresh returned no users".to_string());
            }
            IntentOutcome::Refreshed(n) => {
                self.selected = 0;
                self.push_status("INFO", format!("Refreshed {} users", n));
            }
            IntentOutcome::Added(added) => {
                self.pending_adds = self.pending_adds.saturating_sub(1);
                if added {
                    self.push_status("INFO", "Added a user".to_string());
                } else {
                    self.push_status("WARN", "Could not add a user".to_string());
                }
            }
        }
    }
}
