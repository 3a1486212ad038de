// Tabs state management for multiple pages
use crate::engine::Target;
use crate::state::{FindState, LoadState};
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Stable identity of a tab; survives reordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(pub u64);

/// What the tab currently holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TabKind {
    Web { url: Option<Url> },
    Text { path: PathBuf, content: String },
}

/// State for a single tab
#[derive(Clone, Debug)]
pub struct TabState {
    pub id: TabId,
    pub kind: TabKind,
    pub title: String,
    pub history: Vec<Target>,
    pub history_index: usize,
    pub load: LoadState,
    pub scroll: f32,
    pub find: Option<FindState>,
}

impl TabState {
    pub fn new(id: TabId, target: Target) -> Self {
        Self {
            id,
            kind: kind_for(&target),
            title: target.label(),
            history: vec![target],
            history_index: 0,
            load: LoadState::Idle,
            scroll: 0.0,
            find: None,
        }
    }

    pub fn current_target(&self) -> Option<&Target> {
        self.history.get(self.history_index)
    }

    /// Address shown in the status bar.
    pub fn location(&self) -> String {
        self.current_target()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    /// Load `target` in this tab, dropping any forward history.
    pub fn navigate(&mut self, target: Target) {
        self.history.truncate(self.history_index + 1);
        self.history.push(target);
        self.history_index = self.history.len() - 1;
        self.show_current();
    }

    pub fn go_back(&mut self) -> Option<Target> {
        if self.history_index == 0 {
            return None;
        }
        self.history_index -= 1;
        self.show_current();
        self.current_target().cloned()
    }

    pub fn go_forward(&mut self) -> Option<Target> {
        if self.history_index + 1 >= self.history.len() {
            return None;
        }
        self.history_index += 1;
        self.show_current();
        self.current_target().cloned()
    }

    /// Store loaded file content; ignored when the tab moved on meanwhile.
    /// Match ranges of a previous search refer to the old text and are dropped.
    pub fn set_content(&mut self, path: PathBuf, content: String) -> bool {
        if self.current_target() != Some(&Target::File(path.clone())) {
            return false;
        }
        self.kind = TabKind::Text { path, content };
        self.find = None;
        true
    }

    pub fn text_content(&self) -> Option<&str> {
        match &self.kind {
            TabKind::Text { content, .. } => Some(content),
            TabKind::Web { .. } => None,
        }
    }

    fn show_current(&mut self) {
        if let Some(target) = self.current_target().cloned() {
            self.kind = kind_for(&target);
            self.title = target.label();
        }
        self.load = LoadState::Idle;
        self.scroll = 0.0;
        self.find = None;
    }
}

fn kind_for(target: &Target) -> TabKind {
    match target {
        Target::Blank => TabKind::Web { url: None },
        Target::Web(url) => TabKind::Web {
            url: Some(url.clone()),
        },
        Target::File(path) => TabKind::Text {
            path: path.clone(),
            content: String::new(),
        },
    }
}

/// Why a typed tab argument could not be used.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TabArgError {
    #[error("no tabs are open")]
    NoTabs,
    #[error("'{0}' is not a valid tab number")]
    Invalid(String),
    #[error("tab {index} does not exist (there are {count} tabs)")]
    OutOfRange { index: usize, count: usize },
}

/// Manages multiple tabs
#[derive(Default)]
pub struct TabsManager {
    pub tabs: Vec<TabState>,
    pub active_tab: usize,
    next_id: u64,
}

impl TabsManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_active(&self) -> Option<&TabState> {
        self.tabs.get(self.active_tab)
    }

    pub fn get_active_mut(&mut self) -> Option<&mut TabState> {
        self.tabs.get_mut(self.active_tab)
    }

    pub fn get_mut(&mut self, id: TabId) -> Option<&mut TabState> {
        self.tabs.iter_mut().find(|tab| tab.id == id)
    }

    /// Open a tab after the others and make it current.
    pub fn open(&mut self, target: Target) -> TabId {
        let id = TabId(self.next_id);
        self.next_id += 1;
        self.tabs.push(TabState::new(id, target));
        self.active_tab = self.tabs.len() - 1;
        id
    }

    pub fn close_tab(&mut self, index: usize) -> Option<TabState> {
        if index >= self.tabs.len() {
            return None;
        }
        let removed = self.tabs.remove(index);

        if self.active_tab > index || self.active_tab >= self.tabs.len() {
            self.active_tab = self.active_tab.saturating_sub(1);
        }

        Some(removed)
    }

    pub fn switch_to_tab(&mut self, index: usize) {
        if index < self.tabs.len() {
            self.active_tab = index;
        }
    }

    /// Move the current index `steps` times to the right (or left),
    /// wrapping at both ends.
    pub fn shift_active(&mut self, steps: usize, right: bool) {
        let count = self.tabs.len();
        if count == 0 {
            return;
        }
        let steps = steps % count;
        self.active_tab = if right {
            (self.active_tab + steps) % count
        } else {
            (self.active_tab + count - steps) % count
        };
    }

    /// Move the current tab to `position` (0-based), keeping it current.
    pub fn move_active_to(&mut self, position: usize) {
        if self.tabs.is_empty() {
            return;
        }
        let position = position.min(self.tabs.len() - 1);
        let tab = self.tabs.remove(self.active_tab);
        self.tabs.insert(position, tab);
        self.active_tab = position;
    }

    /// Tab index for a 1-based number typed by the user; empty means current.
    pub fn resolve_index(&self, argument: &str) -> Result<usize, TabArgError> {
        if self.tabs.is_empty() {
            return Err(TabArgError::NoTabs);
        }
        let argument = argument.trim();
        if argument.is_empty() {
            return Ok(self.active_tab);
        }
        let number: usize = argument
            .parse()
            .map_err(|_| TabArgError::Invalid(argument.to_string()))?;
        if number == 0 || number > self.tabs.len() {
            return Err(TabArgError::OutOfRange {
                index: number,
                count: self.tabs.len(),
            });
        }
        Ok(number - 1)
    }

    /// Distance typed for a move; empty means one step.
    pub fn parse_steps(argument: &str) -> Result<usize, TabArgError> {
        let argument = argument.trim();
        if argument.is_empty() {
            return Ok(1);
        }
        argument
            .parse()
            .map_err(|_| TabArgError::Invalid(argument.to_string()))
    }

    /// Apply a move-tab argument: `+n`/`ln` right, `-n`/`hn` left, `n` to
    /// absolute position n.
    pub fn move_active(&mut self, argument: &str) -> Result<usize, TabArgError> {
        if self.tabs.is_empty() {
            return Err(TabArgError::NoTabs);
        }
        let argument = argument.trim();
        let mut chars = argument.chars();
        let position = match chars.next() {
            Some('+' | 'l') => {
                let steps = Self::parse_steps(chars.as_str())?;
                self.active_tab.saturating_add(steps).min(self.tabs.len() - 1)
            }
            Some('-' | 'h') => {
                let steps = Self::parse_steps(chars.as_str())?;
                self.active_tab.saturating_sub(steps)
            }
            _ => self.resolve_index(argument)?,
        };
        self.move_active_to(position);
        Ok(position)
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    /// `tab N out of M`, or `No tabs`.
    pub fn info(&self) -> String {
        if self.tabs.is_empty() {
            "No tabs".to_string()
        } else {
            format!("tab {} out of {}", self.active_tab + 1, self.tabs.len())
        }
    }
}
