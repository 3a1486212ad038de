// The popups of the main window
use super::{PopupWidget, SizePolicy};
use crate::state::FindSettings;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

const MAX_COMPLETIONS: usize = 12;

/// Path entry with directory completion.
#[derive(Debug, Default)]
pub struct OpenFilePopup {
    pub path: String,
    pub focus: bool,
    submitted: Option<PathBuf>,
    close_requested: bool,
    /// Completions and the path they were listed for
    listed: Option<(String, Vec<String>)>,
}

impl OpenFilePopup {
    pub fn submit(&mut self) {
        let text = self.path.trim();
        if text.is_empty() {
            return;
        }
        self.submitted = Some(PathBuf::from(text));
        self.close_requested = true;
    }

    pub fn cancel(&mut self) {
        self.close_requested = true;
    }

    pub fn take_submitted(&mut self) -> Option<PathBuf> {
        self.submitted.take()
    }

    /// Entries of the typed directory whose name starts with the typed
    /// file name. Directories get a trailing `/`. The directory is read
    /// again only after the path changed.
    pub fn completions(&mut self) -> &[String] {
        let stale = self
            .listed
            .as_ref()
            .is_none_or(|(path, _)| *path != self.path);
        if stale {
            self.listed = Some((self.path.clone(), list_completions(&self.path)));
        }
        self.listed.as_ref().map(|(_, names)| names.as_slice()).unwrap_or_default()
    }

    /// Replace the file name part of the typed path with `name`.
    pub fn apply_completion(&mut self, name: &str) {
        let cut = self.path.rfind('/').map(|i| i + 1).unwrap_or(0);
        self.path.truncate(cut);
        self.path.push_str(name);
        self.focus = true;
    }
}

fn list_completions(typed: &str) -> Vec<String> {
    let (dir, prefix) = split_typed_path(typed);
    let Ok(read_dir) = fs::read_dir(&dir) else {
        return Vec::new();
    };

    let mut names: Vec<String> = read_dir
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            if !name.starts_with(&prefix) || (prefix.is_empty() && name.starts_with('.')) {
                return None;
            }
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            Some(if is_dir { format!("{name}/") } else { name })
        })
        .collect();
    names.sort();
    names.truncate(MAX_COMPLETIONS);
    names
}

fn split_typed_path(text: &str) -> (PathBuf, String) {
    match text.rfind('/') {
        Some(i) => {
            let dir = if i == 0 { "/" } else { &text[..i] };
            (PathBuf::from(dir), text[i + 1..].to_string())
        }
        None => (PathBuf::from("."), text.to_string()),
    }
}

impl PopupWidget for OpenFilePopup {
    fn on_show(&mut self) {
        self.focus = true;
        self.submitted = None;
        self.listed = None;
        if self.path.is_empty() {
            if let Some(dirs) = directories::UserDirs::new() {
                self.path = format!("{}/", dirs.home_dir().display());
            }
        }
    }

    fn size_policy(&self) -> SizePolicy {
        SizePolicy {
            width: 520.0,
            max_height: 360.0,
        }
    }

    fn take_close_request(&mut self) -> bool {
        std::mem::take(&mut self.close_requested)
    }
}

/// A message that goes away on its own.
#[derive(Debug)]
pub struct LabelPopup {
    pub text: String,
    timeout: Duration,
    shown_at: Option<Instant>,
    close_requested: bool,
}

impl LabelPopup {
    pub fn new(timeout: Duration) -> Self {
        Self {
            text: String::new(),
            timeout,
            shown_at: None,
            close_requested: false,
        }
    }

    pub fn dismiss(&mut self) {
        self.close_requested = true;
    }

    /// Request close once the timeout has elapsed since the popup was shown.
    pub fn tick(&mut self, now: Instant) {
        if let Some(shown_at) = self.shown_at {
            if now.saturating_duration_since(shown_at) >= self.timeout {
                self.shown_at = None;
                self.close_requested = true;
            }
        }
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.shown_at
            .map(|shown_at| self.timeout.saturating_sub(now.saturating_duration_since(shown_at)))
    }
}

impl PopupWidget for LabelPopup {
    fn on_show(&mut self) {
        self.shown_at = Some(Instant::now());
    }

    fn on_hide(&mut self) {
        self.shown_at = None;
    }

    fn size_policy(&self) -> SizePolicy {
        SizePolicy {
            width: 360.0,
            max_height: 120.0,
        }
    }

    fn take_close_request(&mut self) -> bool {
        std::mem::take(&mut self.close_requested)
    }
}

/// Search text plus options.
#[derive(Debug, Default)]
pub struct FindPopup {
    pub settings: FindSettings,
    pub focus: bool,
    submitted: Option<FindSettings>,
    close_requested: bool,
}

impl FindPopup {
    pub fn submit(&mut self) {
        if self.settings.text.is_empty() {
            return;
        }
        self.submitted = Some(self.settings.clone());
        self.close_requested = true;
    }

    pub fn cancel(&mut self) {
        self.close_requested = true;
    }

    pub fn take_submitted(&mut self) -> Option<FindSettings> {
        self.submitted.take()
    }
}

impl PopupWidget for FindPopup {
    fn on_show(&mut self) {
        self.focus = true;
        self.submitted = None;
    }

    fn take_close_request(&mut self) -> bool {
        std::mem::take(&mut self.close_requested)
    }
}

/// Every popup the main window can show.
#[derive(Debug)]
pub enum Popup {
    OpenFile(OpenFilePopup),
    Warning(LabelPopup),
    Find(FindPopup),
}

impl Popup {
    fn widget(&mut self) -> &mut dyn PopupWidget {
        match self {
            Popup::OpenFile(p) => p,
            Popup::Warning(p) => p,
            Popup::Find(p) => p,
        }
    }

    fn widget_ref(&self) -> &dyn PopupWidget {
        match self {
            Popup::OpenFile(p) => p,
            Popup::Warning(p) => p,
            Popup::Find(p) => p,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Popup::OpenFile(_) => "Open File",
            Popup::Warning(_) => "Warning",
            Popup::Find(_) => "Find",
        }
    }
}

impl PopupWidget for Popup {
    fn on_show(&mut self) {
        self.widget().on_show();
    }

    fn on_hide(&mut self) {
        self.widget().on_hide();
    }

    fn size_policy(&self) -> SizePolicy {
        self.widget_ref().size_policy()
    }

    fn take_close_request(&mut self) -> bool {
        self.widget().take_close_request()
    }
}
