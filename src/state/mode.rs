// Window modes and the policies attached to mode transitions
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating mode of the browser window.
///
/// Exactly one mode is current at any time; it decides how keystrokes
/// are interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    #[default]
    Idle,
    #[serde(alias = "TOGGLE_MENUBAR")]
    ToggleMenuBar,
    Quit,
    Command,
    OpenFile,
    OpenTab,
    CloseTab,
    RefreshTab,
    MoveLeft,
    MoveRight,
    MoveTab,
    Find,
    FindDown,
    FindUp,
    HistoryNext,
    HistoryPrev,
    ScrollUp,
    ScrollDown,
    NewSearch,
    EditSearch,
}

/// What runs right after a successful transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PostprocessPolicy {
    None,
    Postprocess,
    Action,
}

/// How a mode consumes typed characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgumentKind {
    /// Handled by the controller itself
    Controller,
    /// Free text (URLs, search strings)
    Text,
    /// Digits only (tab index)
    Index,
    /// Digits with an optional leading direction (`+`, `-`, `h`, `l`)
    Offset,
    /// Input is owned by a popup
    Popup,
    /// No argument, the action runs at once
    Immediate,
}

impl Mode {
    pub const ALL: [Mode; 20] = [
        Mode::Idle,
        Mode::ToggleMenuBar,
        Mode::Quit,
        Mode::Command,
        Mode::OpenFile,
        Mode::OpenTab,
        Mode::CloseTab,
        Mode::RefreshTab,
        Mode::MoveLeft,
        Mode::MoveRight,
        Mode::MoveTab,
        Mode::Find,
        Mode::FindDown,
        Mode::FindUp,
        Mode::HistoryNext,
        Mode::HistoryPrev,
        Mode::ScrollUp,
        Mode::ScrollDown,
        Mode::NewSearch,
        Mode::EditSearch,
    ];

    /// Name shown in the status bar while the mode collects input.
    pub fn action_name(self) -> &'static str {
        match self {
            Mode::Idle => "",
            Mode::ToggleMenuBar => "toggle menubar",
            Mode::Quit => "quit",
            Mode::Command => "command",
            Mode::OpenFile => "open file",
            Mode::OpenTab => "open",
            Mode::CloseTab => "close",
            Mode::RefreshTab => "refresh",
            Mode::MoveLeft => "move left",
            Mode::MoveRight => "move right",
            Mode::MoveTab => "move tab",
            Mode::Find => "find",
            Mode::FindDown => "find down",
            Mode::FindUp => "find up",
            Mode::HistoryNext => "history next",
            Mode::HistoryPrev => "history prev",
            Mode::ScrollUp => "scroll up",
            Mode::ScrollDown => "scroll down",
            Mode::NewSearch => "search",
            Mode::EditSearch => "edit search",
        }
    }

    pub fn argument_kind(self) -> ArgumentKind {
        match self {
            Mode::Idle | Mode::Command | Mode::Quit | Mode::ToggleMenuBar => {
                ArgumentKind::Controller
            }
            Mode::OpenTab | Mode::Find | Mode::NewSearch | Mode::EditSearch => ArgumentKind::Text,
            Mode::CloseTab | Mode::RefreshTab | Mode::MoveLeft | Mode::MoveRight => {
                ArgumentKind::Index
            }
            Mode::MoveTab => ArgumentKind::Offset,
            Mode::OpenFile => ArgumentKind::Popup,
            Mode::FindDown
            | Mode::FindUp
            | Mode::HistoryNext
            | Mode::HistoryPrev
            | Mode::ScrollUp
            | Mode::ScrollDown => ArgumentKind::Immediate,
        }
    }

    /// Configuration spelling, e.g. `OPEN_TAB`.
    pub fn config_name(self) -> &'static str {
        match self {
            Mode::Idle => "IDLE",
            Mode::ToggleMenuBar => "TOGGLE_MENU_BAR",
            Mode::Quit => "QUIT",
            Mode::Command => "COMMAND",
            Mode::OpenFile => "OPEN_FILE",
            Mode::OpenTab => "OPEN_TAB",
            Mode::CloseTab => "CLOSE_TAB",
            Mode::RefreshTab => "REFRESH_TAB",
            Mode::MoveLeft => "MOVE_LEFT",
            Mode::MoveRight => "MOVE_RIGHT",
            Mode::MoveTab => "MOVE_TAB",
            Mode::Find => "FIND",
            Mode::FindDown => "FIND_DOWN",
            Mode::FindUp => "FIND_UP",
            Mode::HistoryNext => "HISTORY_NEXT",
            Mode::HistoryPrev => "HISTORY_PREV",
            Mode::ScrollUp => "SCROLL_UP",
            Mode::ScrollDown => "SCROLL_DOWN",
            Mode::NewSearch => "NEW_SEARCH",
            Mode::EditSearch => "EDIT_SEARCH",
        }
    }
}

impl ArgumentKind {
    /// Whether `c` may be appended to the buffer given what is typed so far.
    pub fn accepts(self, buffer: &str, c: char) -> bool {
        match self {
            ArgumentKind::Text => c == ' ' || c.is_ascii_graphic(),
            ArgumentKind::Index => c.is_ascii_digit(),
            ArgumentKind::Offset => {
                c.is_ascii_digit() || (buffer.is_empty() && matches!(c, '+' | '-' | 'h' | 'l'))
            }
            ArgumentKind::Controller | ArgumentKind::Popup | ArgumentKind::Immediate => false,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_name())
    }
}
