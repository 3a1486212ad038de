// Notifications from the modal controller to the surrounding UI
use crate::state::Mode;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControllerEvent {
    ModeChanged(Mode),
    /// Text for the user input area of the status bar
    DisplayTextChanged(String),
    ShortcutsEnabledChanged(bool),
    RequestClose,
    RequestMenuBarToggle,
    /// An action the UI performs on tabs, content or popups
    Execute { mode: Mode, argument: String },
}
