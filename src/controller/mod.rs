// Modal command controller
// Turns key events and typed long commands into window mode transitions

pub mod events;

pub use events::ControllerEvent;

use crate::commands::{CommandTable, Key, KeyChord, Modifiers};
use crate::state::{ArgumentKind, InputBuffer, Mode, PostprocessPolicy, TextAction};
use tracing::{debug, error, info, warn};

/// Vim-like window state machine.
///
/// The controller owns the current mode, the text typed by the user and the
/// command table. It never touches widgets: every side effect is queued as a
/// [`ControllerEvent`] that the UI drains with [`ModalController::take_events`].
pub struct ModalController {
    mode: Mode,
    buffer: InputBuffer,
    table: CommandTable,
    shortcuts_enabled: bool,
    display_text: String,
    events: Vec<ControllerEvent>,
}

impl ModalController {
    pub fn new(table: CommandTable) -> Self {
        Self {
            mode: Mode::Idle,
            buffer: InputBuffer::new(),
            table,
            shortcuts_enabled: true,
            display_text: String::new(),
            events: Vec::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn buffer(&self) -> &str {
        self.buffer.as_str()
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    pub fn shortcuts_enabled(&self) -> bool {
        self.shortcuts_enabled
    }

    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    pub fn take_events(&mut self) -> Vec<ControllerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Move to `target`, running the work selected by `policy` afterwards.
    ///
    /// Returns false when the window already is in `target` or the transition
    /// is not allowed from the current mode.
    pub fn request_transition(
        &mut self,
        target: Mode,
        policy: PostprocessPolicy,
        trigger: Option<Key>,
    ) -> bool {
        self.transition(target, policy, trigger, None)
    }

    fn transition(
        &mut self,
        target: Mode,
        policy: PostprocessPolicy,
        trigger: Option<Key>,
        action_text: Option<String>,
    ) -> bool {
        let previous = self.mode;
        if previous == target {
            warn!(from = %previous, to = %target, "ignoring request to move to the current mode");
            return false;
        }

        if !self.is_valid_transition(target, trigger) {
            warn!(from = %previous, to = %target, ?trigger, "rejected mode transition");
            return false;
        }

        debug!(from = %previous, to = %target, ?policy, "mode transition");
        self.mode = target;
        self.emit(ControllerEvent::ModeChanged(target));

        let typed = self.buffer.take();
        self.print_user_input(TextAction::Clear, "");

        match policy {
            PostprocessPolicy::None => {}
            PostprocessPolicy::Postprocess => self.on_post_transition(previous),
            PostprocessPolicy::Action => {
                let text = action_text.unwrap_or(typed);
                self.execute_action(target, text, PostprocessPolicy::Action);
            }
        }

        true
    }

    /// Idle is always reachable; everything else only from Idle, unless
    /// the window is in Command mode or Backspace on an empty buffer asks to
    /// go back to Command mode.
    fn is_valid_transition(&self, target: Mode, trigger: Option<Key>) -> bool {
        let override_allowed = self.mode == Mode::Command
            || (target == Mode::Command
                && self.buffer.is_empty()
                && trigger == Some(Key::Backspace));

        target == Mode::Idle || self.mode == Mode::Idle || override_allowed
    }

    fn on_post_transition(&mut self, previous: Mode) {
        debug!(from = %previous, to = %self.mode, "postprocessing transition");
        match self.mode {
            Mode::Idle => {
                self.set_shortcuts_enabled(true);
                self.print_user_input(TextAction::Clear, "");
            }
            Mode::Quit => self.emit(ControllerEvent::RequestClose),
            Mode::ToggleMenuBar => {
                self.emit(ControllerEvent::RequestMenuBarToggle);
                self.transition(Mode::Idle, PostprocessPolicy::Postprocess, None, None);
            }
            Mode::Command => self.set_shortcuts_enabled(false),
            mode => match mode.argument_kind() {
                ArgumentKind::Text | ArgumentKind::Index | ArgumentKind::Offset => {
                    self.set_shortcuts_enabled(false);
                }
                ArgumentKind::Popup => {
                    self.set_shortcuts_enabled(false);
                    self.emit_execute(mode, String::new());
                }
                ArgumentKind::Immediate => {
                    self.emit_execute(mode, String::new());
                    self.transition(Mode::Idle, PostprocessPolicy::Postprocess, None, None);
                }
                ArgumentKind::Controller => {
                    error!(%mode, "mode has no postprocess step");
                }
            },
        }
    }

    /// Run the action bound to `mode` with `text` as its argument.
    ///
    /// `chain` is the policy used when a typed long command moves the
    /// window to another mode.
    fn execute_action(&mut self, mode: Mode, text: String, chain: PostprocessPolicy) {
        match mode {
            Mode::Idle => {}
            Mode::Quit => self.emit(ControllerEvent::RequestClose),
            Mode::ToggleMenuBar => {
                self.emit(ControllerEvent::RequestMenuBarToggle);
                self.transition(Mode::Idle, PostprocessPolicy::Postprocess, None, None);
            }
            Mode::Command => {
                self.execute_command(&text, chain);
            }
            other => self.emit_execute(other, text),
        }
    }

    /// Look `text` up among the long commands and move to the matching mode.
    fn execute_command(&mut self, text: &str, chain: PostprocessPolicy) -> bool {
        let Some(entry) = self.table.by_long_command(text) else {
            debug!(text, "no command matches user input");
            return false;
        };
        let target = entry.state;
        info!(
            name = %entry.name,
            long_cmd = %entry.long_cmd,
            state = %target,
            "command matches user input"
        );
        self.transition(target, chain, None, Some(String::new()))
    }

    pub fn on_key_press(&mut self, key: Key, modifiers: Modifiers) {
        debug!(mode = %self.mode, ?key, ?modifiers, "key pressed");

        if key.is_enter() {
            let text = self.buffer.as_str().to_string();
            self.execute_action(self.mode, text, PostprocessPolicy::Action);
            self.reset();
            return;
        }
        if key == Key::Escape {
            self.reset();
            return;
        }

        let typed = if modifiers.intersects(Modifiers::CTRL | Modifiers::ALT | Modifiers::META) {
            None
        } else {
            key.text()
        };

        match self.mode {
            Mode::Command => match typed {
                Some(' ') => {
                    let text = self.buffer.as_str().to_string();
                    if !self.execute_command(&text, PostprocessPolicy::None) {
                        self.print_user_input(TextAction::Append, " ");
                    }
                }
                Some(c) if ('!'..='~').contains(&c) => {
                    self.print_user_input(TextAction::Append, c.encode_utf8(&mut [0; 4]));
                }
                _ => {}
            },
            Mode::Idle => {
                if typed == Some(':') {
                    self.request_transition(
                        Mode::Command,
                        PostprocessPolicy::Postprocess,
                        Some(key),
                    );
                    self.set_shortcuts_enabled(false);
                }
                self.print_user_input(TextAction::Clear, "");
            }
            mode => {
                let Some(c) = typed else { return };
                if mode.argument_kind().accepts(self.buffer.as_str(), c) {
                    self.print_user_input(TextAction::Append, c.encode_utf8(&mut [0; 4]));
                } else {
                    warn!(%mode, key = %c, "character not accepted in this mode");
                }
            }
        }
    }

    pub fn on_key_release(&mut self, key: Key, modifiers: Modifiers) {
        if key != Key::Backspace {
            return;
        }
        debug!(mode = %self.mode, ?modifiers, text = self.buffer.as_str(), "backspace released");

        if !self.buffer.is_empty() {
            self.print_user_input(TextAction::Backspace, "");
        } else if self.mode != Mode::Command {
            self.restore_long_command();
        }
    }

    /// Go back from a shortcut mode to Command mode showing the long form
    /// of the command that leads to it.
    fn restore_long_command(&mut self) {
        let Some(long_cmd) = self.table.by_mode(self.mode).map(|e| e.long_cmd.clone()) else {
            debug!(mode = %self.mode, "no command leads to the current mode");
            return;
        };
        if self.request_transition(
            Mode::Command,
            PostprocessPolicy::Postprocess,
            Some(Key::Backspace),
        ) {
            self.print_user_input(TextAction::Set, &long_cmd);
        }
    }

    /// A bound shortcut fired. Ignored while shortcuts are disabled.
    pub fn on_shortcut(&mut self, chord: KeyChord) -> bool {
        if !self.shortcuts_enabled {
            debug!(%chord, "shortcuts disabled");
            return false;
        }
        let Some(entry) = self.table.by_shortcut(&chord) else {
            return false;
        };
        let target = entry.state;
        info!(name = %entry.name, %chord, state = %target, "shortcut activated");
        self.request_transition(target, PostprocessPolicy::Postprocess, None)
    }

    /// Whether `chord` is bound and shortcuts are currently allowed to fire.
    pub fn is_bound_shortcut(&self, chord: &KeyChord) -> bool {
        self.shortcuts_enabled && self.table.by_shortcut(chord).is_some()
    }

    pub fn popup_closed(&mut self) {
        debug!(mode = %self.mode, "popup closed");
        self.reset();
    }

    /// Replace the typed text, e.g. to pre-fill the current URL.
    pub fn set_input(&mut self, text: &str) {
        self.print_user_input(TextAction::Set, text);
    }

    /// Force the window back to Idle, bypassing transition rules.
    pub fn reset(&mut self) {
        if self.mode != Mode::Idle {
            debug!(from = %self.mode, "resetting to idle");
            self.mode = Mode::Idle;
            self.emit(ControllerEvent::ModeChanged(Mode::Idle));
        }
        self.print_user_input(TextAction::Clear, "");
        self.set_shortcuts_enabled(true);
    }

    fn set_shortcuts_enabled(&mut self, enabled: bool) {
        if self.shortcuts_enabled != enabled {
            debug!(enabled, "shortcut enabled property changed");
            self.shortcuts_enabled = enabled;
            self.emit(ControllerEvent::ShortcutsEnabledChanged(enabled));
        }
    }

    fn print_user_input(&mut self, action: TextAction, text: &str) {
        debug!(?action, text, "user input");
        match action {
            TextAction::Set => self.buffer.set(text),
            TextAction::Append => self.buffer.append(text),
            TextAction::Clear => self.buffer.clear(),
            TextAction::Backspace => {
                self.buffer.backspace();
            }
        }

        let label = display_text(self.mode, self.buffer.as_str());
        if label != self.display_text {
            self.display_text = label.clone();
            self.emit(ControllerEvent::DisplayTextChanged(label));
        }
    }

    fn emit_execute(&mut self, mode: Mode, argument: String) {
        self.emit(ControllerEvent::Execute { mode, argument });
    }

    fn emit(&mut self, event: ControllerEvent) {
        self.events.push(event);
    }
}

/// Status bar text: `:text` in Command mode, `:action text` in other modes.
pub fn display_text(mode: Mode, text: &str) -> String {
    match mode {
        Mode::Idle => String::new(),
        Mode::Command => format!(":{text}"),
        other => format!(":{} {text}", other.action_name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{CommandEntry, CommandTable};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn entry(name: &str, shortcut: &str, long_cmd: &str, state: Mode) -> CommandEntry {
        CommandEntry {
            name: name.into(),
            shortcut: Some(shortcut.parse().expect("valid chord")),
            long_cmd: long_cmd.into(),
            state,
        }
    }

    fn controller() -> ModalController {
        let table = CommandTable::from_entries(vec![
            entry("find", "ctrl+f", "find", Mode::Find),
            entry("quit", "q", "quit", Mode::Quit),
            entry("menubar", "m", "menubar", Mode::ToggleMenuBar),
            entry("open", "o", "open", Mode::OpenTab),
            entry("move-tab", "t", "move-tab", Mode::MoveTab),
            entry("scroll-down", "j", "scroll-down", Mode::ScrollDown),
            entry("open-file", "ctrl+o", "open-file", Mode::OpenFile),
        ])
        .expect("valid table");
        ModalController::new(table)
    }

    fn press(ctrl: &mut ModalController, key: Key) {
        ctrl.on_key_press(key, Modifiers::empty());
    }

    fn type_text(ctrl: &mut ModalController, text: &str) {
        for c in text.chars() {
            let key = if c == ' ' { Key::Space } else { Key::Char(c) };
            press(ctrl, key);
        }
    }

    fn mode_changes(events: &[ControllerEvent]) -> Vec<Mode> {
        events
            .iter()
            .filter_map(|e| match e {
                ControllerEvent::ModeChanged(mode) => Some(*mode),
                _ => None,
            })
            .collect()
    }

    fn executed(events: &[ControllerEvent]) -> Vec<(Mode, String)> {
        events
            .iter()
            .filter_map(|e| match e {
                ControllerEvent::Execute { mode, argument } => Some((*mode, argument.clone())),
                _ => None,
            })
            .collect()
    }

    /// Put the controller in `mode` regardless of the transition rules.
    fn force_mode(ctrl: &mut ModalController, mode: Mode) {
        ctrl.mode = mode;
        ctrl.take_events();
    }

    #[test]
    fn test_typed_find_command_scenario() {
        let mut ctrl = controller();
        type_text(&mut ctrl, ":find");
        assert_eq!(ctrl.mode(), Mode::Command);
        assert_eq!(ctrl.buffer(), "find");
        press(&mut ctrl, Key::Enter);

        let events = ctrl.take_events();
        assert_eq!(
            mode_changes(&events),
            vec![Mode::Command, Mode::Find, Mode::Idle]
        );
        assert_eq!(executed(&events), vec![(Mode::Find, String::new())]);
        assert_eq!(ctrl.mode(), Mode::Idle);
        assert!(ctrl.buffer().is_empty());
        assert!(ctrl.shortcuts_enabled());
    }

    #[test]
    fn test_colon_disables_shortcuts() {
        let mut ctrl = controller();
        press(&mut ctrl, Key::Char(':'));
        assert_eq!(ctrl.mode(), Mode::Command);
        assert!(!ctrl.shortcuts_enabled());
        assert_eq!(ctrl.display_text(), ":");
        assert!(!ctrl.on_shortcut("q".parse().expect("chord")));
        assert_eq!(ctrl.mode(), Mode::Command);
    }

    #[rstest]
    fn test_non_idle_targets_rejected_outside_idle(
        #[values(Mode::OpenTab, Mode::Find, Mode::MoveTab, Mode::CloseTab)] current: Mode,
    ) {
        for target in Mode::ALL {
            if target == Mode::Idle || target == current {
                continue;
            }
            let mut ctrl = controller();
            force_mode(&mut ctrl, current);
            ctrl.buffer.set("x");
            assert!(
                !ctrl.request_transition(target, PostprocessPolicy::None, Some(Key::Backspace)),
                "{current} -> {target} should be rejected"
            );
            assert_eq!(ctrl.mode(), current);
            assert!(ctrl.take_events().is_empty());
        }
    }

    #[rstest]
    fn test_idle_always_reachable(#[values(Mode::Command, Mode::OpenTab, Mode::Find, Mode::Quit)] from: Mode) {
        let mut ctrl = controller();
        force_mode(&mut ctrl, from);
        ctrl.buffer.set("typed");
        assert!(ctrl.request_transition(Mode::Idle, PostprocessPolicy::Postprocess, None));
        assert_eq!(ctrl.mode(), Mode::Idle);
        assert!(ctrl.buffer().is_empty());
        assert!(ctrl.shortcuts_enabled());
    }

    #[test]
    fn test_same_mode_is_noop() {
        let mut ctrl = controller();
        assert!(!ctrl.request_transition(Mode::Idle, PostprocessPolicy::None, None));
        assert!(ctrl.take_events().is_empty());
    }

    #[test]
    fn test_command_mode_reaches_any_mode() {
        let mut ctrl = controller();
        press(&mut ctrl, Key::Char(':'));
        assert!(ctrl.request_transition(Mode::MoveTab, PostprocessPolicy::None, None));
        assert_eq!(ctrl.mode(), Mode::MoveTab);
    }

    #[test]
    fn test_backspace_restores_long_command() {
        let mut ctrl = controller();
        assert!(ctrl.on_shortcut("ctrl+f".parse().expect("chord")));
        assert_eq!(ctrl.mode(), Mode::Find);
        assert!(!ctrl.shortcuts_enabled());
        assert_eq!(ctrl.display_text(), ":find ");

        ctrl.on_key_release(Key::Backspace, Modifiers::empty());
        assert_eq!(ctrl.mode(), Mode::Command);
        assert_eq!(ctrl.buffer(), "find");
        assert_eq!(ctrl.display_text(), ":find");

        ctrl.on_key_release(Key::Backspace, Modifiers::empty());
        assert_eq!(ctrl.mode(), Mode::Command);
        assert_eq!(ctrl.buffer(), "fin");
    }

    #[test]
    fn test_backspace_deletes_before_restoring() {
        let mut ctrl = controller();
        ctrl.on_shortcut("o".parse().expect("chord"));
        type_text(&mut ctrl, "ab");
        ctrl.on_key_release(Key::Backspace, Modifiers::empty());
        assert_eq!(ctrl.mode(), Mode::OpenTab);
        assert_eq!(ctrl.buffer(), "a");
        ctrl.on_key_release(Key::Backspace, Modifiers::empty());
        ctrl.on_key_release(Key::Backspace, Modifiers::empty());
        assert_eq!(ctrl.mode(), Mode::Command);
        assert_eq!(ctrl.buffer(), "open");
    }

    #[test]
    fn test_backspace_in_idle_without_binding_does_nothing() {
        let mut ctrl = controller();
        ctrl.on_key_release(Key::Backspace, Modifiers::empty());
        assert_eq!(ctrl.mode(), Mode::Idle);
        assert!(ctrl.take_events().is_empty());
    }

    #[test]
    fn test_space_live_matches_and_keeps_typing() {
        let mut ctrl = controller();
        type_text(&mut ctrl, ":open www.example.org");
        assert_eq!(ctrl.mode(), Mode::OpenTab);
        assert_eq!(ctrl.buffer(), "www.example.org");
        assert_eq!(ctrl.display_text(), ":open www.example.org");
        press(&mut ctrl, Key::Return);

        let events = ctrl.take_events();
        assert_eq!(
            executed(&events),
            vec![(Mode::OpenTab, "www.example.org".to_string())]
        );
        assert_eq!(ctrl.mode(), Mode::Idle);
    }

    #[test]
    fn test_unmatched_space_is_appended() {
        let mut ctrl = controller();
        type_text(&mut ctrl, ":no such");
        assert_eq!(ctrl.mode(), Mode::Command);
        assert_eq!(ctrl.buffer(), "no such");
        press(&mut ctrl, Key::Enter);
        assert!(executed(&ctrl.take_events()).is_empty());
        assert_eq!(ctrl.mode(), Mode::Idle);
    }

    #[test]
    fn test_escape_forces_idle() {
        let mut ctrl = controller();
        type_text(&mut ctrl, ":qu");
        press(&mut ctrl, Key::Escape);
        assert_eq!(ctrl.mode(), Mode::Idle);
        assert!(ctrl.buffer().is_empty());
        assert!(ctrl.shortcuts_enabled());
        assert_eq!(ctrl.display_text(), "");
    }

    #[test]
    fn test_quit_shortcut_requests_close() {
        let mut ctrl = controller();
        ctrl.on_shortcut("q".parse().expect("chord"));
        assert!(ctrl.take_events().contains(&ControllerEvent::RequestClose));
    }

    #[test]
    fn test_toggle_menubar_returns_to_idle() {
        let mut ctrl = controller();
        ctrl.on_shortcut("m".parse().expect("chord"));
        let events = ctrl.take_events();
        assert!(events.contains(&ControllerEvent::RequestMenuBarToggle));
        assert_eq!(
            mode_changes(&events),
            vec![Mode::ToggleMenuBar, Mode::Idle]
        );
        assert_eq!(ctrl.mode(), Mode::Idle);
        assert!(ctrl.shortcuts_enabled());
    }

    #[test]
    fn test_immediate_mode_runs_and_returns() {
        let mut ctrl = controller();
        ctrl.on_shortcut("j".parse().expect("chord"));
        let events = ctrl.take_events();
        assert_eq!(executed(&events), vec![(Mode::ScrollDown, String::new())]);
        assert_eq!(ctrl.mode(), Mode::Idle);
    }

    #[test]
    fn test_open_file_shortcut_asks_for_popup() {
        let mut ctrl = controller();
        ctrl.on_shortcut("ctrl+o".parse().expect("chord"));
        let events = ctrl.take_events();
        assert_eq!(executed(&events), vec![(Mode::OpenFile, String::new())]);
        assert_eq!(ctrl.mode(), Mode::OpenFile);
        assert!(!ctrl.shortcuts_enabled());

        ctrl.popup_closed();
        assert_eq!(ctrl.mode(), Mode::Idle);
        assert!(ctrl.shortcuts_enabled());
    }

    #[test]
    fn test_offset_mode_filters_characters() {
        let mut ctrl = controller();
        ctrl.on_shortcut("t".parse().expect("chord"));
        type_text(&mut ctrl, "x+2-");
        assert_eq!(ctrl.buffer(), "+2");
        press(&mut ctrl, Key::Enter);
        assert_eq!(
            executed(&ctrl.take_events()),
            vec![(Mode::MoveTab, "+2".to_string())]
        );
    }

    #[test]
    fn test_modified_characters_are_not_typed() {
        let mut ctrl = controller();
        press(&mut ctrl, Key::Char(':'));
        ctrl.on_key_press(Key::Char('c'), Modifiers::CTRL);
        assert!(ctrl.buffer().is_empty());
    }

    #[test]
    fn test_set_input_prefills_buffer() {
        let mut ctrl = controller();
        ctrl.on_shortcut("o".parse().expect("chord"));
        ctrl.set_input("https://example.org");
        assert_eq!(ctrl.display_text(), ":open https://example.org");
    }

    #[test]
    fn test_display_text_format() {
        assert_eq!(display_text(Mode::Idle, "ignored"), "");
        assert_eq!(display_text(Mode::Command, "find"), ":find");
        assert_eq!(display_text(Mode::MoveLeft, "2"), ":move left 2");
    }
}
