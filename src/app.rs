use crate::commands::CommandTable;
use crate::config::Config;
use crate::controller::{ControllerEvent, ModalController};
use crate::engine::{create_url, spawn_worker, ContentEngine, EngineEvent, Target, WorkerEngine};
use crate::popup::{MainWindowPopups, PopupOutcome};
use crate::state::{FindDirection, FindSettings, FindState, Mode, TabsManager, UIState};
use eframe::egui;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub struct Browser {
    pub(crate) controller: ModalController,
    pub(crate) popups: MainWindowPopups,
    pub(crate) tabs: TabsManager,
    pub(crate) ui: UIState,
    pub(crate) config: Config,
    /// Settings of the last search, reused by find-next and find-prev
    pub(crate) last_find: Option<FindSettings>,
    /// Set when the content view must jump to `TabState::scroll`
    pub(crate) scroll_dirty: bool,
    engine: WorkerEngine,
    engine_rx: Receiver<EngineEvent>,
}

impl Browser {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: Config,
        table: CommandTable,
        initial: Vec<String>,
    ) -> Self {
        let ctx = cc.egui_ctx.clone();
        let (engine, engine_rx) = spawn_worker(move || ctx.request_repaint());

        cc.egui_ctx.style_mut(|style| {
            for font in style.text_styles.values_mut() {
                font.size = config.ui.font_size;
            }
        });

        Self::with_engine(config, table, engine, engine_rx, initial)
    }

    fn with_engine(
        config: Config,
        table: CommandTable,
        engine: WorkerEngine,
        engine_rx: Receiver<EngineEvent>,
        initial: Vec<String>,
    ) -> Self {
        let warning_timeout = Duration::from_secs(config.ui.status_timeout_secs);
        let mut browser = Self {
            controller: ModalController::new(table),
            popups: MainWindowPopups::new(warning_timeout),
            tabs: TabsManager::new(),
            ui: UIState::new(config.window.show_menu_bar),
            config,
            last_find: None,
            scroll_dirty: false,
            engine,
            engine_rx,
        };

        let initial = if initial.is_empty() && !browser.config.browser.home_page.is_empty() {
            vec![browser.config.browser.home_page.clone()]
        } else {
            initial
        };
        for text in initial {
            browser.open_in_new_tab(&text);
        }
        browser
    }

    fn drain_engine_events(&mut self) {
        while let Ok(event) = self.engine_rx.try_recv() {
            let Some(tab) = self.tabs.get_mut(event.tab()) else {
                debug!(?event, "event for a closed tab");
                continue;
            };
            match event {
                EngineEvent::LoadStarted(_) => tab.load.start_loading(),
                EngineEvent::LoadProgress { percent, .. } => tab.load.set_progress(percent),
                EngineEvent::LoadFinished { path, content, .. } => {
                    if !path.as_os_str().is_empty() {
                        tab.set_content(path, content);
                    }
                    tab.load.end_loading(true);
                }
                EngineEvent::LoadFailed { reason, .. } => {
                    warn!(tab = ?tab.id, %reason, "load failed");
                    tab.load.fail(reason);
                }
            }
        }
    }

    fn dispatch_controller_events(&mut self, ctx: &egui::Context) {
        loop {
            let events = self.controller.take_events();
            if events.is_empty() {
                break;
            }
            for event in events {
                match event {
                    ControllerEvent::ModeChanged(mode) => {
                        debug!(%mode, "window mode changed");
                        // A chained `:edit<Enter>` is already back in Idle here
                        let editing = self.controller.mode() == Mode::EditSearch;
                        if mode == Mode::EditSearch && editing {
                            let location = self
                                .tabs
                                .get_active()
                                .map(|tab| tab.location())
                                .unwrap_or_default();
                            self.controller.set_input(&location);
                        }
                    }
                    ControllerEvent::DisplayTextChanged(text) => self.ui.input_text = text,
                    ControllerEvent::ShortcutsEnabledChanged(enabled) => {
                        self.ui.shortcuts_enabled = enabled;
                    }
                    ControllerEvent::RequestClose => {
                        info!("closing window");
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                    ControllerEvent::RequestMenuBarToggle => self.ui.toggle_menu_bar(),
                    ControllerEvent::Execute { mode, argument } => self.execute(mode, &argument),
                }
            }
        }
    }

    /// Run an action the controller delegated to the window.
    pub(crate) fn execute(&mut self, mode: Mode, argument: &str) {
        debug!(%mode, argument, "executing action");
        match mode {
            Mode::OpenTab => self.open_in_new_tab(argument),
            Mode::NewSearch | Mode::EditSearch => {
                if argument.trim().is_empty() {
                    self.ui.set_info(format!("{} needs an address", mode.action_name()));
                } else {
                    self.open_in_current_tab(argument);
                }
            }
            Mode::CloseTab => match self.tabs.resolve_index(argument) {
                Ok(index) => {
                    if let Some(tab) = self.tabs.close_tab(index) {
                        self.engine.stop(tab.id);
                    }
                }
                Err(e) => self.ui.set_error(e.to_string()),
            },
            Mode::RefreshTab => match self.tabs.resolve_index(argument) {
                Ok(index) => {
                    if let Some(tab) = self.tabs.tabs.get(index) {
                        if let Some(target) = tab.current_target().cloned() {
                            self.engine.load(tab.id, target);
                        }
                    }
                }
                Err(e) => self.ui.set_error(e.to_string()),
            },
            Mode::MoveLeft | Mode::MoveRight => match TabsManager::parse_steps(argument) {
                Ok(steps) => self.tabs.shift_active(steps, mode == Mode::MoveRight),
                Err(e) => self.ui.set_error(e.to_string()),
            },
            Mode::MoveTab => {
                if let Err(e) = self.tabs.move_active(argument) {
                    self.ui.set_error(e.to_string());
                }
            }
            Mode::Find => {
                if argument.is_empty() {
                    self.popups.show_find_popup(self.last_find.as_ref());
                } else {
                    let settings = FindSettings {
                        text: argument.to_string(),
                        ..self.last_find.clone().unwrap_or_default()
                    };
                    self.find(settings);
                }
            }
            Mode::FindDown => self.step_find(FindDirection::Down),
            Mode::FindUp => self.step_find(FindDirection::Up),
            Mode::HistoryNext | Mode::HistoryPrev => {
                let Some(tab) = self.tabs.get_active_mut() else {
                    self.ui.set_error("No tabs".into());
                    return;
                };
                let target = if mode == Mode::HistoryNext {
                    tab.go_forward()
                } else {
                    tab.go_back()
                };
                match target {
                    Some(target) => {
                        let id = tab.id;
                        self.engine.load(id, target);
                    }
                    None => self.ui.set_info("no more history".into()),
                }
            }
            Mode::ScrollUp | Mode::ScrollDown => {
                let step = self.config.browser.scroll_step;
                if let Some(tab) = self.tabs.get_active_mut() {
                    let delta = if mode == Mode::ScrollUp { -step } else { step };
                    tab.scroll = (tab.scroll + delta).max(0.0);
                    self.scroll_dirty = true;
                }
            }
            Mode::OpenFile => {
                self.popups.show_open_file_popup();
            }
            Mode::Idle | Mode::Command | Mode::Quit | Mode::ToggleMenuBar => {}
        }
    }

    fn handle_popup_outcome(&mut self, outcome: PopupOutcome) {
        match outcome {
            PopupOutcome::OpenPath(path) => self.open_path(path),
            PopupOutcome::Find(settings) => self.find(settings),
            PopupOutcome::Closed => self.controller.popup_closed(),
        }
    }

    fn open_path(&mut self, path: PathBuf) {
        if path.is_file() {
            let target = Target::File(path);
            let id = self.tabs.open(target.clone());
            self.engine.load(id, target);
        } else {
            warn!(path = %path.display(), "cannot open file");
            self.popups
                .show_warning_popup(format!("{} is not a readable file", path.display()));
        }
    }

    pub(crate) fn open_in_new_tab(&mut self, text: &str) {
        match create_url(text, &self.config.browser.search_engine) {
            Ok(target) => {
                info!(%target, "opening tab");
                let id = self.tabs.open(target.clone());
                self.engine.load(id, target);
            }
            Err(e) => self.ui.set_error(format!("cannot open '{text}': {e}")),
        }
    }

    fn open_in_current_tab(&mut self, text: &str) {
        let target = match create_url(text, &self.config.browser.search_engine) {
            Ok(target) => target,
            Err(e) => {
                self.ui.set_error(format!("cannot open '{text}': {e}"));
                return;
            }
        };
        match self.tabs.get_active_mut() {
            Some(tab) => {
                tab.navigate(target.clone());
                let id = tab.id;
                self.engine.load(id, target);
            }
            None => self.open_in_new_tab(text),
        }
    }

    fn find(&mut self, settings: FindSettings) {
        self.last_find = Some(settings.clone());
        let Some(tab) = self.tabs.get_active_mut() else {
            self.ui.set_error("No tabs".into());
            return;
        };
        let Some(content) = tab.text_content() else {
            self.ui.set_error("nothing to search in this tab".into());
            return;
        };
        let state = FindState::new(settings, content);
        let summary = state.summary();
        tab.find = Some(state);
        self.ui.set_info(summary);
        self.scroll_to_match();
    }

    fn step_find(&mut self, direction: FindDirection) {
        let Some(find) = self.tabs.get_active_mut().and_then(|tab| tab.find.as_mut()) else {
            self.ui.set_info("no search in this tab".into());
            return;
        };
        // Steps follow the direction chosen when searching
        let direction = match find.settings.direction {
            FindDirection::Down => direction,
            FindDirection::Up => direction.reversed(),
        };
        find.step(direction);
        let summary = find.summary();
        self.ui.set_info(summary);
        self.scroll_to_match();
    }

    fn scroll_to_match(&mut self) {
        let line_height = self.config.ui.font_size * crate::style::LINE_HEIGHT_RATIO;
        let Some(tab) = self.tabs.get_active_mut() else {
            return;
        };
        let (Some(range), Some(content)) = (
            tab.find.as_ref().and_then(|f| f.current_match()),
            tab.text_content(),
        ) else {
            return;
        };
        let Some(before) = content.get(..range.start) else {
            return;
        };
        let line = before.matches('\n').count();
        tab.scroll = (line as f32 * line_height - 2.0 * line_height).max(0.0);
        self.scroll_dirty = true;
    }
}

impl eframe::App for Browser {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_engine_events();
        self.handle_input(ctx);
        self.dispatch_controller_events(ctx);

        for outcome in self.popups.poll(Instant::now()) {
            self.handle_popup_outcome(outcome);
        }
        self.dispatch_controller_events(ctx);
        self.ui
            .clear_expired_messages(self.config.ui.status_timeout_secs);

        self.render_menu_bar(ctx);
        self.render_tab_bar(ctx);
        self.render_status_bar(ctx);
        self.render_content(ctx);
        self.render_popups(ctx);

        if self.popups.is_visible() || self.ui.error_message.is_some() || self.ui.info_message.is_some() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{Key, Modifiers};
    use crate::state::PostprocessPolicy;
    use pretty_assertions::assert_eq;

    fn browser(initial: &[&str]) -> Browser {
        let (engine, engine_rx) = spawn_worker(|| {});
        let config = Config::default();
        let table = CommandTable::builtin().expect("built-in table");
        let initial = initial.iter().map(|s| s.to_string()).collect();
        Browser::with_engine(config, table, engine, engine_rx, initial)
    }

    fn type_command(browser: &mut Browser, ctx: &egui::Context, text: &str) {
        for c in text.chars() {
            let key = if c == ' ' { Key::Space } else { Key::Char(c) };
            browser.controller.on_key_press(key, Modifiers::empty());
        }
        browser.controller.on_key_press(Key::Enter, Modifiers::empty());
        browser.dispatch_controller_events(ctx);
    }

    #[test]
    fn test_chained_edit_keeps_page_and_clears_input() {
        let ctx = egui::Context::default();
        let mut browser = browser(&["https://example.org/"]);
        let before = browser.tabs.get_active().map(|t| t.location());

        type_command(&mut browser, &ctx, ":edit");

        assert_eq!(browser.controller.mode(), Mode::Idle);
        assert_eq!(browser.controller.buffer(), "");
        assert_eq!(browser.tabs.get_active().map(|t| t.location()), before);
        assert_eq!(browser.tabs.get_active().map(|t| t.history.len()), Some(1));
        assert!(browser.ui.info_message.is_some());
    }

    #[test]
    fn test_empty_search_argument_is_ignored() {
        let mut browser = browser(&["https://example.org/"]);
        browser.execute(Mode::NewSearch, "  ");
        assert_eq!(
            browser.tabs.get_active().map(|t| t.location()),
            Some("https://example.org/".to_string())
        );

        browser.execute(Mode::NewSearch, "https://example.com/");
        assert_eq!(
            browser.tabs.get_active().map(|t| t.location()),
            Some("https://example.com/".to_string())
        );
    }

    #[test]
    fn test_edit_shortcut_prefills_location() {
        let ctx = egui::Context::default();
        let mut browser = browser(&["https://example.org/"]);
        assert!(browser.controller.request_transition(
            Mode::EditSearch,
            PostprocessPolicy::Postprocess,
            None
        ));
        browser.dispatch_controller_events(&ctx);
        assert_eq!(browser.controller.buffer(), "https://example.org/");
    }

    #[test]
    fn test_huge_move_right_wraps_without_panic() {
        let mut browser = browser(&["a.example", "b.example"]);
        browser.execute(Mode::MoveRight, "18446744073709551615");
        assert_eq!(browser.tabs.active_tab, 0);
        browser.execute(Mode::MoveTab, "+18446744073709551615");
        assert_eq!(browser.tabs.active_tab, 1);
    }
}
