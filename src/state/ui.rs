// UI state - presentation settings and transient messages
use std::time::Instant;

pub struct UIState {
    pub show_menu_bar: bool,
    /// Text of the user input area in the status bar
    pub input_text: String,
    pub shortcuts_enabled: bool,
    pub error_message: Option<(String, Instant)>,
    pub info_message: Option<(String, Instant)>,
}

impl UIState {
    pub fn new(show_menu_bar: bool) -> Self {
        Self {
            show_menu_bar,
            input_text: String::new(),
            shortcuts_enabled: true,
            error_message: None,
            info_message: None,
        }
    }

    pub fn toggle_menu_bar(&mut self) {
        self.show_menu_bar = !self.show_menu_bar;
    }

    pub fn set_error(&mut self, message: String) {
        self.error_message = Some((message, Instant::now()));
    }

    pub fn set_info(&mut self, message: String) {
        self.info_message = Some((message, Instant::now()));
    }

    pub fn clear_expired_messages(&mut self, timeout_secs: u64) {
        if let Some((_, time)) = &self.error_message {
            if time.elapsed().as_secs() >= timeout_secs {
                self.error_message = None;
            }
        }
        if let Some((_, time)) = &self.info_message {
            if time.elapsed().as_secs() >= timeout_secs {
                self.info_message = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_menu_bar() {
        let mut ui = UIState::new(true);
        ui.toggle_menu_bar();
        assert!(!ui.show_menu_bar);
    }

    #[test]
    fn test_messages_expire() {
        let mut ui = UIState::new(false);
        ui.set_error("boom".into());
        ui.set_info("hello".into());
        ui.clear_expired_messages(60);
        assert!(ui.error_message.is_some());
        ui.clear_expired_messages(0);
        assert!(ui.error_message.is_none());
        assert!(ui.info_message.is_none());
    }
}
