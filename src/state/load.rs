// Page load progress of a tab

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading {
        progress: u8,
    },
    Finished,
    Error(String),
}

impl LoadState {
    pub fn start_loading(&mut self) {
        *self = LoadState::Loading { progress: 0 };
    }

    /// Progress updates are ignored unless a load is running.
    pub fn set_progress(&mut self, value: u8) {
        if let LoadState::Loading { progress } = self {
            *progress = value.min(100);
        }
    }

    pub fn end_loading(&mut self, success: bool) {
        *self = if success {
            LoadState::Finished
        } else {
            LoadState::Error("load failed".to_string())
        };
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        *self = LoadState::Error(reason.into());
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading { .. })
    }

    /// Short text for the status bar, empty when nothing is happening.
    pub fn status_text(&self) -> String {
        match self {
            LoadState::Idle => String::new(),
            LoadState::Loading { progress } => format!("loading {progress}%"),
            LoadState::Finished => "done".to_string(),
            LoadState::Error(reason) => format!("error: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_lifecycle() {
        let mut state = LoadState::default();
        state.set_progress(40);
        assert_eq!(state, LoadState::Idle);

        state.start_loading();
        state.set_progress(40);
        assert_eq!(state, LoadState::Loading { progress: 40 });
        state.set_progress(250);
        assert_eq!(state.status_text(), "loading 100%");

        state.end_loading(true);
        assert_eq!(state, LoadState::Finished);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_failed_load() {
        let mut state = LoadState::default();
        state.start_loading();
        state.end_loading(false);
        assert!(matches!(state, LoadState::Error(_)));

        state.fail("not found");
        assert_eq!(state.status_text(), "error: not found");
    }
}
