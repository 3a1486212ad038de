// Popups owned by the main window, one slot per kind
use super::kinds::{FindPopup, LabelPopup, OpenFilePopup, Popup};
use super::{PopupContainer, PopupEvent, SizePolicy, SlotId};
use crate::state::FindSettings;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::debug;

/// Something the user finished in a popup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PopupOutcome {
    OpenPath(PathBuf),
    Find(FindSettings),
    /// The visible popup went away; input goes back to the window.
    Closed,
}

pub struct MainWindowPopups {
    container: PopupContainer<Popup>,
    open_file_id: SlotId,
    warning_id: SlotId,
    find_id: SlotId,
}

impl MainWindowPopups {
    pub fn new(warning_timeout: Duration) -> Self {
        let mut container = PopupContainer::new();
        let open_file_id = container.append(Popup::OpenFile(OpenFilePopup::default()));
        let warning_id = container.append(Popup::Warning(LabelPopup::new(warning_timeout)));
        let find_id = container.append(Popup::Find(FindPopup::default()));
        Self {
            container,
            open_file_id,
            warning_id,
            find_id,
        }
    }

    pub fn show_open_file_popup(&mut self) -> bool {
        self.container.show(self.open_file_id)
    }

    pub fn show_warning_popup(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        debug!(%text, "showing warning");
        if let Some(label) = self.warning_popup_mut() {
            label.text = text;
        }
        self.container.show(self.warning_id)
    }

    /// Show the find popup, starting from `previous` settings when given.
    pub fn show_find_popup(&mut self, previous: Option<&FindSettings>) -> bool {
        if let (Some(find), Some(settings)) = (self.find_popup_mut(), previous) {
            find.settings = settings.clone();
        }
        self.container.show(self.find_id)
    }

    pub fn open_file_popup_mut(&mut self) -> Option<&mut OpenFilePopup> {
        match self.container.get_mut(self.open_file_id) {
            Some(Popup::OpenFile(popup)) => Some(popup),
            _ => None,
        }
    }

    pub fn warning_popup_mut(&mut self) -> Option<&mut LabelPopup> {
        match self.container.get_mut(self.warning_id) {
            Some(Popup::Warning(popup)) => Some(popup),
            _ => None,
        }
    }

    pub fn find_popup_mut(&mut self) -> Option<&mut FindPopup> {
        match self.container.get_mut(self.find_id) {
            Some(Popup::Find(popup)) => Some(popup),
            _ => None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.container.current_visible_id().is_some()
    }

    pub fn visible_mut(&mut self) -> Option<&mut Popup> {
        self.container.current_visible_mut()
    }

    pub fn size_policy(&self) -> SizePolicy {
        self.container.size_policy()
    }

    /// Close whatever is on screen, as Escape does.
    pub fn close_visible(&mut self) {
        if let Some(popup) = self.container.current_visible_mut() {
            match popup {
                Popup::OpenFile(p) => p.cancel(),
                Popup::Warning(p) => p.dismiss(),
                Popup::Find(p) => p.cancel(),
            }
        }
    }

    /// Collect what happened in the popups since the last frame.
    pub fn poll(&mut self, now: Instant) -> Vec<PopupOutcome> {
        if let Some(label) = self.warning_popup_mut() {
            label.tick(now);
        }

        let mut outcomes = Vec::new();
        if let Some(path) = self.open_file_popup_mut().and_then(|p| p.take_submitted()) {
            outcomes.push(PopupOutcome::OpenPath(path));
        }
        if let Some(settings) = self.find_popup_mut().and_then(|p| p.take_submitted()) {
            outcomes.push(PopupOutcome::Find(settings));
        }

        self.container.poll_close_requests();
        for event in self.container.take_events() {
            match event {
                PopupEvent::CloseRequested(id) => {
                    if self.container.current_visible_id() == Some(id) {
                        self.container.hide();
                        outcomes.push(PopupOutcome::Closed);
                    }
                }
                PopupEvent::GeometryChangeRequested => {}
            }
        }
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn popups() -> MainWindowPopups {
        MainWindowPopups::new(Duration::from_secs(2))
    }

    #[test]
    fn test_one_slot_per_kind() {
        let popups = popups();
        assert_eq!(
            (popups.open_file_id, popups.warning_id, popups.find_id),
            (0, 1, 2)
        );
        assert_eq!(popups.container.count(), 3);
        assert!(!popups.is_visible());
    }

    #[test]
    fn test_submitting_open_file() {
        let mut popups = popups();
        assert!(popups.show_open_file_popup());
        if let Some(p) = popups.open_file_popup_mut() {
            p.path = "/tmp/page.html".into();
            p.submit();
        }
        assert_eq!(
            popups.poll(Instant::now()),
            vec![
                PopupOutcome::OpenPath(PathBuf::from("/tmp/page.html")),
                PopupOutcome::Closed
            ]
        );
        assert!(!popups.is_visible());
    }

    #[test]
    fn test_warning_replaces_visible_popup() {
        let mut popups = popups();
        popups.show_find_popup(None);
        popups.show_warning_popup("file not found");
        assert!(matches!(popups.visible_mut(), Some(Popup::Warning(l)) if l.text == "file not found"));
    }

    #[test]
    fn test_warning_expires() {
        let mut popups = popups();
        popups.show_warning_popup("slow down");
        assert!(popups.poll(Instant::now()).is_empty());
        let later = Instant::now() + Duration::from_secs(3);
        assert_eq!(popups.poll(later), vec![PopupOutcome::Closed]);
    }

    #[test]
    fn test_find_popup_keeps_previous_settings() {
        let mut popups = popups();
        let previous = FindSettings {
            case_sensitive: true,
            ..FindSettings::new("word")
        };
        popups.show_find_popup(Some(&previous));
        if let Some(p) = popups.find_popup_mut() {
            p.submit();
        }
        assert_eq!(
            popups.poll(Instant::now()),
            vec![PopupOutcome::Find(previous), PopupOutcome::Closed]
        );
    }

    #[test]
    fn test_escape_closes_visible() {
        let mut popups = popups();
        popups.show_open_file_popup();
        popups.close_visible();
        assert_eq!(popups.poll(Instant::now()), vec![PopupOutcome::Closed]);
    }
}
