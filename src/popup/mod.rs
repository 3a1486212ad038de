// Indexed popup slots with at most one popup on screen
//
// Slots are numbered densely: a new popup takes the smallest free id, so
// ids freed by `remove` are handed out again.

pub mod kinds;
pub mod main_window;

pub use kinds::{FindPopup, LabelPopup, OpenFilePopup, Popup};
pub use main_window::{MainWindowPopups, PopupOutcome};

use std::collections::BTreeMap;
use tracing::{debug, error, warn};

pub type SlotId = u32;

/// Preferred geometry of a popup, adopted by the container on show.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizePolicy {
    pub width: f32,
    pub max_height: f32,
}

impl Default for SizePolicy {
    fn default() -> Self {
        Self {
            width: 420.0,
            max_height: 320.0,
        }
    }
}

/// Behaviour the container needs from anything it holds.
pub trait PopupWidget {
    fn on_show(&mut self) {}

    fn on_hide(&mut self) {}

    fn size_policy(&self) -> SizePolicy {
        SizePolicy::default()
    }

    /// Returns true once per close request raised by the popup.
    fn take_close_request(&mut self) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PopupEvent {
    CloseRequested(SlotId),
    GeometryChangeRequested,
}

pub struct PopupContainer<P: PopupWidget> {
    popups: BTreeMap<SlotId, P>,
    visible: Option<SlotId>,
    size_policy: SizePolicy,
    events: Vec<PopupEvent>,
}

impl<P: PopupWidget> Default for PopupContainer<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PopupWidget> PopupContainer<P> {
    pub fn new() -> Self {
        Self {
            popups: BTreeMap::new(),
            visible: None,
            size_policy: SizePolicy::default(),
            events: Vec::new(),
        }
    }

    /// Register `popup` under `id`; refuses occupied ids.
    pub fn insert(&mut self, id: SlotId, popup: P) -> bool {
        if self.popups.contains_key(&id) {
            warn!(id, "popup slot already in use");
            return false;
        }
        debug!(id, "adding popup");
        self.popups.insert(id, popup);
        true
    }

    /// Smallest id not used by any registered popup.
    pub fn allocate_next_free_id(&self) -> SlotId {
        let mut expected: SlotId = 0;
        for &id in self.popups.keys() {
            if id != expected {
                break;
            }
            expected += 1;
        }
        expected
    }

    pub fn append(&mut self, popup: P) -> SlotId {
        let id = self.allocate_next_free_id();
        let inserted = self.insert(id, popup);
        debug_assert!(inserted, "free slot {id} turned out to be occupied");
        if !inserted {
            error!(id, "free slot turned out to be occupied");
        }
        id
    }

    pub fn remove(&mut self, id: SlotId) -> bool {
        if self.visible == Some(id) {
            self.hide();
        }
        match self.popups.remove(&id) {
            Some(_) => {
                debug!(id, "removed popup");
                true
            }
            None => {
                warn!(id, "no popup to remove");
                false
            }
        }
    }

    /// Put popup `id` on screen, hiding whichever popup was there.
    pub fn show(&mut self, id: SlotId) -> bool {
        if !self.popups.contains_key(&id) {
            warn!(id, "cannot show unknown popup");
            return false;
        }

        if let Some(previous) = self.visible.take() {
            if let Some(popup) = self.popups.get_mut(&previous) {
                popup.on_hide();
            }
        }

        let Some(popup) = self.popups.get_mut(&id) else {
            return false;
        };
        popup.on_show();
        self.size_policy = popup.size_policy();
        self.visible = Some(id);
        debug!(id, "showing popup");
        self.events.push(PopupEvent::GeometryChangeRequested);
        true
    }

    pub fn hide(&mut self) {
        if let Some(id) = self.visible.take() {
            if let Some(popup) = self.popups.get_mut(&id) {
                popup.on_hide();
            }
            debug!(id, "hid popup");
        }
    }

    pub fn replace(&mut self, id: SlotId, popup: P) -> bool {
        self.remove(id);
        self.insert(id, popup)
    }

    /// Turn close requests of every registered popup into events.
    pub fn poll_close_requests(&mut self) {
        for (&id, popup) in self.popups.iter_mut() {
            if popup.take_close_request() {
                debug!(id, "popup requested close");
                self.events.push(PopupEvent::CloseRequested(id));
            }
        }
    }

    pub fn current_visible(&self) -> Option<&P> {
        self.visible.and_then(|id| self.popups.get(&id))
    }

    pub fn current_visible_mut(&mut self) -> Option<&mut P> {
        self.visible.and_then(|id| self.popups.get_mut(&id))
    }

    pub fn current_visible_id(&self) -> Option<SlotId> {
        self.visible
    }

    pub fn get(&self, id: SlotId) -> Option<&P> {
        self.popups.get(&id)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut P> {
        self.popups.get_mut(&id)
    }

    pub fn count(&self) -> usize {
        self.popups.len()
    }

    pub fn size_policy(&self) -> SizePolicy {
        self.size_policy
    }

    pub fn take_events(&mut self) -> Vec<PopupEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Dummy {
        width: f32,
        shown: u32,
        hidden: u32,
        close: bool,
    }

    impl Dummy {
        fn wide(width: f32) -> Self {
            Self {
                width,
                ..Default::default()
            }
        }
    }

    impl PopupWidget for Dummy {
        fn on_show(&mut self) {
            self.shown += 1;
        }

        fn on_hide(&mut self) {
            self.hidden += 1;
        }

        fn size_policy(&self) -> SizePolicy {
            SizePolicy {
                width: self.width,
                max_height: 100.0,
            }
        }

        fn take_close_request(&mut self) -> bool {
            std::mem::take(&mut self.close)
        }
    }

    fn container(ids: &[SlotId]) -> PopupContainer<Dummy> {
        let mut c = PopupContainer::new();
        for &id in ids {
            assert!(c.insert(id, Dummy::default()));
        }
        c
    }

    #[test]
    fn test_allocate_fills_first_gap() {
        assert_eq!(container(&[0, 1, 3]).allocate_next_free_id(), 2);
        assert_eq!(container(&[0, 1, 2]).allocate_next_free_id(), 3);
        assert_eq!(container(&[]).allocate_next_free_id(), 0);
        assert_eq!(container(&[1, 2]).allocate_next_free_id(), 0);
    }

    #[test]
    fn test_append_reuses_removed_id() {
        let mut c = container(&[]);
        assert_eq!(c.append(Dummy::default()), 0);
        assert_eq!(c.append(Dummy::default()), 1);
        assert_eq!(c.append(Dummy::default()), 2);
        assert!(c.remove(1));
        assert_eq!(c.append(Dummy::default()), 1);
        assert_eq!(c.count(), 3);
    }

    #[test]
    fn test_insert_refuses_occupied_id() {
        let mut c = container(&[0]);
        assert!(!c.insert(0, Dummy::wide(99.0)));
        assert_eq!(c.count(), 1);
        assert_eq!(c.get(0).map(|p| p.width), Some(0.0));
    }

    #[test]
    fn test_show_unknown_keeps_visible() {
        let mut c = container(&[0]);
        assert!(c.show(0));
        assert!(!c.show(7));
        assert_eq!(c.current_visible_id(), Some(0));
    }

    #[test]
    fn test_show_switches_visible_popup() {
        let mut c = container(&[0, 1]);
        assert!(c.show(1));
        assert!(c.show(0));
        assert_eq!(c.current_visible_id(), Some(0));
        assert_eq!(c.get(1).map(|p| (p.shown, p.hidden)), Some((1, 1)));
        assert_eq!(c.get(0).map(|p| (p.shown, p.hidden)), Some((1, 0)));
        assert_eq!(
            c.take_events(),
            vec![
                PopupEvent::GeometryChangeRequested,
                PopupEvent::GeometryChangeRequested
            ]
        );
    }

    #[test]
    fn test_show_adopts_size_policy() {
        let mut c = container(&[]);
        let id = c.append(Dummy::wide(640.0));
        c.show(id);
        assert_eq!(c.size_policy().width, 640.0);
    }

    #[test]
    fn test_remove_visible_hides_it() {
        let mut c = container(&[0, 1]);
        c.show(1);
        assert!(c.remove(1));
        assert_eq!(c.current_visible_id(), None);
        assert!(c.current_visible().is_none());
        assert!(!c.remove(1));
    }

    #[test]
    fn test_replace_keeps_id() {
        let mut c = container(&[0, 1]);
        assert!(c.replace(1, Dummy::wide(5.0)));
        assert_eq!(c.get(1).map(|p| p.width), Some(5.0));
        assert!(c.replace(4, Dummy::default()));
        assert_eq!(c.count(), 3);
    }

    #[test]
    fn test_close_requests_bubble_with_slot_id() {
        let mut c = container(&[0, 1]);
        if let Some(popup) = c.get_mut(1) {
            popup.close = true;
        }
        c.poll_close_requests();
        assert_eq!(c.take_events(), vec![PopupEvent::CloseRequested(1)]);
        c.poll_close_requests();
        assert!(c.take_events().is_empty());
    }
}
