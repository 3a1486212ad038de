// Input handling for Kiri
// Translates egui keyboard events and routes them to popups, shortcuts or
// the modal controller

use crate::app::Browser;
use crate::commands::{Key, KeyChord, Modifiers};
use eframe::egui;
use tracing::trace;

pub fn translate_modifiers(modifiers: egui::Modifiers) -> Modifiers {
    let mut out = Modifiers::empty();
    out.set(Modifiers::SHIFT, modifiers.shift);
    out.set(Modifiers::CTRL, modifiers.ctrl);
    out.set(Modifiers::ALT, modifiers.alt);
    out.set(Modifiers::META, modifiers.mac_cmd);
    out
}

pub fn translate_key(key: egui::Key) -> Option<Key> {
    use egui::Key as E;
    let translated = match key {
        E::Enter => Key::Enter,
        E::Escape => Key::Escape,
        E::Backspace => Key::Backspace,
        E::Space => Key::Space,
        E::Tab => Key::Tab,
        E::ArrowUp => Key::Up,
        E::ArrowDown => Key::Down,
        E::ArrowLeft => Key::Left,
        E::ArrowRight => Key::Right,
        E::PageUp => Key::PageUp,
        E::PageDown => Key::PageDown,
        E::Home => Key::Home,
        E::End => Key::End,
        E::Delete => Key::Delete,
        E::F1 => Key::F(1),
        E::F2 => Key::F(2),
        E::F3 => Key::F(3),
        E::F4 => Key::F(4),
        E::F5 => Key::F(5),
        E::F6 => Key::F(6),
        E::F7 => Key::F(7),
        E::F8 => Key::F(8),
        E::F9 => Key::F(9),
        E::F10 => Key::F(10),
        E::F11 => Key::F(11),
        E::F12 => Key::F(12),
        other => {
            let mut chars = other.symbol_or_name().chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c.to_ascii_lowercase()),
                _ => return None,
            }
        }
    };
    Some(translated)
}

impl Browser {
    pub(crate) fn handle_input(&mut self, ctx: &egui::Context) {
        let events = ctx.input(|i| i.events.clone());

        // Popup widgets own the keyboard while they are on screen
        if self.popups.is_visible() {
            if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
                self.popups.close_visible();
            }
            return;
        }

        // Text produced by a key that fired a shortcut must not be typed too
        let mut swallow_text = false;

        for event in events {
            match event {
                egui::Event::Key {
                    key,
                    pressed,
                    modifiers,
                    ..
                } => {
                    let Some(key) = translate_key(key) else {
                        continue;
                    };
                    let modifiers = translate_modifiers(modifiers);
                    trace!(?key, ?modifiers, pressed, "key event");

                    if !pressed {
                        self.controller.on_key_release(key, modifiers);
                        continue;
                    }

                    let chord = KeyChord::new(key, modifiers);
                    if self.controller.is_bound_shortcut(&chord) {
                        self.controller.on_shortcut(chord);
                        swallow_text = key.text().is_some()
                            && !modifiers.intersects(Modifiers::CTRL | Modifiers::ALT | Modifiers::META);
                        continue;
                    }

                    // Printable keys arrive again as text events
                    if key.text().is_none() {
                        self.controller.on_key_press(key, modifiers);
                    }
                }
                egui::Event::Text(text) => {
                    if std::mem::take(&mut swallow_text) {
                        continue;
                    }
                    for c in text.chars() {
                        let key = if c == ' ' { Key::Space } else { Key::Char(c) };
                        self.controller.on_key_press(key, Modifiers::empty());
                    }
                }
                _ => {}
            }
        }
    }
}
