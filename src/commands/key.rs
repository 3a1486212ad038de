// Toolkit independent key codes and chords
use bitflags::bitflags;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

bitflags! {
    /// Modifier keys held while a key is pressed.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const META = 1 << 3;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character. Letters in chords are stored lowercase.
    Char(char),
    Enter,
    Return,
    Escape,
    Backspace,
    Space,
    Tab,
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    Delete,
    F(u8),
}

impl Key {
    /// Character this key contributes to typed text, if any.
    pub fn text(self) -> Option<char> {
        match self {
            Key::Char(c) => Some(c),
            Key::Space => Some(' '),
            _ => None,
        }
    }

    pub fn is_enter(self) -> bool {
        matches!(self, Key::Enter | Key::Return)
    }

    fn name(self) -> String {
        match self {
            Key::Char(c) => c.to_string(),
            Key::Enter => "enter".into(),
            Key::Return => "return".into(),
            Key::Escape => "esc".into(),
            Key::Backspace => "backspace".into(),
            Key::Space => "space".into(),
            Key::Tab => "tab".into(),
            Key::Up => "up".into(),
            Key::Down => "down".into(),
            Key::Left => "left".into(),
            Key::Right => "right".into(),
            Key::PageUp => "pageup".into(),
            Key::PageDown => "pagedown".into(),
            Key::Home => "home".into(),
            Key::End => "end".into(),
            Key::Delete => "delete".into(),
            Key::F(n) => format!("f{n}"),
        }
    }

    fn from_name(token: &str) -> Option<Self> {
        let lower = token.to_ascii_lowercase();
        let key = match lower.as_str() {
            "enter" => Key::Enter,
            "return" => Key::Return,
            "esc" | "escape" => Key::Escape,
            "backspace" => Key::Backspace,
            "space" => Key::Space,
            "tab" => Key::Tab,
            "up" => Key::Up,
            "down" => Key::Down,
            "left" => Key::Left,
            "right" => Key::Right,
            "pageup" => Key::PageUp,
            "pagedown" => Key::PageDown,
            "home" => Key::Home,
            "end" => Key::End,
            "del" | "delete" => Key::Delete,
            "plus" => Key::Char('+'),
            "minus" => Key::Char('-'),
            "slash" => Key::Char('/'),
            "colon" => Key::Char(':'),
            _ => {
                let n = lower.strip_prefix('f')?.parse::<u8>().ok()?;
                return (1..=24).contains(&n).then_some(Key::F(n));
            }
        };
        Some(key)
    }
}

/// A key together with its modifiers; the unit of shortcut lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyChord {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        let key = match key {
            Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
            other => other,
        };
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::empty())
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, name) in [
            (Modifiers::CTRL, "ctrl"),
            (Modifiers::ALT, "alt"),
            (Modifiers::META, "meta"),
            (Modifiers::SHIFT, "shift"),
        ] {
            if self.modifiers.contains(flag) {
                write!(f, "{name}+")?;
            }
        }
        f.write_str(&self.key.name())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChordParseError {
    #[error("shortcut is empty")]
    Empty,
    #[error("unknown modifier '{0}'")]
    UnknownModifier(String),
    #[error("unknown key '{0}'")]
    UnknownKey(String),
    #[error("shortcut has modifiers but no key")]
    MissingKey,
    #[error("unexpected key '{0}' after the main key")]
    ExtraKey(String),
}

impl FromStr for KeyChord {
    type Err = ChordParseError;

    /// Parses `ctrl+f`, `Q` (uppercase implies shift), `/`, `alt+left`, `f5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ChordParseError::Empty);
        }
        // A lone "+" is the plus key, not a separator
        let tokens: Vec<&str> = if s == "+" {
            vec!["+"]
        } else if let Some(head) = s.strip_suffix("++") {
            head.split('+').chain(std::iter::once("+")).collect()
        } else {
            s.split('+').collect()
        };

        let mut modifiers = Modifiers::empty();
        let mut key = None;
        for token in tokens {
            if key.is_some() {
                return Err(ChordParseError::ExtraKey(token.to_string()));
            }
            let lower = token.to_ascii_lowercase();
            let flag = match lower.as_str() {
                "ctrl" | "control" => Some(Modifiers::CTRL),
                "shift" => Some(Modifiers::SHIFT),
                "alt" | "option" => Some(Modifiers::ALT),
                "meta" | "cmd" | "super" => Some(Modifiers::META),
                _ => None,
            };
            if let Some(flag) = flag {
                modifiers |= flag;
                continue;
            }

            let mut chars = token.chars();
            key = match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_uppercase() => {
                    modifiers |= Modifiers::SHIFT;
                    Some(Key::Char(c))
                }
                (Some(c), None) if c == ' ' => Some(Key::Space),
                (Some(c), None) if c.is_ascii_graphic() => Some(Key::Char(c)),
                (Some(_), None) => return Err(ChordParseError::UnknownKey(token.to_string())),
                _ => match Key::from_name(token) {
                    Some(named) => Some(named),
                    None if token.is_empty() => return Err(ChordParseError::MissingKey),
                    None if looks_like_modifier(&lower) => {
                        return Err(ChordParseError::UnknownModifier(token.to_string()))
                    }
                    None => return Err(ChordParseError::UnknownKey(token.to_string())),
                },
            };
        }

        key.map(|key| KeyChord::new(key, modifiers))
            .ok_or(ChordParseError::MissingKey)
    }
}

fn looks_like_modifier(token: &str) -> bool {
    ["ctl", "ctr", "shft", "meta", "mod", "win"]
        .iter()
        .any(|prefix| token.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("q", KeyChord::plain(Key::Char('q')))]
    #[case("Q", KeyChord::new(Key::Char('q'), Modifiers::SHIFT))]
    #[case("ctrl+f", KeyChord::new(Key::Char('f'), Modifiers::CTRL))]
    #[case("Ctrl+Shift+t", KeyChord::new(Key::Char('t'), Modifiers::CTRL | Modifiers::SHIFT))]
    #[case("/", KeyChord::plain(Key::Char('/')))]
    #[case("+", KeyChord::plain(Key::Char('+')))]
    #[case("ctrl++", KeyChord::new(Key::Char('+'), Modifiers::CTRL))]
    #[case("alt+left", KeyChord::new(Key::Left, Modifiers::ALT))]
    #[case("f5", KeyChord::plain(Key::F(5)))]
    #[case("esc", KeyChord::plain(Key::Escape))]
    fn test_parse_chord(#[case] text: &str, #[case] expected: KeyChord) {
        assert_eq!(text.parse::<KeyChord>(), Ok(expected));
    }

    #[rstest]
    #[case("", ChordParseError::Empty)]
    #[case("ctrl+", ChordParseError::MissingKey)]
    #[case("ctrl", ChordParseError::MissingKey)]
    #[case("hyper+q", ChordParseError::UnknownKey("hyper".into()))]
    #[case("ctl+q", ChordParseError::UnknownModifier("ctl".into()))]
    #[case("f99", ChordParseError::UnknownKey("f99".into()))]
    #[case("q+w", ChordParseError::ExtraKey("w".into()))]
    fn test_parse_chord_errors(#[case] text: &str, #[case] expected: ChordParseError) {
        assert_eq!(text.parse::<KeyChord>(), Err(expected));
    }

    #[test]
    fn test_display_round_trips() {
        for text in ["ctrl+f", "shift+q", "alt+left", "f12", "/"] {
            let chord: KeyChord = text.parse().expect("valid chord");
            assert_eq!(chord.to_string().parse::<KeyChord>(), Ok(chord));
        }
    }

    #[test]
    fn test_chord_letters_normalized() {
        assert_eq!(
            KeyChord::new(Key::Char('F'), Modifiers::CTRL),
            KeyChord::new(Key::Char('f'), Modifiers::CTRL)
        );
    }

    #[test]
    fn test_uppercase_letter_adds_shift() {
        let plain: KeyChord = "ctrl+f".parse().expect("valid chord");
        let shifted: KeyChord = "ctrl+F".parse().expect("valid chord");
        assert_ne!(plain, shifted);
        assert_eq!(shifted.modifiers, Modifiers::CTRL | Modifiers::SHIFT);
    }

    #[test]
    fn test_error_messages() {
        let err = "ctl+q".parse::<KeyChord>().expect_err("bad modifier");
        assert_eq!(err.to_string(), "unknown modifier 'ctl'");
        assert_eq!(ChordParseError::MissingKey.to_string(), "shortcut has modifiers but no key");
    }
}
