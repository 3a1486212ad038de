// Text search inside the content of a tab
use std::ops::Range;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FindDirection {
    #[default]
    Down,
    Up,
}

impl FindDirection {
    pub fn reversed(self) -> Self {
        match self {
            FindDirection::Down => FindDirection::Up,
            FindDirection::Up => FindDirection::Down,
        }
    }
}

/// What to look for and how.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FindSettings {
    pub text: String,
    pub direction: FindDirection,
    pub case_sensitive: bool,
    pub match_full_word: bool,
}

impl FindSettings {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Byte ranges of every non-overlapping match in `haystack`.
    pub fn find_matches(&self, haystack: &str) -> Vec<Range<usize>> {
        if self.text.is_empty() {
            return Vec::new();
        }

        // ASCII folding keeps byte offsets identical between both strings
        let (hay, needle) = if self.case_sensitive {
            (haystack.to_string(), self.text.clone())
        } else {
            (haystack.to_ascii_lowercase(), self.text.to_ascii_lowercase())
        };

        hay.match_indices(needle.as_str())
            .map(|(start, m)| start..start + m.len())
            .filter(|range| !self.match_full_word || is_whole_word(haystack, range))
            .collect()
    }
}

fn is_whole_word(haystack: &str, range: &Range<usize>) -> bool {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let before = haystack[..range.start].chars().next_back();
    let after = haystack[range.end..].chars().next();
    !before.is_some_and(is_word) && !after.is_some_and(is_word)
}

/// Result of the last search in a tab, with a cursor over its matches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FindState {
    pub settings: FindSettings,
    pub matches: Vec<Range<usize>>,
    pub current: Option<usize>,
}

impl FindState {
    pub fn new(settings: FindSettings, content: &str) -> Self {
        let matches = settings.find_matches(content);
        let current = match (matches.is_empty(), settings.direction) {
            (true, _) => None,
            (false, FindDirection::Down) => Some(0),
            (false, FindDirection::Up) => Some(matches.len() - 1),
        };
        Self {
            settings,
            matches,
            current,
        }
    }

    /// Move to the next match in `direction`, wrapping around.
    pub fn step(&mut self, direction: FindDirection) -> Option<Range<usize>> {
        let count = self.matches.len();
        if count == 0 {
            return None;
        }
        let index = match (self.current, direction) {
            (None, FindDirection::Down) => 0,
            (None, FindDirection::Up) => count - 1,
            (Some(i), FindDirection::Down) => (i + 1) % count,
            (Some(i), FindDirection::Up) => (i + count - 1) % count,
        };
        self.current = Some(index);
        self.matches.get(index).cloned()
    }

    pub fn current_match(&self) -> Option<Range<usize>> {
        self.current.and_then(|i| self.matches.get(i).cloned())
    }

    pub fn summary(&self) -> String {
        match self.current {
            Some(i) => format!("match {} of {}", i + 1, self.matches.len()),
            None => format!("no matches for '{}'", self.settings.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Rust is fast. rust is safe. Trusty rust_lang.";

    #[test]
    fn test_case_insensitive_by_default() {
        let settings = FindSettings::new("rust");
        assert_eq!(settings.find_matches(TEXT).len(), 4);
    }

    #[test]
    fn test_case_sensitive() {
        let settings = FindSettings {
            case_sensitive: true,
            ..FindSettings::new("Rust")
        };
        assert_eq!(settings.find_matches(TEXT), vec![0..4]);
    }

    #[test]
    fn test_full_word() {
        let settings = FindSettings {
            match_full_word: true,
            ..FindSettings::new("rust")
        };
        // "Trusty" and "rust_lang" are not whole words
        assert_eq!(settings.find_matches(TEXT), vec![0..4, 14..18]);
    }

    #[test]
    fn test_empty_needle_matches_nothing() {
        assert!(FindSettings::new("").find_matches(TEXT).is_empty());
    }

    #[test]
    fn test_step_wraps_both_ways() {
        let mut state = FindState::new(FindSettings::new("is"), "is a is b is");
        assert_eq!(state.current, Some(0));
        assert_eq!(state.step(FindDirection::Up), Some(10..12));
        assert_eq!(state.step(FindDirection::Down), Some(0..2));
        assert_eq!(state.step(FindDirection::Down), Some(5..7));
        assert_eq!(state.summary(), "match 2 of 3");
    }

    #[test]
    fn test_search_up_starts_at_last_match() {
        let settings = FindSettings {
            direction: FindDirection::Up,
            ..FindSettings::new("b")
        };
        let state = FindState::new(settings, "abab");
        assert_eq!(state.current_match(), Some(3..4));
    }

    #[test]
    fn test_no_matches() {
        let mut state = FindState::new(FindSettings::new("zzz"), TEXT);
        assert_eq!(state.step(FindDirection::Down), None);
        assert_eq!(state.summary(), "no matches for 'zzz'");
    }
}
