// Text typed by the user while a mode collects input

/// Buffer operations, mirrored in the debug log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAction {
    Set,
    Append,
    Clear,
    Backspace,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn set(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
    }

    pub fn append(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Removes the last character, returning it.
    pub fn backspace(&mut self) -> Option<char> {
        self.text.pop()
    }

    /// Clears the buffer and hands back what it held.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }
}
