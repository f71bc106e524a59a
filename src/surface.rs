//! Input and display surfaces a lookup widget is wired to.
//!
//! A widget never looks up its surfaces itself; the dashboard or the console
//! command hands them over at construction time.

use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Normal,
    Error,
}

/// What the user currently sees for one widget.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DisplayState {
    pub headline: String,
    pub detail: Option<String>,
    pub icon_url: Option<String>,
    pub tone: Tone,
}

impl DisplayState {
    pub fn message(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            headline: text.into(),
            detail: None,
            icon_url: None,
            tone,
        }
    }

    /// Fixed error text with detail and icon cleared.
    pub fn failure(text: impl Into<String>) -> Self {
        Self::message(text, Tone::Error)
    }

    pub fn is_error(&self) -> bool {
        self.tone == Tone::Error
    }
}

pub trait InputSurface: Send + Sync {
    fn value(&self) -> String;
    fn clear(&self);

    /// Clear only if the input still reads `expected`, so text typed while a
    /// request was in flight survives.
    fn clear_if_unchanged(&self, expected: &str) {
        if self.value() == expected {
            self.clear();
        }
    }
}

pub trait DisplaySurface: Send + Sync {
    fn show(&self, state: DisplayState);
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panicked writer leaves plain data behind; keep using it.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Editable text box shared between the key handler and a widget.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    text: Arc<Mutex<String>>,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, c: char) {
        lock(&self.text).push(c);
    }

    pub fn pop(&self) {
        lock(&self.text).pop();
    }

    pub fn set(&self, value: &str) {
        let mut text = lock(&self.text);
        text.clear();
        text.push_str(value);
    }
}

impl InputSurface for TextInput {
    fn value(&self) -> String {
        lock(&self.text).clone()
    }

    fn clear(&self) {
        lock(&self.text).clear();
    }

    fn clear_if_unchanged(&self, expected: &str) {
        let mut text = lock(&self.text);
        if *text == expected {
            text.clear();
        }
    }
}

/// Display state shared between a widget and the renderer.
#[derive(Debug, Clone, Default)]
pub struct DisplayCell {
    state: Arc<Mutex<DisplayState>>,
}

impl DisplayCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> DisplayState {
        lock(&self.state).clone()
    }
}

impl DisplaySurface for DisplayCell {
    fn show(&self, state: DisplayState) {
        *lock(&self.state) = state;
    }
}

/// Input for a one-shot console lookup.
#[derive(Debug, Default)]
pub struct FixedInput {
    value: Mutex<String>,
}

impl FixedInput {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(value.into()),
        }
    }
}

impl InputSurface for FixedInput {
    fn value(&self) -> String {
        lock(&self.value).clone()
    }

    fn clear(&self) {
        lock(&self.value).clear();
    }
}

/// Prints results to stdout and failures to stderr.
#[derive(Debug, Default)]
pub struct ConsoleDisplay;

impl DisplaySurface for ConsoleDisplay {
    fn show(&self, state: DisplayState) {
        if state.is_error() {
            eprintln!("{}", state.headline);
            return;
        }

        println!("{}", state.headline);
        if let Some(detail) = state.detail.as_deref().filter(|d| !d.is_empty()) {
            println!("{}", detail);
        }
        if let Some(icon) = state.icon_url {
            println!("icon: {}", icon);
        }
    }
}
