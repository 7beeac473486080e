//! Chat surfaces: the input field and message list a handler drives.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::Message;

/// The page elements a [`SubmissionHandler`](super::SubmissionHandler) reads
/// from and renders into.
///
/// Implementations are called from the handler only; the message list is
/// append-only.
pub trait ChatView: Send + Sync {
    /// Current text of the chat input.
    fn input_value(&self) -> String;

    /// Reset the chat input to the empty string.
    fn clear_input(&self);

    /// Append a message to the end of the message list.
    fn append_message(&self, message: Message);
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory chat surface.
///
/// Useful for embedding the handler in another front end and for tests.
#[derive(Debug, Default)]
pub struct MemoryView {
    input: Mutex<String>,
    messages: Mutex<Vec<Message>>,
}

impl MemoryView {
    /// Create an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Type text into the input, replacing what was there.
    pub fn set_input(&self, text: impl Into<String>) {
        *lock(&self.input) = text.into();
    }

    /// Current input text.
    #[must_use]
    pub fn input(&self) -> String {
        lock(&self.input).clone()
    }

    /// Snapshot of the message list.
    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        lock(&self.messages).clone()
    }

    /// Message list rendered as `"<label>: <text>"` lines.
    #[must_use]
    pub fn transcript(&self) -> Vec<String> {
        lock(&self.messages).iter().map(ToString::to_string).collect()
    }
}

impl ChatView for MemoryView {
    fn input_value(&self) -> String {
        self.input()
    }

    fn clear_input(&self) {
        lock(&self.input).clear();
    }

    fn append_message(&self, message: Message) {
        lock(&self.messages).push(message);
    }
}
