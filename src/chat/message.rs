//! Chat transcript entries.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Identifier shared by the user message and the reply of one submission.
///
/// Turn ids are handed out in submission order by the
/// [`SubmissionHandler`](super::SubmissionHandler), starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TurnId(pub u64);

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Who a message is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Text typed into the chat input.
    User,
    /// Text returned by the assistant endpoint.
    Assistant,
    /// A turn whose request failed.
    Error,
}

impl Sender {
    /// Label rendered in front of the message text.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Assistant => "Assistant",
            Self::Error => "Error",
        }
    }
}

/// A single entry in the message list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Turn this message belongs to.
    pub turn: TurnId,
    /// Author of the message.
    pub sender: Sender,
    /// Message body, rendered verbatim.
    pub text: String,
    /// When the message was appended.
    pub sent_at: DateTime<Utc>,
}

impl Message {
    fn new(turn: TurnId, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            turn,
            sender,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }

    /// Message echoing the user's input.
    #[must_use]
    pub fn user(turn: TurnId, text: impl Into<String>) -> Self {
        Self::new(turn, Sender::User, text)
    }

    /// Reply extracted from a successful response.
    #[must_use]
    pub fn assistant(turn: TurnId, text: impl Into<String>) -> Self {
        Self::new(turn, Sender::Assistant, text)
    }

    /// Failure notice for a turn whose request did not produce a reply.
    #[must_use]
    pub fn error(turn: TurnId, text: impl Into<String>) -> Self {
        Self::new(turn, Sender::Error, text)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.sender.label(), self.text)
    }
}
