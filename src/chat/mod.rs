//! Chat form submission handling.
//!
//! A [`SubmissionHandler`] drives one chat turn per submission: it reads and
//! clears the input of a [`ChatView`], echoes the text as a `You` message,
//! sends it through a [`ChatTransport`], and appends the reply as an
//! `Assistant` message. Failed turns are rendered as `Error` messages.
//!
//! # Surfaces
//!
//! - [`MemoryView`]: in-memory input and message list
//! - [`TerminalView`]: prints messages to a writer (stdout for the CLI)
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vpc_docs_assistant::chat::{HttpTransport, MemoryView, SubmissionHandler};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let view = Arc::new(MemoryView::new());
//! let transport = Arc::new(HttpTransport::new("http://127.0.0.1:3000/")?);
//! let handler = SubmissionHandler::new(Arc::clone(&view), transport);
//!
//! view.set_input("Hello");
//! handler.submit().await?;
//! assert_eq!(view.transcript()[0], "You: Hello");
//! # Ok(())
//! # }
//! ```

mod handler;
mod message;
pub mod terminal;
mod transport;
mod view;

pub use handler::SubmissionHandler;
pub use message::{Message, Sender, TurnId};
pub use terminal::TerminalView;
pub use transport::{ChatError, ChatTransport, HttpTransport};
pub use view::{ChatView, MemoryView};
