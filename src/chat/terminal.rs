//! Terminal front end: each non-blank stdin line is a form submission.

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use super::{ChatTransport, ChatView, Message, SubmissionHandler};

/// Chat surface that prints each appended message as a line.
#[derive(Debug)]
pub struct TerminalView<W> {
    input: Mutex<String>,
    out: Mutex<W>,
}

impl TerminalView<std::io::Stdout> {
    /// Surface writing to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalView<W> {
    /// Surface writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            input: Mutex::new(String::new()),
            out: Mutex::new(out),
        }
    }

    /// Replace the pending input with a line the user typed.
    pub fn set_input(&self, line: impl Into<String>) {
        *self.input.lock().unwrap_or_else(PoisonError::into_inner) = line.into();
    }

    fn write_prompt(&self) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        // A closed stdout is not worth failing the session over.
        let _ = write!(out, "> ");
        let _ = out.flush();
    }

    /// Consume the surface and return its writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> ChatView for TerminalView<W> {
    fn input_value(&self) -> String {
        self.input.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn clear_input(&self) {
        self.input.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn append_message(&self, message: Message) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(out, "{message}");
        let _ = out.flush();
    }
}

/// Run an interactive chat session over `lines` until end of input.
///
/// Blank lines are ignored, mirroring a form whose input is `required`.
/// Failed turns are rendered by the handler and do not end the session.
pub async fn run_session<R, W, T>(
    lines: R,
    view: Arc<TerminalView<W>>,
    transport: Arc<T>,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write + Send,
    T: ChatTransport,
{
    let handler = SubmissionHandler::new(Arc::clone(&view), transport);
    let mut lines = lines.lines();

    view.write_prompt();
    while let Some(line) = lines.next_line().await? {
        if !line.trim().is_empty() {
            view.set_input(line);
            // Already rendered and logged by the handler.
            let _ = handler.submit().await;
        }
        view.write_prompt();
    }
    Ok(())
}

/// Run [`run_session`] on stdin and stdout.
pub async fn run_stdio<T: ChatTransport>(transport: Arc<T>) -> std::io::Result<()> {
    let view = Arc::new(TerminalView::stdout());
    run_session(BufReader::new(tokio::io::stdin()), view, transport).await
}
