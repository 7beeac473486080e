//! Form submission handling.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{ChatError, ChatTransport, ChatView, Message, TurnId};

/// Runs one chat turn per form submission.
///
/// A submission captures and clears the input, echoes it as a `You` message,
/// then sends it through the transport and appends the reply (or an `Error`
/// message) to the same list.
///
/// Submissions may overlap. Their echoes are appended immediately, but the
/// network step of each turn waits for the previous turn to settle, so replies
/// land in submission order.
pub struct SubmissionHandler<V, T> {
    view: Arc<V>,
    transport: Arc<T>,
    next_turn: AtomicU64,
    /// FIFO queue for the network step.
    in_flight: Mutex<()>,
}

impl<V, T> std::fmt::Debug for SubmissionHandler<V, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionHandler")
            .field("next_turn", &self.next_turn.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<V: ChatView, T: ChatTransport> SubmissionHandler<V, T> {
    /// Create a handler bound to a chat surface and a transport.
    #[must_use]
    pub fn new(view: Arc<V>, transport: Arc<T>) -> Self {
        Self {
            view,
            transport,
            next_turn: AtomicU64::new(1),
            in_flight: Mutex::new(()),
        }
    }

    /// The surface this handler renders into.
    pub fn view(&self) -> &Arc<V> {
        &self.view
    }

    /// Handle one submission of the chat form.
    ///
    /// Returns the appended assistant message. On failure the error has
    /// already been rendered as an `Error` message when it is returned.
    pub async fn submit(&self) -> Result<Message, ChatError> {
        let query = self.view.input_value();
        self.view.clear_input();

        let turn = TurnId(self.next_turn.fetch_add(1, Ordering::Relaxed));
        self.view.append_message(Message::user(turn, query.clone()));
        debug!(name: "chat.turn.queued", turn = %turn, bytes = query.len(), "Turn queued");

        let _slot = self.in_flight.lock().await;
        debug!(name: "chat.turn.sent", turn = %turn, "Query sent");

        match self.transport.query(&query).await {
            Ok(text) => {
                info!(name: "chat.turn.answered", turn = %turn, bytes = text.len(), "Turn answered");
                let message = Message::assistant(turn, text);
                self.view.append_message(message.clone());
                Ok(message)
            }
            Err(err) => {
                warn!(name: "chat.turn.failed", turn = %turn, error = %err, "Turn failed");
                self.view.append_message(Message::error(turn, err.to_string()));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;

    use tokio::sync::oneshot;

    use crate::chat::{MemoryView, Sender};

    /// Answers every query from a fixed table.
    struct TableTransport(HashMap<&'static str, &'static str>);

    #[async_trait::async_trait]
    impl ChatTransport for TableTransport {
        async fn query(&self, query: &str) -> Result<String, ChatError> {
            self.0
                .get(query)
                .map(|s| (*s).to_string())
                .ok_or(ChatError::MissingResponse)
        }
    }

    /// Holds each query until the test releases it.
    #[derive(Default)]
    struct GatedTransport {
        gates: StdMutex<HashMap<String, oneshot::Receiver<Result<String, ChatError>>>>,
        sent: StdMutex<Vec<String>>,
    }

    impl GatedTransport {
        fn gate(&self, query: &str) -> oneshot::Sender<Result<String, ChatError>> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert(query.to_string(), rx);
            tx
        }

        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl ChatTransport for GatedTransport {
        async fn query(&self, query: &str) -> Result<String, ChatError> {
            self.sent.lock().unwrap().push(query.to_string());
            let rx = self.gates.lock().unwrap().remove(query).expect("ungated query");
            rx.await.expect("gate dropped")
        }
    }

    fn setup<T: ChatTransport>(
        transport: T,
    ) -> (Arc<MemoryView>, Arc<T>, Arc<SubmissionHandler<MemoryView, T>>) {
        let view = Arc::new(MemoryView::new());
        let transport = Arc::new(transport);
        let handler = Arc::new(SubmissionHandler::new(Arc::clone(&view), Arc::clone(&transport)));
        (view, transport, handler)
    }

    async fn wait_for_messages(view: &MemoryView, count: usize) {
        while view.messages().len() < count {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_hello_round_trip() {
        let (view, _, handler) = setup(TableTransport(HashMap::from([("Hello", "Hi there")])));
        view.set_input("Hello");

        let reply = handler.submit().await.unwrap();

        assert_eq!(reply.sender, Sender::Assistant);
        assert_eq!(view.transcript(), vec!["You: Hello", "Assistant: Hi there"]);
        assert_eq!(view.input(), "");
    }

    #[tokio::test]
    async fn test_input_cleared_and_echoed_before_reply() {
        let (view, transport, handler) = setup(GatedTransport::default());
        let gate = transport.gate("What is a subnet?");
        view.set_input("What is a subnet?");

        let task = tokio::spawn({
            let handler = Arc::clone(&handler);
            async move { handler.submit().await }
        });
        wait_for_messages(&view, 1).await;

        assert_eq!(view.input(), "");
        assert_eq!(view.transcript(), vec!["You: What is a subnet?"]);

        gate.send(Ok("A range of addresses.".to_string())).unwrap();
        task.await.unwrap().unwrap();

        assert_eq!(
            view.transcript(),
            vec!["You: What is a subnet?", "Assistant: A range of addresses."]
        );
    }

    #[tokio::test]
    async fn test_sequential_turns_keep_order() {
        let (view, _, handler) = setup(TableTransport(HashMap::from([("A", "RA"), ("B", "RB")])));

        view.set_input("A");
        handler.submit().await.unwrap();
        view.set_input("B");
        handler.submit().await.unwrap();

        assert_eq!(
            view.transcript(),
            vec!["You: A", "Assistant: RA", "You: B", "Assistant: RB"]
        );
        let turns: Vec<u64> = view.messages().iter().map(|m| m.turn.0).collect();
        assert_eq!(turns, vec![1, 1, 2, 2]);
    }

    #[tokio::test]
    async fn test_overlapping_turns_reply_in_submission_order() {
        let (view, transport, handler) = setup(GatedTransport::default());
        let gate_a = transport.gate("A");
        let gate_b = transport.gate("B");

        view.set_input("A");
        let first = tokio::spawn({
            let handler = Arc::clone(&handler);
            async move { handler.submit().await }
        });
        wait_for_messages(&view, 1).await;

        view.set_input("B");
        let second = tokio::spawn({
            let handler = Arc::clone(&handler);
            async move { handler.submit().await }
        });
        wait_for_messages(&view, 2).await;

        // B is queued behind A and has not been sent.
        assert_eq!(transport.sent(), vec!["A"]);

        // Answer B first; it still cannot overtake A.
        gate_b.send(Ok("RB".to_string())).unwrap();
        gate_a.send(Ok("RA".to_string())).unwrap();
        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        assert_eq!(transport.sent(), vec!["A", "B"]);
        assert_eq!(
            view.transcript(),
            vec!["You: A", "You: B", "Assistant: RA", "Assistant: RB"]
        );
    }

    #[tokio::test]
    async fn test_failure_renders_error_message() {
        let (view, _, handler) = setup(TableTransport(HashMap::new()));
        view.set_input("unknown");

        let err = handler.submit().await.unwrap_err();

        assert!(matches!(err, ChatError::MissingResponse));
        let messages = view.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].sender, Sender::Error);
        assert_eq!(messages[1].text, "response has no `response` field");
        assert_eq!(view.input(), "");
    }

    #[tokio::test]
    async fn test_failed_turn_does_not_block_next() {
        let (view, _, handler) = setup(TableTransport(HashMap::from([("ok", "fine")])));

        view.set_input("bad");
        assert!(handler.submit().await.is_err());
        view.set_input("ok");
        handler.submit().await.unwrap();

        assert_eq!(view.transcript().last().unwrap(), "Assistant: fine");
    }

    #[tokio::test]
    async fn test_empty_input_is_still_sent() {
        let (view, transport, handler) = setup(GatedTransport::default());
        let gate = transport.gate("");
        gate.send(Ok("Ask me anything.".to_string())).unwrap();

        handler.submit().await.unwrap();

        assert_eq!(transport.sent(), vec![""]);
        assert_eq!(view.transcript(), vec!["You: ", "Assistant: Ask me anything."]);
    }
}
