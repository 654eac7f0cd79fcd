//! Conversational session over a single document.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tracing::debug;

use super::{ActionError, Actions, RequestTracker};
use crate::analysis::QuestionInput;
use crate::models::ChatMessage;

/// A transient chat transcript about one document.
///
/// The transcript is never persisted. A question is shown immediately and
/// removed again unless its answer is delivered: on failure, on
/// cancellation, or when the session was reset meanwhile. Only one question
/// may be in flight.
pub struct ChatSession {
    document_text: String,
    transcript: Mutex<Vec<ChatMessage>>,
    tracker: RequestTracker,
    in_flight: AtomicBool,
}

/// Shown when a question is asked while the previous one is unanswered.
pub const BUSY_MESSAGE: &str = "Please wait for the current answer before asking another question.";

/// Holds the session while a question is pending. Unless the answer was
/// delivered, dropping it takes the question back out of the transcript.
struct Pending<'a> {
    session: &'a ChatSession,
    question: Option<ChatMessage>,
}

impl Pending<'_> {
    fn answered(&mut self) {
        self.question = None;
    }
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        if let Some(question) = self.question.take() {
            let mut transcript = self.session.lock();
            if transcript.last() == Some(&question) {
                transcript.pop();
            }
        }
        self.session.in_flight.store(false, Ordering::Release);
    }
}

impl ChatSession {
    pub fn new(document_text: impl Into<String>) -> Self {
        Self {
            document_text: document_text.into(),
            transcript: Mutex::new(Vec::new()),
            tracker: RequestTracker::new(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.lock().clone()
    }

    /// Clear the transcript. An answer still in flight is dropped when it
    /// arrives.
    pub fn reset(&self) {
        self.tracker.invalidate();
        self.lock().clear();
    }

    pub fn is_waiting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Ask a question and append the answer.
    ///
    /// Fails with [`ActionError::Invalid`] while another question is still
    /// unanswered. Returns `Ok(None)` when the session was reset before the
    /// answer arrived.
    pub async fn ask(
        &self,
        actions: &Actions,
        question: &str,
    ) -> Result<Option<ChatMessage>, ActionError> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Err(ActionError::Invalid {
                message: BUSY_MESSAGE.to_string(),
            });
        }
        let input = QuestionInput::new(self.document_text.clone(), question);
        let ticket = self.tracker.begin();
        let user_message = ChatMessage::user(question);
        self.lock().push(user_message.clone());
        let mut pending = Pending {
            session: self,
            question: Some(user_message),
        };

        let output = actions.chat(&input).await?;

        if !self.tracker.is_current(ticket) {
            debug!("Dropping stale chat response");
            return Ok(None);
        }

        let reply = ChatMessage::ai(output.answer);
        self.lock().push(reply.clone());
        pending.answered();
        Ok(Some(reply))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ChatMessage>> {
        self.transcript
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Analyzer, AnalyzerSettings};
    use crate::models::Sender;
    use crate::testing::ScriptedClient;
    use std::sync::Arc;
    use std::time::Duration;

    fn actions(client: ScriptedClient) -> Actions {
        Actions::new(Analyzer::new(Arc::new(client), AnalyzerSettings::default()))
    }

    #[tokio::test]
    async fn test_ask_appends_both_messages() {
        let actions = actions(ScriptedClient::always(r#"{"answer": "No pets."}"#));
        let session = ChatSession::new("2. No pets allowed.");

        let reply = session.ask(&actions, "Can I keep a cat?").await.unwrap();
        assert_eq!(reply, Some(ChatMessage::ai("No pets.")));

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(messages[0].text, "Can I keep a cat?");
        assert_eq!(messages[1].sender, Sender::Ai);
    }

    #[tokio::test]
    async fn test_failure_removes_question() {
        let actions = actions(ScriptedClient::failing("boom"));
        let session = ChatSession::new("2. No pets allowed.");

        let err = session.ask(&actions, "Can I keep a cat?").await.unwrap_err();
        assert_eq!(
            err.message(),
            "The AI assistant failed to respond. Please try again."
        );
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn test_reset_clears_transcript() {
        let actions = actions(ScriptedClient::always(r#"{"answer": "Yes."}"#));
        let session = ChatSession::new("doc");
        session.ask(&actions, "q").await.unwrap();
        session.reset();
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn test_second_question_rejected_while_first_is_pending() {
        let actions = actions(
            ScriptedClient::always(r#"{"answer": "ok"}"#).with_delay(Duration::from_millis(20)),
        );
        let session = ChatSession::new("doc");

        let (first, second) = tokio::join!(
            session.ask(&actions, "first?"),
            session.ask(&actions, "second?")
        );

        assert_eq!(first.unwrap(), Some(ChatMessage::ai("ok")));
        assert_eq!(
            second.unwrap_err(),
            ActionError::Invalid {
                message: BUSY_MESSAGE.to_string()
            }
        );
        assert_eq!(
            session.messages(),
            vec![ChatMessage::user("first?"), ChatMessage::ai("ok")]
        );
        assert!(!session.is_waiting());

        // The session accepts questions again once the answer is in
        session.ask(&actions, "third?").await.unwrap();
        assert_eq!(session.messages().len(), 4);
    }

    #[tokio::test]
    async fn test_reset_while_waiting_drops_answer() {
        let actions = actions(
            ScriptedClient::always(r#"{"answer": "late"}"#).with_delay(Duration::from_millis(20)),
        );
        let session = ChatSession::new("doc");

        let (reply, _) = tokio::join!(session.ask(&actions, "q"), async {
            tokio::task::yield_now().await;
            assert!(session.is_waiting());
            session.reset();
        });

        assert_eq!(reply.unwrap(), None);
        assert!(session.messages().is_empty());
        assert!(!session.is_waiting());
    }

    #[tokio::test]
    async fn test_cancelled_ask_releases_session() {
        let actions = actions(
            ScriptedClient::always(r#"{"answer": "ok"}"#).with_delay(Duration::from_secs(5)),
        );
        let session = ChatSession::new("doc");

        let timed_out =
            tokio::time::timeout(Duration::from_millis(10), session.ask(&actions, "q")).await;
        assert!(timed_out.is_err());
        assert!(!session.is_waiting());
        assert!(session.messages().is_empty());
    }
}
