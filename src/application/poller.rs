//! # Poll Loop
//!
//! Periodically asks the review API for changes since the time cursor and
//! relays the latest status change to the chat. Every failure is logged and
//! retried on the next tick; nothing inside the loop is fatal.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::error::PollError;
use crate::domain::traits::{ChatProvider, Clock, ReviewApi};
use crate::domain::types;
use crate::strings::logs;

/// Result of a successful iteration.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The review API reported no new homework events
    NoChange,
    Notified { homework: String, message: String },
}

pub struct PollLoop {
    review: Arc<dyn ReviewApi>,
    chat: Arc<dyn ChatProvider>,
    clock: Arc<dyn Clock>,
    interval: Duration,
    cursor: i64,
}

impl PollLoop {
    pub fn new(
        review: Arc<dyn ReviewApi>,
        chat: Arc<dyn ChatProvider>,
        clock: Arc<dyn Clock>,
        interval: Duration,
    ) -> Self {
        let cursor = clock.now();
        Self {
            review,
            chat,
            clock,
            interval,
            cursor,
        }
    }

    /// Current `from_date` watermark.
    #[cfg(test)]
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Run a single fetch/validate/derive/notify cycle.
    ///
    /// The cursor moves forward as soon as the fetch succeeds, even if a later
    /// step fails, and stays put when the fetch itself fails.
    pub async fn tick(&mut self) -> Result<TickOutcome, PollError> {
        let from_date = if self.cursor == 0 {
            self.clock.now()
        } else {
            self.cursor
        };

        let body = self.review.homework_statuses(from_date).await?;
        self.cursor = self.clock.now();

        tracing::debug!("{}", logs::CHECKING_RESPONSE);
        let Some(homework) = types::latest_change(&body)? else {
            tracing::debug!("{}", logs::NO_CHANGE);
            return Ok(TickOutcome::NoChange);
        };

        let message = homework.notification();
        self.chat
            .send_message(&message)
            .await
            .map_err(PollError::Delivery)?;

        tracing::info!(
            status = homework.status.as_str(),
            "{}",
            logs::homework_notified(&homework.name)
        );
        Ok(TickOutcome::Notified {
            homework: homework.name,
            message,
        })
    }

    /// Tick forever, sleeping the full interval after every iteration.
    pub async fn run(mut self) {
        tracing::info!(
            "{}",
            logs::poll_started(self.interval.as_secs(), self.cursor)
        );

        loop {
            match self.tick().await {
                Ok(TickOutcome::NoChange) => {}
                Ok(TickOutcome::Notified { homework, message }) => {
                    tracing::debug!(homework = %homework, "Delivered: {}", message);
                }
                Err(e) => {
                    tracing::error!(kind = e.kind(), "{}", logs::program_failure(&e.to_string()));
                }
            }
            tokio::time::sleep(self.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicI64, Ordering};

    struct FakeClock(AtomicI64);

    impl FakeClock {
        fn at(ts: i64) -> Arc<Self> {
            Arc::new(Self(AtomicI64::new(ts)))
        }

        fn set(&self, ts: i64) {
            self.0.store(ts, Ordering::SeqCst);
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    #[derive(Default)]
    struct FakeReview {
        responses: Mutex<VecDeque<Result<Value, PollError>>>,
        requested: Mutex<Vec<i64>>,
    }

    impl FakeReview {
        fn with(responses: Vec<Result<Value, PollError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                requested: Mutex::new(Vec::new()),
            })
        }

        fn requested(&self) -> Vec<i64> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ReviewApi for FakeReview {
        async fn homework_statuses(&self, from_date: i64) -> Result<Value, PollError> {
            self.requested.lock().unwrap().push(from_date);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(json!({"homeworks": []})))
        }
    }

    #[derive(Default)]
    struct FakeChat {
        sent: Mutex<Vec<String>>,
        fail: bool,
    }

    impl FakeChat {
        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatProvider for FakeChat {
        async fn send_message(&self, content: &str) -> Result<String, String> {
            if self.fail {
                return Err("Forbidden: bot was blocked by the user".to_string());
            }
            let mut sent = self.sent.lock().unwrap();
            sent.push(content.to_string());
            Ok(sent.len().to_string())
        }
    }

    fn poll_loop(review: &Arc<FakeReview>, chat: &Arc<FakeChat>, clock: &Arc<FakeClock>) -> PollLoop {
        PollLoop::new(
            review.clone(),
            chat.clone(),
            clock.clone(),
            Duration::from_secs(600),
        )
    }

    #[tokio::test]
    async fn test_cursor_starts_at_now() {
        let review = FakeReview::with(vec![]);
        let chat = Arc::new(FakeChat::default());
        let clock = FakeClock::at(1_000);
        let mut poller = poll_loop(&review, &chat, &clock);
        assert_eq!(poller.cursor(), 1_000);

        clock.set(1_600);
        poller.tick().await.unwrap();
        assert_eq!(review.requested(), vec![1_000]);
    }

    #[tokio::test]
    async fn test_notifies_on_status_change() {
        let review = FakeReview::with(vec![Ok(json!({
            "homeworks": [{"homework_name": "proj1", "status": "approved"}],
            "current_date": 1_000
        }))]);
        let chat = Arc::new(FakeChat::default());
        let clock = FakeClock::at(1_000);
        let mut poller = poll_loop(&review, &chat, &clock);

        clock.set(1_600);
        let outcome = poller.tick().await.unwrap();

        let expected = "Status changed for \"proj1\": The work has been reviewed: the reviewer liked everything. Hooray!";
        assert_eq!(
            outcome,
            TickOutcome::Notified {
                homework: "proj1".to_string(),
                message: expected.to_string(),
            }
        );
        assert_eq!(chat.sent(), vec![expected.to_string()]);
        assert_eq!(poller.cursor(), 1_600);
    }

    #[tokio::test]
    async fn test_empty_homeworks_is_no_change() {
        let review = FakeReview::with(vec![Ok(json!({"homeworks": []}))]);
        let chat = Arc::new(FakeChat::default());
        let clock = FakeClock::at(1_000);
        let mut poller = poll_loop(&review, &chat, &clock);

        clock.set(1_600);
        assert_eq!(poller.tick().await.unwrap(), TickOutcome::NoChange);
        assert!(chat.sent().is_empty());
        assert_eq!(poller.cursor(), 1_600);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_cursor() {
        let review = FakeReview::with(vec![Err(PollError::UnexpectedStatus(503))]);
        let chat = Arc::new(FakeChat::default());
        let clock = FakeClock::at(1_000);
        let mut poller = poll_loop(&review, &chat, &clock);

        clock.set(1_600);
        let err = poller.tick().await.unwrap_err();
        assert!(matches!(err, PollError::UnexpectedStatus(503)));
        assert_eq!(poller.cursor(), 1_000);
        assert!(chat.sent().is_empty());

        // The next attempt re-requests the same window
        clock.set(2_200);
        poller.tick().await.unwrap();
        assert_eq!(review.requested(), vec![1_000, 1_000]);
        assert_eq!(poller.cursor(), 2_200);
    }

    #[tokio::test]
    async fn test_format_failure_still_advances_cursor() {
        let review = FakeReview::with(vec![
            Ok(json!({"current_date": 1})),
            Ok(json!({"homeworks": "approved"})),
        ]);
        let chat = Arc::new(FakeChat::default());
        let clock = FakeClock::at(1_000);
        let mut poller = poll_loop(&review, &chat, &clock);

        clock.set(1_600);
        assert!(matches!(poller.tick().await, Err(PollError::Format(_))));
        assert_eq!(poller.cursor(), 1_600);

        clock.set(2_200);
        assert!(matches!(poller.tick().await, Err(PollError::Format(_))));
        assert_eq!(poller.cursor(), 2_200);
        assert!(chat.sent().is_empty());
    }

    #[tokio::test]
    async fn test_status_failures_are_distinct() {
        let review = FakeReview::with(vec![
            Ok(json!({"homeworks": [{"homework_name": "hw", "status": "pending"}]})),
            Ok(json!({"homeworks": [{"homework_name": "hw"}]})),
        ]);
        let chat = Arc::new(FakeChat::default());
        let clock = FakeClock::at(1_000);
        let mut poller = poll_loop(&review, &chat, &clock);

        assert!(matches!(
            poller.tick().await,
            Err(PollError::UnknownStatus(ref s)) if s == "pending"
        ));
        assert!(matches!(
            poller.tick().await,
            Err(PollError::MissingField("status"))
        ));
        assert!(chat.sent().is_empty());
    }

    #[tokio::test]
    async fn test_delivery_failure_is_reported_and_cursor_advances() {
        let review = FakeReview::with(vec![Ok(json!({
            "homeworks": [{"homework_name": "hw", "status": "rejected"}]
        }))]);
        let chat = Arc::new(FakeChat {
            fail: true,
            ..Default::default()
        });
        let clock = FakeClock::at(1_000);
        let mut poller = poll_loop(&review, &chat, &clock);

        clock.set(1_600);
        let err = poller.tick().await.unwrap_err();
        assert!(matches!(err, PollError::Delivery(ref m) if m.contains("blocked")));
        assert_eq!(err.kind(), "delivery-error");
        assert_eq!(poller.cursor(), 1_600);
    }

    #[tokio::test]
    async fn test_zero_cursor_uses_current_time() {
        let review = FakeReview::with(vec![]);
        let chat = Arc::new(FakeChat::default());
        let clock = FakeClock::at(0);
        let mut poller = poll_loop(&review, &chat, &clock);
        assert_eq!(poller.cursor(), 0);

        clock.set(5_000);
        poller.tick().await.unwrap();
        assert_eq!(review.requested(), vec![5_000]);
    }

    #[tokio::test]
    async fn test_only_first_record_is_notified() {
        let review = FakeReview::with(vec![Ok(json!({
            "homeworks": [
                {"homework_name": "second", "status": "reviewing"},
                {"homework_name": "first", "status": "approved"}
            ]
        }))]);
        let chat = Arc::new(FakeChat::default());
        let clock = FakeClock::at(1_000);
        let mut poller = poll_loop(&review, &chat, &clock);

        poller.tick().await.unwrap();
        assert_eq!(
            chat.sent(),
            vec!["Status changed for \"second\": The work has been taken for review by the reviewer.".to_string()]
        );
    }

    /// Review API that is always down
    #[derive(Default)]
    struct UnavailableReview {
        calls: AtomicI64,
    }

    impl UnavailableReview {
        fn calls(&self) -> i64 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ReviewApi for UnavailableReview {
        async fn homework_statuses(&self, _from_date: i64) -> Result<Value, PollError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(PollError::UnexpectedStatus(500))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_keeps_polling_after_failures() {
        let review = Arc::new(UnavailableReview::default());
        let chat = Arc::new(FakeChat::default());
        let clock = FakeClock::at(1_000);
        let poller = PollLoop::new(
            review.clone(),
            chat.clone(),
            clock.clone(),
            Duration::from_secs(600),
        );

        let handle = tokio::spawn(poller.run());

        // First fetch happens immediately, the next only after the full interval
        tokio::time::sleep(Duration::from_secs(599)).await;
        assert_eq!(review.calls(), 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(review.calls(), 2);

        tokio::time::sleep(Duration::from_secs(598)).await;
        assert_eq!(review.calls(), 2);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(review.calls(), 3);

        assert!(!handle.is_finished());
        assert!(chat.sent().is_empty());
        handle.abort();
    }
}
