use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::event::{AppEvent, Event, app_event};

/// Delays search dispatch until the input has been quiet for `delay`.
///
/// Each [`schedule`](Self::schedule) cancels the previous timer, so only the
/// last query of a burst is ever emitted. Settled queries are tagged with a
/// sequence number; [`accept`](Self::accept) rejects any that were superseded
/// after their timer already fired.
pub struct Debouncer {
    delay: Duration,
    sender: UnboundedSender<Event>,
    seq: u64,
    pending: Option<CancellationToken>,
}

impl Debouncer {
    pub fn new(delay: Duration, sender: UnboundedSender<Event>) -> Self {
        Self {
            delay,
            sender,
            seq: 0,
            pending: None,
        }
    }

    /// Arm the timer for `query`, replacing any pending one.
    pub fn schedule(&mut self, query: String) {
        self.cancel();
        self.seq += 1;

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let sender = self.sender.clone();
        let delay = self.delay;
        let seq = self.seq;

        tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = sender.send(app_event(AppEvent::QuerySettled { seq, query }));
                }
            }
        });

        self.pending = Some(token);
    }

    /// Drop the pending timer, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }

    /// Whether a settled query is the latest one scheduled.
    pub fn accept(&mut self, seq: u64) -> bool {
        if seq != self.seq || self.pending.is_none() {
            return false;
        }
        self.pending = None;
        true
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    fn settled(event: Event) -> (u64, String) {
        match event {
            Event::App(app) => match *app {
                AppEvent::QuerySettled { seq, query } => (seq, query),
                other => panic!("unexpected app event: {other:?}"),
            },
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_keystrokes_settles_once_with_last_value() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(300), tx);

        for query in ["c", "ch", "cha"] {
            debouncer.schedule(query.to_string());
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        // 100ms since the last keystroke: nothing yet.
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(250)).await;
        let (seq, query) = settled(rx.try_recv().expect("query settled"));
        assert_eq!(query, "cha");
        assert!(debouncer.accept(seq));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn does_not_fire_before_quiet_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(300), tx);

        debouncer.schedule("pie".into());
        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        let (_, query) = settled(rx.try_recv().expect("query settled"));
        assert_eq!(query, "pie");
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_dispatch() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(300), tx);

        debouncer.schedule("soup".into());
        debouncer.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_pending_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(300), tx);

        debouncer.schedule("stew".into());
        drop(debouncer);
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_settle_is_rejected() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(300), tx);

        debouncer.schedule("ta".into());
        tokio::time::sleep(Duration::from_millis(350)).await;
        let (stale_seq, _) = settled(rx.try_recv().expect("query settled"));

        // A keystroke lands before the loop got to the settled event.
        debouncer.schedule("tac".into());
        assert!(!debouncer.accept(stale_seq));

        tokio::time::sleep(Duration::from_millis(350)).await;
        let (seq, query) = settled(rx.try_recv().expect("query settled"));
        assert_eq!(query, "tac");
        assert!(debouncer.accept(seq));
        assert!(!debouncer.accept(seq));
    }
}
