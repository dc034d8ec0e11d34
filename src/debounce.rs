//! Input debouncing for the adapter layer.
//!
//! Collapses a burst of inputs into the last one, released once no new
//! input has arrived for the debounce window.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Debounces a stream of query strings arriving on a channel
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    rx: mpsc::Receiver<String>,
    pending: Option<String>,
    deadline: Option<Instant>,
    closed: bool,
}

impl Debouncer {
    /// Default quiet window (500ms)
    pub const DEFAULT_WINDOW: Duration = Duration::from_millis(500);

    /// Create a debouncer and the sender feeding it
    pub fn channel(window: Duration, capacity: usize) -> (mpsc::Sender<String>, Self) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let debouncer = Self {
            window,
            rx,
            pending: None,
            deadline: None,
            closed: false,
        };
        (tx, debouncer)
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn accept(&mut self, received: Option<String>) {
        match received {
            Some(input) => {
                if let Some(old) = self.pending.replace(input) {
                    tracing::trace!("Debounce: dropped superseded input '{}'", old);
                }
                self.deadline = Some(Instant::now() + self.window);
            }
            None => self.closed = true,
        }
    }

    /// Wait for the next settled input.
    ///
    /// Every input restarts the window; superseded inputs are dropped. When
    /// the sender side closes, a pending input is released at once, after
    /// which `None` is returned. Cancel-safe: dropping the future keeps the
    /// pending input and its deadline.
    pub async fn next(&mut self) -> Option<String> {
        loop {
            if self.closed {
                self.deadline = None;
                return self.pending.take();
            }

            match self.deadline {
                Some(deadline) => {
                    let received = tokio::select! {
                        received = self.rx.recv() => Some(received),
                        _ = tokio::time::sleep_until(deadline) => None,
                    };
                    match received {
                        Some(received) => self.accept(received),
                        None => {
                            self.deadline = None;
                            return self.pending.take();
                        }
                    }
                }
                None => {
                    let received = self.rx.recv().await;
                    self.accept(received);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_last_input() {
        let (tx, mut debouncer) = Debouncer::channel(Duration::from_millis(500), 16);

        for partial in ["b", "bl", "blu", "blue"] {
            tx.send(partial.to_string()).await.unwrap();
        }

        assert_eq!(debouncer.next().await.as_deref(), Some("blue"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_inputs_are_all_released() {
        let (tx, mut debouncer) = Debouncer::channel(Duration::from_millis(500), 16);

        let producer = tokio::spawn(async move {
            tx.send("dark".to_string()).await.unwrap();
            tokio::time::sleep(Duration::from_millis(800)).await;
            tx.send("magician".to_string()).await.unwrap();
        });

        assert_eq!(debouncer.next().await.as_deref(), Some("dark"));
        assert_eq!(debouncer.next().await.as_deref(), Some("magician"));
        producer.await.unwrap();
        assert_eq!(debouncer.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_input_within_window_restarts_timer() {
        let (tx, mut debouncer) = Debouncer::channel(Duration::from_millis(500), 16);

        let producer = tokio::spawn(async move {
            tx.send("pot".to_string()).await.unwrap();
            tokio::time::sleep(Duration::from_millis(300)).await;
            tx.send("pot of greed".to_string()).await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let start = tokio::time::Instant::now();
        assert_eq!(debouncer.next().await.as_deref(), Some("pot of greed"));
        assert!(start.elapsed() >= Duration::from_millis(800));
        producer.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_wait_keeps_pending_input() {
        let (tx, mut debouncer) = Debouncer::channel(Duration::from_millis(500), 4);
        tx.send("exodia".to_string()).await.unwrap();

        let timed_out = tokio::time::timeout(Duration::from_millis(100), debouncer.next()).await;
        assert!(timed_out.is_err());
        assert!(debouncer.has_pending());

        assert_eq!(debouncer.next().await.as_deref(), Some("exodia"));
        drop(tx);
    }

    #[tokio::test]
    async fn test_closed_sender_flushes_pending() {
        let (tx, mut debouncer) = Debouncer::channel(Debouncer::DEFAULT_WINDOW, 4);
        tx.send("last".to_string()).await.unwrap();
        drop(tx);

        assert_eq!(debouncer.next().await.as_deref(), Some("last"));
        assert_eq!(debouncer.next().await, None);
        assert_eq!(debouncer.next().await, None);
    }

    #[tokio::test]
    async fn test_pending_input_survives_closed_command_channel() {
        let (tx, mut debouncer) = Debouncer::channel(Debouncer::DEFAULT_WINDOW, 4);
        let (command_tx, mut command_rx) = mpsc::channel::<()>(4);
        tx.send("dark magician".to_string()).await.unwrap();
        drop(tx);
        drop(command_tx);

        let mut released = Vec::new();
        for _ in 0..8 {
            tokio::select! {
                biased;

                query = debouncer.next() => match query {
                    Some(query) => released.push(query),
                    None => break,
                },
                command = command_rx.recv() => {
                    if command.is_none() {
                        while let Some(query) = debouncer.next().await {
                            released.push(query);
                        }
                        break;
                    }
                }
            }
        }

        assert_eq!(released, vec!["dark magician".to_string()]);
    }
}
