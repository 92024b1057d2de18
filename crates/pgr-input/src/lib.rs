//! Async terminal input source: translates `crossterm` events into
//! [`pgr_events::Event`]s over the shared channel.
//!
//! Grounded on the teacher's `core-input` async-service pattern: one
//! `tokio::spawn`ed task owns a `crossterm::event::EventStream`, and a
//! `tokio::sync::Notify`-based shutdown handle lets the main loop stop it
//! cooperatively instead of aborting the task.

pub mod translate;

use crossterm::event::EventStream;
use pgr_events::{AsyncEventSource, Event};
use std::sync::Arc;
use tokio::sync::{mpsc::Sender, Notify};
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;

#[derive(Clone, Debug)]
pub struct InputShutdown {
    notify: Arc<Notify>,
}

impl InputShutdown {
    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

pub struct TerminalInputSource {
    notify: Arc<Notify>,
}

impl TerminalInputSource {
    /// Returns the source plus the handle used to stop it during shutdown.
    pub fn new() -> (Self, InputShutdown) {
        let notify = Arc::new(Notify::new());
        (Self { notify: notify.clone() }, InputShutdown { notify })
    }
}

impl AsyncEventSource for TerminalInputSource {
    fn name(&self) -> &'static str {
        "terminal_input"
    }

    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
        let notify = self.notify;
        tokio::spawn(async move {
            let mut stream = EventStream::new();
            loop {
                tokio::select! {
                    _ = notify.notified() => {
                        tracing::debug!(target: "input", "shutdown signal received");
                        break;
                    }
                    maybe_event = stream.next() => {
                        match maybe_event {
                            None => {
                                tracing::debug!(target: "input", "event stream ended");
                                break;
                            }
                            Some(Err(err)) => {
                                tracing::warn!(target: "input", %err, "event stream error");
                                break;
                            }
                            Some(Ok(crossterm_event)) => {
                                if let Some(event) = translate::translate(crossterm_event)
                                    && tx.send(event).await.is_err()
                                {
                                    return;
                                }
                            }
                        }
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn shutdown_notify_stops_the_task_promptly() {
        let (source, shutdown) = TerminalInputSource::new();
        let (tx, _rx) = mpsc::channel::<Event>(pgr_events::EVENT_CHANNEL_CAP);
        let handle = Box::new(source).spawn(tx);
        shutdown.signal();
        tokio::time::timeout(Duration::from_millis(200), handle)
            .await
            .expect("task should stop once notified")
            .unwrap();
    }
}
