//! Central event bus: typed events flowing from input/timer/data sources
//! into the single-threaded main loop, and the typed commands the loop
//! dispatches in response.
//!
//! Mirrors a bounded-mpsc-with-backpressure channel policy: a single input
//! producer and a handful of timer/data producers feed one consumer, so
//! blocking sends (rather than dropping) keep keystroke/watch-tick fidelity
//! without requiring a priority queue.

use pgr_state::command::NavCommand;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

/// Channel capacity for the main event bus. Generous relative to expected
/// burst size (a paste-speed key stream, or a watch-mode reload) so normal
/// operation never blocks the producer.
pub const EVENT_CHANNEL_CAP: usize = 4096;

#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    Command(Command),
    Resize(u16, u16),
    /// The watch-mode reload timer elapsed; the loop should re-run the data
    /// source and reload, preserving cursor/viewport state.
    WatchTick,
    /// A streaming data source (FIFO, `tail -f`-like pipe) produced more
    /// lines; the loop should append them without disturbing navigation.
    DataAppended,
    RenderRequested,
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct KeyModifiers: u8 {
        const CTRL  = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const SHIFT = 0b0000_0100;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Down(MouseButton),
    Up(MouseButton),
    Drag(MouseButton),
    ScrollUp,
    ScrollDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub column: u16,
    pub row: u16,
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Raw text committed for the incremental search/goto-line prompt.
    TextCommit(String),
    CtrlC,
}

/// Every non-navigation action a keystroke, mouse click, or command-line
/// flag can request of the running session.
#[derive(Debug, Clone)]
pub enum Command {
    Navigate(NavCommand),
    EnterSearch { backward: bool },
    SearchNext,
    SearchPrev,
    ClearSearch,
    ToggleBookmark,
    MarkRows,
    MarkBlock,
    MarkColumns,
    CancelMark,
    Export { target: ExportTarget },
    ToggleFreeze,
    SetFreezeCols(u8),
    Sort { column: usize, descending: bool },
    ClearSort,
    ToggleSearchHighlight,
    ToggleLineHighlight,
    TogglePause,
    Refresh,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    Clipboard,
    File,
}

/// Observes events passing through the loop without altering dispatch.
/// Default is a no-op so adding a hook never forces every call site to
/// change.
pub trait EventHooks: Send + Sync + 'static {
    fn pre_dispatch(&self, _event: &Event) {}
    fn post_dispatch(&self, _event: &Event) {}
}

pub struct NoopEventHooks;
impl EventHooks for NoopEventHooks {}

/// One independent background producer of `Event`s (terminal input, watch
/// timer, streaming data reader, SIGWINCH). Each owns its async task and
/// must stop promptly once the channel closes.
pub trait AsyncEventSource: Send + 'static {
    fn name(&self) -> &'static str;
    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()>;
}

#[derive(Default)]
pub struct EventSourceRegistry {
    sources: Vec<Box<dyn AsyncEventSource>>,
}

impl EventSourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S: AsyncEventSource>(&mut self, source: S) {
        self.sources.push(Box::new(source));
    }

    /// Spawn every registered source, each with its own channel-sender
    /// clone. Callers should drop their own sender before awaiting these
    /// handles during shutdown so sources observe the closed channel.
    pub fn spawn_all(&mut self, tx: &Sender<Event>) -> Vec<JoinHandle<()>> {
        self.sources
            .drain(..)
            .map(|source| {
                let name = source.name();
                tracing::info!(target: "events", source = name, "spawning event source");
                source.spawn(tx.clone())
            })
            .collect()
    }
}

/// Fires `Event::WatchTick` on a fixed interval (`--watch=SEC`).
pub struct WatchTickSource {
    interval: std::time::Duration,
}

impl WatchTickSource {
    pub fn new(interval: std::time::Duration) -> Self {
        Self { interval }
    }
}

impl AsyncEventSource for WatchTickSource {
    fn name(&self) -> &'static str {
        "watch_tick"
    }

    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
        let dur = self.interval;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(dur);
            interval.tick().await; // first tick fires immediately; consume it
            loop {
                interval.tick().await;
                if tx.send(Event::WatchTick).await.is_err() {
                    break;
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tokio::sync::mpsc;

    struct MockCloseSource {
        flag: Arc<AtomicBool>,
    }

    impl AsyncEventSource for MockCloseSource {
        fn name(&self) -> &'static str {
            "mock_close"
        }
        fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
            let flag = self.flag;
            tokio::spawn(async move {
                tx.closed().await;
                flag.store(true, Ordering::SeqCst);
            })
        }
    }

    #[tokio::test]
    async fn registry_sources_exit_on_channel_drop() {
        let (tx, rx) = mpsc::channel::<Event>(8);
        let mut reg = EventSourceRegistry::new();
        let flag = Arc::new(AtomicBool::new(false));
        reg.register(MockCloseSource { flag: flag.clone() });
        let handles = reg.spawn_all(&tx);
        drop(tx);
        drop(rx);
        for handle in handles {
            tokio::time::timeout(Duration::from_millis(50), handle)
                .await
                .expect("source should exit once channel closes")
                .unwrap();
        }
        assert!(flag.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn watch_tick_source_emits_after_first_interval() {
        let (tx, mut rx) = mpsc::channel::<Event>(8);
        let mut reg = EventSourceRegistry::new();
        reg.register(WatchTickSource::new(Duration::from_millis(5)));
        let handles = reg.spawn_all(&tx);
        let ev = tokio::time::timeout(Duration::from_millis(200), rx.recv())
            .await
            .expect("should receive a tick")
            .unwrap();
        assert!(matches!(ev, Event::WatchTick));
        drop(tx);
        for handle in handles {
            let _ = tokio::time::timeout(Duration::from_millis(50), handle).await;
        }
    }
}
