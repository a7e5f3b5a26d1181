//! Guest input and the throbber clock, merged into one stream.
//!
//! There is no free-running tick: the throbber clock only runs while
//! [`Events::set_pending`] reports login or chat requests in flight, so an
//! idle chat wakes up for key presses and resizes alone.

use std::io;
use std::time::Duration;

use crossterm::event::{Event as TerminalEvent, EventStream, KeyEvent, KeyEventKind};
use futures::{Stream, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// What the app loop reacts to.
#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    /// Advance the loading throbber one frame.
    Spin,
}

/// Background task reading the terminal; see the module docs.
pub struct Events {
    rx: mpsc::UnboundedReceiver<Event>,
    pending: watch::Sender<usize>,
    cancel: CancellationToken,
}

impl Events {
    /// Read from the real terminal.
    pub fn spawn(spin_every: Duration) -> Self {
        Self::from_input(EventStream::new(), spin_every)
    }

    /// Read from any source of terminal events.
    pub fn from_input<S>(input: S, spin_every: Duration) -> Self
    where
        S: Stream<Item = io::Result<TerminalEvent>> + Send + Unpin + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let (pending, pending_rx) = watch::channel(0);
        let cancel = CancellationToken::new();
        tokio::spawn(pump(input, spin_every, pending_rx, tx, cancel.clone()));
        Self {
            rx,
            pending,
            cancel,
        }
    }

    /// Number of requests still running. Zero stops the throbber clock.
    pub fn set_pending(&self, count: usize) {
        self.pending.send_if_modified(|current| {
            let changed = *current != count;
            *current = count;
            changed
        });
    }

    /// `None` once the terminal input has ended.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

impl Drop for Events {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn pump<S>(
    mut input: S,
    spin_every: Duration,
    mut pending: watch::Receiver<usize>,
    tx: mpsc::UnboundedSender<Event>,
    cancel: CancellationToken,
) where
    S: Stream<Item = io::Result<TerminalEvent>> + Unpin,
{
    let mut spin = tokio::time::interval(spin_every);
    spin.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut busy = false;

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => break,

            changed = pending.changed() => {
                if changed.is_err() {
                    break;
                }
                busy = *pending.borrow_and_update() > 0;
                spin.reset();
                continue;
            }

            _ = spin.tick(), if busy => Event::Spin,

            read = input.next() => match read {
                Some(Ok(raw)) => match translate(raw) {
                    Some(event) => event,
                    None => continue,
                },
                Some(Err(e)) => {
                    warn!(error = %e, "terminal read failed");
                    continue;
                }
                None => break,
            },
        };

        if tx.send(event).is_err() {
            break;
        }
    }
}

/// Key presses and resizes; releases, repeats, mouse and focus are dropped.
fn translate(raw: TerminalEvent) -> Option<Event> {
    match raw {
        TerminalEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        TerminalEvent::Resize(cols, rows) => Some(Event::Resize(cols, rows)),
        _ => None,
    }
}
