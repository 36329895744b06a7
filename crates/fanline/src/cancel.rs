use core::convert::Infallible;
use core::fmt;
use core::time::Duration;
use crossbeam_channel::{Receiver, Sender, at, never};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;

/// A cloneable, thread-safe cancellation signal with an optional deadline.
///
/// The token fires when any clone calls [`cancel`](Self::cancel) or when its
/// deadline passes, whichever comes first. Cancellation is one-way and
/// idempotent.
///
/// Internally the token is a channel that never carries a message: every clone
/// holds a [`Receiver`], and cancelling drops the only [`Sender`]. A
/// disconnected receiver is immediately ready, which lets blocking operations
/// race against cancellation inside a [`crossbeam_channel::select!`].
///
/// # Example
///
/// ```
/// use core::time::Duration;
/// use fanline::CancellationToken;
///
/// let token = CancellationToken::with_timeout(Duration::from_secs(60));
/// let child = token.clone();
/// assert!(!child.is_cancelled());
///
/// token.cancel();
/// assert!(child.is_cancelled());
/// ```
#[derive(Clone)]
pub struct CancellationToken {
    signal: Receiver<Infallible>,
    trigger: Arc<Mutex<Option<Sender<Infallible>>>>,
    deadline: Option<Instant>,
}

impl CancellationToken {
    /// Creates a token that only fires on an explicit [`cancel`](Self::cancel).
    pub fn new() -> Self {
        let (trigger, signal) = crossbeam_channel::bounded(0);
        Self {
            signal,
            trigger: Arc::new(Mutex::new(Some(trigger))),
            deadline: None,
        }
    }

    /// Creates a token that also fires once `deadline` is reached.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            ..Self::new()
        }
    }

    /// Creates a token that also fires `timeout` from now.
    ///
    /// A timeout too large to represent as an [`Instant`] means no deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => Self::with_deadline(deadline),
            None => Self::new(),
        }
    }

    /// Fires the token for every clone.
    pub fn cancel(&self) {
        if self.trigger.lock().take().is_some() {
            #[cfg(feature = "tracing")]
            tracing::debug!("cancellation requested");
        }
    }

    /// Returns `true` once the token was cancelled or its deadline passed.
    pub fn is_cancelled(&self) -> bool {
        self.trigger.lock().is_none() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Receiver that disconnects when [`cancel`](Self::cancel) is called.
    pub(crate) const fn signal(&self) -> &Receiver<Infallible> {
        &self.signal
    }

    /// Receiver that becomes ready at the deadline, or never.
    pub(crate) fn deadline_receiver(&self) -> Receiver<Instant> {
        self.deadline.map_or_else(never, at)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .field("deadline", &self.deadline)
            .finish()
    }
}
