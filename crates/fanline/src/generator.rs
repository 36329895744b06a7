use crate::CancellationToken;
use crossbeam_channel::{Sender, select};

/// Emits `1, 2, 3, ...` into `sink` until `token` fires, calling `observe`
/// with each value after it has been handed to the channel.
///
/// Returns the number of values emitted.
///
/// # Delivery contract
///
/// - `observe` runs exactly once per value the channel accepted, and only
///   after the channel accepted it. A value whose send was abandoned or failed
///   is never observed, and the sequence does not advance past it.
/// - `sink` is owned by this function and dropped on every return path, which
///   closes the channel for downstream consumers once their buffers drain.
///   Callers must not keep another [`Sender`] clone alive, otherwise the
///   channel stays open.
///
/// # Cancellation
///
/// The token is checked before every attempt, and each send is raced against
/// the token in a [`select!`]. A generator blocked on a full channel (or a
/// rendezvous channel with no ready reader) therefore stops as soon as the
/// token fires instead of waiting for a reader to show up.
///
/// If every receiver has been dropped the send fails and the generator stops
/// early; this is treated the same as cancellation.
pub fn generate<F>(token: &CancellationToken, sink: Sender<u64>, mut observe: F) -> u64
where
    F: FnMut(u64),
{
    let deadline = token.deadline_receiver();
    let mut next: u64 = 1;

    loop {
        if token.is_cancelled() {
            break;
        }

        let delivered = select! {
            send(sink, next) -> res => res.is_ok(),
            recv(token.signal()) -> _ => false,
            recv(deadline) -> _ => false,
        };
        if !delivered {
            break;
        }

        observe(next);
        next += 1;
    }

    let emitted = next - 1;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        emitted,
        cancelled = token.is_cancelled(),
        "generator stopped, closing input channel"
    );

    drop(sink);
    emitted
}
