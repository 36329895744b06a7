use core::time::Duration;
use crossbeam_channel::{Receiver, Sender};

/// Worker loop: relays every value from the shared `input` channel to this
/// worker's private `output` channel, unmodified and in the order received.
///
/// Several workers compete for `input`, so each one sees an arbitrary,
/// load-dependent subset of the stream. The loop ends once `input` is closed
/// and drained; `output` is then dropped, closing the private channel for the
/// worker's collector. If the collector disappears first, the worker stops
/// forwarding and returns early.
///
/// `delay` is slept after each forward and stands in for per-item transform
/// latency.
///
/// Returns the number of values forwarded.
pub fn run_worker(
    _worker: usize,
    input: Receiver<u64>,
    output: Sender<u64>,
    delay: Duration,
) -> u64 {
    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {_worker} started");

    let mut forwarded = 0;
    for value in &input {
        if output.send(value).is_err() {
            #[cfg(feature = "tracing")]
            tracing::warn!("Worker {_worker} lost its collector, dropping {value}");
            break;
        }
        forwarded += 1;

        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {_worker} stopped after {forwarded} values");

    forwarded
}
