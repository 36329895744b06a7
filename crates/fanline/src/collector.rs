use crate::Probe;
use crossbeam_channel::{Receiver, Sender};
use crossbeam_utils::sync::WaitGroup;

/// Fan-in stage for a single worker.
///
/// Drains `source` (the worker's private channel) to exhaustion, republishing
/// each value unchanged onto the shared `results` channel. `tally` belongs to
/// this collector alone and counts only values that were actually forwarded.
///
/// On exit the collector releases its `results` sender first and its `done`
/// handle last, so by the time the closer observes the completion no sender
/// owned by this collector is left.
///
/// # Arguments
///
/// - `worker`: Index of the worker this collector drains.
/// - `source`: The worker's private output channel.
/// - `tally`: This worker's slot in the per-worker tally array.
/// - `results`: A clone of the shared result sender.
/// - `done`: A clone of the closer's [`WaitGroup`].
/// - `probe`: Instrumentation hooks.
pub fn run_collector<P: Probe + ?Sized>(
    worker: usize,
    source: Receiver<u64>,
    tally: &mut u64,
    results: Sender<u64>,
    done: WaitGroup,
    probe: &P,
) {
    for value in &source {
        probe.collected(worker, value);
        if results.send(value).is_err() {
            // Only possible if the aggregator is gone, i.e. it panicked.
            #[cfg(feature = "tracing")]
            tracing::error!("Collector {worker} lost the result channel");
            break;
        }
        *tally += 1;
    }

    drop(results);

    #[cfg(feature = "tracing")]
    tracing::trace!("Collector {worker} finished with tally {}", *tally);

    probe.collector_finished(worker);
    drop(done);
}
