use crate::Probe;
use crossbeam_channel::Sender;
use crossbeam_utils::sync::WaitGroup;

/// Closes the shared result channel once every collector has finished.
///
/// `collectors` is the original [`WaitGroup`]; every collector holds a clone
/// and drops it on exit. `results` is the owning sender of the result channel.
/// Collectors hold clones of it and release them before signalling, so when
/// the wait returns this is the last sender alive and dropping it is the one
/// and only close of the channel.
///
/// This must run on its own thread, concurrently with the aggregator. The
/// aggregator is the only consumer of the result channel; waiting for the
/// collectors on the consuming thread would leave their sends blocked once
/// the buffer fills.
pub fn close_when_drained<P: Probe + ?Sized>(
    collectors: WaitGroup,
    results: Sender<u64>,
    probe: &P,
) {
    collectors.wait();
    drop(results);

    #[cfg(feature = "tracing")]
    tracing::debug!("all collectors finished, result channel closed");

    probe.results_closed();
}
