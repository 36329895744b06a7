use crate::{Error, Result, run_worker};
use core::time::Duration;
use crossbeam_channel::Receiver;
use std::thread::{Builder, Scope};

/// Wires the fan-out stage.
///
/// Spawns `workers` worker threads inside `scope`. Every worker gets its own
/// clone of the shared `input` receiver and a freshly created private output
/// channel; the receiving ends are returned in worker-index order. No two
/// workers share an output channel.
///
/// Private channels are rendezvous channels, so a slow collector stalls only
/// its own worker.
///
/// The caller keeps its `input` receiver. It should drop it once the returned
/// receivers are wired up so that only workers hold the input channel open.
///
/// # Errors
///
/// Returns [`Error::Spawn`] if a worker thread cannot be started. Workers
/// already running exit on their own once the input channel closes.
pub fn fan_out<'scope>(
    scope: &'scope Scope<'scope, '_>,
    input: &Receiver<u64>,
    workers: usize,
    delay: Duration,
) -> Result<Vec<Receiver<u64>>> {
    (0..workers)
        .map(|worker| -> Result<Receiver<u64>> {
            let (output, private) = crossbeam_channel::bounded(0);
            let input = input.clone();
            Builder::new()
                .name(format!("fanline-worker-{worker}"))
                .spawn_scoped(scope, move || run_worker(worker, input, output, delay))
                .map_err(|source| Error::Spawn {
                    role: "worker",
                    source,
                })?;
            Ok(private)
        })
        .collect()
}
