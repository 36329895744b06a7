use crate::{Result, Totals, verify};
use core::time::Duration;

/// Final aggregates of one pipeline run, handed to whoever renders results.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunReport {
    /// Number of workers the run was wired with.
    pub workers: usize,
    /// What the generator's observer saw.
    pub emitted: Totals,
    /// What the aggregator saw.
    pub collected: Totals,
    /// Values tallied by each worker's collector, in worker-index order.
    pub tallies: Vec<u64>,
    /// Wall-clock time from wiring the first stage to draining the result
    /// channel.
    pub elapsed: Duration,
}

impl RunReport {
    /// Sum of all per-worker tallies.
    pub fn tallied(&self) -> u64 {
        self.tallies.iter().sum()
    }

    /// Values aggregated per second of run time.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.collected.count as f64 / secs
        } else {
            0.0
        }
    }

    /// Checks the run's accounting invariants. See [`verify`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvariantViolation`](crate::Error::InvariantViolation)
    /// naming the first failed check.
    pub fn verify(&self) -> Result<()> {
        verify(self)
    }
}
