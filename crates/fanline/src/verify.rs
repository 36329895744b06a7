use crate::{Result, RunReport, Violation};

/// Proves a finished run lost, duplicated and misattributed nothing.
///
/// Checks, in order:
///
/// 1. values emitted == values aggregated
/// 2. sum emitted == sum aggregated
/// 3. sum of per-worker tallies == values emitted
///
/// Must only be called after the aggregator has drained the result channel;
/// [`Pipeline::run`](crate::Pipeline::run) guarantees that for the reports it
/// returns.
///
/// # Errors
///
/// Returns [`Error::InvariantViolation`](crate::Error::InvariantViolation)
/// carrying the first failed check. A violation means the pipeline wiring is
/// broken and the run must be treated as fatal.
pub fn verify(report: &RunReport) -> Result<()> {
    let emitted = report.emitted;
    let collected = report.collected;

    if emitted.count != collected.count {
        return Err(Violation::CountMismatch {
            emitted: emitted.count,
            collected: collected.count,
        }
        .into());
    }

    if emitted.sum != collected.sum {
        return Err(Violation::SumMismatch {
            emitted: emitted.sum,
            collected: collected.sum,
        }
        .into());
    }

    let tallied = report.tallied();
    if tallied != emitted.count {
        return Err(Violation::DistributionMismatch {
            emitted: emitted.count,
            tallied,
        }
        .into());
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(count = emitted.count, sum = emitted.sum, "run verified");

    Ok(())
}
