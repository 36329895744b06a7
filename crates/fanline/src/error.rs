//! Error types for a pipeline run.
//!
//! Channel closure and cancellation are ordinary control flow and never
//! surface here. The only error a correctly spawned pipeline can produce is an
//! [`Error::InvariantViolation`], raised by the verifier when the accounting on
//! the two ends of the pipeline disagrees.

pub type Result<T> = core::result::Result<T, Error>;

/// All errors that `fanline` can produce.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The generator side and the collector side of a run disagree.
    ///
    /// This always means the pipeline wiring is broken. It is never a
    /// transient condition and must not be retried.
    #[error("invariant violated: {0}")]
    InvariantViolation(#[from] Violation),

    /// The operating system refused to start a stage thread.
    #[error("failed to spawn {role} thread: {source}")]
    Spawn {
        role: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// The specific accounting check that failed during verification.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Violation {
    /// Number of values emitted differs from the number aggregated.
    #[error("count mismatch: emitted {emitted}, collected {collected}")]
    CountMismatch { emitted: u64, collected: u64 },

    /// Sum of values emitted differs from the sum aggregated.
    #[error("sum mismatch: emitted {emitted}, collected {collected}")]
    SumMismatch { emitted: u64, collected: u64 },

    /// The per-worker tallies do not add up to the number of values emitted.
    #[error("distribution mismatch: emitted {emitted}, tallied across workers {tallied}")]
    DistributionMismatch { emitted: u64, tallied: u64 },
}

impl Error {
    /// Returns the failed check if this is an invariant violation.
    pub const fn violation(&self) -> Option<&Violation> {
        match self {
            Self::InvariantViolation(violation) => Some(violation),
            Self::Spawn { .. } => None,
        }
    }
}
