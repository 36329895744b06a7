//! One-shot orchestration of the generator, fan-out, fan-in and aggregation
//! stages.
//!
//! ```text
//!                    ┌─► worker 0 ─► collector 0 ─┐
//! generator ─► input ┼─► worker 1 ─► collector 1 ─┼─► results ─► aggregator
//!                    └─► worker N ─► collector N ─┘      ▲
//!                                        │ WaitGroup      │ close
//!                                        └──────► closer ─┘
//! ```
//!
//! Every stage runs on its own scoped thread except the aggregator, which runs
//! on the caller's thread. Only the generator observes the cancellation token.
//! Every other stage ends because its upstream channel closed.

use crate::{
    CancellationToken, Error, GenerationStats, PipelineConfig, Probe, Result, RunReport,
    aggregate, close_when_drained, fan_out, generate, run_collector,
};
use crossbeam_utils::sync::WaitGroup;
use std::thread::{self, Builder};
use std::time::Instant;

/// A configured pipeline, runnable any number of times.
///
/// Each call to [`run`](Self::run) or [`run_until`](Self::run_until) wires a
/// fresh set of channels and threads and tears all of them down before
/// returning.
#[derive(Debug)]
pub struct Pipeline<P = ()> {
    config: PipelineConfig,
    probe: P,
}

impl Pipeline {
    pub const fn new(config: PipelineConfig) -> Self {
        Self { config, probe: () }
    }
}

impl<P: Probe> Pipeline<P> {
    /// Replaces the instrumentation hooks.
    pub fn with_probe<Q: Probe>(self, probe: Q) -> Pipeline<Q> {
        Pipeline {
            config: self.config,
            probe,
        }
    }

    pub const fn probe(&self) -> &P {
        &self.probe
    }

    /// Runs the pipeline with a generator deadline of
    /// [`PipelineConfig::timeout`] from now.
    ///
    /// # Errors
    ///
    /// See [`run_until`](Self::run_until).
    pub fn run(&self) -> Result<RunReport> {
        self.run_until(&CancellationToken::with_timeout(self.config.timeout))
    }

    /// Runs the pipeline until `token` stops the generator and every value it
    /// emitted has reached the aggregator.
    ///
    /// The returned report is not verified; call [`RunReport::verify`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Spawn`] if a stage thread cannot be started. Stages
    /// already running are drained and joined before the error is returned.
    pub fn run_until(&self, token: &CancellationToken) -> Result<RunReport> {
        let workers = self.config.workers;
        let probe = &self.probe;
        let stats = GenerationStats::new();
        let mut tallies = vec![0_u64; workers];
        let started = Instant::now();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            workers,
            input_capacity = self.config.input_capacity,
            result_capacity = self.config.result_capacity(),
            "wiring pipeline"
        );

        let collected = thread::scope(|s| -> Result<_> {
            let (input_tx, input_rx) = crossbeam_channel::bounded(self.config.input_capacity);
            let outputs = fan_out(s, &input_rx, workers, self.config.worker_delay)?;
            // Only workers may keep the input channel open.
            drop(input_rx);

            let (results_tx, results_rx) =
                crossbeam_channel::bounded(self.config.result_capacity());
            let collectors = WaitGroup::new();

            for ((worker, source), tally) in outputs.into_iter().enumerate().zip(&mut tallies) {
                let results = results_tx.clone();
                let done = collectors.clone();
                Builder::new()
                    .name(format!("fanline-collector-{worker}"))
                    .spawn_scoped(s, move || {
                        run_collector(worker, source, tally, results, done, probe);
                    })
                    .map_err(|source| Error::Spawn {
                        role: "collector",
                        source,
                    })?;
            }

            Builder::new()
                .name("fanline-closer".into())
                .spawn_scoped(s, move || close_when_drained(collectors, results_tx, probe))
                .map_err(|source| Error::Spawn {
                    role: "closer",
                    source,
                })?;

            let stats = &stats;
            Builder::new()
                .name("fanline-generator".into())
                .spawn_scoped(s, move || {
                    let emitted = generate(token, input_tx, |value| {
                        stats.record(value);
                        probe.emitted(value);
                    });
                    probe.generator_stopped(emitted);
                })
                .map_err(|source| Error::Spawn {
                    role: "generator",
                    source,
                })?;

            Ok(aggregate(&results_rx))
        })?;

        let report = RunReport {
            workers,
            emitted: stats.snapshot(),
            collected,
            tallies,
            elapsed: started.elapsed(),
        };

        #[cfg(feature = "tracing")]
        tracing::info!(
            emitted = report.emitted.count,
            collected = report.collected.count,
            elapsed = ?report.elapsed,
            "pipeline drained"
        );

        Ok(report)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
