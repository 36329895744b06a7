use anyhow::bail;
use clap::{Parser, ValueEnum};
use core::time::Duration;
use fanline::PipelineConfig;

/// Upper bound on `--workers`. Each worker costs two OS threads.
pub const MAX_WORKERS: usize = 1024;

/// Runtime configuration for the `fanline` binary.
///
/// Every setting can come from a flag, an environment variable or a `.env`
/// file in the working directory, in that order of precedence.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "fanline",
    version,
    about = "Runs a deadline-bounded fan-out/fan-in pipeline and verifies its accounting"
)]
pub struct CliArgs {
    /// How long the generator produces values, in milliseconds.
    ///
    /// Once the deadline passes the generator closes the input channel and
    /// the rest of the pipeline drains whatever is in flight.
    ///
    /// Environment variable: `FANLINE_TIMEOUT_MS`
    #[arg(long, env = "FANLINE_TIMEOUT_MS", default_value_t = 1000)]
    pub timeout_ms: u64,

    /// Number of parallel workers competing for the shared input channel.
    ///
    /// Each worker gets its own collector, so the run uses two threads per
    /// worker plus one each for the generator and the closer.
    ///
    /// Environment variable: `FANLINE_WORKERS`
    #[arg(long, env = "FANLINE_WORKERS", default_value_t = 5)]
    pub workers: usize,

    /// Per-item processing delay inside each worker, in microseconds.
    ///
    /// Environment variable: `FANLINE_WORKER_DELAY_US`
    #[arg(long, env = "FANLINE_WORKER_DELAY_US", default_value_t = 1000)]
    pub worker_delay_us: u64,

    /// Buffer size of the shared input channel. `0` makes every hand-off
    /// from the generator to a worker a rendezvous.
    ///
    /// Environment variable: `FANLINE_INPUT_CAPACITY`
    #[arg(long, env = "FANLINE_INPUT_CAPACITY", default_value_t = 0)]
    pub input_capacity: usize,

    /// Buffer size of the shared result channel. Defaults to the worker
    /// count.
    ///
    /// Environment variable: `FANLINE_RESULT_CAPACITY`
    #[arg(long, env = "FANLINE_RESULT_CAPACITY")]
    pub result_capacity: Option<usize>,

    /// How to render the final report on stdout.
    ///
    /// Environment variable: `FANLINE_OUTPUT`
    #[arg(long, env = "FANLINE_OUTPUT", value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines.
    Text,
    /// A pretty-printed JSON document.
    Json,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub pipeline: PipelineConfig,
    pub output: OutputFormat,
}

impl TryFrom<CliArgs> for RunConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.timeout_ms == 0 {
            bail!("FANLINE_TIMEOUT_MS must be greater than 0");
        }

        if args.workers == 0 {
            bail!("FANLINE_WORKERS must be greater than 0");
        }

        if args.workers > MAX_WORKERS {
            bail!(
                "FANLINE_WORKERS ({}) exceeds the supported maximum ({})",
                args.workers,
                MAX_WORKERS
            );
        }

        let mut pipeline = PipelineConfig::default()
            .with_workers(args.workers)
            .with_timeout(Duration::from_millis(args.timeout_ms))
            .with_worker_delay(Duration::from_micros(args.worker_delay_us))
            .with_input_capacity(args.input_capacity);

        if let Some(capacity) = args.result_capacity {
            if capacity == 0 {
                bail!("FANLINE_RESULT_CAPACITY must be greater than 0");
            }
            pipeline = pipeline.with_result_capacity(capacity);
        }

        Ok(Self {
            pipeline,
            output: args.output,
        })
    }
}
