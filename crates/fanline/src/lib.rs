//! A deadline-bounded fan-out/fan-in pipeline.
//!
//! A single [`generate`] loop feeds `1, 2, 3, ...` into one shared channel
//! until its [`CancellationToken`] fires. A pool of workers competes for that
//! channel and relays every value to a private channel, one collector per
//! worker tallies and republishes onto a shared result channel, and a closer
//! shuts the result channel once every collector is done. The calling thread
//! aggregates the results and [`verify`] proves nothing was lost, duplicated
//! or misattributed.
//!
//! ```
//! use core::time::Duration;
//! use fanline::{Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::default()
//!     .with_workers(3)
//!     .with_timeout(Duration::from_millis(20))
//!     .with_worker_delay(Duration::ZERO);
//!
//! let report = Pipeline::new(config).run().unwrap();
//! report.verify().unwrap();
//! assert_eq!(report.tallies.len(), 3);
//! ```

mod aggregate;
mod cancel;
mod closer;
mod collector;
mod config;
mod dispatch;
mod error;
mod generator;
mod pipeline;
mod probe;
mod report;
mod verify;
mod worker;

#[cfg(test)]
mod tests;

pub use crate::aggregate::*;
pub use crate::cancel::*;
pub use crate::closer::*;
pub use crate::collector::*;
pub use crate::config::*;
pub use crate::dispatch::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::pipeline::*;
pub use crate::probe::*;
pub use crate::report::*;
pub use crate::verify::*;
pub use crate::worker::*;
