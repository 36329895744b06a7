use crossbeam_channel::Receiver;
use portable_atomic::{AtomicU64, Ordering};

/// Running count and sum of a stream of values.
///
/// Sums wrap on overflow. [`GenerationStats`] wraps the same way, so both ends
/// of the pipeline agree even past `u64::MAX`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Totals {
    pub count: u64,
    pub sum: u64,
}

impl Totals {
    pub const ZERO: Self = Self { count: 0, sum: 0 };

    /// Accounts for one value.
    #[inline]
    pub const fn record(&mut self, value: u64) {
        self.count += 1;
        self.sum = self.sum.wrapping_add(value);
    }
}

impl Extend<u64> for Totals {
    fn extend<I: IntoIterator<Item = u64>>(&mut self, iter: I) {
        for value in iter {
            self.record(value);
        }
    }
}

impl FromIterator<u64> for Totals {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        let mut totals = Self::ZERO;
        totals.extend(iter);
        totals
    }
}

/// Generator-side accounting, updated by the generation observer.
///
/// Backed by atomics so that any number of concurrent generators can share
/// one instance. Count and sum are updated independently; a [`snapshot`]
/// taken while a generator is still running may pair a count with a sum that
/// is one value behind or ahead. Snapshots taken after the generator has
/// stopped are exact.
///
/// [`snapshot`]: GenerationStats::snapshot
#[derive(Debug, Default)]
pub struct GenerationStats {
    count: AtomicU64,
    sum: AtomicU64,
}

impl GenerationStats {
    pub const fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum: AtomicU64::new(0),
        }
    }

    /// Accounts for one emitted value.
    #[inline]
    pub fn record(&self, value: u64) {
        self.sum.fetch_add(value, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> Totals {
        Totals {
            count: self.count.load(Ordering::Relaxed),
            sum: self.sum.load(Ordering::Relaxed),
        }
    }
}

/// Drains `results` until every sender is gone and returns what it saw.
///
/// This is the final stage of the pipeline. It returns only once the result
/// channel is closed, so it must not run on the thread that is responsible
/// for closing it.
pub fn aggregate(results: &Receiver<u64>) -> Totals {
    let totals: Totals = results.iter().collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(count = totals.count, sum = totals.sum, "result channel drained");

    totals
}
