/// Instrumentation hooks invoked at pipeline stage boundaries.
///
/// Every method has a no-op default, so an implementation only overrides the
/// events it cares about. Hooks run synchronously on the thread of the stage
/// that raised them: a hook that sleeps slows that stage down and pushes
/// backpressure upstream, which makes probes useful for simulating slow
/// consumers as well as for recording event order.
///
/// `()` is the no-op probe used by [`Pipeline::new`](crate::Pipeline::new).
pub trait Probe: Sync {
    /// The generator delivered `value` to the input channel.
    fn emitted(&self, _value: u64) {}

    /// The generator stopped after delivering `emitted` values. The input
    /// channel is already closed, so downstream stages may be winding down
    /// concurrently with this call.
    fn generator_stopped(&self, _emitted: u64) {}

    /// The collector for `worker` is about to publish `value` onto the result
    /// channel. Its tally is bumped once the send succeeds.
    fn collected(&self, _worker: usize, _value: u64) {}

    /// The collector for `worker` drained its source and released its result
    /// sender. Raised before the collector signals completion to the closer.
    fn collector_finished(&self, _worker: usize) {}

    /// The closer released the last result sender; the result channel is
    /// closed once buffered values drain.
    fn results_closed(&self) {}
}

impl Probe for () {}

impl<P: Probe + ?Sized> Probe for &P {
    fn emitted(&self, value: u64) {
        (**self).emitted(value);
    }

    fn generator_stopped(&self, emitted: u64) {
        (**self).generator_stopped(emitted);
    }

    fn collected(&self, worker: usize, value: u64) {
        (**self).collected(worker, value);
    }

    fn collector_finished(&self, worker: usize) {
        (**self).collector_finished(worker);
    }

    fn results_closed(&self) {
        (**self).results_closed();
    }
}
