use crate::{CancellationToken, Pipeline, PipelineConfig, Probe, RunReport};
use core::time::Duration;
use std::collections::HashSet;
use std::sync::Mutex;
use std::thread::sleep;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Event {
    Emitted(u64),
    GeneratorStopped(u64),
    Collected(usize, u64),
    CollectorFinished(usize),
    ResultsClosed,
}

/// Records every probe event in the order the stages raised them.
#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<Event>>,
    /// Cancels `stop.0` once the value `stop.1` has been emitted.
    stop: Option<(CancellationToken, u64)>,
    /// Sleep inside every `collected` hook, to make collectors slow.
    collect_delay: Duration,
}

impl Recorder {
    fn stopping_at(token: &CancellationToken, last: u64) -> Self {
        Self {
            stop: Some((token.clone(), last)),
            ..Self::default()
        }
    }

    fn with_collect_delay(mut self, delay: Duration) -> Self {
        self.collect_delay = delay;
        self
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn emitted(&self) -> Vec<u64> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Emitted(v) => Some(v),
                _ => None,
            })
            .collect()
    }

    fn collected_by(&self, workers: usize) -> Vec<Vec<u64>> {
        let mut per_worker = vec![Vec::new(); workers];
        for event in self.events() {
            if let Event::Collected(worker, value) = event {
                per_worker[worker].push(value);
            }
        }
        per_worker
    }
}

impl Probe for Recorder {
    fn emitted(&self, value: u64) {
        self.push(Event::Emitted(value));
        if let Some((token, last)) = &self.stop {
            if value == *last {
                token.cancel();
            }
        }
    }

    fn generator_stopped(&self, emitted: u64) {
        self.push(Event::GeneratorStopped(emitted));
    }

    fn collected(&self, worker: usize, value: u64) {
        self.push(Event::Collected(worker, value));
        if !self.collect_delay.is_zero() {
            sleep(self.collect_delay);
        }
    }

    fn collector_finished(&self, worker: usize) {
        self.push(Event::CollectorFinished(worker));
    }

    fn results_closed(&self) {
        self.push(Event::ResultsClosed);
    }
}

fn fast_config(workers: usize) -> PipelineConfig {
    PipelineConfig::default()
        .with_workers(workers)
        .with_timeout(Duration::from_millis(30))
        .with_worker_delay(Duration::from_micros(100))
}

fn sorted(mut values: Vec<u64>) -> Vec<u64> {
    values.sort_unstable();
    values
}

fn assert_consistent(report: &RunReport) {
    report.verify().unwrap();
    assert_eq!(report.emitted, report.collected);
    assert_eq!(report.tallied(), report.collected.count);
    assert_eq!(report.tallies.len(), report.workers);
}

#[test]
fn test_multiset_of_values_is_conserved() {
    for workers in [1, 2, 5] {
        let pipeline = Pipeline::new(fast_config(workers)).with_probe(Recorder::default());
        let report = pipeline.run().unwrap();
        assert_consistent(&report);

        let recorder = pipeline.probe();
        let emitted = recorder.emitted();
        let collected: Vec<u64> = recorder.collected_by(workers).concat();

        assert!(!emitted.is_empty(), "30ms should emit something");
        assert_eq!(emitted, (1..=emitted.len() as u64).collect::<Vec<_>>());
        assert_eq!(sorted(collected), emitted);
        assert_eq!(report.emitted.count, emitted.len() as u64);
        assert_eq!(report.emitted.sum, emitted.iter().sum::<u64>());
    }
}

#[test]
fn test_tallies_partition_the_stream() {
    let workers = 4;
    let pipeline = Pipeline::new(fast_config(workers)).with_probe(Recorder::default());
    let report = pipeline.run().unwrap();
    assert_consistent(&report);

    let per_worker = pipeline.probe().collected_by(workers);
    let counts: Vec<u64> = per_worker.iter().map(|v| v.len() as u64).collect();
    assert_eq!(counts, report.tallies);

    let mut seen = HashSet::new();
    for value in per_worker.into_iter().flatten() {
        assert!(seen.insert(value), "value {value} collected twice");
    }
    assert_eq!(seen.len() as u64, report.emitted.count);
}

#[test]
fn test_result_channel_closes_once_after_every_collector() {
    let workers = 6;
    let pipeline = Pipeline::new(fast_config(workers)).with_probe(Recorder::default());
    pipeline.run().unwrap().verify().unwrap();

    let events = pipeline.probe().events();
    let closes: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| **e == Event::ResultsClosed)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(closes.len(), 1, "result channel must close exactly once");
    let closed_at = closes[0];

    let finished: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| matches!(e, Event::CollectorFinished(_)))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(finished.len(), workers);
    assert!(finished.iter().all(|&i| i < closed_at));

    // No collector publishes anything after the close.
    assert!(
        events[closed_at..]
            .iter()
            .all(|e| !matches!(e, Event::Collected(..)))
    );
}

#[test]
fn test_slow_collector_with_single_worker_still_terminates() {
    let config = PipelineConfig::default()
        .with_workers(1)
        .with_timeout(Duration::from_millis(20))
        .with_worker_delay(Duration::ZERO)
        .with_input_capacity(4)
        .with_result_capacity(1);
    let pipeline = Pipeline::new(config)
        .with_probe(Recorder::default().with_collect_delay(Duration::from_millis(5)));

    let report = pipeline.run().unwrap();
    assert_consistent(&report);
    assert_eq!(report.tallies, [report.emitted.count]);

    // The generator gave up on a blocked send at the deadline instead of
    // outrunning the collector, and everything it did hand over drained.
    let events = pipeline.probe().events();
    assert!(events.contains(&Event::GeneratorStopped(report.emitted.count)));
    assert_eq!(
        events.iter().filter(|e| **e == Event::ResultsClosed).count(),
        1
    );
}

#[test]
fn test_each_worker_stream_stays_in_order() {
    let token = CancellationToken::new();
    let workers = 3;
    let config = PipelineConfig::default()
        .with_workers(workers)
        .with_timeout(Duration::MAX)
        .with_worker_delay(Duration::from_micros(200));
    let pipeline = Pipeline::new(config).with_probe(Recorder::stopping_at(&token, 30));

    let report = pipeline.run_until(&token).unwrap();
    assert_consistent(&report);
    assert_eq!(report.emitted.count, 30);
    assert_eq!(report.emitted.sum, (1..=30).sum::<u64>());

    let per_worker = pipeline.probe().collected_by(workers);
    for stream in &per_worker {
        assert!(
            stream.windows(2).all(|w| w[0] < w[1]),
            "worker stream out of order: {stream:?}"
        );
    }
    assert_eq!(sorted(per_worker.concat()), (1..=30).collect::<Vec<_>>());
}

#[test]
fn test_totals_match_within_each_run_regardless_of_workers() {
    let narrow = Pipeline::new(fast_config(1)).run().unwrap();
    let wide = Pipeline::new(fast_config(10)).run().unwrap();

    assert_consistent(&narrow);
    assert_consistent(&wide);
    assert_eq!(narrow.tallies.len(), 1);
    assert_eq!(wide.tallies.len(), 10);
}

#[test]
fn test_immediate_cancel_reports_zeros_and_terminates() {
    let token = CancellationToken::new();
    token.cancel();
    let pipeline = Pipeline::new(fast_config(4)).with_probe(Recorder::default());

    let report = pipeline.run_until(&token).unwrap();
    assert_consistent(&report);
    assert_eq!(report.emitted.count, 0);
    assert_eq!(report.emitted.sum, 0);
    assert_eq!(report.collected.sum, 0);
    assert_eq!(report.tallies, [0, 0, 0, 0]);

    let events = pipeline.probe().events();
    assert!(events.contains(&Event::GeneratorStopped(0)));
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, Event::CollectorFinished(_)))
            .count(),
        4
    );
    assert!(events.contains(&Event::ResultsClosed));
}

#[test]
fn test_zero_workers_terminates_without_emitting() {
    let token = CancellationToken::new();
    let pipeline = Pipeline::new(fast_config(0));

    let report = pipeline.run_until(&token).unwrap();
    assert_consistent(&report);
    assert_eq!(report.emitted.count, 0);
    assert!(report.tallies.is_empty());
    assert!(!token.is_cancelled());
}

#[test]
fn test_pipeline_is_reusable() {
    let pipeline = Pipeline::new(fast_config(2));
    for _ in 0..3 {
        assert_consistent(&pipeline.run().unwrap());
    }
}

#[test]
fn test_buffered_input_channel() {
    let config = fast_config(3).with_input_capacity(64);
    assert_consistent(&Pipeline::new(config).run().unwrap());
}

#[cfg(feature = "serde")]
#[test]
fn test_report_serializes_to_json() {
    let token = CancellationToken::new();
    let pipeline = Pipeline::new(fast_config(2)).with_probe(Recorder::stopping_at(&token, 5));
    let report = pipeline.run_until(&token).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["workers"], 2);
    assert_eq!(json["emitted"]["count"], 5);
    assert_eq!(json["collected"]["sum"], 15);
    assert_eq!(json["tallies"].as_array().unwrap().len(), 2);

    let back: RunReport = serde_json::from_value(json).unwrap();
    assert_eq!(back, report);
}
