//! Unit tests for the job registry under concurrent access

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use render_sweep_gateway::backend::RenderUnitResult;
use render_sweep_gateway::jobs::{JobId, JobRegistry, JobStatus};

fn results(units: std::ops::RangeInclusive<i64>) -> Vec<RenderUnitResult> {
    units
        .map(|unit_index| RenderUnitResult {
            unit_index,
            image_payload: format!("data:image/png;base64,{}", unit_index),
        })
        .collect()
}

#[test]
fn test_concurrent_creates_yield_unique_ids() {
    let registry = Arc::new(JobRegistry::new());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            thread::spawn(move || (0..250).map(|_| registry.create_job()).collect::<Vec<_>>())
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(ids.insert(id));
        }
    }

    assert_eq!(ids.len(), 2000);
    assert_eq!(registry.stats().pending, 2000);
}

#[test]
fn test_reads_never_observe_partial_results() {
    let registry = Arc::new(JobRegistry::new());
    let id = registry.create_job();
    let expected = results(1..=64);

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = registry.clone();
            let id = id.clone();
            thread::spawn(move || {
                for _ in 0..5_000 {
                    match registry.status(&id) {
                        JobStatus::Pending => {}
                        JobStatus::Complete { images } => {
                            assert_eq!(images.len(), 64);
                            return true;
                        }
                    }
                    thread::yield_now();
                }
                false
            })
        })
        .collect();

    registry.complete(&id, expected.clone());

    for reader in readers {
        reader.join().unwrap();
    }

    // Once complete, every later read sees the same collection
    for _ in 0..3 {
        assert_eq!(registry.status(&id).images().unwrap(), expected.as_slice());
    }
}

#[test]
fn test_unknown_and_pending_are_indistinguishable() {
    let registry = JobRegistry::new();
    let pending = registry.create_job();

    assert_eq!(registry.status(&pending), registry.status(&JobId::from("job-unknown")));
}

#[test]
fn test_stats_track_completion() {
    let registry = JobRegistry::new();
    let ids: Vec<_> = (0..3).map(|_| registry.create_job()).collect();
    registry.complete(&ids[0], results(1..=2));

    let stats = registry.stats();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.pending, 2);
    assert_eq!(stats.complete, 1);
}
