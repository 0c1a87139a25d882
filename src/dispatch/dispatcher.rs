//! Fan-out dispatcher: one backend call per sweep unit, merged into a job

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

use crate::backend::{RenderBackend, RenderRequest, RenderUnitResult, UnitOutcome};
use crate::config::DispatchConfig;
use crate::jobs::{JobId, JobRegistry};
use crate::response::encode_image;

/// Drives sweeps against a render backend and publishes them to the registry
pub struct Dispatcher {
    backend: Arc<dyn RenderBackend>,
    registry: Arc<JobRegistry>,
    config: DispatchConfig,
}

impl Dispatcher {
    /// Create a new dispatcher
    pub fn with_config(
        backend: Arc<dyn RenderBackend>,
        registry: Arc<JobRegistry>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            backend,
            registry,
            config,
        }
    }

    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.registry
    }

    /// Register a job for `request` and run its sweep in the background.
    ///
    /// Returns as soon as the job is registered; the spawned task completes
    /// the job once every unit has finished.
    pub fn submit(&self, request: RenderRequest) -> JobId {
        let job_id = self.registry.create_job();
        info!(
            job = %job_id,
            start = request.start,
            end = request.end,
            samples = request.sample_count,
            units = request.unit_count(),
            "Job submitted"
        );

        let backend = self.backend.clone();
        let registry = self.registry.clone();
        let max_concurrent = self.config.max_concurrent;
        let job = job_id.clone();

        tokio::spawn(async move {
            let results = fan_out(backend, request, max_concurrent).await;
            registry.complete(&job, results);
        });

        job_id
    }

    /// Run a sweep to completion and return the rendered units in sweep order
    pub async fn dispatch(&self, request: RenderRequest) -> Vec<RenderUnitResult> {
        fan_out(self.backend.clone(), request, self.config.max_concurrent).await
    }
}

/// One spawned task per unit, at most `max_concurrent` alive at a time.
/// Successful units land in a collection with its own lock; the result is
/// final only after every unit task has been joined.
async fn fan_out(
    backend: Arc<dyn RenderBackend>,
    request: RenderRequest,
    max_concurrent: usize,
) -> Vec<RenderUnitResult> {
    let requested = request.unit_count();
    if requested == 0 {
        debug!(start = request.start, end = request.end, "Empty sweep");
        return Vec::new();
    }

    let max_concurrent = max_concurrent.max(1);
    let collected: Arc<Mutex<Vec<RenderUnitResult>>> = Arc::new(Mutex::new(Vec::new()));
    let mut tasks = JoinSet::new();

    for unit_index in request.units() {
        // Backpressure: reap a finished unit before spawning past the limit
        if tasks.len() >= max_concurrent {
            if let Some(joined) = tasks.join_next().await {
                log_join_failure(joined);
            }
        }

        let backend = backend.clone();
        let collected = collected.clone();
        let sample_count = request.sample_count;

        tasks.spawn(async move {
            match backend.fetch_unit(unit_index, sample_count).await {
                UnitOutcome::Success(bytes) => {
                    let result = RenderUnitResult {
                        unit_index,
                        image_payload: encode_image(&bytes),
                    };
                    collected.lock().push(result);
                }
                UnitOutcome::Skipped => {
                    debug!(unit = unit_index, backend = %backend.name(), "Unit skipped");
                }
            }
        });
    }

    while let Some(joined) = tasks.join_next().await {
        log_join_failure(joined);
    }

    let mut results = std::mem::take(&mut *collected.lock());
    results.sort_by_key(|result| result.unit_index);

    info!(
        requested,
        rendered = results.len(),
        skipped = requested.saturating_sub(results.len() as u64),
        "Sweep finished"
    );

    results
}

fn log_join_failure(joined: std::result::Result<(), JoinError>) {
    if let Err(e) = joined {
        warn!(error = %e, "Render unit task failed, unit skipped");
    }
}
