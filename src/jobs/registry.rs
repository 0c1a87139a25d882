//! Process-wide job registry
//!
//! Every read and write of the job map goes through one mutex. Readers copy
//! what they need (the state tag and a shared pointer to the immutable
//! result list) before the guard drops, so a poll can never observe a job
//! half-way through completion.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::backend::RenderUnitResult;

/// Opaque job identifier handed to clients
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Generate a fresh `job-<uuid>` identifier
    pub fn generate() -> Self {
        Self(format!("job-{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for JobId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
enum JobState {
    Pending,
    Complete(Arc<[RenderUnitResult]>),
}

#[derive(Debug, Clone)]
struct Job {
    state: JobState,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl Job {
    fn pending() -> Self {
        Self {
            state: JobState::Pending,
            created_at: Utc::now(),
            completed_at: None,
        }
    }
}

/// What a poll observes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Complete { images: Arc<[RenderUnitResult]> },
}

impl JobStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, JobStatus::Complete { .. })
    }

    /// Results of a completed job, `None` while pending
    pub fn images(&self) -> Option<&[RenderUnitResult]> {
        match self {
            JobStatus::Pending => None,
            JobStatus::Complete { images } => Some(&images[..]),
        }
    }
}

/// Registry counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub total: usize,
    pub pending: usize,
    pub complete: usize,
}

/// Registry of all jobs issued by this process
#[derive(Default)]
pub struct JobRegistry {
    jobs: Mutex<HashMap<JobId, Job>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new pending job and return its id
    pub fn create_job(&self) -> JobId {
        let mut jobs = self.jobs.lock();
        let mut id = JobId::generate();
        while jobs.contains_key(&id) {
            warn!(job = %id, "Job id collision, regenerating");
            id = JobId::generate();
        }
        jobs.insert(id.clone(), Job::pending());
        debug!(job = %id, "Job created");
        id
    }

    /// Publish the results of a job and mark it complete.
    ///
    /// Completing twice replaces the earlier results.
    pub fn complete(&self, id: &JobId, results: Vec<RenderUnitResult>) {
        let images: Arc<[RenderUnitResult]> = results.into();
        let count = images.len();
        let now = Utc::now();

        let created_at = {
            let mut jobs = self.jobs.lock();
            let job = jobs.entry(id.clone()).or_insert_with(|| {
                warn!(job = %id, "Completing a job that was never registered");
                Job::pending()
            });
            if job.completed_at.is_some() {
                warn!(job = %id, "Job completed more than once, replacing results");
            }
            job.state = JobState::Complete(images);
            job.completed_at = Some(now);
            job.created_at
        };

        info!(
            job = %id,
            images = count,
            elapsed_ms = (now - created_at).num_milliseconds(),
            "Job complete"
        );
    }

    /// Current status of a job. Unknown ids read as pending.
    pub fn status(&self, id: &JobId) -> JobStatus {
        let jobs = self.jobs.lock();
        match jobs.get(id).map(|job| &job.state) {
            Some(JobState::Complete(images)) => JobStatus::Complete {
                images: Arc::clone(images),
            },
            Some(JobState::Pending) | None => JobStatus::Pending,
        }
    }

    /// Count jobs by state
    pub fn stats(&self) -> RegistryStats {
        let jobs = self.jobs.lock();
        let complete = jobs
            .values()
            .filter(|job| matches!(job.state, JobState::Complete(_)))
            .count();
        RegistryStats {
            total: jobs.len(),
            pending: jobs.len() - complete,
            complete,
        }
    }

    pub fn len(&self) -> usize {
        self.jobs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.lock().is_empty()
    }
}
