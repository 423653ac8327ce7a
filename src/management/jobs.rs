use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, RwLock, RwLockWriteGuard},
};

use serde::Serialize;

use crate::{
    types::{BatchReport, TrackOutcome, TrackReport, TrackRequest},
    utils,
};

/// Number of jobs kept before the oldest ones are forgotten.
pub const MAX_JOBS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Running,
    Finished,
    Cancelled,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobStatus {
    pub id: String,
    pub state: JobState,
    pub total: usize,
    pub tracks: Vec<TrackReport>,
}

#[derive(Default)]
struct Jobs {
    by_id: HashMap<String, JobStatus>,
    // creation order, oldest first
    order: VecDeque<String>,
}

impl Jobs {
    /// Makes room for one more job: finished jobs go first, oldest first,
    /// and only when every kept job is still running is the oldest running
    /// one dropped.
    fn evict_for_insert(&mut self, capacity: usize) {
        while self.by_id.len() >= capacity {
            let position = self
                .order
                .iter()
                .position(|id| {
                    self.by_id
                        .get(id)
                        .is_some_and(|job| job.state != JobState::Running)
                })
                .unwrap_or(0);

            match self.order.remove(position) {
                Some(id) => {
                    self.by_id.remove(&id);
                }
                None => break,
            }
        }
    }
}

/// In-memory status of the batches accepted by this process.
///
/// At most `capacity` jobs are kept; a late `record`/`finish` for a job that
/// was already dropped is ignored.
#[derive(Clone)]
pub struct JobRegistry {
    jobs: Arc<RwLock<Jobs>>,
    capacity: usize,
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::with_capacity(MAX_JOBS)
    }
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            jobs: Arc::new(RwLock::new(Jobs::default())),
            capacity: capacity.max(1),
        }
    }

    /// Registers a new running job and returns its id.
    pub fn create(&self, total: usize) -> String {
        let id = utils::random_token(12);
        let status = JobStatus {
            id: id.clone(),
            state: JobState::Running,
            total,
            tracks: Vec::with_capacity(total),
        };

        let mut jobs = self.write();
        jobs.evict_for_insert(self.capacity);
        jobs.order.push_back(id.clone());
        jobs.by_id.insert(id.clone(), status);
        id
    }

    pub fn record(&self, id: &str, track: &TrackRequest, outcome: &TrackOutcome) {
        if let Some(job) = self.write().by_id.get_mut(id) {
            job.tracks.push(TrackReport {
                name: track.name.clone(),
                artist: track.artist.clone(),
                outcome: outcome.clone(),
            });
        }
    }

    pub fn finish(&self, id: &str, report: &BatchReport) {
        let cancelled = report
            .tracks
            .iter()
            .any(|t| t.outcome == TrackOutcome::Cancelled);

        if let Some(job) = self.write().by_id.get_mut(id) {
            job.tracks = report.tracks.clone();
            job.state = if cancelled {
                JobState::Cancelled
            } else {
                JobState::Finished
            };
        }
    }

    pub fn get(&self, id: &str) -> Option<JobStatus> {
        self.jobs
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .by_id
            .get(id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.jobs
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .by_id
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn write(&self) -> RwLockWriteGuard<'_, Jobs> {
        self.jobs.write().unwrap_or_else(|e| e.into_inner())
    }
}
