//! Progress tracking for batch warm-introduction runs
//!
//! A [`JobState`] is created by the caller and passed into the batch call;
//! nothing is kept in global state. All counters are atomics so rayon workers
//! can report without locking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Cancelled,
    /// Aborted before any target ran (owner lookup or edge fetch failed)
    Failed,
}

/// Point-in-time view of a job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobProgress {
    pub id: Uuid,
    pub status: JobStatus,
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub paths_found: usize,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl JobProgress {
    /// Share of targets processed (completed, failed or skipped), 0.0..=1.0
    pub fn fraction_done(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.completed + self.failed + self.skipped) as f64 / self.total as f64
    }
}

#[derive(Debug)]
struct Lifecycle {
    status: JobStatus,
    finished_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct JobState {
    id: Uuid,
    created_at: DateTime<Utc>,
    total: AtomicUsize,
    completed: AtomicUsize,
    failed: AtomicUsize,
    skipped: AtomicUsize,
    paths_found: AtomicUsize,
    cancelled: AtomicBool,
    lifecycle: Mutex<Lifecycle>,
}

impl Default for JobState {
    fn default() -> Self {
        Self::new()
    }
}

impl JobState {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            total: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
            paths_found: AtomicUsize::new(0),
            cancelled: AtomicBool::new(false),
            lifecycle: Mutex::new(Lifecycle {
                status: JobStatus::Pending,
                finished_at: None,
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Ask workers to skip the targets they have not started yet
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub(crate) fn start(&self, total: usize) {
        self.total.store(total, Ordering::SeqCst);
        self.lifecycle().status = JobStatus::Running;
    }

    pub(crate) fn record_success(&self, paths: usize) {
        self.paths_found.fetch_add(paths, Ordering::Relaxed);
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn finish(&self) {
        let mut lifecycle = self.lifecycle();
        lifecycle.status = if self.is_cancelled() {
            JobStatus::Cancelled
        } else {
            JobStatus::Completed
        };
        lifecycle.finished_at = Some(Utc::now());
    }

    pub(crate) fn fail(&self) {
        let mut lifecycle = self.lifecycle();
        lifecycle.status = JobStatus::Failed;
        lifecycle.finished_at = Some(Utc::now());
    }

    pub fn snapshot(&self) -> JobProgress {
        let lifecycle = self.lifecycle();
        JobProgress {
            id: self.id,
            status: lifecycle.status,
            total: self.total.load(Ordering::SeqCst),
            completed: self.completed.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            skipped: self.skipped.load(Ordering::SeqCst),
            paths_found: self.paths_found.load(Ordering::SeqCst),
            created_at: self.created_at,
            finished_at: lifecycle.finished_at,
        }
    }

    fn lifecycle(&self) -> std::sync::MutexGuard<'_, Lifecycle> {
        // Counters stay meaningful even if a worker panicked mid-update
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
