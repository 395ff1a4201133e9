// Background job handoff keyed by string.
//
// A caller asks for a result by key; the first request spawns the work and
// every request until it finishes sees `Pending`. Finished outcomes, errors
// included, are kept for the store's TTL.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Outcome stored for a finished job. Errors are kept as their message.
pub type JobOutcome<T> = Result<T, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Ready,
}

enum JobState<T> {
    InProgress { started: Instant },
    Done { finished: Instant, outcome: JobOutcome<T> },
}

impl<T> JobState<T> {
    fn stamped(&self) -> Instant {
        match self {
            JobState::InProgress { started } => *started,
            JobState::Done { finished, .. } => *finished,
        }
    }
}

pub struct JobStore<T> {
    jobs: DashMap<String, JobState<T>>,
    ttl: Duration,
}

impl<T> JobStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration) -> Arc<Self> {
        Arc::new(Self {
            jobs: DashMap::new(),
            ttl,
        })
    }

    /// Make sure a job for `key` exists, starting `work` if it does not.
    ///
    /// The in-progress marker is written under the map's entry lock before
    /// the task is spawned, so at most one computation per key is in flight.
    /// Entries older than the TTL, finished or not, are replaced.
    pub fn ensure_job<F, Fut, E>(self: &Arc<Self>, key: &str, work: F) -> JobStatus
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        match self.jobs.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().stamped().elapsed() < self.ttl {
                    return match occupied.get() {
                        JobState::InProgress { .. } => JobStatus::Pending,
                        JobState::Done { .. } => JobStatus::Ready,
                    };
                }
                debug!(key, "job entry expired, restarting");
                occupied.insert(JobState::InProgress {
                    started: Instant::now(),
                });
            }
            Entry::Vacant(vacant) => {
                vacant.insert(JobState::InProgress {
                    started: Instant::now(),
                });
            }
        }

        self.spawn(key.to_string(), work());
        JobStatus::Pending
    }

    fn spawn<Fut, E>(self: &Arc<Self>, key: String, fut: Fut)
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = fut.await.map_err(|e| e.to_string());
            if let Err(message) = &outcome {
                warn!(key = %key, error = %message, "background job failed");
            } else {
                info!(key = %key, "background job finished");
            }
            store.jobs.insert(
                key,
                JobState::Done {
                    finished: Instant::now(),
                    outcome,
                },
            );
        });
    }

    pub fn status(&self, key: &str) -> Option<JobStatus> {
        let entry = self.jobs.get(key)?;
        if entry.stamped().elapsed() >= self.ttl {
            return None;
        }
        Some(match entry.value() {
            JobState::InProgress { .. } => JobStatus::Pending,
            JobState::Done { .. } => JobStatus::Ready,
        })
    }

    /// The finished outcome for `key`, if any and not expired.
    pub fn result(&self, key: &str) -> Option<JobOutcome<T>> {
        let entry = self.jobs.get(key)?;
        match entry.value() {
            JobState::Done { finished, outcome } if finished.elapsed() < self.ttl => {
                Some(outcome.clone())
            }
            _ => None,
        }
    }

    /// Poll until `key` has an outcome or `timeout` passes.
    pub async fn wait(&self, key: &str, poll: Duration, timeout: Duration) -> Option<JobOutcome<T>> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(outcome) = self.result(key) {
                return Some(outcome);
            }
            if Instant::now() >= deadline {
                return None;
            }
            tokio::time::sleep(poll).await;
        }
    }

    /// Drop entries older than the TTL.
    pub fn purge_expired(&self) {
        self.jobs.retain(|_, state| state.stamped().elapsed() < self.ttl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    const POLL: Duration = Duration::from_millis(10);
    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test(start_paused = true)]
    async fn second_request_does_not_start_second_job() {
        let store: Arc<JobStore<u32>> = JobStore::new(Duration::from_secs(3600));
        let runs = Arc::new(AtomicUsize::new(0));
        let (gate_tx, gate_rx) = oneshot::channel::<()>();

        let counter = Arc::clone(&runs);
        let first = store.ensure_job("week-3", move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            let _ = gate_rx.await;
            Ok::<_, String>(42)
        });
        let counter = Arc::clone(&runs);
        let second = store.ensure_job("week-3", move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, String>(7)
        });

        assert_eq!(first, JobStatus::Pending);
        assert_eq!(second, JobStatus::Pending);
        assert_eq!(store.result("week-3"), None);

        gate_tx.send(()).unwrap();
        assert_eq!(store.wait("week-3", POLL, TIMEOUT).await, Some(Ok(42)));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(store.status("week-3"), Some(JobStatus::Ready));

        let again = store.ensure_job("week-3", || async { Ok::<_, String>(0) });
        assert_eq!(again, JobStatus::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_stored_as_outcomes() {
        let store: Arc<JobStore<u32>> = JobStore::new(Duration::from_secs(3600));
        store.ensure_job("bad", || async { Err::<u32, _>("provider unreachable") });

        let outcome = store.wait("bad", POLL, TIMEOUT).await;
        assert_eq!(outcome, Some(Err("provider unreachable".to_string())));
    }

    #[tokio::test(start_paused = true)]
    async fn expired_results_are_recomputed() {
        let store: Arc<JobStore<u32>> = JobStore::new(Duration::from_secs(60));
        store.ensure_job("k", || async { Ok::<_, String>(1) });
        assert_eq!(store.wait("k", POLL, TIMEOUT).await, Some(Ok(1)));

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(store.result("k"), None);
        assert_eq!(store.status("k"), None);

        let status = store.ensure_job("k", || async { Ok::<_, String>(2) });
        assert_eq!(status, JobStatus::Pending);
        assert_eq!(store.wait("k", POLL, TIMEOUT).await, Some(Ok(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn purge_drops_only_expired_entries() {
        let store: Arc<JobStore<u32>> = JobStore::new(Duration::from_secs(60));
        store.ensure_job("old", || async { Ok::<_, String>(1) });
        store.wait("old", POLL, TIMEOUT).await;
        tokio::time::advance(Duration::from_secs(61)).await;
        store.ensure_job("new", || async { Ok::<_, String>(2) });
        store.wait("new", POLL, TIMEOUT).await;

        store.purge_expired();
        assert_eq!(store.status("old"), None);
        assert_eq!(store.status("new"), Some(JobStatus::Ready));
    }
}
