//! In-process background job worker
//!
//! Jobs are queued on an `mpsc` channel and run one at a time by a single
//! tokio task. Records live in memory; every status change is broadcast
//! for the `/jobs/events` SSE stream. Finished records are evicted oldest
//! first once they outnumber the retention cap or outlive its TTL.

use alchemy_common::sse::SseEvent;
use alchemy_common::time::now;
use alchemy_common::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::SqlitePool;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::analysis;

const QUEUE_CAPACITY: usize = 256;
const EVENT_CAPACITY: usize = 100;
const MAX_FINISHED_JOBS: usize = 1000;
const FINISHED_JOB_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// How many finished jobs are kept, and for how long
#[derive(Debug, Clone, Copy)]
pub struct Retention {
    pub max_finished: usize,
    pub ttl: Duration,
}

impl Default for Retention {
    fn default() -> Self {
        Self {
            max_finished: MAX_FINISHED_JOBS,
            ttl: FINISHED_JOB_TTL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobTask {
    ProcessAssessment,
    AnalyzeTeam,
    GenerateRecommendations,
}

impl JobTask {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobTask::ProcessAssessment => "process_assessment",
            JobTask::AnalyzeTeam => "analyze_team",
            JobTask::GenerateRecommendations => "generate_recommendations",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    pub job_id: Uuid,
    pub task: JobTask,
    pub target_id: i64,
    pub status: JobStatus,
    pub result: Option<Value>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl SseEvent for JobRecord {
    fn event_name(&self) -> &'static str {
        "JobStatusChanged"
    }
}

#[derive(Default)]
struct JobStore {
    records: HashMap<Uuid, JobRecord>,
    /// Finished job ids, oldest first
    finished: VecDeque<Uuid>,
}

impl JobStore {
    fn mark_finished(&mut self, job_id: Uuid, retention: Retention) {
        self.finished.push_back(job_id);

        let current = now();
        while let Some(oldest) = self.finished.front().copied() {
            let expired = match self.records.get(&oldest) {
                Some(record) => record
                    .finished_at
                    .and_then(|at| (current - at).to_std().ok())
                    .is_some_and(|age| age >= retention.ttl),
                None => true,
            };
            if self.finished.len() <= retention.max_finished && !expired {
                break;
            }
            self.finished.pop_front();
            self.records.remove(&oldest);
            debug!(job_id = %oldest, "Evicted finished job record");
        }
    }
}

type Records = Arc<RwLock<JobStore>>;

/// Handle to the job queue; cheap to clone
#[derive(Clone)]
pub struct JobQueue {
    sender: mpsc::Sender<Uuid>,
    records: Records,
    events: broadcast::Sender<JobRecord>,
    worker: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl JobQueue {
    /// Spawn the worker task; requires a running tokio runtime
    pub fn start(db: SqlitePool, max_recommendations: usize) -> Self {
        Self::with_retention(db, max_recommendations, Retention::default())
    }

    pub fn with_retention(
        db: SqlitePool,
        max_recommendations: usize,
        retention: Retention,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(QUEUE_CAPACITY);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let records: Records = Arc::new(RwLock::new(JobStore::default()));

        let worker = tokio::spawn(run_worker(
            receiver,
            db,
            records.clone(),
            events.clone(),
            max_recommendations,
            retention,
        ));

        Self {
            sender,
            records,
            events,
            worker: Arc::new(Mutex::new(Some(worker))),
        }
    }

    /// Record and enqueue a job
    pub async fn submit(&self, task: JobTask, target_id: i64) -> Result<JobRecord> {
        let record = JobRecord {
            job_id: Uuid::new_v4(),
            task,
            target_id,
            status: JobStatus::Queued,
            result: None,
            error: None,
            created_at: now(),
            started_at: None,
            finished_at: None,
        };

        self.records
            .write()
            .await
            .records
            .insert(record.job_id, record.clone());
        let _ = self.events.send(record.clone());
        if self.sender.send(record.job_id).await.is_err() {
            self.records.write().await.records.remove(&record.job_id);
            return Err(Error::Internal("Job worker is not running".to_string()));
        }

        info!(job_id = %record.job_id, task = task.as_str(), target_id, "Job queued");
        Ok(record)
    }

    pub async fn get(&self, job_id: Uuid) -> Option<JobRecord> {
        self.records.read().await.records.get(&job_id).cloned()
    }

    /// Number of job records currently held, queued or finished
    pub async fn held_records(&self) -> usize {
        self.records.read().await.records.len()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<JobRecord> {
        self.events.subscribe()
    }

    /// False once the worker task has exited
    pub fn is_running(&self) -> bool {
        !self.sender.is_closed()
    }

    /// Stop accepting jobs and wait for queued ones to finish
    ///
    /// The worker drains once every clone of the queue is dropped; call
    /// this after the server (and its state) has shut down.
    pub async fn shutdown(self, grace: Duration) {
        let JobQueue { sender, worker, .. } = self;
        drop(sender);

        let handle = worker.lock().await.take();
        if let Some(handle) = handle {
            match tokio::time::timeout(grace, handle).await {
                Ok(Ok(())) => info!("Job worker drained"),
                Ok(Err(e)) => error!("Job worker panicked: {}", e),
                Err(_) => warn!(
                    "Job worker still busy after {:?}; abandoning queue",
                    grace
                ),
            }
        }
    }
}

/// Apply `change` to a held record and broadcast the result
///
/// With `retention` set the job is marked finished under the same lock, so
/// a reader never sees more finished records than the cap allows.
async fn update<F>(
    records: &Records,
    events: &broadcast::Sender<JobRecord>,
    job_id: Uuid,
    retention: Option<Retention>,
    change: F,
) -> Option<JobRecord>
where
    F: FnOnce(&mut JobRecord),
{
    let updated = {
        let mut guard = records.write().await;
        let record = guard.records.get_mut(&job_id)?;
        change(record);
        let updated = record.clone();
        if let Some(retention) = retention {
            guard.mark_finished(job_id, retention);
        }
        updated
    };
    let _ = events.send(updated.clone());
    Some(updated)
}

async fn execute(
    db: &SqlitePool,
    task: JobTask,
    target_id: i64,
    max_recommendations: usize,
) -> Result<Value> {
    match task {
        JobTask::ProcessAssessment => analysis::calculate_assessment(db, target_id).await,
        JobTask::AnalyzeTeam => {
            let run = analysis::analyze_stored_team(db, target_id).await?;
            Ok(serde_json::to_value(run)?)
        }
        JobTask::GenerateRecommendations => {
            let report =
                analysis::team_recommendations(db, target_id, max_recommendations).await?;
            Ok(serde_json::to_value(report)?)
        }
    }
}

async fn run_worker(
    mut receiver: mpsc::Receiver<Uuid>,
    db: SqlitePool,
    records: Records,
    events: broadcast::Sender<JobRecord>,
    max_recommendations: usize,
    retention: Retention,
) {
    info!("Job worker started");

    while let Some(job_id) = receiver.recv().await {
        let Some(record) = update(&records, &events, job_id, None, |r| {
            r.status = JobStatus::Running;
            r.started_at = Some(now());
        })
        .await
        else {
            warn!(%job_id, "Dequeued unknown job");
            continue;
        };

        debug!(%job_id, task = record.task.as_str(), "Job running");
        let outcome = execute(&db, record.task, record.target_id, max_recommendations).await;

        let finished = update(&records, &events, job_id, Some(retention), |r| {
            r.finished_at = Some(now());
            match outcome {
                Ok(value) => {
                    r.status = JobStatus::Completed;
                    r.result = Some(value);
                }
                Err(e) => {
                    r.status = JobStatus::Failed;
                    r.error = Some(e.to_string());
                }
            }
        })
        .await;
        if let Some(r) = finished {
            match r.status {
                JobStatus::Failed => warn!(%job_id, error = ?r.error, "Job failed"),
                _ => info!(%job_id, task = r.task.as_str(), "Job completed"),
            }
        }
    }

    info!("Job worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use alchemy_common::db::init_memory_database;

    async fn wait_for_finish(queue: &JobQueue, job_id: Uuid) -> JobRecord {
        for _ in 0..100 {
            if let Some(record) = queue.get(job_id).await {
                if matches!(record.status, JobStatus::Completed | JobStatus::Failed) {
                    return record;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("job {} did not finish", job_id);
    }

    #[tokio::test]
    async fn test_missing_team_job_fails() {
        let pool = init_memory_database().await.unwrap();
        let queue = JobQueue::start(pool, 10);
        let mut events = queue.subscribe();

        let queued = queue.submit(JobTask::AnalyzeTeam, 42).await.unwrap();
        assert_eq!(queued.status, JobStatus::Queued);

        let finished = wait_for_finish(&queue, queued.job_id).await;
        assert_eq!(finished.status, JobStatus::Failed);
        assert!(finished.error.unwrap().contains("Team with id 42 not found"));

        let first = events.recv().await.unwrap();
        assert_eq!(first.job_id, queued.job_id);
    }

    #[tokio::test]
    async fn test_shutdown_drains_worker() {
        let pool = init_memory_database().await.unwrap();
        let queue = JobQueue::start(pool, 10);
        assert!(queue.is_running());
        queue.shutdown(Duration::from_secs(1)).await;
    }

    #[tokio::test]
    async fn test_finished_records_are_capped() {
        let pool = init_memory_database().await.unwrap();
        let retention = Retention {
            max_finished: 5,
            ttl: Duration::from_secs(3600),
        };
        let queue = JobQueue::with_retention(pool, 10, retention);

        let mut ids = Vec::new();
        for team_id in 0..20 {
            ids.push(queue.submit(JobTask::AnalyzeTeam, team_id).await.unwrap().job_id);
        }
        let last = wait_for_finish(&queue, ids[19]).await;
        assert_eq!(last.status, JobStatus::Failed);

        assert_eq!(queue.held_records().await, 5);
        assert!(queue.get(ids[0]).await.is_none());
        assert!(queue.get(ids[14]).await.is_none());
        assert!(queue.get(ids[15]).await.is_some());
    }

    #[tokio::test]
    async fn test_expired_records_are_evicted() {
        let pool = init_memory_database().await.unwrap();
        let retention = Retention {
            max_finished: 100,
            ttl: Duration::ZERO,
        };
        let queue = JobQueue::with_retention(pool, 10, retention);

        let first = queue.submit(JobTask::AnalyzeTeam, 1).await.unwrap();
        for _ in 0..100 {
            if queue.get(first.job_id).await.is_none() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(queue.get(first.job_id).await.is_none());
    }

    #[test]
    fn test_task_wire_names() {
        let task: JobTask = serde_json::from_str("\"generate_recommendations\"").unwrap();
        assert_eq!(task, JobTask::GenerateRecommendations);
        assert_eq!(JobTask::ProcessAssessment.as_str(), "process_assessment");
    }
}
