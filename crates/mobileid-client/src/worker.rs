use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::client::MobileIdClient;
use crate::error::AuthError;
use crate::model::Person;
use crate::session::PollOutcome;

/// Single delivered result of a submitted authentication job.
pub type JobResult = Result<Person, AuthError>;

/// Validated, immutable worker pool configuration.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPoolConfig {
    concurrency: usize,
    queue_size: usize,
}

impl WorkerPoolConfig {
    pub fn new(concurrency: usize, queue_size: usize) -> Result<Self, AuthError> {
        if concurrency == 0 {
            return Err(AuthError::InvalidWorkerConfig(
                "concurrency must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            concurrency,
            queue_size,
        })
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn queue_size(&self) -> usize {
        self.queue_size
    }
}

struct Job {
    session_id: String,
    token: CancellationToken,
    reply: oneshot::Sender<JobResult>,
}

struct PoolState {
    tx: Option<mpsc::Sender<Job>>,
    handles: Vec<JoinHandle<()>>,
}

/// Bounded pool of polling workers draining one shared job queue.
///
/// At most `concurrency` session fetches are in flight at any time; each
/// job's one-shot channel receives exactly one message, a person record or
/// an error (including cancellation). One job's failure never stops the
/// pool.
pub struct WorkerPool {
    client: Arc<dyn MobileIdClient>,
    config: WorkerPoolConfig,
    state: Mutex<PoolState>,
}

impl WorkerPool {
    pub fn new(client: Arc<dyn MobileIdClient>, config: WorkerPoolConfig) -> Self {
        Self {
            client,
            config,
            state: Mutex::new(PoolState {
                tx: None,
                handles: Vec::new(),
            }),
        }
    }

    /// Launches the workers. A second call on a running pool is a no-op.
    ///
    /// The token cancels all waiting and polling as soon as it fires;
    /// enqueued jobs are then answered with a cancellation error.
    pub async fn start(&self, token: CancellationToken) {
        let mut state = self.state.lock().await;
        if state.tx.is_some() {
            return;
        }

        // tokio's bounded channel rejects zero capacity; a queue size of
        // zero degrades to a single-slot queue.
        let (tx, rx) = mpsc::channel::<Job>(self.config.queue_size.max(1));
        let rx = Arc::new(Mutex::new(rx));

        let mut handles = Vec::with_capacity(self.config.concurrency);
        for worker_id in 0..self.config.concurrency {
            let client = Arc::clone(&self.client);
            let rx = Arc::clone(&rx);
            let token = token.clone();
            handles.push(tokio::spawn(async move {
                worker_loop(worker_id, client, rx, token).await;
            }));
        }

        debug!(
            concurrency = self.config.concurrency,
            queue_size = self.config.queue_size,
            "worker pool started"
        );
        state.tx = Some(tx);
        state.handles = handles;
    }

    /// Submits a session for polling and returns the job's result channel.
    ///
    /// Blocks while the queue is full; if the token fires first the job is
    /// never enqueued and the channel receives a cancellation error.
    pub async fn process(
        &self,
        token: &CancellationToken,
        session_id: impl Into<String>,
    ) -> oneshot::Receiver<JobResult> {
        let session_id = session_id.into();
        let (reply, receiver) = oneshot::channel();

        let tx = { self.state.lock().await.tx.clone() };
        let Some(tx) = tx else {
            let _ = reply.send(Err(AuthError::InvalidWorkerConfig(
                "worker pool is not running".to_string(),
            )));
            return receiver;
        };

        tokio::select! {
            _ = token.cancelled() => {
                let _ = reply.send(Err(AuthError::Cancelled));
            }
            permit = tx.reserve() => match permit {
                Ok(permit) => {
                    permit.send(Job {
                        session_id,
                        token: token.clone(),
                        reply,
                    });
                }
                Err(_) => {
                    let _ = reply.send(Err(AuthError::Cancelled));
                }
            },
        }
        receiver
    }

    /// Closes the queue and waits for the workers to finish.
    ///
    /// In-flight and already-enqueued jobs still complete unless the start
    /// token has fired. Idempotent.
    pub async fn stop(&self) {
        let handles = {
            let mut state = self.state.lock().await;
            state.tx = None;
            std::mem::take(&mut state.handles)
        };
        for handle in handles {
            if handle.await.is_err() {
                warn!("worker task panicked during shutdown");
            }
        }
        debug!("worker pool stopped");
    }
}

async fn worker_loop(
    worker_id: usize,
    client: Arc<dyn MobileIdClient>,
    rx: Arc<Mutex<mpsc::Receiver<Job>>>,
    token: CancellationToken,
) {
    loop {
        // Pop is mutually exclusive; the lock is released before polling so
        // the other workers can pick up jobs concurrently.
        let job = {
            let mut rx = rx.lock().await;
            tokio::select! {
                _ = token.cancelled() => None,
                job = rx.recv() => job,
            }
        };
        let Some(job) = job else { break };

        let result = run_job(client.as_ref(), &job, &token).await;
        if job.reply.send(result).is_err() {
            debug!(worker_id, "job result dropped by caller");
        }
    }

    // On cancellation, answer whatever is still queued instead of leaving
    // the callers waiting forever.
    if token.is_cancelled() {
        loop {
            let job = { rx.lock().await.try_recv() };
            match job {
                Ok(job) => {
                    let _ = job.reply.send(Err(AuthError::Cancelled));
                }
                Err(_) => break,
            }
        }
    }
    debug!(worker_id, "worker exited");
}

/// Polls one session until a terminal outcome or cancellation.
///
/// The provider's long-poll wait hint paces the loop; only `InProgress`
/// continues it. Any fetch error is the job's terminal result.
async fn run_job(
    client: &dyn MobileIdClient,
    job: &Job,
    pool_token: &CancellationToken,
) -> JobResult {
    loop {
        let fetched = tokio::select! {
            _ = job.token.cancelled() => return Err(AuthError::Cancelled),
            _ = pool_token.cancelled() => return Err(AuthError::Cancelled),
            fetched = client.fetch_session(&job.session_id) => fetched,
        };
        match fetched {
            Ok(PollOutcome::InProgress) => continue,
            Ok(PollOutcome::Success(person)) => return Ok(person),
            Ok(PollOutcome::Rejected(reason)) => {
                return Err(AuthError::AuthenticationFailed(reason))
            }
            Err(err) => return Err(err),
        }
    }
}
