//! TaskGovernor - 同時実行数の上限（N permits）
//!
//! location fetch / oracle 呼び出し / nearby 計算はすべてここを通ります。
//! permit は RAII で、成功・失敗・panic のどの経路でも drop 時に返却されます。

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;

use crate::domain::TourGuideError;

/// Bounded-concurrency limiter shared by every subsystem of the process.
///
/// Cloning shares the same permits.
#[derive(Debug, Clone)]
pub struct TaskGovernor {
    semaphore: Arc<Semaphore>,
    capacity: usize,
    call_timeout: Option<Duration>,
}

/// A held permit. Returned to the governor when dropped.
#[derive(Debug)]
pub struct GovernorPermit {
    _permit: OwnedSemaphorePermit,
}

impl GovernorPermit {
    /// Give the permit back explicitly.
    pub fn release(self) {}
}

impl TaskGovernor {
    pub fn new(capacity: usize) -> Self {
        Self::with_timeout(capacity, None)
    }

    pub fn with_timeout(capacity: usize, call_timeout: Option<Duration>) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
            call_timeout,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Operations currently admitted.
    pub fn in_flight(&self) -> usize {
        self.capacity.saturating_sub(self.available_permits())
    }

    /// Wait for a permit.
    ///
    /// Fails with `Cancelled` once the governor is closed; no permit is held
    /// in that case. Dropping the returned future while waiting is also safe.
    pub async fn acquire(&self) -> Result<GovernorPermit, TourGuideError> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| TourGuideError::Cancelled)?;
        Ok(GovernorPermit { _permit: permit })
    }

    /// Abort every current and future `acquire`. Held permits stay valid
    /// until dropped.
    pub fn close(&self) {
        self.semaphore.close();
    }

    pub fn is_closed(&self) -> bool {
        self.semaphore.is_closed()
    }

    /// Run one unit of work under a permit, bounded by the call timeout.
    ///
    /// The permit is dropped when this returns, whatever the outcome.
    pub async fn run<F, T>(&self, work: F) -> Result<T, TourGuideError>
    where
        F: Future<Output = Result<T, TourGuideError>>,
    {
        let _permit = self.acquire().await?;
        match self.call_timeout {
            Some(after) => tokio::time::timeout(after, work)
                .await
                .map_err(|_| TourGuideError::Timeout { after })?,
            None => work.await,
        }
    }

    /// Spawn `work` onto the runtime; the task waits for its own permit so
    /// the caller never blocks.
    pub fn spawn<F, T>(&self, work: F) -> JoinHandle<Result<T, TourGuideError>>
    where
        F: Future<Output = Result<T, TourGuideError>> + Send + 'static,
        T: Send + 'static,
    {
        let governor = self.clone();
        tokio::spawn(async move { governor.run(work).await })
    }
}

impl Default for TaskGovernor {
    fn default() -> Self {
        Self::new(crate::app::config::DEFAULT_PERMITS)
    }
}
