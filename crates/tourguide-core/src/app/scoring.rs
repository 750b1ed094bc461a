//! ScoringBatch - 1 回の calculate_rewards が投げた採点タスクの束
//!
//! 採点は投げっぱなしで進みます。batch を drop しても中断されません
//! （JoinHandle の drop は detach）。待ちたいテストや呼び出し側だけ `wait()` します。

use tokio::task::JoinHandle;

use crate::domain::TourGuideError;

/// One scoring task: attraction name plus the handle of the oracle call.
#[derive(Debug)]
struct PendingScore {
    attraction_name: String,
    handle: JoinHandle<Result<i32, TourGuideError>>,
}

/// Completion handle for the scoring dispatched by one engine call.
#[derive(Debug, Default)]
pub struct ScoringBatch {
    pending: Vec<PendingScore>,
}

/// Outcome of a batch, one line per attraction.
#[derive(Debug, Default)]
pub struct ScoringReport {
    pub scored: Vec<(String, i32)>,
    pub failed: Vec<(String, TourGuideError)>,
}

impl ScoringReport {
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total_points(&self) -> i64 {
        self.scored.iter().map(|(_, p)| i64::from(*p)).sum()
    }
}

impl ScoringBatch {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn push(
        &mut self,
        attraction_name: String,
        handle: JoinHandle<Result<i32, TourGuideError>>,
    ) {
        self.pending.push(PendingScore {
            attraction_name,
            handle,
        });
    }

    /// Attraction names scored by this batch, in dispatch order.
    pub fn attraction_names(&self) -> Vec<&str> {
        self.pending
            .iter()
            .map(|p| p.attraction_name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Wait for every task of the batch. Failures are collected, not raised.
    pub async fn wait(self) -> ScoringReport {
        let mut report = ScoringReport::default();
        for PendingScore {
            attraction_name,
            handle,
        } in self.pending
        {
            match handle.await.map_err(TourGuideError::from).and_then(|r| r) {
                Ok(points) => report.scored.push((attraction_name, points)),
                Err(err) => report.failed.push((attraction_name, err)),
            }
        }
        report
    }
}
