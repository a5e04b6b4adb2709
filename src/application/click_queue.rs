//! Off-request-path click recording.
//!
//! A resolver hands each visit to a bounded channel with
//! [`tokio::sync::mpsc::Sender::try_send`] and returns immediately; a worker
//! task drains the channel into a [`ClickRecorder`]. The caller owns the task:
//! nothing in this crate spawns it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::application::services::ClickRecorder;
use crate::domain::repositories::ClickRepository;

/// A visit waiting to be recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingClick {
    pub link_id: i64,
    pub client_address: String,
    pub user_agent: String,
    pub occurred_at: DateTime<Utc>,
}

impl PendingClick {
    /// Captures a visit at the current instant.
    pub fn new(
        link_id: i64,
        client_address: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            link_id,
            client_address: client_address.into(),
            user_agent: user_agent.into(),
            occurred_at: Utc::now(),
        }
    }
}

/// Records every queued click until all senders are dropped.
///
/// A failed write is logged and the click is dropped; there is no retry.
/// Returns the number of clicks recorded.
pub async fn run_click_worker<C: ClickRepository>(
    mut rx: mpsc::Receiver<PendingClick>,
    recorder: Arc<ClickRecorder<C>>,
) -> u64 {
    let mut recorded = 0;

    while let Some(click) = rx.recv().await {
        match recorder
            .record(
                click.link_id,
                &click.client_address,
                &click.user_agent,
                click.occurred_at,
            )
            .await
        {
            Ok(event) => {
                recorded += 1;
                debug!(link_id = event.link_id, click_id = event.id, "Queued click stored");
            }
            Err(e) => {
                warn!(link_id = click.link_id, error = %e, "Dropping click after failed write");
            }
        }
    }

    info!(recorded, "Click queue closed, worker exiting");
    recorded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geo::NullGeoLocator;
    use crate::domain::repositories::MockClickRepository;
    use crate::error::AppError;

    #[tokio::test]
    async fn test_worker_records_until_channel_closes() {
        let mut mock_repo = MockClickRepository::new();
        mock_repo
            .expect_record()
            .times(3)
            .returning(|new_click| Ok(new_click.into_event(1)));

        let recorder = Arc::new(ClickRecorder::new(Arc::new(mock_repo), Arc::new(NullGeoLocator)));
        let (tx, rx) = mpsc::channel(8);

        for link_id in 1..=3 {
            tx.send(PendingClick::new(link_id, "10.0.0.1", "Mozilla/5.0 (iPhone)"))
                .await
                .unwrap();
        }
        drop(tx);

        let recorded = run_click_worker(rx, recorder).await;
        assert_eq!(recorded, 3);
    }

    #[tokio::test]
    async fn test_worker_skips_failed_writes() {
        let mut mock_repo = MockClickRepository::new();
        mock_repo.expect_record().times(2).returning(|new_click| {
            if new_click.link_id == 1 {
                Err(AppError::persistence("connection reset"))
            } else {
                Ok(new_click.into_event(2))
            }
        });

        let recorder = Arc::new(ClickRecorder::new(Arc::new(mock_repo), Arc::new(NullGeoLocator)));
        let (tx, rx) = mpsc::channel(8);

        tx.send(PendingClick::new(1, "10.0.0.1", "curl/8.0")).await.unwrap();
        tx.send(PendingClick::new(2, "10.0.0.1", "curl/8.0")).await.unwrap();
        drop(tx);

        assert_eq!(run_click_worker(rx, recorder).await, 1);
    }
}
