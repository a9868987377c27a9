use std::{sync::Arc, time::Duration};

use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::repo::RefreshTokenRepo;

/// Periodically deletes refresh tokens past their expiry.
pub fn spawn(repo: Arc<dyn RefreshTokenRepo>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            sweep_once(repo.as_ref()).await;
        }
    })
}

pub async fn sweep_once(repo: &dyn RefreshTokenRepo) -> u64 {
    match repo.delete_expired(OffsetDateTime::now_utc()).await {
        Ok(0) => {
            debug!("no expired refresh tokens");
            0
        }
        Ok(n) => {
            info!(deleted = n, "expired refresh tokens removed");
            n
        }
        Err(e) => {
            error!(error = ?e, "refresh token sweep failed");
            0
        }
    }
}
