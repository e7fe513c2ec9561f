//! Story Expiry Sweeper
//!
//! Deletes story rows older than the visibility window and unlinks their
//! uploaded files. This is the second, independent half of the expiry
//! design: readers already filter on recency, so a story the sweeper has
//! not reached yet is still invisible once it ages out.

use crate::db::story_repo;
use crate::services::media::MediaStorage;
use crate::services::stories::recency_cutoff;
use chrono::Utc;
use sqlx::PgPool;
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Sweep interval; deliberately not synchronized with the read filter
const CHECK_INTERVAL: Duration = Duration::from_secs(60 * 60);

pub async fn start_story_sweeper(db: PgPool, storage: MediaStorage) {
    tracing::info!(
        "Starting story sweeper background job (check_interval={}m)",
        CHECK_INTERVAL.as_secs() / 60
    );

    loop {
        sleep(CHECK_INTERVAL).await;

        let cycle_start = Instant::now();
        match sweep_expired_stories(&db, &storage).await {
            Ok(removed) => {
                tracing::info!(
                    removed,
                    duration_ms = cycle_start.elapsed().as_millis(),
                    "Story sweep completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    duration_ms = cycle_start.elapsed().as_millis(),
                    "Story sweep failed"
                );
            }
        }
    }
}

/// Remove expired stories and their files; returns rows removed.
///
/// Files are unlinked before rows are deleted; a row that survives a
/// crash keeps its file eligible for the next cycle.
async fn sweep_expired_stories(db: &PgPool, storage: &MediaStorage) -> anyhow::Result<u64> {
    let cutoff = recency_cutoff(Utc::now());

    let expired = story_repo::list_expired(db, cutoff).await?;
    if expired.is_empty() {
        return Ok(0);
    }

    for story in &expired {
        storage.remove_by_url(&story.url).await;
    }

    let removed = story_repo::delete_expired(db, cutoff).await?;

    Ok(removed)
}
