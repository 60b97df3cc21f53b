//! Order Status Scheduler
//!
//! Periodic background worker advancing paid orders through the
//! delivery pipeline (PAID -> IN_TRANSIT -> DELIVERED) without user
//! action. Runs as a single tokio task next to the request path and
//! stops on the shared shutdown token.
//!
//! Work is paged: each page commits as one transaction, a conflicting
//! row inside a page is skipped (a user cancelled it mid-flight), and a
//! failed page only aborts the current tick. Advancement is monotonic
//! and transition checks tolerate already-advanced rows, so the next
//! tick safely retries.

use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::OrderRepository;
use crate::utils::{AppError, AppResult};
use shared::util::now_millis;
use sqlx::SqlitePool;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Outcome of one scheduler tick
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickStats {
    pub pages: usize,
    pub advanced: usize,
    pub skipped: usize,
}

pub struct StatusScheduler {
    pool: SqlitePool,
    orders: OrderRepository,
    interval: Duration,
    page_size: u32,
    min_stage_age: Duration,
    shutdown: CancellationToken,
}

impl StatusScheduler {
    pub fn new(db: &DbService, config: &Config, shutdown: CancellationToken) -> Self {
        Self {
            pool: db.pool.clone(),
            orders: OrderRepository::new(db.pool.clone()),
            interval: Duration::from_secs(config.scheduler_interval_secs),
            page_size: config.scheduler_page_size,
            min_stage_age: Duration::from_secs(config.min_stage_age_secs),
            shutdown,
        }
    }

    /// Main loop: tick on a fixed interval until shutdown
    pub async fn run(self) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            page_size = self.page_size,
            "Status scheduler started"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Status scheduler received shutdown signal");
                    break;
                }
            }

            match self.tick().await {
                Ok(stats) if stats.advanced > 0 || stats.skipped > 0 => {
                    tracing::info!(
                        advanced = stats.advanced,
                        skipped = stats.skipped,
                        pages = stats.pages,
                        "Delivery advancement tick finished"
                    );
                }
                Ok(_) => {}
                // One bad tick never kills the worker; the next tick retries
                Err(e) => {
                    tracing::error!(error = %e, "Delivery advancement tick failed");
                }
            }
        }

        tracing::info!("Status scheduler stopped");
    }

    /// One advancement pass over all eligible orders, in bounded pages.
    ///
    /// Eligibility is age-gated: an order must have sat in its current
    /// stage for at least `min_stage_age`, so a tick that just advanced
    /// a row will not advance it again on an immediate re-run.
    pub async fn tick(&self) -> AppResult<TickStats> {
        let cutoff = now_millis() - self.min_stage_age.as_millis() as i64;
        let mut stats = TickStats::default();
        let mut last_seen = 0_i64;

        loop {
            let page = self
                .orders
                .delivery_page(last_seen, cutoff, self.page_size)
                .await?;
            let Some(last) = page.last() else {
                break;
            };
            last_seen = last.order_id;
            stats.pages += 1;

            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            for order in &page {
                let Some(next) = order.status.next_delivery_stage() else {
                    continue;
                };
                if OrderRepository::advance_status_tx(&mut *tx, order.order_id, order.version, next)
                    .await?
                {
                    stats.advanced += 1;
                } else {
                    // Lost a race on this row (user cancel, concurrent
                    // write). Skip it, never abort the page for it.
                    stats.skipped += 1;
                    tracing::warn!(
                        order_id = order.order_id,
                        "Skipping concurrently modified order in scheduler page"
                    );
                }
            }
            tx.commit()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        Ok(stats)
    }
}
