// Contracts change feed
//
// The contracting database is the source of truth for which contracts
// still need reconciliation: every cycle re-queries the current
// pending-termination set. A successful pass flips the remote status
// and the row drops out of the next result; a failed pass leaves it to
// resurface. No local progress state is kept.

use std::collections::VecDeque;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::models::ContractStatus;

/// Ordered source of contract identifiers needing reconciliation.
/// `refresh` returns the size of the new batch; exactly that many
/// `next` calls yield identifiers before the following `refresh`.
#[async_trait]
pub trait ChangeQueue: Send + Sync {
    async fn refresh(&mut self) -> AppResult<usize>;

    fn next(&mut self) -> Option<String>;
}

/// Postgres-backed change feed over the contracting database.
pub struct ContractsDbWatcher {
    pool: PgPool,
    batch_limit: i64,
    pending: VecDeque<String>,
}

impl ContractsDbWatcher {
    pub fn new(pool: PgPool, batch_limit: i64) -> Self {
        Self {
            pool,
            batch_limit,
            pending: VecDeque::new(),
        }
    }
}

#[async_trait]
impl ChangeQueue for ContractsDbWatcher {
    async fn refresh(&mut self) -> AppResult<usize> {
        let ids: Vec<String> = sqlx::query_scalar(
            "SELECT id FROM contracts \
             WHERE status = $1 \
             ORDER BY updated_at ASC \
             LIMIT $2",
        )
        .bind(ContractStatus::PendingTerminated.as_str())
        .bind(self.batch_limit)
        .fetch_all(&self.pool)
        .await?;

        self.pending = ids.into();
        Ok(self.pending.len())
    }

    fn next(&mut self) -> Option<String> {
        self.pending.pop_front()
    }
}
