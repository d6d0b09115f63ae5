use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::clients::ContractingApi;
use crate::error::{AppError, AppResult};
use crate::models::ContractPatch;

use super::{ChainEvent, ChainStep, EventKind};

/// Admission gate: decides whether a queued identifier needs any
/// reconciliation at all.
pub struct ContractChecker {
    client: Arc<dyn ContractingApi>,
}

impl ContractChecker {
    pub fn new(client: Arc<dyn ContractingApi>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChainStep for ContractChecker {
    fn name(&self) -> &'static str {
        "contract_checker"
    }

    fn accepts(&self, kind: EventKind) -> bool {
        kind == EventKind::ContractQueued
    }

    async fn handle(&self, event: ChainEvent) -> AppResult<Option<ChainEvent>> {
        let context = event.into_context();
        let next = match self.client.get_contract(context.contract_id()).await? {
            None => ChainEvent::new(EventKind::ContractNotFound, context),
            Some(contract) if contract.status.is_terminated() => ChainEvent::new(
                EventKind::ContractAlreadyTerminated,
                context.with_contract(contract),
            ),
            Some(contract) => {
                ChainEvent::new(EventKind::LotCheckDue, context.with_contract(contract))
            }
        };
        Ok(Some(next))
    }
}

/// Applies the terminal status patch on the contracting side. Final
/// mutation of a successful pass.
pub struct ContractPatcher {
    client: Arc<dyn ContractingApi>,
}

impl ContractPatcher {
    pub fn new(client: Arc<dyn ContractingApi>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChainStep for ContractPatcher {
    fn name(&self) -> &'static str {
        "contract_patcher"
    }

    fn accepts(&self, kind: EventKind) -> bool {
        kind == EventKind::ContractPatchDue
    }

    async fn handle(&self, event: ChainEvent) -> AppResult<Option<ChainEvent>> {
        let context = event.into_context();
        let contract = context.contract().ok_or_else(|| {
            AppError::Internal("contract patch due without a contract snapshot".to_string())
        })?;
        let patch = ContractPatch::derived_from(contract);
        let updated = self
            .client
            .patch_contract(context.contract_id(), &patch)
            .await?;
        info!("✓ Contract {} patched to {}", updated.id, updated.status);
        Ok(None)
    }
}

/// Records a queued identifier the contracting system no longer serves.
pub struct ContractNotFoundHandler;

#[async_trait]
impl ChainStep for ContractNotFoundHandler {
    fn name(&self) -> &'static str {
        "contract_not_found_handler"
    }

    fn accepts(&self, kind: EventKind) -> bool {
        kind == EventKind::ContractNotFound
    }

    async fn handle(&self, event: ChainEvent) -> AppResult<Option<ChainEvent>> {
        warn!(
            "⚠️ Contract {} not found in the contracting system; nothing to reconcile",
            event.context().contract_id()
        );
        Ok(None)
    }
}

/// Records a contract that already reached its terminal state.
pub struct ContractAlreadyTerminatedHandler;

#[async_trait]
impl ChainStep for ContractAlreadyTerminatedHandler {
    fn name(&self) -> &'static str {
        "contract_already_terminated_handler"
    }

    fn accepts(&self, kind: EventKind) -> bool {
        kind == EventKind::ContractAlreadyTerminated
    }

    async fn handle(&self, event: ChainEvent) -> AppResult<Option<ChainEvent>> {
        info!(
            "Contract {} is already terminated; skipping",
            event.context().contract_id()
        );
        Ok(None)
    }
}
