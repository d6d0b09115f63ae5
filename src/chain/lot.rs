use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::clients::LotsApi;
use crate::error::{AppError, AppResult};
use crate::models::LotContractPatch;

use super::{ChainEvent, ChainStep, EventKind};

/// Checks the lot system's reference for a contract under
/// reconciliation.
pub struct LotContractChecker {
    client: Arc<dyn LotsApi>,
}

impl LotContractChecker {
    pub fn new(client: Arc<dyn LotsApi>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChainStep for LotContractChecker {
    fn name(&self) -> &'static str {
        "lot_contract_checker"
    }

    fn accepts(&self, kind: EventKind) -> bool {
        kind == EventKind::LotCheckDue
    }

    async fn handle(&self, event: ChainEvent) -> AppResult<Option<ChainEvent>> {
        let context = event.into_context();
        if context.contract().is_none() {
            return Err(AppError::Internal(
                "lot check due without a contract snapshot".to_string(),
            ));
        }
        let next = match self.client.get_lot_contract(context.contract_id()).await? {
            None => ChainEvent::new(EventKind::LotContractNotFound, context),
            Some(lot_contract) if lot_contract.status.is_complete() => ChainEvent::new(
                EventKind::LotContractAlreadyComplete,
                context.with_lot_contract(lot_contract),
            ),
            Some(lot_contract) => ChainEvent::new(
                EventKind::LotPatchDue,
                context.with_lot_contract(lot_contract),
            ),
        };
        Ok(Some(next))
    }
}

/// Converges the lot side to its terminal status, then hands the pass
/// to the contract patcher.
pub struct LotContractPatcher {
    client: Arc<dyn LotsApi>,
}

impl LotContractPatcher {
    pub fn new(client: Arc<dyn LotsApi>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChainStep for LotContractPatcher {
    fn name(&self) -> &'static str {
        "lot_contract_patcher"
    }

    fn accepts(&self, kind: EventKind) -> bool {
        kind == EventKind::LotPatchDue
    }

    async fn handle(&self, event: ChainEvent) -> AppResult<Option<ChainEvent>> {
        let context = event.into_context();
        let contract = context.contract().ok_or_else(|| {
            AppError::Internal("lot patch due without a contract snapshot".to_string())
        })?;
        if context.lot_contract().is_none() {
            return Err(AppError::Internal(
                "lot patch due without a lot contract snapshot".to_string(),
            ));
        }
        let patch = LotContractPatch::derived_from(contract);
        let updated = self
            .client
            .patch_lot_contract(context.contract_id(), &patch)
            .await?;
        info!("✓ Lot contract {} patched to {}", updated.id, updated.status);
        Ok(Some(ChainEvent::new(EventKind::ContractPatchDue, context)))
    }
}

/// Records a contract the lot system holds no reference for.
pub struct LotContractNotFoundHandler;

#[async_trait]
impl ChainStep for LotContractNotFoundHandler {
    fn name(&self) -> &'static str {
        "lot_contract_not_found_handler"
    }

    fn accepts(&self, kind: EventKind) -> bool {
        kind == EventKind::LotContractNotFound
    }

    async fn handle(&self, event: ChainEvent) -> AppResult<Option<ChainEvent>> {
        warn!(
            "⚠️ No lot contract for {} in the lot system; nothing to reconcile",
            event.context().contract_id()
        );
        Ok(None)
    }
}

/// Records a lot reference that already converged, then re-enters the
/// chain at the contract patcher: the contract side may still need its
/// patch.
pub struct LotContractAlreadyCompleteHandler;

#[async_trait]
impl ChainStep for LotContractAlreadyCompleteHandler {
    fn name(&self) -> &'static str {
        "lot_contract_already_complete_handler"
    }

    fn accepts(&self, kind: EventKind) -> bool {
        kind == EventKind::LotContractAlreadyComplete
    }

    async fn handle(&self, event: ChainEvent) -> AppResult<Option<ChainEvent>> {
        info!(
            "Lot contract {} already complete; converging the contract side",
            event.context().contract_id()
        );
        Ok(Some(ChainEvent::new(
            EventKind::ContractPatchDue,
            event.into_context(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::PassContext;
    use crate::models::{ContractResource, ContractStatus, LotContractResource, LotContractStatus};

    struct FixedLots {
        lot_contract: Option<LotContractResource>,
    }

    #[async_trait]
    impl LotsApi for FixedLots {
        async fn get_lot_contract(
            &self,
            _contract_id: &str,
        ) -> AppResult<Option<LotContractResource>> {
            Ok(self.lot_contract.clone())
        }

        async fn patch_lot_contract(
            &self,
            contract_id: &str,
            patch: &LotContractPatch,
        ) -> AppResult<LotContractResource> {
            Ok(LotContractResource {
                id: contract_id.to_string(),
                status: patch.status,
                date_modified: None,
            })
        }
    }

    fn context_with_contract(id: &str) -> PassContext {
        PassContext::new(id).with_contract(ContractResource {
            id: id.to_string(),
            status: ContractStatus::PendingTerminated,
            date_modified: None,
        })
    }

    #[tokio::test]
    async fn checker_rejects_a_context_missing_the_contract() {
        let checker = LotContractChecker::new(Arc::new(FixedLots { lot_contract: None }));
        let event = ChainEvent::new(EventKind::LotCheckDue, PassContext::new("c-1"));
        let result = checker.handle(event).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn checker_routes_missing_reference_to_not_found() {
        let checker = LotContractChecker::new(Arc::new(FixedLots { lot_contract: None }));
        let event = ChainEvent::new(EventKind::LotCheckDue, context_with_contract("c-1"));
        let next = checker.handle(event).await.unwrap().unwrap();
        assert_eq!(next.kind(), EventKind::LotContractNotFound);
    }

    #[tokio::test]
    async fn checker_routes_complete_reference_to_already_complete() {
        let checker = LotContractChecker::new(Arc::new(FixedLots {
            lot_contract: Some(LotContractResource {
                id: "c-1".to_string(),
                status: LotContractStatus::Complete,
                date_modified: None,
            }),
        }));
        let event = ChainEvent::new(EventKind::LotCheckDue, context_with_contract("c-1"));
        let next = checker.handle(event).await.unwrap().unwrap();
        assert_eq!(next.kind(), EventKind::LotContractAlreadyComplete);
        assert!(next.context().lot_contract().is_some());
    }

    #[tokio::test]
    async fn patcher_emits_contract_patch_due_on_success() {
        let patcher = LotContractPatcher::new(Arc::new(FixedLots { lot_contract: None }));
        let context = context_with_contract("c-1").with_lot_contract(LotContractResource {
            id: "c-1".to_string(),
            status: LotContractStatus::Active,
            date_modified: None,
        });
        let event = ChainEvent::new(EventKind::LotPatchDue, context);
        let next = patcher.handle(event).await.unwrap().unwrap();
        assert_eq!(next.kind(), EventKind::ContractPatchDue);
    }

    #[tokio::test]
    async fn already_complete_handler_re_enters_at_the_contract_patcher() {
        let handler = LotContractAlreadyCompleteHandler;
        let event = ChainEvent::new(
            EventKind::LotContractAlreadyComplete,
            context_with_contract("c-1"),
        );
        let next = handler.handle(event).await.unwrap().unwrap();
        assert_eq!(next.kind(), EventKind::ContractPatchDue);
    }
}
