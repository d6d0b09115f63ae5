// Reconciliation chain
//
// A fixed graph of steps connected observer-style: a node runs its step,
// then forwards the produced event to every registered successor in
// registration order, depth-first. The graph is wired once at startup
// and never changes while the loop runs.

pub mod context;
pub mod contract;
pub mod lot;

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tracing::{debug, info};

use crate::clients::{ContractingApi, LotsApi};
use crate::error::AppResult;

pub use context::PassContext;

use contract::{
    ContractAlreadyTerminatedHandler, ContractChecker, ContractNotFoundHandler, ContractPatcher,
};
use lot::{
    LotContractAlreadyCompleteHandler, LotContractChecker, LotContractNotFoundHandler,
    LotContractPatcher,
};

/// Tag carried by every chain event; a successor acts only on the kinds
/// it declared interest in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    ContractQueued,
    ContractNotFound,
    ContractAlreadyTerminated,
    LotCheckDue,
    LotContractNotFound,
    LotContractAlreadyComplete,
    LotPatchDue,
    ContractPatchDue,
}

/// One hop through the chain: a tagged outcome plus the pass context it
/// applies to.
#[derive(Debug, Clone)]
pub struct ChainEvent {
    kind: EventKind,
    context: PassContext,
}

impl ChainEvent {
    pub fn new(kind: EventKind, context: PassContext) -> Self {
        Self { kind, context }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn context(&self) -> &PassContext {
        &self.context
    }

    pub fn into_context(self) -> PassContext {
        self.context
    }
}

/// A unit of reconciliation work: checker, patcher or terminal handler.
#[async_trait]
pub trait ChainStep: Send + Sync {
    fn name(&self) -> &'static str;

    /// Event kinds this step reacts to.
    fn accepts(&self, kind: EventKind) -> bool;

    /// Runs the step. The returned event, if any, is broadcast to the
    /// node's successors; `Err` aborts the rest of the pass.
    async fn handle(&self, event: ChainEvent) -> AppResult<Option<ChainEvent>>;
}

/// A step plus its outgoing edges.
pub struct StepNode {
    step: Arc<dyn ChainStep>,
    successors: Vec<Arc<StepNode>>,
}

impl StepNode {
    pub fn new(step: Arc<dyn ChainStep>) -> Self {
        Self {
            step,
            successors: Vec::new(),
        }
    }

    /// Adds an outgoing edge. Duplicate edges are kept and re-notified.
    pub fn register_successor(&mut self, node: Arc<StepNode>) {
        info!(
            "Registered chain edge {} -> {}",
            self.step.name(),
            node.step.name()
        );
        self.successors.push(node);
    }

    /// Delivers an event to this node and, depth-first, to its
    /// successors. Events the step does not accept are dropped silently.
    pub fn notify(&self, event: ChainEvent) -> BoxFuture<'_, AppResult<()>> {
        Box::pin(async move {
            if !self.step.accepts(event.kind()) {
                return Ok(());
            }
            debug!("step {} handling {:?}", self.step.name(), event.kind());
            let Some(next) = self.step.handle(event).await? else {
                return Ok(());
            };
            for successor in &self.successors {
                successor.notify(next.clone()).await?;
            }
            Ok(())
        })
    }
}

/// The wired step graph, rooted at the admission gate.
pub struct ReconcileChain {
    entry: Arc<StepNode>,
}

impl ReconcileChain {
    pub fn new(entry: Arc<StepNode>) -> Self {
        Self { entry }
    }

    /// Runs one reconciliation pass with a fresh context.
    pub async fn dispatch(&self, contract_id: &str) -> AppResult<()> {
        let context = PassContext::new(contract_id);
        self.entry
            .notify(ChainEvent::new(EventKind::ContractQueued, context))
            .await
    }
}

/// Wires the production step graph, leaf nodes first.
pub fn build_chain(contracting: Arc<dyn ContractingApi>, lots: Arc<dyn LotsApi>) -> ReconcileChain {
    let contract_patcher = Arc::new(StepNode::new(Arc::new(ContractPatcher::new(
        contracting.clone(),
    ))));

    let mut lot_patcher = StepNode::new(Arc::new(LotContractPatcher::new(lots.clone())));
    lot_patcher.register_successor(contract_patcher.clone());
    let lot_patcher = Arc::new(lot_patcher);

    let mut lot_already_complete = StepNode::new(Arc::new(LotContractAlreadyCompleteHandler));
    lot_already_complete.register_successor(contract_patcher);
    let lot_already_complete = Arc::new(lot_already_complete);

    let lot_not_found = Arc::new(StepNode::new(Arc::new(LotContractNotFoundHandler)));

    let mut lot_checker = StepNode::new(Arc::new(LotContractChecker::new(lots)));
    lot_checker.register_successor(lot_patcher);
    lot_checker.register_successor(lot_already_complete);
    lot_checker.register_successor(lot_not_found);
    let lot_checker = Arc::new(lot_checker);

    let already_terminated = Arc::new(StepNode::new(Arc::new(ContractAlreadyTerminatedHandler)));
    let contract_not_found = Arc::new(StepNode::new(Arc::new(ContractNotFoundHandler)));

    let mut contract_checker = StepNode::new(Arc::new(ContractChecker::new(contracting)));
    contract_checker.register_successor(lot_checker);
    contract_checker.register_successor(already_terminated);
    contract_checker.register_successor(contract_not_found);

    ReconcileChain::new(Arc::new(contract_checker))
}
