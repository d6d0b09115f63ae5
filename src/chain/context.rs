use crate::models::{ContractResource, LotContractResource};

/// Working record for one reconciliation pass, built fresh per
/// identifier and dropped when the pass ends. Steps read what their
/// predecessors attached and append their own snapshots; a field once
/// written is never overwritten or retracted.
#[derive(Debug, Clone)]
pub struct PassContext {
    contract_id: String,
    contract: Option<ContractResource>,
    lot_contract: Option<LotContractResource>,
}

impl PassContext {
    pub fn new(contract_id: impl Into<String>) -> Self {
        Self {
            contract_id: contract_id.into(),
            contract: None,
            lot_contract: None,
        }
    }

    pub fn contract_id(&self) -> &str {
        &self.contract_id
    }

    pub fn contract(&self) -> Option<&ContractResource> {
        self.contract.as_ref()
    }

    pub fn lot_contract(&self) -> Option<&LotContractResource> {
        self.lot_contract.as_ref()
    }

    pub fn with_contract(mut self, contract: ContractResource) -> Self {
        self.contract = Some(contract);
        self
    }

    pub fn with_lot_contract(mut self, lot_contract: LotContractResource) -> Self {
        self.lot_contract = Some(lot_contract);
        self
    }
}
