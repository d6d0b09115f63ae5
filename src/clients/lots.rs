use async_trait::async_trait;

use crate::config::ApiEndpoint;
use crate::error::AppResult;
use crate::models::{LotContractPatch, LotContractResource};

use super::rest::RestClient;

// The lot system indexes its contract references by the contracting
// system's contract id, under its own host.
const RESOURCE: &str = "contracts";

/// Read/patch access to the lot system's contract references.
#[async_trait]
pub trait LotsApi: Send + Sync {
    async fn get_lot_contract(&self, contract_id: &str) -> AppResult<Option<LotContractResource>>;

    async fn patch_lot_contract(
        &self,
        contract_id: &str,
        patch: &LotContractPatch,
    ) -> AppResult<LotContractResource>;
}

/// REST client for the lot-management service.
pub struct LotsClient {
    rest: RestClient,
}

impl LotsClient {
    pub fn new(endpoint: &ApiEndpoint) -> AppResult<Self> {
        Ok(Self {
            rest: RestClient::new(endpoint)?,
        })
    }
}

#[async_trait]
impl LotsApi for LotsClient {
    async fn get_lot_contract(&self, contract_id: &str) -> AppResult<Option<LotContractResource>> {
        self.rest.fetch(RESOURCE, contract_id).await
    }

    async fn patch_lot_contract(
        &self,
        contract_id: &str,
        patch: &LotContractPatch,
    ) -> AppResult<LotContractResource> {
        self.rest.patch(RESOURCE, contract_id, patch).await
    }
}
