use async_trait::async_trait;

use crate::config::ApiEndpoint;
use crate::error::AppResult;
use crate::models::{ContractPatch, ContractResource};

use super::rest::RestClient;

const RESOURCE: &str = "contracts";

/// Read/patch access to contracts in the contracting system.
#[async_trait]
pub trait ContractingApi: Send + Sync {
    async fn get_contract(&self, contract_id: &str) -> AppResult<Option<ContractResource>>;

    async fn patch_contract(
        &self,
        contract_id: &str,
        patch: &ContractPatch,
    ) -> AppResult<ContractResource>;
}

/// REST client for the contracting service.
pub struct ContractingClient {
    rest: RestClient,
}

impl ContractingClient {
    pub fn new(endpoint: &ApiEndpoint) -> AppResult<Self> {
        Ok(Self {
            rest: RestClient::new(endpoint)?,
        })
    }
}

#[async_trait]
impl ContractingApi for ContractingClient {
    async fn get_contract(&self, contract_id: &str) -> AppResult<Option<ContractResource>> {
        self.rest.fetch(RESOURCE, contract_id).await
    }

    async fn patch_contract(
        &self,
        contract_id: &str,
        patch: &ContractPatch,
    ) -> AppResult<ContractResource> {
        self.rest.patch(RESOURCE, contract_id, patch).await
    }
}
