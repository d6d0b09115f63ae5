use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle states of a contract in the contracting system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    Active,
    #[serde(rename = "pending.terminated")]
    PendingTerminated,
    Terminated,
}

impl ContractStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractStatus::Active => "active",
            ContractStatus::PendingTerminated => "pending.terminated",
            ContractStatus::Terminated => "terminated",
        }
    }

    /// Terminal ceasefire state; nothing left to reconcile on this side.
    pub fn is_terminated(&self) -> bool {
        matches!(self, ContractStatus::Terminated)
    }
}

impl std::fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle states of a lot's contract reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LotContractStatus {
    Scheduled,
    Active,
    Complete,
}

impl LotContractStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LotContractStatus::Scheduled => "scheduled",
            LotContractStatus::Active => "active",
            LotContractStatus::Complete => "complete",
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, LotContractStatus::Complete)
    }
}

impl std::fmt::Display for LotContractStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Contract record as served by the contracting system
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractResource {
    pub id: String,
    pub status: ContractStatus,
    pub date_modified: Option<DateTime<Utc>>,
}

/// The lot system's reference to a contract, sharing the contracting
/// system's id space.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotContractResource {
    pub id: String,
    pub status: LotContractStatus,
    pub date_modified: Option<DateTime<Utc>>,
}

/// Status patch for the contracting side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractPatch {
    pub status: ContractStatus,
}

impl ContractPatch {
    /// Pure function of the contract snapshot; identical input yields an
    /// identical payload.
    pub fn derived_from(contract: &ContractResource) -> Self {
        let status = match contract.status {
            ContractStatus::Active
            | ContractStatus::PendingTerminated
            | ContractStatus::Terminated => ContractStatus::Terminated,
        };
        Self { status }
    }
}

/// Status patch for the lot side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LotContractPatch {
    pub status: LotContractStatus,
}

impl LotContractPatch {
    /// Pure function of the contract snapshot; identical input yields an
    /// identical payload.
    pub fn derived_from(contract: &ContractResource) -> Self {
        let status = match contract.status {
            ContractStatus::Active
            | ContractStatus::PendingTerminated
            | ContractStatus::Terminated => LotContractStatus::Complete,
        };
        Self { status }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_status_keeps_dotted_wire_form() {
        let json = serde_json::to_string(&ContractStatus::PendingTerminated).unwrap();
        assert_eq!(json, "\"pending.terminated\"");

        let back: ContractStatus = serde_json::from_str("\"pending.terminated\"").unwrap();
        assert_eq!(back, ContractStatus::PendingTerminated);
    }

    #[test]
    fn contract_resource_decodes_camel_case_fields() {
        let raw = r#"{"id":"4be1a81c","status":"active","dateModified":"2018-03-07T12:00:00Z"}"#;
        let contract: ContractResource = serde_json::from_str(raw).unwrap();
        assert_eq!(contract.id, "4be1a81c");
        assert_eq!(contract.status, ContractStatus::Active);
        assert!(contract.date_modified.is_some());
    }

    #[test]
    fn lot_contract_resource_decodes_without_date() {
        let raw = r#"{"id":"4be1a81c","status":"scheduled"}"#;
        let lot_contract: LotContractResource = serde_json::from_str(raw).unwrap();
        assert_eq!(lot_contract.status, LotContractStatus::Scheduled);
        assert!(lot_contract.date_modified.is_none());
    }

    #[test]
    fn patch_payloads_are_deterministic() {
        let contract = ContractResource {
            id: "c-1".to_string(),
            status: ContractStatus::PendingTerminated,
            date_modified: None,
        };

        assert_eq!(
            LotContractPatch::derived_from(&contract),
            LotContractPatch::derived_from(&contract)
        );
        assert_eq!(
            ContractPatch::derived_from(&contract),
            ContractPatch::derived_from(&contract)
        );
        assert_eq!(
            LotContractPatch::derived_from(&contract).status,
            LotContractStatus::Complete
        );
        assert_eq!(
            ContractPatch::derived_from(&contract).status,
            ContractStatus::Terminated
        );
    }

    #[test]
    fn patch_serializes_status_only() {
        let contract = ContractResource {
            id: "c-1".to_string(),
            status: ContractStatus::Active,
            date_modified: None,
        };
        let payload = serde_json::to_value(ContractPatch::derived_from(&contract)).unwrap();
        assert_eq!(payload, serde_json::json!({ "status": "terminated" }));
    }
}
