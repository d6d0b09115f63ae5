pub mod contracting;
pub mod lots;
pub mod rest;

pub use contracting::{ContractingApi, ContractingClient};
pub use lots::{LotsApi, LotsClient};
