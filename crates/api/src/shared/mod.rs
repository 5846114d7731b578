pub mod auth;
pub mod carrier_signature;
pub mod credit_ledger;
pub mod usecase;
