//! # prorata-core
//! Foundation types and collaborator traits for the Prorata accrual ledger.

pub mod constants;
pub mod error;
pub mod ledger;
pub mod roles;
pub mod types;
