//! Core domain types and the revaluation cascade.

pub mod field;
pub mod observable;
pub mod registry;
pub mod currency;
pub mod fx_rate;
pub mod asset;
pub mod holding;
pub mod portfolio;
pub mod market;
pub mod actor;
pub mod scenario;
pub mod error;
