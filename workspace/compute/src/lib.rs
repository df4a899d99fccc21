//! Ownership scoping and the derived-metrics engine.
//!
//! Every read in the application starts from one of the scoped selects
//! in [`scope`]; the aggregate figures for the rollup parents (crops and
//! ledgers) are computed in [`crop`] and [`ledger`] as single SQL sums
//! over the scoped child sets.

pub mod crop;
pub mod error;
pub mod ledger;
pub mod scope;

#[cfg(test)]
pub(crate) mod testkit;

pub use error::{ComputeError, Result};
