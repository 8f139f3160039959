//! Governance proposal simulator.
//!
//! Proposals are declared as ordered lists of symbolic contract calls, then
//! simulated through a four-phase lifecycle (SETUP → RUN → TEARDOWN →
//! VALIDATE) against a contract-calling interface.

pub mod chain;
pub mod cli;
pub mod config;
pub mod executor;
pub mod invariants;
pub mod lifecycle;
pub mod output;
pub mod proposal;
pub mod proposals;
pub mod registry;
pub mod telemetry;
