//! Proposal Lifecycle
//!
//! Every proposal passes through four phases, strictly in order and each
//! exactly once:
//!
//!   SETUP    → harness-only preconditions (funding, temporary roles)
//!   RUN      → the proposal's real effect, i.e. its declared commands
//!   TEARDOWN → undo SETUP-only side effects (never RUN's)
//!   VALIDATE → assert the post-state, collecting every failed invariant
//!
//! A [`LifecycleModule`] implements the phases it needs; the rest default to
//! no-ops, and the default RUN executes the proposal's description.

mod consistency;
mod environment;
mod runner;
mod validation;

pub use consistency::{check_consistency, Divergence};
pub use environment::Environment;
pub use runner::{LifecycleError, LifecycleRunner, SimulationReport};
pub use validation::{InvariantFailure, ValidationReport};

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

use crate::proposal::{ProposalDescription, ProposalError};

/// Lifecycle phases in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Phase {
    /// Harness-only preconditions
    Setup,
    /// The proposal's effect
    Run,
    /// Harness cleanup
    Teardown,
    /// Post-state assertions
    Validate,
}

impl Phase {
    /// All phases, in the only order they ever run.
    pub const ALL: [Phase; 4] = [Phase::Setup, Phase::Run, Phase::Teardown, Phase::Validate];

    /// Upper-case phase label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Setup => "SETUP",
            Self::Run => "RUN",
            Self::Teardown => "TEARDOWN",
            Self::Validate => "VALIDATE",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proposal: its declarative description plus the four lifecycle phases.
///
/// Modules own no persistent state; everything they change lives behind the
/// environment's contract-calling interface.
#[async_trait]
pub trait LifecycleModule: Send + Sync {
    /// Declarative description of what RUN performs.
    fn description(&self) -> &ProposalDescription;

    /// Establish harness-only preconditions.
    async fn setup(&self, _env: &Environment<'_>) -> Result<(), ProposalError> {
        Ok(())
    }

    /// Execute the proposal. Defaults to the description's commands, in order,
    /// from the governance executor.
    async fn run(&self, env: &Environment<'_>) -> Result<(), ProposalError> {
        env.execute_description(self.description()).await.map(|_| ())
    }

    /// Undo SETUP-only side effects.
    async fn teardown(&self, _env: &Environment<'_>) -> Result<(), ProposalError> {
        Ok(())
    }

    /// Assert the post-state. Failed assertions go into `report`; an `Err`
    /// means the checks themselves could not run.
    async fn validate(
        &self,
        _env: &Environment<'_>,
        _report: &mut ValidationReport,
    ) -> Result<(), ProposalError> {
        Ok(())
    }
}
