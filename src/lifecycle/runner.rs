use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use super::{Environment, LifecycleModule, Phase, ValidationReport};
use crate::output;
use crate::proposal::ProposalError;

/// A fail-fast error raised inside one lifecycle phase.
#[derive(Debug, Error)]
#[error("{phase} phase of '{title}' failed: {source}")]
pub struct LifecycleError {
    /// Proposal title
    pub title: String,
    /// Phase that raised the error
    pub phase: Phase,
    /// The error itself
    pub source: ProposalError,
    /// Checks recorded before VALIDATE itself failed
    pub validation: Option<ValidationReport>,
}

/// Outcome of a lifecycle run that reached the end of VALIDATE.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    /// Proposal title
    pub title: String,
    /// Phases that completed, in order
    pub phases_completed: Vec<Phase>,
    /// Validation results
    pub validation: ValidationReport,
}

impl SimulationReport {
    /// Whether every phase completed and every invariant held.
    ///
    /// A failed validation means the simulation failed even though RUN's
    /// effects are already applied.
    pub fn passed(&self) -> bool {
        self.phases_completed == Phase::ALL && self.validation.passed()
    }
}

/// Drives a [`LifecycleModule`] through SETUP → RUN → TEARDOWN → VALIDATE.
///
/// Phases never overlap and never repeat. An error in any phase aborts the
/// run; the whole lifecycle must then be restarted from SETUP against a fresh
/// environment. Only one proposal may run against an environment at a time.
#[derive(Debug)]
pub struct LifecycleRunner<'a> {
    env: Environment<'a>,
}

impl<'a> LifecycleRunner<'a> {
    /// Runner over `env`.
    pub fn new(env: Environment<'a>) -> Self {
        Self { env }
    }

    /// Run all four phases of `module`.
    ///
    /// The description is shape-checked first; a malformed proposal fails as
    /// a SETUP error before any phase is entered.
    pub async fn run(
        &self,
        module: &dyn LifecycleModule,
    ) -> Result<SimulationReport, LifecycleError> {
        let title = module.description().title().to_string();
        let logging = self.env.logging();

        if let Err(source) = module.description().validate_shape() {
            error!(
                target: "proposal_sim::lifecycle",
                title = %title,
                kind = source.kind(),
                error = %source,
                "malformed proposal"
            );
            if logging {
                output::print_phase_failed(Phase::Setup, &source);
            }
            return Err(LifecycleError {
                title,
                phase: Phase::Setup,
                source,
                validation: None,
            });
        }

        let mut phases_completed = Vec::with_capacity(Phase::ALL.len());
        let mut validation = ValidationReport::new();

        for phase in Phase::ALL {
            info!(target: "proposal_sim::lifecycle", title = %title, %phase, "entering phase");
            if logging {
                output::print_phase_start(phase);
            }

            let result = match phase {
                Phase::Setup => module.setup(&self.env).await,
                Phase::Run => module.run(&self.env).await,
                Phase::Teardown => module.teardown(&self.env).await,
                Phase::Validate => module.validate(&self.env, &mut validation).await,
            };

            if let Err(source) = result {
                error!(
                    target: "proposal_sim::lifecycle",
                    title = %title,
                    %phase,
                    kind = source.kind(),
                    error = %source,
                    "phase failed"
                );
                if logging {
                    output::print_phase_failed(phase, &source);
                }
                let validation = (phase == Phase::Validate).then_some(validation);
                return Err(LifecycleError {
                    title,
                    phase,
                    source,
                    validation,
                });
            }

            phases_completed.push(phase);
            if logging {
                output::print_phase_ok(phase);
            }
        }

        if logging {
            output::print_validation(&validation);
        }
        Ok(SimulationReport {
            title,
            phases_completed,
            validation,
        })
    }
}
