//! Hand the timelock's admin slot to the new timelock.

use alloy_primitives::Address;
use async_trait::async_trait;

use crate::lifecycle::{Environment, LifecycleModule, ValidationReport};
use crate::proposal::{Command, ProposalDescription, ProposalError};

/// Completes a two-step admin handover: the new timelock accepts the admin
/// role it was nominated for.
#[derive(Debug, Clone)]
pub struct AcceptTimelockAdmin {
    description: ProposalDescription,
}

impl AcceptTimelockAdmin {
    /// Catalog key
    pub const KEY: &'static str = "accept_timelock_admin";

    pub fn new() -> Self {
        Self {
            description: ProposalDescription::new(
                "Accept timelock admin",
                vec![Command::new("timelock", "acceptAdmin()")
                    .describe("Timelock accepts the pending admin role")],
                "The old timelock nominated the new timelock as pending admin. \
                 This proposal completes the handover so governance runs through \
                 the new timelock only.",
            ),
        }
    }
}

impl Default for AcceptTimelockAdmin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LifecycleModule for AcceptTimelockAdmin {
    fn description(&self) -> &ProposalDescription {
        &self.description
    }

    /// The nomination is queued on the old timelock and not part of this
    /// proposal, so the harness replays it as the old admin.
    async fn setup(&self, env: &Environment<'_>) -> Result<(), ProposalError> {
        let old_timelock = env.old_address("timelock")?;
        let nominate = Command::new("timelock", "setPendingAdmin(address)")
            .args(["{timelock}"])
            .describe("Old timelock nominates the new timelock");
        env.execute_as(old_timelock, &nominate).await.map(|_| ())
    }

    async fn validate(
        &self,
        env: &Environment<'_>,
        report: &mut ValidationReport,
    ) -> Result<(), ProposalError> {
        let timelock = env.address("timelock")?;
        let admin = env.view_address("timelock", "admin()", &[]).await?;
        let pending = env.view_address("timelock", "pendingAdmin()", &[]).await?;
        report.expect_eq("timelock.admin", timelock, admin);
        report.expect_eq("timelock.pendingAdmin", Address::ZERO, pending);
        Ok(())
    }
}
