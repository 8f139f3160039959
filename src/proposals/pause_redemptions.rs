//! Emergency pause of PSM redemptions and minting.

use async_trait::async_trait;

use crate::lifecycle::{Environment, LifecycleModule, ValidationReport};
use crate::proposal::{Command, ProposalDescription, ProposalError};

/// Pauses redeem and mint on the PSM while leaving the module itself live.
#[derive(Debug, Clone)]
pub struct PauseRedemptions {
    description: ProposalDescription,
}

impl PauseRedemptions {
    /// Catalog key
    pub const KEY: &'static str = "pause_redemptions";

    pub fn new() -> Self {
        Self {
            description: ProposalDescription::new(
                "Pause PSM redemptions",
                vec![
                    Command::new("psm", "pauseRedeem()").describe("Pause redemptions on the PSM"),
                    Command::new("psm", "pauseMint()").describe("Pause minting on the PSM"),
                ],
                "Stops the PSM from redeeming or minting until the peg recovers. \
                 The global pause stays off so pending withdrawals can settle.",
            ),
        }
    }
}

impl Default for PauseRedemptions {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LifecycleModule for PauseRedemptions {
    fn description(&self) -> &ProposalDescription {
        &self.description
    }

    async fn validate(
        &self,
        env: &Environment<'_>,
        report: &mut ValidationReport,
    ) -> Result<(), ProposalError> {
        env.verify_pause_state(report).await?;
        let redeem_paused = env.view_bool("psm", "redeemPaused()", &[]).await?;
        report.expect_eq("psm.redeemPaused", true, redeem_paused);
        Ok(())
    }
}
