//! Proposal Catalog
//!
//! Every shipped governance proposal, addressable by key or title.

mod accept_timelock_admin;
mod pause_redemptions;
mod treasury_rebalance;

pub use accept_timelock_admin::AcceptTimelockAdmin;
pub use pause_redemptions::PauseRedemptions;
pub use treasury_rebalance::{rebalance_amount, TreasuryRebalance};

use crate::lifecycle::LifecycleModule;

/// A catalog entry.
pub struct ProposalEntry {
    /// Stable key used on the command line
    pub key: &'static str,
    /// The proposal itself
    pub module: Box<dyn LifecycleModule>,
}

impl std::fmt::Debug for ProposalEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProposalEntry")
            .field("key", &self.key)
            .field("title", &self.module.description().title())
            .finish()
    }
}

/// All shipped proposals, in catalog order.
pub fn all() -> Vec<ProposalEntry> {
    vec![
        ProposalEntry {
            key: AcceptTimelockAdmin::KEY,
            module: Box::new(AcceptTimelockAdmin::new()),
        },
        ProposalEntry {
            key: PauseRedemptions::KEY,
            module: Box::new(PauseRedemptions::new()),
        },
        ProposalEntry {
            key: TreasuryRebalance::KEY,
            module: Box::new(TreasuryRebalance::new()),
        },
    ]
}

/// Find a proposal by key or exact title.
pub fn find(key_or_title: &str) -> Option<ProposalEntry> {
    all()
        .into_iter()
        .find(|entry| {
            entry.key == key_or_title || entry.module.description().title() == key_or_title
        })
}
