use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// On-disk deployment record for one environment.
///
/// ```json
/// {
///   "network": "mainnet-fork",
///   "contracts": {
///     "timelock": { "address": "0x…", "kind": "timelock", "methods": ["acceptAdmin()"] },
///     "guardian": "0x…"
///   },
///   "old": { "timelock": { "address": "0x…", "kind": "timelock" } }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    /// Environment label (mainnet, fork name, dev)
    #[serde(default)]
    pub network: String,
    /// Current generation of contracts
    #[serde(default)]
    pub contracts: BTreeMap<String, RecordEntry>,
    /// Previous generation, present while a migration is in flight
    #[serde(default)]
    pub old: BTreeMap<String, RecordEntry>,
}

/// One named entry in a deployment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordEntry {
    /// Address-only reference (EOA, multisig, contract without a known interface)
    Bare(Address),
    /// Contract with its callable interface
    Contract {
        /// Deployed address
        address: Address,
        /// Behaviour label used by the in-memory test deployment
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
        /// Canonical method signatures exposed by the contract
        #[serde(default)]
        methods: Vec<String>,
    },
}
