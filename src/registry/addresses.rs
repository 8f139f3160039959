use alloy_primitives::{address, Address};

/// Governance executor (the timelock every proposal executes through).
pub const DEV_TIMELOCK_ADDRESS: Address = address!("00000000000000000000000000000000714E4C00");

/// Previous timelock generation, kept around while admin rights migrate.
pub const DEV_OLD_TIMELOCK_ADDRESS: Address = address!("00000000000000000000000000000000714E4B00");

/// Access-control core holding protocol roles
pub const DEV_CORE_ADDRESS: Address = address!("00000000000000000000000000000000C0DE0000");

/// Protocol stablecoin
pub const DEV_FEI_ADDRESS: Address = address!("00000000000000000000000000000000FE100000");

/// Peg stability module with independent mint/redeem pause flags
pub const DEV_PSM_ADDRESS: Address = address!("0000000000000000000000000000000005A00000");

/// Second peg stability module (DAI side)
pub const DEV_DAI_PSM_ADDRESS: Address = address!("0000000000000000000000000000000005A10000");

/// PCV vault being drained by rebalancing proposals
pub const DEV_OLD_VAULT_ADDRESS: Address = address!("000000000000000000000000000000000BA00100");

/// PCV vault receiving funds in rebalancing proposals
pub const DEV_NEW_VAULT_ADDRESS: Address = address!("000000000000000000000000000000000BA00200");

/// Multisig referenced by proposals as a plain address (no contract interface)
pub const DEV_GUARDIAN_MULTISIG_ADDRESS: Address =
    address!("000000000000000000000000000000006F5AFE00");

/// Identity the simulation harness uses for SETUP/TEARDOWN-only actions.
///
/// Never part of a real proposal; anything granted to it in SETUP must be
/// taken away again in TEARDOWN.
pub const SIMULATION_HARNESS_ADDRESS: Address =
    address!("000000000000000000000000000000000000A000");
