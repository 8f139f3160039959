//! Built-in development deployment used when no deployment file is given.

use alloy_primitives::Address;

use super::{ContractKind, InMemoryChain};
use crate::registry::{
    AddressRegistry, ContractHandle, DEV_CORE_ADDRESS, DEV_DAI_PSM_ADDRESS, DEV_FEI_ADDRESS,
    DEV_GUARDIAN_MULTISIG_ADDRESS, DEV_NEW_VAULT_ADDRESS, DEV_OLD_TIMELOCK_ADDRESS,
    DEV_OLD_VAULT_ADDRESS, DEV_PSM_ADDRESS, DEV_TIMELOCK_ADDRESS,
};

fn simulated(name: &str, address: Address, kind: ContractKind) -> ContractHandle {
    ContractHandle::new(name, address)
        .with_kind(kind.as_str())
        .with_methods(kind.methods().iter().copied())
}

/// Registry of the development deployment.
///
/// The current timelock is mid-handover: its admin is still the old timelock
/// registered under `old.timelock`.
pub fn dev_registry() -> AddressRegistry {
    let mut registry = AddressRegistry::new("dev");
    registry.insert(simulated("timelock", DEV_TIMELOCK_ADDRESS, ContractKind::Timelock));
    registry.insert(simulated("core", DEV_CORE_ADDRESS, ContractKind::Access));
    registry.insert(simulated("fei", DEV_FEI_ADDRESS, ContractKind::Token));
    registry.insert(simulated("psm", DEV_PSM_ADDRESS, ContractKind::Pausable));
    registry.insert(simulated("daiPsm", DEV_DAI_PSM_ADDRESS, ContractKind::Pausable));
    registry.insert(simulated("oldVault", DEV_OLD_VAULT_ADDRESS, ContractKind::Vault));
    registry.insert(simulated("newVault", DEV_NEW_VAULT_ADDRESS, ContractKind::Vault));
    registry.insert(ContractHandle::new("guardian", DEV_GUARDIAN_MULTISIG_ADDRESS));
    registry.insert_old(simulated("timelock", DEV_OLD_TIMELOCK_ADDRESS, ContractKind::Timelock));
    registry
}

/// Fresh in-memory chain for [`dev_registry`], governed by the current timelock.
pub fn dev_chain() -> InMemoryChain {
    InMemoryChain::from_registry(&dev_registry(), DEV_TIMELOCK_ADDRESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dev_registry_layout() {
        let registry = dev_registry();
        assert_eq!(registry.network(), "dev");
        assert_eq!(registry.len(), 8);
        assert_eq!(registry.old_address("timelock"), Some(DEV_OLD_TIMELOCK_ADDRESS));
        assert!(registry.handle("psm").unwrap().has_method("pauseRedeem()"));
        assert!(registry.handle("guardian").unwrap().interface.is_empty());
    }
}
