//! In-Memory Deployment
//!
//! A small simulated protocol deployment that implements [`ContractCaller`].
//! It stands in for a forked node in tests and in the CLI's default mode,
//! covering the contract behaviours the shipped proposals touch:
//!
//! ```text
//!   timelock ──admin──▶ core (access) ──MINTER──▶ fei (token)
//!                          │                         ▲
//!                          └── governor of ─▶ psm    │ balances
//!                                             vaults ┘
//! ```
//!
//! Every call is atomic: it runs on a copy of the state which replaces the
//! live state only if the call succeeds. Views run on a copy that is thrown
//! away.

mod contracts;
pub mod dev;

pub use contracts::{minter_role, ContractKind, ContractState, DEFAULT_ADMIN_ROLE};
pub use dev::{dev_chain, dev_registry};

use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use std::collections::BTreeSet;
use tokio::sync::RwLock;
use tracing::{debug, trace, warn};

use contracts::ChainState;
use crate::executor::{CallError, ContractCall, ContractCaller};
use crate::registry::AddressRegistry;

/// Registry name of the access-control core consulted by tokens.
pub const CORE_NAME: &str = "core";

/// Registry name of the protocol token held by vaults.
pub const TOKEN_NAME: &str = "fei";

/// Simulated deployment behind a `tokio` lock.
#[derive(Debug, Default)]
pub struct InMemoryChain {
    state: RwLock<ChainState>,
}

impl InMemoryChain {
    /// Empty chain with no contracts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploy every registry entry that declares a known `kind`.
    ///
    /// `governor` administers access control and pause switches. A timelock
    /// whose name also exists among the old contracts starts out administered
    /// by that old contract (a handover in progress); other timelocks start
    /// out administered by `governor`. Entries without a kind are plain
    /// accounts.
    pub fn from_registry(registry: &AddressRegistry, governor: Address) -> Self {
        let core = registry.address(CORE_NAME).unwrap_or_default();
        let token = registry.address(TOKEN_NAME).unwrap_or_default();
        let mut state = ChainState::default();

        let current = registry.handles().map(|handle| (handle, registry.old_address(&handle.name)));
        let old = registry.old_contracts().values().map(|handle| (handle, None));

        for (handle, predecessor) in current.chain(old) {
            let Some(kind) = handle.kind.as_deref() else {
                continue;
            };
            let kind = match kind.parse::<ContractKind>() {
                Ok(kind) => kind,
                Err(reason) => {
                    warn!(
                        target: "proposal_sim::chain",
                        name = %handle.name,
                        %reason,
                        "not simulated"
                    );
                    continue;
                }
            };
            let contract = match kind {
                ContractKind::Timelock => ContractState::Timelock {
                    admin: predecessor.unwrap_or(governor),
                    pending_admin: Address::ZERO,
                },
                ContractKind::Pausable => ContractState::Pausable {
                    governor,
                    paused: false,
                    mint_paused: false,
                    redeem_paused: false,
                },
                ContractKind::Token => ContractState::Token {
                    core,
                    total_supply: U256::ZERO,
                    balances: Default::default(),
                },
                ContractKind::Access => ContractState::Access {
                    roles: BTreeSet::from([(DEFAULT_ADMIN_ROLE, governor)]),
                },
                ContractKind::Vault => ContractState::Vault {
                    governor,
                    token,
                    deposited: U256::ZERO,
                },
            };
            debug!(
                target: "proposal_sim::chain",
                name = %handle.name,
                address = %handle.address,
                kind = kind.as_str(),
                "deployed"
            );
            state.contracts.insert(handle.address, contract);
        }

        Self {
            state: RwLock::new(state),
        }
    }
}

#[async_trait]
impl ContractCaller for InMemoryChain {
    async fn call(&self, call: &ContractCall) -> Result<Bytes, CallError> {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        let output = next.dispatch(call)?;
        *state = next;
        trace!(target: "proposal_sim::chain", %call, "applied");
        Ok(output)
    }

    async fn view(&self, call: &ContractCall) -> Result<Bytes, CallError> {
        let mut scratch = self.state.read().await.clone();
        scratch.dispatch(call)
    }

    async fn balance(&self, address: Address) -> Result<U256, CallError> {
        Ok(self.state.read().await.balances.get(&address).copied().unwrap_or_default())
    }

    async fn fund(&self, address: Address, amount: U256) -> Result<(), CallError> {
        let mut state = self.state.write().await;
        let balance = state.balances.entry(address).or_default();
        *balance = balance.saturating_add(amount);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::abi::{decode_address, decode_bool, decode_u256};
    use crate::proposal::MethodSignature;
    use crate::registry::{
        DEV_CORE_ADDRESS, DEV_FEI_ADDRESS, DEV_GUARDIAN_MULTISIG_ADDRESS, DEV_NEW_VAULT_ADDRESS,
        DEV_OLD_TIMELOCK_ADDRESS, DEV_OLD_VAULT_ADDRESS, DEV_PSM_ADDRESS, DEV_TIMELOCK_ADDRESS,
        SIMULATION_HARNESS_ADDRESS,
    };
    use alloy_dyn_abi::DynSolValue;

    impl InMemoryChain {
        async fn contract(&self, address: Address) -> Option<ContractState> {
            self.state.read().await.contracts.get(&address).cloned()
        }

        async fn contract_count(&self) -> usize {
            self.state.read().await.contracts.len()
        }

        async fn deploy(&self, address: Address, contract: ContractState) {
            self.state.write().await.contracts.insert(address, contract);
        }
    }

    fn call(from: Address, to: Address, signature: &str, args: Vec<DynSolValue>) -> ContractCall {
        ContractCall {
            from,
            to,
            method: MethodSignature::parse(signature).unwrap(),
            args,
            value: U256::ZERO,
        }
    }

    fn addr(a: Address) -> DynSolValue {
        DynSolValue::Address(a)
    }

    fn uint(n: u64) -> DynSolValue {
        DynSolValue::Uint(U256::from(n), 256)
    }

    #[tokio::test]
    async fn test_from_registry_deploys_kinds_only() {
        let chain = dev_chain();
        // timelock, old timelock, core, fei, psm, daiPsm, two vaults; guardian is an account
        assert_eq!(chain.contract_count().await, 8);
        assert!(chain.contract(DEV_GUARDIAN_MULTISIG_ADDRESS).await.is_none());
        assert_eq!(
            chain.contract(DEV_TIMELOCK_ADDRESS).await,
            Some(ContractState::Timelock {
                admin: DEV_OLD_TIMELOCK_ADDRESS,
                pending_admin: Address::ZERO
            })
        );
    }

    #[tokio::test]
    async fn test_timelock_handover() {
        let chain = dev_chain();
        let set = call(
            DEV_OLD_TIMELOCK_ADDRESS,
            DEV_TIMELOCK_ADDRESS,
            "setPendingAdmin(address)",
            vec![addr(DEV_TIMELOCK_ADDRESS)],
        );
        chain.call(&set).await.unwrap();

        let accept = call(DEV_TIMELOCK_ADDRESS, DEV_TIMELOCK_ADDRESS, "acceptAdmin()", vec![]);
        chain.call(&accept).await.unwrap();

        let admin = chain
            .view(&call(Address::ZERO, DEV_TIMELOCK_ADDRESS, "admin()", vec![]))
            .await
            .unwrap();
        assert_eq!(decode_address(&admin).unwrap(), DEV_TIMELOCK_ADDRESS);
        let pending = chain
            .view(&call(Address::ZERO, DEV_TIMELOCK_ADDRESS, "pendingAdmin()", vec![]))
            .await
            .unwrap();
        assert_eq!(decode_address(&pending).unwrap(), Address::ZERO);
    }

    #[tokio::test]
    async fn test_accept_without_nomination_reverts() {
        let chain = dev_chain();
        let accept = call(DEV_TIMELOCK_ADDRESS, DEV_TIMELOCK_ADDRESS, "acceptAdmin()", vec![]);
        let err = chain.call(&accept).await.unwrap_err();
        assert!(matches!(err, CallError::Reverted(ref r) if r.contains("pending admin")));
    }

    #[tokio::test]
    async fn test_pause_requires_governor() {
        let chain = dev_chain();
        let from_guardian =
            call(DEV_GUARDIAN_MULTISIG_ADDRESS, DEV_PSM_ADDRESS, "pauseRedeem()", vec![]);
        assert!(chain.call(&from_guardian).await.is_err());

        let from_timelock = call(DEV_TIMELOCK_ADDRESS, DEV_PSM_ADDRESS, "pauseRedeem()", vec![]);
        chain.call(&from_timelock).await.unwrap();
        let flag = chain
            .view(&call(Address::ZERO, DEV_PSM_ADDRESS, "redeemPaused()", vec![]))
            .await
            .unwrap();
        assert!(decode_bool(&flag).unwrap());
    }

    #[tokio::test]
    async fn test_pause_twice_reverts() {
        let chain = dev_chain();
        let pause = call(DEV_TIMELOCK_ADDRESS, DEV_PSM_ADDRESS, "pause()", vec![]);
        chain.call(&pause).await.unwrap();
        assert!(chain.call(&pause).await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_method_and_value_revert() {
        let chain = dev_chain();
        let unknown = call(DEV_TIMELOCK_ADDRESS, DEV_PSM_ADDRESS, "fuseFix()", vec![]);
        assert!(matches!(chain.call(&unknown).await, Err(CallError::Reverted(_))));

        let mut payable = call(DEV_TIMELOCK_ADDRESS, DEV_PSM_ADDRESS, "pause()", vec![]);
        payable.value = U256::from(1);
        let err = chain.call(&payable).await.unwrap_err();
        assert_eq!(err, CallError::Reverted("non-payable method".into()));
    }

    #[tokio::test]
    async fn test_mint_requires_minter_role() {
        let chain = dev_chain();
        let mint = call(
            SIMULATION_HARNESS_ADDRESS,
            DEV_FEI_ADDRESS,
            "mint(address,uint256)",
            vec![addr(DEV_OLD_VAULT_ADDRESS), uint(500)],
        );
        assert!(chain.call(&mint).await.is_err());

        let grant = call(
            DEV_TIMELOCK_ADDRESS,
            DEV_CORE_ADDRESS,
            "grantRole(bytes32,address)",
            vec![DynSolValue::FixedBytes(minter_role(), 32), addr(SIMULATION_HARNESS_ADDRESS)],
        );
        chain.call(&grant).await.unwrap();
        chain.call(&mint).await.unwrap();

        let supply = chain
            .view(&call(Address::ZERO, DEV_FEI_ADDRESS, "totalSupply()", vec![]))
            .await
            .unwrap();
        assert_eq!(decode_u256(&supply).unwrap(), U256::from(500));
    }

    #[tokio::test]
    async fn test_mint_overflow_reverts() {
        let chain = dev_chain();
        let grant = call(
            DEV_TIMELOCK_ADDRESS,
            DEV_CORE_ADDRESS,
            "grantRole(bytes32,address)",
            vec![DynSolValue::FixedBytes(minter_role(), 32), addr(SIMULATION_HARNESS_ADDRESS)],
        );
        chain.call(&grant).await.unwrap();

        let mint_max = call(
            SIMULATION_HARNESS_ADDRESS,
            DEV_FEI_ADDRESS,
            "mint(address,uint256)",
            vec![addr(DEV_OLD_VAULT_ADDRESS), DynSolValue::Uint(U256::MAX, 256)],
        );
        chain.call(&mint_max).await.unwrap();
        let err = chain.call(&mint_max).await.unwrap_err();
        assert_eq!(err, CallError::Reverted("ERC20: mint overflow".into()));

        let supply = chain
            .view(&call(Address::ZERO, DEV_FEI_ADDRESS, "totalSupply()", vec![]))
            .await
            .unwrap();
        assert_eq!(decode_u256(&supply).unwrap(), U256::MAX);
    }

    #[tokio::test]
    async fn test_vault_deposit_order_matters() {
        let chain = dev_chain();
        chain
            .deploy(
                DEV_FEI_ADDRESS,
                ContractState::Token {
                    core: DEV_CORE_ADDRESS,
                    total_supply: U256::from(100),
                    balances: [(DEV_OLD_VAULT_ADDRESS, U256::from(100))].into_iter().collect(),
                },
            )
            .await;

        let deposit = call(DEV_TIMELOCK_ADDRESS, DEV_NEW_VAULT_ADDRESS, "deposit()", vec![]);
        assert!(chain.call(&deposit).await.is_err(), "nothing to deposit yet");

        let withdraw = call(
            DEV_TIMELOCK_ADDRESS,
            DEV_OLD_VAULT_ADDRESS,
            "withdraw(address,uint256)",
            vec![addr(DEV_NEW_VAULT_ADDRESS), uint(100)],
        );
        chain.call(&withdraw).await.unwrap();
        chain.call(&deposit).await.unwrap();

        let deposited = chain
            .view(&call(Address::ZERO, DEV_NEW_VAULT_ADDRESS, "deposited()", vec![]))
            .await
            .unwrap();
        assert_eq!(decode_u256(&deposited).unwrap(), U256::from(100));
    }

    #[tokio::test]
    async fn test_failed_call_leaves_state_untouched() {
        let chain = dev_chain();
        let before = chain.contract(DEV_OLD_VAULT_ADDRESS).await;
        let overdraw = call(
            DEV_TIMELOCK_ADDRESS,
            DEV_OLD_VAULT_ADDRESS,
            "withdraw(address,uint256)",
            vec![addr(DEV_NEW_VAULT_ADDRESS), uint(1)],
        );
        assert!(chain.call(&overdraw).await.is_err());
        assert_eq!(chain.contract(DEV_OLD_VAULT_ADDRESS).await, before);
    }

    #[tokio::test]
    async fn test_view_discards_writes() {
        let chain = dev_chain();
        let pause = call(DEV_TIMELOCK_ADDRESS, DEV_PSM_ADDRESS, "pause()", vec![]);
        chain.view(&pause).await.unwrap();
        let paused = chain
            .view(&call(Address::ZERO, DEV_PSM_ADDRESS, "paused()", vec![]))
            .await
            .unwrap();
        assert!(!decode_bool(&paused).unwrap());
    }

    #[tokio::test]
    async fn test_fund_and_balance() {
        let chain = InMemoryChain::new();
        assert_eq!(chain.balance(SIMULATION_HARNESS_ADDRESS).await.unwrap(), U256::ZERO);
        chain.fund(SIMULATION_HARNESS_ADDRESS, U256::from(7)).await.unwrap();
        chain.fund(SIMULATION_HARNESS_ADDRESS, U256::from(3)).await.unwrap();
        assert_eq!(chain.balance(SIMULATION_HARNESS_ADDRESS).await.unwrap(), U256::from(10));
    }
}
