//! Move the treasury's FEI from the retiring vault into its replacement.
//!
//! The two commands are order-dependent: `deposit()` on the new vault reverts
//! unless the withdrawal has already landed.

use alloy_primitives::{B256, U256};
use async_trait::async_trait;

use crate::chain::minter_role;
use crate::lifecycle::{Environment, LifecycleModule, ValidationReport};
use crate::proposal::{Command, ProposalDescription, ProposalError};

/// Amount of FEI moved by the rebalance (1,000,000 FEI at 18 decimals).
pub fn rebalance_amount() -> U256 {
    U256::from(10u128.pow(24))
}

fn role_arg(role: B256) -> String {
    format!("{role:#x}")
}

/// Withdraws the treasury from `oldVault` into `newVault` and deposits it.
#[derive(Debug, Clone)]
pub struct TreasuryRebalance {
    description: ProposalDescription,
}

impl TreasuryRebalance {
    /// Catalog key
    pub const KEY: &'static str = "treasury_rebalance";

    pub fn new() -> Self {
        let withdraw = Command::new("oldVault", "withdraw(address,uint256)")
            .templated(|scope| {
                Ok(vec![scope.address_arg("newVault")?, rebalance_amount().to_string()])
            })
            .describe("Withdraw the treasury FEI from the old vault into the new vault");
        let deposit = Command::new("newVault", "deposit()")
            .describe("Deposit the received FEI into the new vault's strategy");

        Self {
            description: ProposalDescription::new(
                "Rebalance treasury vaults",
                vec![withdraw, deposit],
                "Retires the old PCV vault. Its FEI is withdrawn to the new vault \
                 and immediately deposited there.",
            ),
        }
    }
}

impl Default for TreasuryRebalance {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LifecycleModule for TreasuryRebalance {
    fn description(&self) -> &ProposalDescription {
        &self.description
    }

    /// Seed the old vault with the treasury balance through a temporary
    /// minter role held by the harness.
    async fn setup(&self, env: &Environment<'_>) -> Result<(), ProposalError> {
        let harness = format!("{:#x}", env.harness());
        let grant = Command::new("core", "grantRole(bytes32,address)")
            .args([role_arg(minter_role()), harness])
            .describe("Grant the harness MINTER");
        env.execute(&grant).await?;

        let mint = Command::new("fei", "mint(address,uint256)")
            .args(["{oldVault}".to_string(), rebalance_amount().to_string()])
            .describe("Mint the treasury balance into the old vault");
        env.execute_as(env.harness(), &mint).await?;
        Ok(())
    }

    async fn teardown(&self, env: &Environment<'_>) -> Result<(), ProposalError> {
        let revoke = Command::new("core", "revokeRole(bytes32,address)")
            .args([role_arg(minter_role()), format!("{:#x}", env.harness())])
            .describe("Revoke the harness MINTER");
        env.execute(&revoke).await.map(|_| ())
    }

    async fn validate(
        &self,
        env: &Environment<'_>,
        report: &mut ValidationReport,
    ) -> Result<(), ProposalError> {
        let amount = rebalance_amount();
        let old_vault = format!("{:#x}", env.address("oldVault")?);
        let new_vault = format!("{:#x}", env.address("newVault")?);

        let old_balance = env.view_u256("fei", "balanceOf(address)", &[old_vault.as_str()]).await?;
        let new_balance = env.view_u256("fei", "balanceOf(address)", &[new_vault.as_str()]).await?;
        let deposited = env.view_u256("newVault", "deposited()", &[]).await?;
        report.expect_eq("oldVault.feiBalance", U256::ZERO, old_balance);
        report.expect_eq("newVault.feiBalance", amount, new_balance);
        report.expect_eq("newVault.deposited", amount, deposited);
        // vaults are not payable; native currency there is stranded
        let native = env.balance("newVault").await?;
        report.expect_eq("newVault.nativeBalance", U256::ZERO, native);

        let role = role_arg(minter_role());
        let harness = format!("{:#x}", env.harness());
        let harness_minter = env
            .view_bool("core", "hasRole(bytes32,address)", &[role.as_str(), harness.as_str()])
            .await?;
        report.expect_eq("core.harnessMinter", false, harness_minter);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{dev_registry, InMemoryChain};
    use crate::executor::{ContractCaller, RecordingCaller};
    use crate::invariants::InvariantConfig;
    use crate::lifecycle::{check_consistency, LifecycleRunner, Phase};
    use crate::proposal::resolve_all;
    use crate::registry::{DEV_NEW_VAULT_ADDRESS, DEV_OLD_VAULT_ADDRESS, DEV_TIMELOCK_ADDRESS};
    use alloy_dyn_abi::DynSolValue;

    #[tokio::test]
    async fn test_full_lifecycle_passes() {
        let registry = dev_registry();
        let chain = InMemoryChain::from_registry(&registry, DEV_TIMELOCK_ADDRESS);
        let invariants = InvariantConfig::bundled().unwrap();
        let env = Environment::new(&registry, &chain, &invariants, DEV_TIMELOCK_ADDRESS);

        let report = LifecycleRunner::new(env).run(&TreasuryRebalance::new()).await.unwrap();

        assert!(report.passed(), "{:?}", report.validation.failures());
        assert_eq!(report.validation.checks(), 5);
    }

    #[test]
    fn test_templated_withdraw_resolves_new_vault() {
        let registry = dev_registry();
        let resolved = resolve_all(TreasuryRebalance::new().description(), &registry).unwrap();

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].target, DEV_OLD_VAULT_ADDRESS);
        assert_eq!(
            resolved[0].args,
            vec![
                DynSolValue::Address(DEV_NEW_VAULT_ADDRESS),
                DynSolValue::Uint(rebalance_amount(), 256)
            ]
        );
        assert_eq!(resolved[1].target, DEV_NEW_VAULT_ADDRESS);
    }

    #[tokio::test]
    async fn test_run_without_setup_fails_in_run() {
        struct SkipSetup(TreasuryRebalance);

        #[async_trait]
        impl LifecycleModule for SkipSetup {
            fn description(&self) -> &ProposalDescription {
                self.0.description()
            }
        }

        let registry = dev_registry();
        let chain = InMemoryChain::from_registry(&registry, DEV_TIMELOCK_ADDRESS);
        let invariants = InvariantConfig::default();
        let env = Environment::new(&registry, &chain, &invariants, DEV_TIMELOCK_ADDRESS);

        let err = LifecycleRunner::new(env)
            .run(&SkipSetup(TreasuryRebalance::new()))
            .await
            .unwrap_err();
        assert_eq!(err.phase, Phase::Run);
        assert_eq!(err.source.kind(), "ExecutionFailure");
    }

    #[tokio::test]
    async fn test_stranded_native_balance_is_reported() {
        let registry = dev_registry();
        let chain = InMemoryChain::from_registry(&registry, DEV_TIMELOCK_ADDRESS);
        chain.fund(DEV_NEW_VAULT_ADDRESS, U256::from(1)).await.unwrap();
        let invariants = InvariantConfig::default();
        let env = Environment::new(&registry, &chain, &invariants, DEV_TIMELOCK_ADDRESS);

        let report = LifecycleRunner::new(env).run(&TreasuryRebalance::new()).await.unwrap();

        let failures = report.validation.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].invariant, "newVault.nativeBalance");
        assert_eq!(failures[0].actual, "1");
    }

    #[tokio::test]
    async fn test_description_matches_run() {
        let registry = dev_registry();
        let invariants = InvariantConfig::default();
        let recorder = RecordingCaller::dry_run();
        let env = Environment::new(&registry, &recorder, &invariants, DEV_TIMELOCK_ADDRESS);

        let module = TreasuryRebalance::new();
        module.description().validate_shape().unwrap();
        assert!(check_consistency(&module, &env).await.unwrap().is_empty());
    }
}
