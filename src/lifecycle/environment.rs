use alloy_primitives::{Address, Bytes, U256};
use std::fmt;
use tracing::debug;

use super::validation::ValidationReport;
use crate::executor::{abi, CallError, CommandExecutor, ContractCaller};
use crate::invariants::{InvariantConfig, PauseFlags};
use crate::output;
use crate::proposal::{resolve, Command, ProposalDescription, ProposalError};
use crate::registry::{AddressRegistry, SIMULATION_HARNESS_ADDRESS};

/// Shared handle passed to every lifecycle phase.
///
/// Bundles the registry (current addresses and old contracts), the
/// contract-calling interface, the invariant config, the identities calls are
/// sent from, and the `logging` flag. Nothing here is global; phases only see
/// what they are handed.
#[derive(Clone, Copy)]
pub struct Environment<'a> {
    registry: &'a AddressRegistry,
    caller: &'a dyn ContractCaller,
    invariants: &'a InvariantConfig,
    executor: Address,
    harness: Address,
    logging: bool,
}

impl fmt::Debug for Environment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("network", &self.registry.network())
            .field("executor", &self.executor)
            .field("harness", &self.harness)
            .field("logging", &self.logging)
            .finish()
    }
}

impl<'a> Environment<'a> {
    /// Create an environment whose proposal commands are sent from `executor`.
    pub fn new(
        registry: &'a AddressRegistry,
        caller: &'a dyn ContractCaller,
        invariants: &'a InvariantConfig,
        executor: Address,
    ) -> Self {
        Self {
            registry,
            caller,
            invariants,
            executor,
            harness: SIMULATION_HARNESS_ADDRESS,
            logging: false,
        }
    }

    /// Enable or disable human-readable progress output.
    pub fn with_logging(mut self, logging: bool) -> Self {
        self.logging = logging;
        self
    }

    /// Same environment, different contract-calling interface.
    pub fn with_caller<'b>(&self, caller: &'b dyn ContractCaller) -> Environment<'b>
    where
        'a: 'b,
    {
        Environment {
            registry: self.registry,
            caller,
            invariants: self.invariants,
            executor: self.executor,
            harness: self.harness,
            logging: self.logging,
        }
    }

    /// Address registry (current generation plus old contracts)
    pub fn addresses(&self) -> &'a AddressRegistry {
        self.registry
    }

    /// Whether progress output is enabled
    pub fn logging(&self) -> bool {
        self.logging
    }

    /// Expected pause flags and guardian allow-list
    pub fn invariants(&self) -> &'a InvariantConfig {
        self.invariants
    }

    /// Governance executor address
    pub fn executor(&self) -> Address {
        self.executor
    }

    /// Harness identity
    pub fn harness(&self) -> Address {
        self.harness
    }

    /// Current-generation address of `name`, or `MissingAddress`.
    pub fn address(&self, name: &str) -> Result<Address, ProposalError> {
        self.registry
            .address(name)
            .ok_or_else(|| ProposalError::MissingAddress {
                name: name.to_string(),
            })
    }

    /// Old-generation address of `name`, or `MissingAddress`.
    pub fn old_address(&self, name: &str) -> Result<Address, ProposalError> {
        self.registry
            .old_address(name)
            .ok_or_else(|| ProposalError::MissingAddress {
                name: format!("old.{name}"),
            })
    }

    /// Executor sending calls from `sender`.
    pub fn executor_for(&self, sender: Address) -> CommandExecutor<'a> {
        CommandExecutor::new(self.registry, self.caller, sender)
    }

    /// Execute a command from the governance executor.
    pub async fn execute(&self, command: &Command) -> Result<Bytes, ProposalError> {
        self.execute_as(self.executor, command).await
    }

    /// Execute a command from an arbitrary sender (harness setup, old admins).
    pub async fn execute_as(
        &self,
        from: Address,
        command: &Command,
    ) -> Result<Bytes, ProposalError> {
        let resolved = resolve(command, self.registry)?;
        if self.logging {
            let sender = self.registry.name_of(from).unwrap_or_else(|| from.to_string());
            output::print_command(&resolved.label(), &sender);
        }
        self.executor_for(from).dispatch(&resolved).await
    }

    /// Execute every command of a description from the governance executor.
    pub async fn execute_description(
        &self,
        description: &ProposalDescription,
    ) -> Result<Vec<Bytes>, ProposalError> {
        if self.logging {
            for command in description.commands() {
                output::print_declared_command(&command.label(), &command.description);
            }
        }
        self.executor_for(self.executor).execute_description(description).await
    }

    /// Read-only call `target.method(args)`; arguments may use placeholders.
    pub async fn view(
        &self,
        target: &str,
        method: &str,
        args: &[&str],
    ) -> Result<Bytes, ProposalError> {
        let command = Command::new(target, method).args(args.iter().copied());
        let resolved = resolve(&command, self.registry)?;
        let executor = self.executor_for(self.executor);
        executor.check(&resolved)?;
        self.caller
            .view(&resolved.to_call(self.executor))
            .await
            .map_err(|source| ProposalError::Execution {
                command: resolved.label(),
                source,
            })
    }

    /// View returning an address.
    pub async fn view_address(
        &self,
        target: &str,
        method: &str,
        args: &[&str],
    ) -> Result<Address, ProposalError> {
        let data = self.view(target, method, args).await?;
        abi::decode_address(&data).map_err(|e| decode_error(target, method, e))
    }

    /// View returning a uint256.
    pub async fn view_u256(
        &self,
        target: &str,
        method: &str,
        args: &[&str],
    ) -> Result<U256, ProposalError> {
        let data = self.view(target, method, args).await?;
        abi::decode_u256(&data).map_err(|e| decode_error(target, method, e))
    }

    /// View returning a bool.
    pub async fn view_bool(
        &self,
        target: &str,
        method: &str,
        args: &[&str],
    ) -> Result<bool, ProposalError> {
        let data = self.view(target, method, args).await?;
        abi::decode_bool(&data).map_err(|e| decode_error(target, method, e))
    }

    /// Native balance of a registry entry.
    pub async fn balance(&self, name: &str) -> Result<U256, ProposalError> {
        let address = self.address(name)?;
        self.caller.balance(address).await.map_err(|source| ProposalError::Execution {
            command: format!("balance({name})"),
            source,
        })
    }

    /// Compare every deployed, managed module's pause flags with the expected
    /// `PauseState`, recording mismatches in `report`.
    ///
    /// Modules named in the config but absent from this registry are skipped.
    pub async fn verify_pause_state(
        &self,
        report: &mut ValidationReport,
    ) -> Result<(), ProposalError> {
        let pause_state = &self.invariants.pause_state;
        for (module, expected) in pause_state.iter() {
            if self.registry.handle(module).is_none() {
                debug!(
                    target: "proposal_sim::validate",
                    module,
                    "not deployed, skipping pause check"
                );
                continue;
            }
            let mint_paused = match expected.mint_paused {
                Some(_) => Some(self.view_bool(module, "mintPaused()", &[]).await?),
                None => None,
            };
            let redeem_paused = match expected.redeem_paused {
                Some(_) => Some(self.view_bool(module, "redeemPaused()", &[]).await?),
                None => None,
            };
            let observed = PauseFlags {
                paused: self.view_bool(module, "paused()", &[]).await?,
                mint_paused,
                redeem_paused,
            };
            pause_state.check(module, &observed, report);
        }
        Ok(())
    }
}

fn decode_error(target: &str, method: &str, source: CallError) -> ProposalError {
    ProposalError::Execution {
        command: format!("{target}.{method}"),
        source,
    }
}
