//! Command Executor
//!
//! Dispatches resolved commands through a [`ContractCaller`], the seam to
//! whatever actually executes calls (a forked node, a live network, or the
//! in-memory test deployment).
//!
//! The executor holds no state. Commands run strictly one at a time in the
//! order given; governance effects are frequently order-dependent.

pub mod abi;
pub mod errors;
mod recorder;

pub use errors::CallError;
pub use recorder::RecordingCaller;

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use std::fmt;
use tracing::{debug, info};

use crate::proposal::{
    encode_calldata, resolve, resolve_all, Command, MethodSignature, ProposalDescription,
    ProposalError, ResolvedCommand,
};
use crate::registry::AddressRegistry;

/// One call sent through the contract-calling interface.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractCall {
    /// Sender
    pub from: Address,
    /// Target contract
    pub to: Address,
    /// Method being invoked
    pub method: MethodSignature,
    /// Typed arguments
    pub args: Vec<DynSolValue>,
    /// Payable amount
    pub value: U256,
}

impl ContractCall {
    /// `selector ‖ abi.encode(args)`
    pub fn calldata(&self) -> Bytes {
        encode_calldata(&self.method, &self.args)
    }
}

impl fmt::Display for ContractCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self.args.iter().map(abi::format_value).collect();
        write!(f, "{}.{}({})", self.to, self.method.name(), args.join(", "))?;
        if !self.value.is_zero() {
            write!(f, " value={}", self.value)?;
        }
        Ok(())
    }
}

/// Contract-calling interface consumed by the executor and lifecycle phases.
///
/// In production: implemented over a forked or live node.
/// In tests: implemented by [`InMemoryChain`](crate::chain::InMemoryChain) or a
/// [`RecordingCaller`].
#[async_trait]
pub trait ContractCaller: Send + Sync {
    /// Execute a state-changing call and return its raw output.
    async fn call(&self, call: &ContractCall) -> Result<Bytes, CallError>;

    /// Execute a read-only call; state changes, if any, are discarded.
    async fn view(&self, call: &ContractCall) -> Result<Bytes, CallError> {
        self.call(call).await
    }

    /// Native balance of `address`.
    async fn balance(&self, address: Address) -> Result<U256, CallError>;

    /// Credit `amount` of native currency to `address` (simulation harnesses only).
    async fn fund(&self, address: Address, _amount: U256) -> Result<(), CallError> {
        Err(CallError::Unsupported(format!("cannot fund {address}")))
    }
}

/// Stateless dispatcher for resolved commands.
#[derive(Clone, Copy)]
pub struct CommandExecutor<'a> {
    registry: &'a AddressRegistry,
    caller: &'a dyn ContractCaller,
    sender: Address,
}

impl fmt::Debug for CommandExecutor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandExecutor")
            .field("network", &self.registry.network())
            .field("sender", &self.sender)
            .finish()
    }
}

impl<'a> CommandExecutor<'a> {
    /// Create an executor sending calls from `sender`.
    pub fn new(
        registry: &'a AddressRegistry,
        caller: &'a dyn ContractCaller,
        sender: Address,
    ) -> Self {
        Self {
            registry,
            caller,
            sender,
        }
    }

    /// Check the preconditions of a resolved command: the target is known and
    /// its interface exposes the method.
    pub fn check(&self, command: &ResolvedCommand) -> Result<(), ProposalError> {
        let handle = self
            .registry
            .lookup(&command.target_name)
            .ok_or_else(|| ProposalError::UnknownTarget {
                target: command.target_name.clone(),
            })?;
        if !handle.has_method(command.method.canonical()) {
            return Err(ProposalError::UnknownMethod {
                target: command.target_name.clone(),
                method: command.method.canonical().to_string(),
            });
        }
        Ok(())
    }

    /// Check and dispatch one resolved command.
    pub async fn dispatch(&self, command: &ResolvedCommand) -> Result<Bytes, ProposalError> {
        self.check(command)?;
        let call = command.to_call(self.sender);
        debug!(
            target: "proposal_sim::executor",
            call = %call,
            calldata = %call.calldata(),
            "dispatching"
        );
        self.caller
            .call(&call)
            .await
            .map_err(|source| ProposalError::Execution {
                command: command.label(),
                source,
            })
    }

    /// Resolve, check and dispatch one command.
    pub async fn execute(&self, command: &Command) -> Result<Bytes, ProposalError> {
        let resolved = resolve(command, self.registry)?;
        self.dispatch(&resolved).await
    }

    /// Execute every command of a description in order.
    ///
    /// All commands are resolved and checked before the first call is sent,
    /// so configuration errors anywhere in the proposal dispatch nothing.
    /// A failing call stops the sequence; earlier calls are not undone.
    pub async fn execute_description(
        &self,
        description: &ProposalDescription,
    ) -> Result<Vec<Bytes>, ProposalError> {
        let resolved = resolve_all(description, self.registry)?;
        for command in &resolved {
            self.check(command)?;
        }

        let mut outputs = Vec::with_capacity(resolved.len());
        for command in &resolved {
            outputs.push(self.dispatch(command).await?);
        }
        info!(
            target: "proposal_sim::executor",
            title = description.title(),
            commands = outputs.len(),
            "proposal commands executed"
        );
        Ok(outputs)
    }
}
