use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use crate::executor::abi::{
    arg_address, arg_b256, arg_u256, encode_address, encode_bool, encode_u256,
};
use crate::executor::{CallError, ContractCall};

/// Admin role of the access-control core
pub const DEFAULT_ADMIN_ROLE: B256 = B256::ZERO;

/// Role allowed to mint the protocol token.
pub fn minter_role() -> B256 {
    keccak256("MINTER_ROLE")
}

/// Behaviours the in-memory deployment can simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractKind {
    /// Two-step admin handover (`setPendingAdmin` / `acceptAdmin`)
    Timelock,
    /// Module with global, mint and redeem pause switches
    Pausable,
    /// Minimal ERC-20 whose minting is gated by the core's MINTER role
    Token,
    /// Role registry (`grantRole` / `revokeRole` / `hasRole`)
    Access,
    /// PCV vault holding protocol tokens
    Vault,
}

impl ContractKind {
    /// Label used in deployment records
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timelock => "timelock",
            Self::Pausable => "pausable",
            Self::Token => "token",
            Self::Access => "access",
            Self::Vault => "vault",
        }
    }

    /// Canonical signatures this kind responds to.
    pub fn methods(&self) -> &'static [&'static str] {
        match self {
            Self::Timelock => {
                &["admin()", "pendingAdmin()", "setPendingAdmin(address)", "acceptAdmin()"]
            }
            Self::Pausable => &[
                "paused()",
                "mintPaused()",
                "redeemPaused()",
                "pause()",
                "unpause()",
                "pauseMint()",
                "unpauseMint()",
                "pauseRedeem()",
                "unpauseRedeem()",
            ],
            Self::Token => &[
                "balanceOf(address)",
                "totalSupply()",
                "transfer(address,uint256)",
                "mint(address,uint256)",
            ],
            Self::Access => &[
                "hasRole(bytes32,address)",
                "grantRole(bytes32,address)",
                "revokeRole(bytes32,address)",
            ],
            Self::Vault => &["deposited()", "deposit()", "withdraw(address,uint256)"],
        }
    }
}

impl FromStr for ContractKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "timelock" => Ok(Self::Timelock),
            "pausable" => Ok(Self::Pausable),
            "token" => Ok(Self::Token),
            "access" => Ok(Self::Access),
            "vault" => Ok(Self::Vault),
            other => Err(format!("unknown contract kind '{other}'")),
        }
    }
}

/// Storage of one simulated contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractState {
    /// Timelock admin slots
    Timelock {
        /// Current admin
        admin: Address,
        /// Nominated admin, zero when none
        pending_admin: Address,
    },
    /// Pause switches
    Pausable {
        /// Address allowed to flip switches
        governor: Address,
        /// Global pause
        paused: bool,
        /// Mint pause
        mint_paused: bool,
        /// Redeem pause
        redeem_paused: bool,
    },
    /// Token ledger
    Token {
        /// Access-control core consulted for MINTER
        core: Address,
        /// Total supply
        total_supply: U256,
        /// Holder balances
        balances: BTreeMap<Address, U256>,
    },
    /// Granted (role, account) pairs
    Access {
        /// Role grants
        roles: BTreeSet<(B256, Address)>,
    },
    /// Vault bookkeeping
    Vault {
        /// Address allowed to withdraw
        governor: Address,
        /// Token held by the vault
        token: Address,
        /// Amount moved into the strategy by `deposit()`
        deposited: U256,
    },
}

impl ContractState {
    /// Behaviour of this contract
    pub fn kind(&self) -> ContractKind {
        match self {
            Self::Timelock { .. } => ContractKind::Timelock,
            Self::Pausable { .. } => ContractKind::Pausable,
            Self::Token { .. } => ContractKind::Token,
            Self::Access { .. } => ContractKind::Access,
            Self::Vault { .. } => ContractKind::Vault,
        }
    }
}

fn revert(reason: impl Into<String>) -> CallError {
    CallError::Reverted(reason.into())
}

fn require(condition: bool, reason: &str) -> Result<(), CallError> {
    if condition {
        Ok(())
    } else {
        Err(revert(reason))
    }
}

/// All simulated contracts and native balances.
#[derive(Debug, Clone, Default)]
pub(crate) struct ChainState {
    pub(crate) contracts: BTreeMap<Address, ContractState>,
    pub(crate) balances: BTreeMap<Address, U256>,
}

impl ChainState {
    /// Execute `call` against this state.
    pub(crate) fn dispatch(&mut self, call: &ContractCall) -> Result<Bytes, CallError> {
        let kind = self
            .contracts
            .get(&call.to)
            .map(ContractState::kind)
            .ok_or_else(|| revert(format!("no contract at {}", call.to)))?;

        if !kind.methods().contains(&call.method.canonical()) {
            return Err(revert(format!(
                "{} does not implement {}",
                kind.as_str(),
                call.method.canonical()
            )));
        }
        require(call.value.is_zero(), "non-payable method")?;

        match kind {
            ContractKind::Timelock => self.timelock(call),
            ContractKind::Pausable => self.pausable(call),
            ContractKind::Token => self.token(call),
            ContractKind::Access => self.access(call),
            ContractKind::Vault => self.vault(call),
        }
    }

    fn timelock(&mut self, call: &ContractCall) -> Result<Bytes, CallError> {
        let Some(ContractState::Timelock {
            admin,
            pending_admin,
        }) = self.contracts.get_mut(&call.to)
        else {
            return Err(revert("not a timelock"));
        };
        match call.method.name() {
            "admin" => Ok(encode_address(*admin)),
            "pendingAdmin" => Ok(encode_address(*pending_admin)),
            "setPendingAdmin" => {
                require(call.from == *admin, "Timelock: caller is not admin")?;
                *pending_admin = arg_address(&call.args, 0)?;
                Ok(Bytes::new())
            }
            "acceptAdmin" => {
                require(
                    !pending_admin.is_zero() && call.from == *pending_admin,
                    "Timelock: caller is not pending admin",
                )?;
                *admin = *pending_admin;
                *pending_admin = Address::ZERO;
                Ok(Bytes::new())
            }
            other => Err(revert(format!("timelock: unhandled {other}"))),
        }
    }

    fn pausable(&mut self, call: &ContractCall) -> Result<Bytes, CallError> {
        let Some(ContractState::Pausable {
            governor,
            paused,
            mint_paused,
            redeem_paused,
        }) = self.contracts.get_mut(&call.to)
        else {
            return Err(revert("not pausable"));
        };
        let (flag, value) = match call.method.name() {
            "paused" => return Ok(encode_bool(*paused)),
            "mintPaused" => return Ok(encode_bool(*mint_paused)),
            "redeemPaused" => return Ok(encode_bool(*redeem_paused)),
            "pause" => {
                require(!*paused, "Pausable: paused")?;
                (paused, true)
            }
            "unpause" => {
                require(*paused, "Pausable: not paused")?;
                (paused, false)
            }
            "pauseMint" => (mint_paused, true),
            "unpauseMint" => (mint_paused, false),
            "pauseRedeem" => (redeem_paused, true),
            "unpauseRedeem" => (redeem_paused, false),
            other => return Err(revert(format!("pausable: unhandled {other}"))),
        };
        require(call.from == *governor, "CoreRef: caller is not governor")?;
        *flag = value;
        Ok(Bytes::new())
    }

    fn token(&mut self, call: &ContractCall) -> Result<Bytes, CallError> {
        let core = match self.contracts.get(&call.to) {
            Some(ContractState::Token { core, .. }) => *core,
            _ => return Err(revert("not a token")),
        };
        match call.method.name() {
            "balanceOf" => {
                let holder = arg_address(&call.args, 0)?;
                Ok(encode_u256(self.token_balance(call.to, holder)))
            }
            "totalSupply" => match self.contracts.get(&call.to) {
                Some(ContractState::Token { total_supply, .. }) => Ok(encode_u256(*total_supply)),
                _ => Err(revert("not a token")),
            },
            "transfer" => {
                let to = arg_address(&call.args, 0)?;
                let amount = arg_u256(&call.args, 1)?;
                self.token_transfer(call.to, call.from, to, amount)?;
                Ok(encode_bool(true))
            }
            "mint" => {
                require(
                    self.has_role(core, minter_role(), call.from),
                    "CoreRef: caller is not a minter",
                )?;
                let to = arg_address(&call.args, 0)?;
                let amount = arg_u256(&call.args, 1)?;
                if let Some(ContractState::Token {
                    total_supply,
                    balances,
                    ..
                }) = self.contracts.get_mut(&call.to)
                {
                    let supply = total_supply
                        .checked_add(amount)
                        .ok_or_else(|| revert("ERC20: mint overflow"))?;
                    let balance = balances.entry(to).or_default();
                    *balance = balance
                        .checked_add(amount)
                        .ok_or_else(|| revert("ERC20: mint overflow"))?;
                    *total_supply = supply;
                }
                Ok(Bytes::new())
            }
            other => Err(revert(format!("token: unhandled {other}"))),
        }
    }

    fn access(&mut self, call: &ContractCall) -> Result<Bytes, CallError> {
        let role = arg_b256(&call.args, 0)?;
        let account = arg_address(&call.args, 1)?;
        let is_admin = self.has_role(call.to, DEFAULT_ADMIN_ROLE, call.from);
        let Some(ContractState::Access { roles }) = self.contracts.get_mut(&call.to) else {
            return Err(revert("not an access registry"));
        };
        match call.method.name() {
            "hasRole" => Ok(encode_bool(roles.contains(&(role, account)))),
            "grantRole" => {
                require(is_admin, "AccessControl: sender must be an admin to grant")?;
                roles.insert((role, account));
                Ok(Bytes::new())
            }
            "revokeRole" => {
                require(is_admin, "AccessControl: sender must be an admin to revoke")?;
                roles.remove(&(role, account));
                Ok(Bytes::new())
            }
            other => Err(revert(format!("access: unhandled {other}"))),
        }
    }

    fn vault(&mut self, call: &ContractCall) -> Result<Bytes, CallError> {
        let (governor, token, deposited) = match self.contracts.get(&call.to) {
            Some(ContractState::Vault {
                governor,
                token,
                deposited,
            }) => (*governor, *token, *deposited),
            _ => return Err(revert("not a vault")),
        };
        let new_deposited = match call.method.name() {
            "deposited" => return Ok(encode_u256(deposited)),
            "deposit" => {
                let idle = self.token_balance(token, call.to).saturating_sub(deposited);
                require(!idle.is_zero(), "PCVDeposit: nothing to deposit")?;
                deposited + idle
            }
            "withdraw" => {
                require(call.from == governor, "CoreRef: caller is not governor")?;
                let to = arg_address(&call.args, 0)?;
                let amount = arg_u256(&call.args, 1)?;
                self.token_transfer(token, call.to, to, amount)?;
                deposited.saturating_sub(amount)
            }
            other => return Err(revert(format!("vault: unhandled {other}"))),
        };
        if let Some(ContractState::Vault { deposited, .. }) = self.contracts.get_mut(&call.to) {
            *deposited = new_deposited;
        }
        Ok(Bytes::new())
    }

    fn has_role(&self, access: Address, role: B256, account: Address) -> bool {
        matches!(
            self.contracts.get(&access),
            Some(ContractState::Access { roles }) if roles.contains(&(role, account))
        )
    }

    fn token_balance(&self, token: Address, holder: Address) -> U256 {
        match self.contracts.get(&token) {
            Some(ContractState::Token { balances, .. }) => {
                balances.get(&holder).copied().unwrap_or_default()
            }
            _ => U256::ZERO,
        }
    }

    fn token_transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), CallError> {
        let Some(ContractState::Token { balances, .. }) = self.contracts.get_mut(&token) else {
            return Err(revert(format!("no token at {token}")));
        };
        let from_balance = balances.get(&from).copied().unwrap_or_default();
        require(from_balance >= amount, "ERC20: transfer amount exceeds balance")?;
        balances.insert(from, from_balance - amount);
        let to_balance = balances.entry(to).or_default();
        *to_balance = to_balance
            .checked_add(amount)
            .ok_or_else(|| revert("ERC20: balance overflow"))?;
        Ok(())
    }
}
