//! Address Registry
//!
//! Maps symbolic contract names to deployed contract handles for one
//! environment (mainnet, a fork, or the in-memory test deployment).
//!
//! Two generations are tracked side by side:
//!   - current: the contracts proposals normally target (`timelock`)
//!   - old:     the previous deployment of a contract during a migration,
//!              addressed as `old.<name>` (`old.timelock`)
//!
//! The registry is populated once per run and is read-only for the whole
//! proposal lifecycle.

pub mod addresses;
pub mod errors;
mod record;

pub use addresses::{
    DEV_CORE_ADDRESS, DEV_DAI_PSM_ADDRESS, DEV_FEI_ADDRESS, DEV_GUARDIAN_MULTISIG_ADDRESS,
    DEV_NEW_VAULT_ADDRESS, DEV_OLD_TIMELOCK_ADDRESS, DEV_OLD_VAULT_ADDRESS, DEV_PSM_ADDRESS,
    DEV_TIMELOCK_ADDRESS, SIMULATION_HARNESS_ADDRESS,
};
pub use errors::RegistryError;
pub use record::{DeploymentRecord, RecordEntry};

use alloy_primitives::Address;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::proposal::MethodSignature;

/// Prefix selecting the old generation in symbolic references.
pub const OLD_PREFIX: &str = "old.";

/// A named, deployed contract and the interface it exposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractHandle {
    /// Symbolic name the handle is registered under
    pub name: String,
    /// Deployed address
    pub address: Address,
    /// Behaviour label (only meaningful to the in-memory test deployment)
    pub kind: Option<String>,
    /// Canonical method signatures callable on this contract
    pub interface: BTreeSet<String>,
}

impl ContractHandle {
    /// Create a handle with an empty interface.
    pub fn new(name: impl Into<String>, address: Address) -> Self {
        Self {
            name: name.into(),
            address,
            kind: None,
            interface: BTreeSet::new(),
        }
    }

    /// Attach a behaviour label.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Extend the interface with the given canonical signatures.
    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interface.extend(methods.into_iter().map(Into::into));
        self
    }

    /// Whether `signature` (canonical form) is part of the interface.
    pub fn has_method(&self, signature: &str) -> bool {
        self.interface.contains(signature)
    }

    /// Build a handle from a record entry, normalizing every declared method
    /// to its canonical signature.
    fn from_entry(name: &str, entry: RecordEntry) -> Result<Self, RegistryError> {
        match entry {
            RecordEntry::Bare(address) => Ok(Self::new(name, address)),
            RecordEntry::Contract {
                address,
                kind,
                methods,
            } => {
                let canonical = methods
                    .iter()
                    .map(|signature| {
                        MethodSignature::parse(signature)
                            .map(|method| method.canonical().to_string())
                            .map_err(|e| RegistryError::InvalidMethod {
                                name: name.to_string(),
                                signature: signature.clone(),
                                reason: e.to_string(),
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let mut handle = Self::new(name, address).with_methods(canonical);
                handle.kind = kind;
                Ok(handle)
            }
        }
    }
}

/// Symbolic name → contract handle, for the current and old generations.
#[derive(Debug, Clone, Default)]
pub struct AddressRegistry {
    network: String,
    current: BTreeMap<String, ContractHandle>,
    old: BTreeMap<String, ContractHandle>,
}

impl AddressRegistry {
    /// Create an empty registry for `network`.
    pub fn new(network: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            ..Default::default()
        }
    }

    /// Build a registry from a parsed deployment record.
    pub fn from_record(record: DeploymentRecord) -> Result<Self, RegistryError> {
        let mut registry = Self::new(record.network);
        for (name, entry) in record.contracts {
            if name.is_empty() {
                return Err(RegistryError::EmptyName);
            }
            registry.insert(ContractHandle::from_entry(&name, entry)?);
        }
        for (name, entry) in record.old {
            if name.is_empty() {
                return Err(RegistryError::EmptyName);
            }
            registry.insert_old(ContractHandle::from_entry(&name, entry)?);
        }
        Ok(registry)
    }

    /// Parse a deployment record from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let record: DeploymentRecord = serde_json::from_str(json)?;
        Self::from_record(record)
    }

    /// Load a deployment record file.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let json = std::fs::read_to_string(path)
            .map_err(|source| RegistryError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json(&json)
    }

    /// Environment label
    pub fn network(&self) -> &str {
        &self.network
    }

    /// Register (or replace) a current-generation handle.
    pub fn insert(&mut self, handle: ContractHandle) {
        self.current.insert(handle.name.clone(), handle);
    }

    /// Register (or replace) an old-generation handle.
    pub fn insert_old(&mut self, handle: ContractHandle) {
        self.old.insert(handle.name.clone(), handle);
    }

    /// Current-generation handle by name
    pub fn handle(&self, name: &str) -> Option<&ContractHandle> {
        self.current.get(name)
    }

    /// Old-generation handle by name
    pub fn old_handle(&self, name: &str) -> Option<&ContractHandle> {
        self.old.get(name)
    }

    /// Resolve a symbolic reference, honouring the `old.` prefix.
    pub fn lookup(&self, reference: &str) -> Option<&ContractHandle> {
        match reference.strip_prefix(OLD_PREFIX) {
            Some(name) => self.old_handle(name),
            None => self.handle(reference),
        }
    }

    /// Current-generation address by name
    pub fn address(&self, name: &str) -> Option<Address> {
        self.handle(name).map(|h| h.address)
    }

    /// Old-generation address by name
    pub fn old_address(&self, name: &str) -> Option<Address> {
        self.old_handle(name).map(|h| h.address)
    }

    /// Current-generation handles, ordered by name.
    pub fn handles(&self) -> impl Iterator<Item = &ContractHandle> {
        self.current.values()
    }

    /// Old-generation handles keyed by name.
    pub fn old_contracts(&self) -> &BTreeMap<String, ContractHandle> {
        &self.old
    }

    /// Current-generation names, ordered.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.current.keys().map(String::as_str)
    }

    /// Symbolic name registered for `address` (current generation first).
    pub fn name_of(&self, address: Address) -> Option<String> {
        if let Some(handle) = self.current.values().find(|h| h.address == address) {
            return Some(handle.name.clone());
        }
        self.old
            .values()
            .find(|h| h.address == address)
            .map(|h| format!("{OLD_PREFIX}{}", h.name))
    }

    /// Number of current-generation entries
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Whether the current generation is empty
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}
