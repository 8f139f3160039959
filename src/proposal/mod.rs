//! Proposal descriptions
//!
//! A proposal is described declaratively (title, ordered commands, rationale)
//! independently of whether or when it executes. Commands name their target
//! symbolically and are resolved against an [`AddressRegistry`](crate::registry::AddressRegistry)
//! by the templater just before dispatch.

mod command;
mod description;
pub mod errors;
pub mod signature;
pub mod templater;

pub use command::{ArgumentTemplate, Arguments, Command, TemplateScope};
pub use description::{ProposalDescription, RenderedCommand, RenderedDescription};
pub use errors::ProposalError;
pub use signature::{function_selector, MethodSignature};
pub use templater::{encode_calldata, resolve, resolve_all, ResolvedCommand};
