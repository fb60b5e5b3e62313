//! Platform ABI type registry.
//!
//! A target's [`abi::LayoutTable`] says how every standard type name is laid out.
//! A [`registry::Registry`] serves requests for those names within one compilation
//! unit, emitting each definition at most once and honouring guards set by other
//! producers of the same vocabulary.

pub mod abi;
pub mod emit;
pub mod loader;
pub mod registry;

pub use abi::{Dialect, LayoutTable, TargetConfig};
pub use emit::RenderStyle;
pub use loader::LoadError;
pub use registry::{Definition, Registry, RegistryError, RegistryOptions, UnknownTypePolicy};
