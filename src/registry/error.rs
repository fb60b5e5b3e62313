use crate::abi::Dialect;

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Failures surfaced only under [`UnknownTypePolicy::Reject`](super::UnknownTypePolicy).
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("type '{name}' is not in the {dialect} layout table of target '{target}'")]
    UnknownType {
        name: String,
        target: String,
        dialect: Dialect,
    },
    #[error("{} requested type(s) missing from target '{target}': {}", .names.len(), .names.join(", "))]
    UnknownTypes { names: Vec<String>, target: String },
}
