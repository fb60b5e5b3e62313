//! Per-unit request dispatch. A [`Registry`] borrows an immutable [`LayoutTable`] and
//! owns the guard table of exactly one unit; requests are processed in program order.
//!
//! ```
//! use abitypes::abi::Dialect;
//! use abitypes::loader::builtin;
//! use abitypes::registry::Registry;
//!
//! let table = builtin("armv7-none-eabi").unwrap();
//! let mut unit = Registry::with_dialect(&table, Dialect::C);
//! unit.request("size_t");
//! unit.request("size_t");
//! assert_eq!(unit.definitions().len(), 1);
//! ```

pub mod error;
pub mod guard;
pub mod resolver;

pub use error::{RegistryError, RegistryResult};
pub use guard::{GuardName, GuardScheme, GuardSet, GuardTable};
pub use resolver::{Definition, LayoutResolver, Resolution};

use crate::abi::{Dialect, LayoutTable};
use crate::emit::{self, RenderStyle};

/// What to do with a request for a name the target table does not define.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnknownTypePolicy {
    /// Silently skip the request.
    #[default]
    Ignore,
    /// Report it from [`Registry::try_request`]; [`Registry::request`] logs and skips.
    Reject,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegistryOptions {
    pub dialect: Dialect,
    pub unknown: UnknownTypePolicy,
}

impl RegistryOptions {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            unknown: UnknownTypePolicy::Ignore,
        }
    }

    pub fn strict(mut self) -> Self {
        self.unknown = UnknownTypePolicy::Reject;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The definition was emitted and its guards set.
    Emitted,
    /// A guard (primary or alias) was already set; nothing emitted.
    AlreadyDefined,
    /// The name is only defined for the other dialect.
    OtherDialect,
    /// The name is absent from the table.
    Unknown,
}

pub struct Registry<'t> {
    resolver: LayoutResolver<'t>,
    options: RegistryOptions,
    guards: GuardTable,
    emitted: Vec<Definition>,
}

impl<'t> Registry<'t> {
    pub fn new(table: &'t LayoutTable, options: RegistryOptions) -> Self {
        Self {
            resolver: LayoutResolver::new(table, options.dialect),
            options,
            guards: GuardTable::new(),
            emitted: Vec::new(),
        }
    }

    pub fn with_dialect(table: &'t LayoutTable, dialect: Dialect) -> Self {
        Self::new(table, RegistryOptions::new(dialect))
    }

    pub fn table(&self) -> &'t LayoutTable {
        self.resolver.table()
    }

    pub fn dialect(&self) -> Dialect {
        self.options.dialect
    }

    /// Records a guard set by a producer outside this registry before processing.
    pub fn preset(&mut self, guard: impl Into<String>) {
        let guard = GuardName::new(guard);
        tracing::debug!(%guard, "external guard preset");
        self.guards.set(guard);
    }

    /// Requests a definition of `name`. Idempotent and infallible.
    pub fn request(&mut self, name: &str) {
        if let Err(err) = self.try_request(name) {
            tracing::warn!(%err, "request rejected");
        }
    }

    pub fn request_all<'n>(&mut self, names: impl IntoIterator<Item = &'n str>) {
        for name in names {
            self.request(name);
        }
    }

    /// Like [`request`](Self::request), reporting what happened. Fails only for unknown
    /// names under [`UnknownTypePolicy::Reject`].
    pub fn try_request(&mut self, name: &str) -> RegistryResult<RequestOutcome> {
        let guards = self.resolver.guards_for(name);
        if self.guards.any_set(&guards) {
            tracing::debug!(name, "already defined, request skipped");
            return Ok(RequestOutcome::AlreadyDefined);
        }
        match self.resolver.resolve(name) {
            Resolution::Defined(definition) => {
                tracing::debug!(name, dialect = %self.dialect(), "emitting definition");
                self.guards.set_all(definition.guards.iter().cloned());
                self.emitted.push(definition);
                Ok(RequestOutcome::Emitted)
            }
            Resolution::OtherDialect => {
                tracing::debug!(name, dialect = %self.dialect(), "not defined for this dialect");
                Ok(RequestOutcome::OtherDialect)
            }
            Resolution::Unknown => match self.options.unknown {
                UnknownTypePolicy::Ignore => {
                    tracing::debug!(name, "unknown type ignored");
                    Ok(RequestOutcome::Unknown)
                }
                UnknownTypePolicy::Reject => Err(self.unknown(name)),
            },
        }
    }

    /// Checks a request list against the table without touching any guard.
    pub fn check_requests<'n>(
        &self,
        names: impl IntoIterator<Item = &'n str>,
    ) -> RegistryResult<()> {
        let missing: Vec<String> = names
            .into_iter()
            .filter(|name| !self.table().contains(name))
            .map(str::to_owned)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RegistryError::UnknownTypes {
                names: missing,
                target: self.table().target().name.clone(),
            })
        }
    }

    /// Whether `name` has been defined in this unit, by this registry or through a
    /// preset alias guard.
    pub fn is_defined(&self, name: &str) -> bool {
        self.guards.any_set(&self.resolver.guards_for(name))
    }

    /// Sets every guard of `name` without emitting anything.
    pub fn mark_defined(&mut self, name: &str) {
        let guards = self.resolver.guards_for(name);
        self.guards.set_all(guards);
    }

    pub fn guards(&self) -> &GuardTable {
        &self.guards
    }

    /// Definitions emitted so far, in emission order.
    pub fn definitions(&self) -> &[Definition] {
        &self.emitted
    }

    pub fn render(&self, style: RenderStyle) -> String {
        emit::render_definitions(&self.emitted, self.table().target(), style)
    }

    fn unknown(&self, name: &str) -> RegistryError {
        RegistryError::UnknownType {
            name: name.to_owned(),
            target: self.table().target().name.clone(),
            dialect: self.dialect(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Dispatch behaviour over a two-entry table.
    use super::*;
    use crate::abi::{
        DataModel, DialectScope, LayoutBody, LayoutEntry, QualType, ScalarKind, ScalarType,
        TargetConfig,
    };

    fn table() -> LayoutTable {
        LayoutTable::from_entries(
            TargetConfig::from_model("test", DataModel::Ilp32),
            GuardScheme::default(),
            [
                LayoutEntry::new(
                    "size_t",
                    LayoutBody::Alias(QualType::scalar(ScalarType::unsigned(ScalarKind::Addr))),
                ),
                LayoutEntry::new(
                    "wchar_t",
                    LayoutBody::Alias(QualType::scalar(ScalarType::unsigned(ScalarKind::Int))),
                )
                .scoped(DialectScope::C),
            ],
        )
        .expect("table is well formed")
    }

    #[test]
    fn repeated_request_is_noop() {
        // the second request must see the guard set by the first
        let table = table();
        let mut unit = Registry::with_dialect(&table, Dialect::C);
        assert_eq!(unit.try_request("size_t").unwrap(), RequestOutcome::Emitted);
        assert_eq!(unit.try_request("size_t").unwrap(), RequestOutcome::AlreadyDefined);
        assert_eq!(unit.definitions().len(), 1);
        assert!(unit.guards().is_set("__CLANG_SIZE_T_DEFINED"), "alias guard set too");
    }

    #[test]
    fn preset_alias_suppresses_definition() {
        // a foreign producer already defined size_t under its own guard
        let table = table();
        let mut unit = Registry::with_dialect(&table, Dialect::C);
        unit.preset("__CLANG_SIZE_T_DEFINED");
        assert!(unit.is_defined("size_t"));
        unit.request("size_t");
        assert!(unit.definitions().is_empty(), "no definition after a preset alias");
    }

    #[test]
    fn dialect_only_entries_skip_other_dialect() {
        // wchar_t is a keyword in C++ and must not be redefined there
        let table = table();
        let mut unit = Registry::with_dialect(&table, Dialect::Cxx);
        assert_eq!(unit.try_request("wchar_t").unwrap(), RequestOutcome::OtherDialect);
        assert!(!unit.is_defined("wchar_t"));
        assert!(unit.guards().is_empty());
    }

    #[test]
    fn unknown_policy_controls_reporting() {
        // ignore mode swallows unknown names; reject mode reports them
        let table = table();
        let mut lax = Registry::with_dialect(&table, Dialect::C);
        assert_eq!(lax.try_request("quux_t").unwrap(), RequestOutcome::Unknown);

        let mut strict = Registry::new(&table, RegistryOptions::new(Dialect::C).strict());
        let err = strict.try_request("quux_t").expect_err("strict registry rejects");
        assert!(matches!(err, RegistryError::UnknownType { ref name, .. } if name == "quux_t"));
        strict.request("quux_t");
        assert!(strict.definitions().is_empty(), "request stays infallible");
    }

    #[test]
    fn mark_defined_sets_every_alias() {
        // marking through the registry must be visible through the alias guard
        let table = table();
        let mut unit = Registry::with_dialect(&table, Dialect::C);
        unit.mark_defined("size_t");
        assert!(unit.guards().is_set("__DEFINED_size_t"));
        assert!(unit.guards().is_set("__CLANG_SIZE_T_DEFINED"));
        unit.request("size_t");
        assert!(unit.definitions().is_empty());
    }

    #[test]
    fn check_requests_lists_all_missing_names() {
        let table = table();
        let unit = Registry::with_dialect(&table, Dialect::C);
        let err = unit
            .check_requests(["size_t", "foo_t", "bar_t"])
            .expect_err("two names are unknown");
        let RegistryError::UnknownTypes { names, .. } = err else {
            panic!("expected aggregated error");
        };
        assert_eq!(names, ["foo_t", "bar_t"]);
        assert!(unit.guards().is_empty(), "checking must not mutate guards");
    }
}
