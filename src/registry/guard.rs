//! Guard naming and the per-unit table of guards that have been set.
//!
//! Every entry owns a primary guard (`__DEFINED_size_t`) and any number of alias
//! guards recognised by foreign producers of the same vocabulary
//! (`__CLANG_SIZE_T_DEFINED`). Setting a definition sets all of them; seeing any one
//! of them set suppresses the definition.

use std::borrow::Borrow;
use std::fmt;

use ahash::AHashSet;
use smallvec::SmallVec;

use crate::abi::{LayoutEntry, TableDiagnostic};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GuardName(String);

impl GuardName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for GuardName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GuardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Primary guard first, then aliases in declaration order.
pub type GuardSet = SmallVec<[GuardName; 3]>;

/// Templates that derive request and guard macro names from a type name.
///
/// `{name}` expands to the name verbatim, `{NAME}` to its upper-cased form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardScheme {
    need: String,
    primary: String,
    aliases: Vec<String>,
}

impl Default for GuardScheme {
    fn default() -> Self {
        Self::new("__DEFINED_{name}", ["__CLANG_{NAME}_DEFINED"])
    }
}

impl GuardScheme {
    pub fn new<I, S>(primary: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            need: Self::DEFAULT_NEED.to_owned(),
            primary: primary.into(),
            aliases: aliases.into_iter().map(Into::into).collect(),
        }
    }

    pub const DEFAULT_NEED: &'static str = "__NEED_{name}";

    pub fn with_need(mut self, template: impl Into<String>) -> Self {
        self.need = template.into();
        self
    }

    /// Macro a consumer defines to request `name` from a rendered header.
    pub fn need_for(&self, name: &str) -> String {
        expand(&self.need, name)
    }

    pub fn primary_template(&self) -> &str {
        &self.primary
    }

    pub fn alias_templates(&self) -> &[String] {
        &self.aliases
    }

    pub fn primary_for(&self, name: &str) -> GuardName {
        GuardName(expand(&self.primary, name))
    }

    /// Guards for a name the table knows nothing about: primary plus table-wide aliases.
    pub fn guards_for_name(&self, name: &str) -> GuardSet {
        let mut guards = GuardSet::new();
        guards.push(self.primary_for(name));
        for alias in &self.aliases {
            guards.push(GuardName(expand(alias, name)));
        }
        guards
    }

    pub fn guards_for(&self, entry: &LayoutEntry) -> GuardSet {
        let name = entry.name.as_str();
        let mut guards = GuardSet::new();
        guards.push(self.primary_for(name));
        if entry.foreign_aliases {
            for alias in &self.aliases {
                guards.push(GuardName(expand(alias, name)));
            }
        }
        for extra in &entry.extra_aliases {
            let guard = GuardName::new(extra.as_str());
            if !guards.contains(&guard) {
                guards.push(guard);
            }
        }
        guards
    }

    pub fn validate(&self) -> Vec<TableDiagnostic> {
        [&self.need, &self.primary]
            .into_iter()
            .chain(&self.aliases)
            .filter_map(|template| {
                let placeholders =
                    template.matches("{name}").count() + template.matches("{NAME}").count();
                let sample = expand(template, "x");
                if placeholders != 1 {
                    Some(format!(
                        "guard template '{template}' must contain exactly one {{name}} or {{NAME}}"
                    ))
                } else if !is_identifier(&sample) {
                    Some(format!(
                        "guard template '{template}' does not expand to a C identifier"
                    ))
                } else {
                    None
                }
            })
            .map(|message| TableDiagnostic::new("table.guard-template", None, message))
            .collect()
    }
}

fn expand(template: &str, name: &str) -> String {
    template
        .replace("{name}", name)
        .replace("{NAME}", &name.to_ascii_uppercase())
}

pub(crate) fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|ch| ch == '_' || ch.is_ascii_alphanumeric())
}

/// Guards set so far within one unit. Guards are never cleared.
#[derive(Clone, Debug, Default)]
pub struct GuardTable {
    set: AHashSet<GuardName>,
}

impl GuardTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self, guard: &str) -> bool {
        self.set.contains(guard)
    }

    pub fn any_set(&self, guards: &[GuardName]) -> bool {
        guards.iter().any(|guard| self.set.contains(guard))
    }

    /// Returns `true` when the guard was not set before.
    pub fn set(&mut self, guard: GuardName) -> bool {
        self.set.insert(guard)
    }

    pub fn set_all(&mut self, guards: impl IntoIterator<Item = GuardName>) {
        for guard in guards {
            if self.set(guard.clone()) {
                tracing::trace!(%guard, "guard set");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Set guards in sorted order.
    pub fn snapshot(&self) -> Vec<GuardName> {
        let mut guards: Vec<_> = self.set.iter().cloned().collect();
        guards.sort();
        guards
    }
}
