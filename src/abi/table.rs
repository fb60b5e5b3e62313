//! The per-target layout table: every entry a registry may emit, indexed by name.

use ahash::AHashMap;
use smallvec::SmallVec;

use super::diagnostic::TableDiagnostic;
use super::dialect::{Dialect, DialectScope};
use super::record::{ArrayLen, LayoutBody, LayoutEntry, TypeName};
use super::target::TargetConfig;
use super::vocabulary::Word;
use crate::registry::guard::GuardScheme;

#[derive(Clone, Debug)]
pub struct LayoutTable {
    target: TargetConfig,
    guards: GuardScheme,
    entries: Vec<LayoutEntry>,
    index: AHashMap<TypeName, SmallVec<[usize; 2]>>,
}

impl LayoutTable {
    pub fn new(target: TargetConfig, guards: GuardScheme) -> Self {
        Self {
            target,
            guards,
            entries: Vec::new(),
            index: AHashMap::new(),
        }
    }

    /// Builds a table and runs every structural check on it.
    pub fn from_entries(
        target: TargetConfig,
        guards: GuardScheme,
        entries: impl IntoIterator<Item = LayoutEntry>,
    ) -> Result<Self, Vec<TableDiagnostic>> {
        let mut table = Self::new(target, guards);
        let mut diagnostics = Vec::new();
        for entry in entries {
            if let Err(diagnostic) = table.insert(entry) {
                diagnostics.push(diagnostic);
            }
        }
        diagnostics.extend(table.validate());
        if diagnostics.is_empty() {
            Ok(table)
        } else {
            Err(diagnostics)
        }
    }

    /// Adds an entry. Two entries for one name must cover disjoint dialects.
    pub fn insert(&mut self, entry: LayoutEntry) -> Result<(), TableDiagnostic> {
        let slots = self.index.entry(entry.name.clone()).or_default();
        if let Some(existing) = slots
            .iter()
            .map(|&slot| &self.entries[slot])
            .find(|existing| existing.scope.overlaps(entry.scope))
        {
            return Err(TableDiagnostic::new(
                "table.duplicate",
                Some(&entry.name),
                format!(
                    "conflicting definitions for the same dialect ({:?} vs {:?})",
                    existing.scope, entry.scope
                ),
            ));
        }
        slots.push(self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    pub fn target(&self) -> &TargetConfig {
        &self.target
    }

    pub fn guards(&self) -> &GuardScheme {
        &self.guards
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[LayoutEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// The single entry defining `name` for `dialect`, if any.
    pub fn lookup(&self, name: &str, dialect: Dialect) -> Option<&LayoutEntry> {
        self.index
            .get(name)?
            .iter()
            .map(|&slot| &self.entries[slot])
            .find(|entry| entry.applies_to(dialect))
    }

    /// Structural checks: guard templates, bodies, and references between entries.
    pub fn validate(&self) -> Vec<TableDiagnostic> {
        let mut diagnostics = self.guards.validate();
        self.validate_target(&mut diagnostics);
        for entry in &self.entries {
            self.validate_body(entry, &mut diagnostics);
            self.validate_refs(entry, &mut diagnostics);
        }
        diagnostics
    }

    /// Reports every vocabulary word that has no entry for a dialect it covers.
    pub fn check_vocabulary(&self, vocabulary: &[Word]) -> Vec<TableDiagnostic> {
        let mut diagnostics = Vec::new();
        for word in vocabulary {
            for dialect in [Dialect::C, Dialect::Cxx] {
                if word.scope.admits(dialect) && self.lookup(word.name, dialect).is_none() {
                    let name = TypeName::new(word.name);
                    diagnostics.push(TableDiagnostic::new(
                        "table.vocabulary",
                        Some(&name),
                        format!("no layout for {dialect} on target '{}'", self.target.name),
                    ));
                }
            }
        }
        diagnostics
    }

    /// Zero widths or alignments would leave layouts undefined.
    fn validate_target(&self, diagnostics: &mut Vec<TableDiagnostic>) {
        let target = &self.target;
        let widths = &target.widths;
        let align = &target.align;
        let mut push = |message: String| {
            diagnostics.push(TableDiagnostic::new("table.target", None, message));
        };
        let sizes = [
            ("short", widths.short),
            ("int", widths.int),
            ("long", widths.long),
            ("long_long", widths.long_long),
            ("pointer", widths.pointer),
            ("float", widths.float),
            ("double", widths.double),
            ("long_double", widths.long_double),
        ];
        for (kind, width) in sizes {
            if width == 0 {
                push(format!("width of {kind} is zero on target '{}'", target.name));
            }
        }
        let overrides = [
            ("long_long", align.long_long),
            ("double", align.double),
            ("long_double", align.long_double),
        ];
        for (kind, value) in overrides {
            if value == Some(0) {
                push(format!("alignment override for {kind} is zero"));
            }
        }
        for builtin in &target.builtins {
            if builtin.size == 0 || builtin.align == 0 {
                push(format!(
                    "builtin '{}' needs a nonzero size and alignment",
                    builtin.name
                ));
            }
        }
    }

    fn validate_body(&self, entry: &LayoutEntry, diagnostics: &mut Vec<TableDiagnostic>) {
        let mut push = |message: String| {
            diagnostics.push(TableDiagnostic::new("table.body", Some(&entry.name), message));
        };
        match &entry.body {
            LayoutBody::Alias(_) => {}
            LayoutBody::Record(record) => {
                if record.tag_only && record.tag.is_none() {
                    push("tag-only record declares no tag".into());
                }
                if record.fields.is_empty() {
                    push("record declares no fields".into());
                }
                for field in &record.fields {
                    if matches!(field.len, Some(ArrayLen::Count(0) | ArrayLen::Bytes(0))) {
                        push(format!("field '{}' has a zero-length array", field.name));
                    }
                }
            }
            LayoutBody::Opaque(opaque) => {
                if opaque.views.is_empty() {
                    push("opaque handle declares no views".into());
                }
                for view in &opaque.views {
                    if !matches!(view.len, Some(ArrayLen::Count(count)) if count > 0) {
                        push(format!("view '{}' needs a positive element count", view.name));
                    }
                }
            }
        }
    }

    fn validate_refs(&self, entry: &LayoutEntry, diagnostics: &mut Vec<TableDiagnostic>) {
        for dialect in [Dialect::C, Dialect::Cxx] {
            if !entry.applies_to(dialect) {
                continue;
            }
            for reference in entry.body.named_refs() {
                if self.lookup(reference.as_str(), dialect).is_none() {
                    diagnostics.push(TableDiagnostic::new(
                        "table.unresolved",
                        Some(&entry.name),
                        format!("refers to '{reference}' which has no {dialect} layout"),
                    ));
                } else if self.reaches(reference, &entry.name, dialect, 0) {
                    diagnostics.push(TableDiagnostic::new(
                        "table.cycle",
                        Some(&entry.name),
                        format!("reference to '{reference}' leads back to itself"),
                    ));
                }
            }
        }
    }

    fn reaches(&self, from: &TypeName, target: &TypeName, dialect: Dialect, depth: usize) -> bool {
        if from == target {
            return true;
        }
        if depth > self.entries.len() {
            return false;
        }
        let Some(entry) = self.lookup(from.as_str(), dialect) else {
            return false;
        };
        entry
            .body
            .named_refs()
            .into_iter()
            .any(|next| self.reaches(next, target, dialect, depth + 1))
    }

    /// Names in first-declaration order, each once.
    pub fn names(&self) -> Vec<&TypeName> {
        let mut seen = Vec::with_capacity(self.index.len());
        for entry in &self.entries {
            if !seen.contains(&&entry.name) {
                seen.push(&entry.name);
            }
        }
        seen
    }

    /// Entries grouped by name, preserving declaration order of first appearance.
    pub(crate) fn grouped(&self) -> Vec<SmallVec<[&LayoutEntry; 2]>> {
        self.names()
            .into_iter()
            .map(|name| {
                self.index[name.as_str()]
                    .iter()
                    .map(|&slot| &self.entries[slot])
                    .collect()
            })
            .collect()
    }

    pub fn scope_of(&self, name: &str) -> Option<DialectScope> {
        let slots = self.index.get(name)?;
        match slots.as_slice() {
            [only] => Some(self.entries[*only].scope),
            _ => Some(DialectScope::Any),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Structural checks over small hand-built tables.
    use super::*;
    use crate::abi::aggregate::RecordBuilder;
    use crate::abi::record::{AggregateKind, QualType, TypeExpr};
    use crate::abi::scalar::{ScalarKind, ScalarType};
    use crate::abi::target::DataModel;
    use crate::abi::vocabulary;

    fn table() -> LayoutTable {
        LayoutTable::new(
            TargetConfig::from_model("test", DataModel::Ilp32),
            GuardScheme::default(),
        )
    }

    fn alias(name: &str, scalar: ScalarType) -> LayoutEntry {
        LayoutEntry::new(name, LayoutBody::Alias(QualType::scalar(scalar)))
    }

    fn named(name: &str) -> QualType {
        QualType::new(TypeExpr::Named(name.into()))
    }

    #[test]
    fn duplicate_name_in_same_dialect_is_rejected() {
        // a second definition for the same dialect would be a conflicting definition
        let mut table = table();
        table
            .insert(alias("size_t", ScalarType::unsigned(ScalarKind::Addr)))
            .expect("first insert");
        let err = table
            .insert(alias("size_t", ScalarType::unsigned(ScalarKind::Long)))
            .expect_err("duplicate must be rejected");
        assert_eq!(err.code, "table.duplicate");
        assert_eq!(table.len(), 1, "rejected entry must not be stored");
    }

    #[test]
    fn dialect_split_entries_coexist() {
        // pthread_t has distinct C and C++ spellings under one name
        let mut table = table();
        let c = LayoutEntry::new(
            "pthread_t",
            LayoutBody::Alias(
                QualType::new(TypeExpr::Tagged {
                    kind: AggregateKind::Struct,
                    tag: "__pthread".into(),
                })
                .pointer_to(),
            ),
        )
        .scoped(DialectScope::C);
        let cxx = alias("pthread_t", ScalarType::unsigned(ScalarKind::Long)).scoped(DialectScope::Cxx);
        table.insert(c).expect("C branch");
        table.insert(cxx).expect("C++ branch");
        let LayoutBody::Alias(c_ty) = &table.lookup("pthread_t", Dialect::C).unwrap().body else {
            panic!("C branch should be an alias");
        };
        assert!(
            matches!(c_ty.ty, TypeExpr::Pointer(_)),
            "C branch should be a pointer"
        );
        assert_eq!(
            table.lookup("pthread_t", Dialect::Cxx).unwrap().scope,
            DialectScope::Cxx
        );
        assert_eq!(table.names().len(), 1, "split entries share one name");
        assert_eq!(table.scope_of("pthread_t"), Some(DialectScope::Any));
    }

    #[test]
    fn unresolved_reference_is_reported() {
        // struct timeval without time_t cannot be emitted
        let body = RecordBuilder::new(AggregateKind::Struct)
            .tag("timeval")
            .tag_only()
            .field("tv_sec", named("time_t"))
            .finish();
        let result = LayoutTable::from_entries(
            TargetConfig::from_model("test", DataModel::Ilp32),
            GuardScheme::default(),
            [LayoutEntry::new("struct_timeval", body).without_foreign_aliases()],
        );
        let diagnostics = result.expect_err("missing time_t must fail");
        assert_eq!(diagnostics.len(), 2, "one diagnostic per dialect");
        assert!(diagnostics.iter().all(|d| d.code == "table.unresolved"));
    }

    #[test]
    fn alias_cycle_is_reported() {
        // typedef a b; typedef b a; never resolves to a layout
        let result = LayoutTable::from_entries(
            TargetConfig::from_model("test", DataModel::Ilp32),
            GuardScheme::default(),
            [
                LayoutEntry::new("a_t", LayoutBody::Alias(named("b_t"))).scoped(DialectScope::C),
                LayoutEntry::new("b_t", LayoutBody::Alias(named("a_t"))).scoped(DialectScope::C),
            ],
        );
        let diagnostics = result.expect_err("cycle must fail");
        assert!(diagnostics.iter().any(|d| d.code == "table.cycle"));
    }

    #[test]
    fn vocabulary_gaps_are_listed_per_dialect() {
        // an empty table misses every word, wchar_t only for C
        let diagnostics = table().check_vocabulary(vocabulary::STANDARD);
        let any_words = vocabulary::STANDARD
            .iter()
            .filter(|word| word.scope == DialectScope::Any)
            .count();
        assert_eq!(diagnostics.len(), any_words * 2 + 1);
    }
}
