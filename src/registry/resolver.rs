//! Maps a request name to the one definition the target table prescribes for it.

use crate::abi::{
    Dialect, LayoutBody, LayoutCalc, LayoutTable, SizeAlign, TargetConfig, TypeName,
};
use crate::emit::{self, RenderStyle};

use super::guard::GuardSet;

/// A fully resolved definition ready to be emitted into a unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Definition {
    pub name: TypeName,
    pub dialect: Dialect,
    pub body: LayoutBody,
    /// Primary guard first, then every alias the definition sets.
    pub guards: GuardSet,
    /// `None` for incomplete types such as `FILE`.
    pub layout: Option<SizeAlign>,
}

impl Definition {
    /// C text for this definition followed by its guard `#define`s.
    pub fn render(&self, target: &TargetConfig, style: RenderStyle) -> String {
        emit::render_definition(self, target, style)
    }
}

/// What a table says about a name for one dialect.
#[derive(Debug)]
pub enum Resolution {
    Defined(Definition),
    /// The name exists, but only for the other dialect.
    OtherDialect,
    Unknown,
}

/// Pure lookup over a borrowed table. The dialect is fixed at construction.
#[derive(Clone, Copy)]
pub struct LayoutResolver<'t> {
    table: &'t LayoutTable,
    dialect: Dialect,
}

impl<'t> LayoutResolver<'t> {
    pub fn new(table: &'t LayoutTable, dialect: Dialect) -> Self {
        Self { table, dialect }
    }

    pub fn table(&self) -> &'t LayoutTable {
        self.table
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn resolve(&self, name: &str) -> Resolution {
        let Some(entry) = self.table.lookup(name, self.dialect) else {
            return if self.table.contains(name) {
                Resolution::OtherDialect
            } else {
                Resolution::Unknown
            };
        };
        let layout = LayoutCalc::new(self.table, self.dialect).body(&entry.body);
        Resolution::Defined(Definition {
            name: entry.name.clone(),
            dialect: self.dialect,
            body: entry.body.clone(),
            guards: self.table.guards().guards_for(entry),
            layout,
        })
    }

    /// Guard names for `name`, whether or not the table defines it.
    pub fn guards_for(&self, name: &str) -> GuardSet {
        let scheme = self.table.guards();
        match self.table.lookup(name, self.dialect) {
            Some(entry) => scheme.guards_for(entry),
            None => scheme.guards_for_name(name),
        }
    }
}
