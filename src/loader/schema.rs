//! Raw serde shapes of a target table file.
//!
//! ```toml
//! [target]
//! name = "armv7-none-eabi"
//! model = "ilp32"
//! char_signed = false
//!
//! [guards]
//! primary = "__DEFINED_{name}"
//! aliases = ["__CLANG_{NAME}_DEFINED"]
//!
//! [[types]]
//! name = "size_t"
//! typedef = "unsigned _Addr"
//! ```
//!
//! Nothing here is validated beyond what serde enforces; [`super::build_table`]
//! turns these into a checked [`crate::abi::LayoutTable`].

use serde::Deserialize;

use crate::abi::{
    AggregateKind, AlignOverrides, DataModel, DialectScope, Endianness, MacroExpansion,
    ScalarWidths,
};

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableFile {
    pub target: TargetSection,
    #[serde(default)]
    pub guards: GuardSection,
    #[serde(default)]
    pub types: Vec<TypeSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetSection {
    pub name: String,
    pub model: ModelName,
    #[serde(default)]
    pub endian: EndianName,
    #[serde(default = "default_true")]
    pub char_signed: bool,
    #[serde(default)]
    pub widths: WidthSection,
    #[serde(default)]
    pub align: AlignSection,
    #[serde(default)]
    pub macros: MacroSection,
    #[serde(default)]
    pub builtins: Vec<BuiltinSection>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelName {
    Ilp32,
    Lp64,
}

impl From<ModelName> for DataModel {
    fn from(model: ModelName) -> Self {
        match model {
            ModelName::Ilp32 => DataModel::Ilp32,
            ModelName::Lp64 => DataModel::Lp64,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndianName {
    #[default]
    Little,
    Big,
}

impl From<EndianName> for Endianness {
    fn from(endian: EndianName) -> Self {
        match endian {
            EndianName::Little => Endianness::Little,
            EndianName::Big => Endianness::Big,
        }
    }
}

/// Per-kind width overrides on top of the data model.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WidthSection {
    pub short: Option<u32>,
    pub int: Option<u32>,
    pub long: Option<u32>,
    pub long_long: Option<u32>,
    pub pointer: Option<u32>,
    pub float: Option<u32>,
    pub double: Option<u32>,
    pub long_double: Option<u32>,
}

impl WidthSection {
    pub fn apply(&self, widths: &mut ScalarWidths) {
        let slots = [
            (self.short, &mut widths.short),
            (self.int, &mut widths.int),
            (self.long, &mut widths.long),
            (self.long_long, &mut widths.long_long),
            (self.pointer, &mut widths.pointer),
            (self.float, &mut widths.float),
            (self.double, &mut widths.double),
            (self.long_double, &mut widths.long_double),
        ];
        for (value, slot) in slots {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlignSection {
    pub long_long: Option<u32>,
    pub double: Option<u32>,
    pub long_double: Option<u32>,
}

impl From<&AlignSection> for AlignOverrides {
    fn from(align: &AlignSection) -> Self {
        AlignOverrides {
            long_long: align.long_long,
            double: align.double,
            long_double: align.long_double,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MacroSection {
    pub addr: Option<MacroName>,
    pub int64: Option<MacroName>,
    pub reg: Option<MacroName>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub enum MacroName {
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "long")]
    Long,
    #[serde(rename = "long long")]
    LongLong,
}

impl From<MacroName> for MacroExpansion {
    fn from(name: MacroName) -> Self {
        match name {
            MacroName::Int => MacroExpansion::Int,
            MacroName::Long => MacroExpansion::Long,
            MacroName::LongLong => MacroExpansion::LongLong,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuiltinSection {
    pub name: String,
    pub size: u32,
    pub align: u32,
}

/// Guard templates; omitted keys fall back to the musl/clang scheme.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuardSection {
    pub need: Option<String>,
    pub primary: Option<String>,
    pub aliases: Option<Vec<String>>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub enum DialectName {
    #[default]
    #[serde(rename = "any")]
    Any,
    #[serde(rename = "c")]
    C,
    #[serde(rename = "c++")]
    Cxx,
}

impl From<DialectName> for DialectScope {
    fn from(name: DialectName) -> Self {
        match name {
            DialectName::Any => DialectScope::Any,
            DialectName::C => DialectScope::C,
            DialectName::Cxx => DialectScope::Cxx,
        }
    }
}

/// One `[[types]]` row. Exactly one of `typedef`, `record` or `opaque` must be set.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeSection {
    pub name: String,
    #[serde(default)]
    pub dialect: DialectName,
    pub typedef: Option<String>,
    pub record: Option<RecordSection>,
    pub opaque: Option<Vec<ViewSection>>,
    #[serde(default = "default_true")]
    pub foreign_aliases: bool,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindName {
    #[default]
    Struct,
    Union,
}

impl From<KindName> for AggregateKind {
    fn from(kind: KindName) -> Self {
        match kind {
            KindName::Struct => AggregateKind::Struct,
            KindName::Union => AggregateKind::Union,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordSection {
    #[serde(default)]
    pub kind: KindName,
    pub tag: Option<String>,
    #[serde(default)]
    pub tag_only: bool,
    pub fields: Vec<FieldSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSection {
    pub name: String,
    pub ty: String,
    pub len: Option<LenSection>,
}

/// `len = 9` or `len = { bytes = 128 }`.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(untagged)]
pub enum LenSection {
    Count(u32),
    Bytes { bytes: u32 },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewSection {
    pub name: String,
    pub ty: String,
    pub len: u32,
}
