//! Per-target numeric parameters: scalar widths, alignments and the expansion of the
//! `_Addr`, `_Int64` and `_Reg` macros.

use std::fmt;

use super::scalar::ScalarKind;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endianness::Little => f.write_str("little"),
            Endianness::Big => f.write_str("big"),
        }
    }
}

/// Standard C data models used as a base for target tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataModel {
    Ilp32,
    Lp64,
}

/// Byte widths of the fundamental scalar kinds and of object pointers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScalarWidths {
    pub short: u32,
    pub int: u32,
    pub long: u32,
    pub long_long: u32,
    pub pointer: u32,
    pub float: u32,
    pub double: u32,
    pub long_double: u32,
}

impl ScalarWidths {
    pub fn for_model(model: DataModel) -> Self {
        let (long, pointer) = match model {
            DataModel::Ilp32 => (4, 4),
            DataModel::Lp64 => (8, 8),
        };
        Self {
            short: 2,
            int: 4,
            long,
            long_long: 8,
            pointer,
            float: 4,
            double: 8,
            long_double: 8,
        }
    }
}

/// Alignment overrides; kinds without an override align to their size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AlignOverrides {
    pub long_long: Option<u32>,
    pub double: Option<u32>,
    pub long_double: Option<u32>,
}

/// Which plain C integer type a target macro expands to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MacroExpansion {
    Int,
    Long,
    LongLong,
}

impl MacroExpansion {
    pub fn kind(self) -> ScalarKind {
        match self {
            MacroExpansion::Int => ScalarKind::Int,
            MacroExpansion::Long => ScalarKind::Long,
            MacroExpansion::LongLong => ScalarKind::LongLong,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetMacros {
    pub addr: MacroExpansion,
    pub int64: MacroExpansion,
    pub reg: MacroExpansion,
}

impl TargetMacros {
    pub fn for_model(model: DataModel) -> Self {
        match model {
            DataModel::Ilp32 => Self {
                addr: MacroExpansion::Int,
                int64: MacroExpansion::LongLong,
                reg: MacroExpansion::Int,
            },
            DataModel::Lp64 => Self {
                addr: MacroExpansion::Long,
                int64: MacroExpansion::Long,
                reg: MacroExpansion::Long,
            },
        }
    }
}

/// Size and alignment of a compiler builtin such as `__builtin_va_list`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuiltinLayout {
    pub name: String,
    pub size: u32,
    pub align: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetConfig {
    pub name: String,
    pub endian: Endianness,
    pub char_signed: bool,
    pub widths: ScalarWidths,
    pub align: AlignOverrides,
    pub macros: TargetMacros,
    pub builtins: Vec<BuiltinLayout>,
}

impl TargetConfig {
    pub fn from_model(name: impl Into<String>, model: DataModel) -> Self {
        Self {
            name: name.into(),
            endian: Endianness::Little,
            char_signed: true,
            widths: ScalarWidths::for_model(model),
            align: AlignOverrides::default(),
            macros: TargetMacros::for_model(model),
            builtins: Vec::new(),
        }
    }

    /// Expands `_Addr`, `_Int64` and `_Reg` to the plain kind they stand for.
    pub fn concrete(&self, kind: ScalarKind) -> ScalarKind {
        match kind {
            ScalarKind::Addr => self.macros.addr.kind(),
            ScalarKind::Int64 => self.macros.int64.kind(),
            ScalarKind::Reg => self.macros.reg.kind(),
            other => other,
        }
    }

    pub fn size_of(&self, kind: ScalarKind) -> u32 {
        let widths = &self.widths;
        match self.concrete(kind) {
            ScalarKind::Char => 1,
            ScalarKind::Short => widths.short,
            ScalarKind::Int => widths.int,
            ScalarKind::Long => widths.long,
            ScalarKind::LongLong => widths.long_long,
            ScalarKind::Float => widths.float,
            ScalarKind::Double => widths.double,
            ScalarKind::LongDouble => widths.long_double,
            ScalarKind::Addr | ScalarKind::Int64 | ScalarKind::Reg => {
                unreachable!("target macros expand to plain kinds")
            }
        }
    }

    pub fn align_of(&self, kind: ScalarKind) -> u32 {
        let concrete = self.concrete(kind);
        let override_align = match concrete {
            ScalarKind::LongLong => self.align.long_long,
            ScalarKind::Double => self.align.double,
            ScalarKind::LongDouble => self.align.long_double,
            _ => None,
        };
        override_align.unwrap_or_else(|| self.size_of(concrete))
    }

    pub fn builtin(&self, name: &str) -> Option<&BuiltinLayout> {
        self.builtins.iter().find(|builtin| builtin.name == name)
    }

    pub fn pointer_size(&self) -> u32 {
        self.widths.pointer
    }

    pub fn pointer_bits(&self) -> u32 {
        self.widths.pointer * 8
    }
}

impl fmt::Display for TargetConfig {
    /// `armv7-none-eabi (little endian, unsigned char, 32-bit pointers)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let char_sign = if self.char_signed { "signed" } else { "unsigned" };
        write!(
            f,
            "{} ({} endian, {char_sign} char, {}-bit pointers)",
            self.name,
            self.endian,
            self.pointer_bits()
        )
    }
}
