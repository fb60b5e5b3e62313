//! Primitive C scalar kinds and their signedness spellings.

use std::fmt;

/// Base scalar kinds understood by the layout tables.
///
/// `Addr`, `Int64` and `Reg` are target parameters: they stand for whichever plain C
/// integer type the target picks for pointer-sized, 64-bit and register-sized values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Char,
    Short,
    Int,
    Long,
    LongLong,
    Float,
    Double,
    LongDouble,
    Addr,
    Int64,
    Reg,
}

impl ScalarKind {
    /// True for the three kinds whose spelling depends on the target.
    pub fn is_target_macro(self) -> bool {
        matches!(self, ScalarKind::Addr | ScalarKind::Int64 | ScalarKind::Reg)
    }

    /// C spelling of the kind as it appears in a portable header.
    pub fn spelling(self) -> &'static str {
        match self {
            ScalarKind::Char => "char",
            ScalarKind::Short => "short",
            ScalarKind::Int => "int",
            ScalarKind::Long => "long",
            ScalarKind::LongLong => "long long",
            ScalarKind::Float => "float",
            ScalarKind::Double => "double",
            ScalarKind::LongDouble => "long double",
            ScalarKind::Addr => "_Addr",
            ScalarKind::Int64 => "_Int64",
            ScalarKind::Reg => "_Reg",
        }
    }

    pub fn macro_name(self) -> Option<&'static str> {
        self.is_target_macro().then(|| self.spelling())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Signedness {
    #[default]
    Plain,
    Signed,
    Unsigned,
}

/// A scalar spelled with an optional sign keyword, e.g. `unsigned _Addr`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScalarType {
    pub kind: ScalarKind,
    pub sign: Signedness,
    /// Spelled as a lone sign keyword (`unsigned`), with `int` left implicit.
    pub implicit_int: bool,
}

impl ScalarType {
    pub const fn new(kind: ScalarKind, sign: Signedness) -> Self {
        Self {
            kind,
            sign,
            implicit_int: false,
        }
    }

    /// `int` written as just its sign keyword.
    pub const fn bare(sign: Signedness) -> Self {
        Self {
            kind: ScalarKind::Int,
            sign,
            implicit_int: true,
        }
    }

    pub const fn plain(kind: ScalarKind) -> Self {
        Self::new(kind, Signedness::Plain)
    }

    pub const fn unsigned(kind: ScalarKind) -> Self {
        Self::new(kind, Signedness::Unsigned)
    }

    /// Writes the scalar with `base` standing in for the kind's own spelling.
    pub(crate) fn write_with_base(&self, out: &mut String, base: &str) {
        let keyword = match self.sign {
            Signedness::Plain => None,
            Signedness::Signed => Some("signed"),
            Signedness::Unsigned => Some("unsigned"),
        };
        match keyword {
            Some(keyword) if self.implicit_int => out.push_str(keyword),
            Some(keyword) => {
                out.push_str(keyword);
                out.push(' ');
                out.push_str(base);
            }
            None => out.push_str(base),
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text = String::new();
        self.write_with_base(&mut text, self.kind.spelling());
        f.write_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_sign_keyword_keeps_its_spelling() {
        let bare = ScalarType::bare(Signedness::Unsigned);
        assert_eq!(bare.kind, ScalarKind::Int);
        assert_eq!(bare.to_string(), "unsigned");
        assert_eq!(ScalarType::unsigned(ScalarKind::Int).to_string(), "unsigned int");
        assert_ne!(bare, ScalarType::unsigned(ScalarKind::Int), "spellings stay distinct");
    }

    #[test]
    fn display_keeps_macro_spelling() {
        // portable spelling must keep the target macro intact
        let size = ScalarType::unsigned(ScalarKind::Addr);
        assert_eq!(size.to_string(), "unsigned _Addr");
        assert_eq!(ScalarKind::Reg.macro_name(), Some("_Reg"));
        assert_eq!(ScalarKind::Long.macro_name(), None);
    }
}
