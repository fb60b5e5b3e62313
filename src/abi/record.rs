//! Canonical records describing one layout entry of a target table.

use std::borrow::Borrow;
use std::fmt;

use smallvec::SmallVec;

use super::dialect::{Dialect, DialectScope};
use super::scalar::ScalarType;

/// Symbolic name a consumer requests, e.g. `size_t` or `struct_timeval`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TypeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AggregateKind {
    Struct,
    Union,
}

impl AggregateKind {
    pub fn keyword(self) -> &'static str {
        match self {
            AggregateKind::Struct => "struct",
            AggregateKind::Union => "union",
        }
    }
}

/// Unqualified type expression as spelled in a declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeExpr {
    Void,
    Scalar(ScalarType),
    /// Compiler-provided type such as `__builtin_va_list`.
    Builtin(String),
    /// Another name from the same table, e.g. `time_t` inside `struct timeval`.
    Named(TypeName),
    /// Incomplete tagged aggregate, e.g. `struct _IO_FILE`.
    Tagged { kind: AggregateKind, tag: String },
    Pointer(Box<QualType>),
}

/// A type expression together with its `volatile` qualifier.
///
/// For pointers the qualifier applies to the pointer object itself; the pointee
/// carries its own qualifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QualType {
    pub ty: TypeExpr,
    pub volatile: bool,
}

impl QualType {
    pub fn new(ty: TypeExpr) -> Self {
        Self {
            ty,
            volatile: false,
        }
    }

    pub fn volatile(ty: TypeExpr) -> Self {
        Self { ty, volatile: true }
    }

    pub fn scalar(scalar: ScalarType) -> Self {
        Self::new(TypeExpr::Scalar(scalar))
    }

    pub fn pointer_to(self) -> Self {
        Self::new(TypeExpr::Pointer(Box::new(self)))
    }

    /// The table name this type refers to, looking through pointers.
    pub fn named_refs(&self) -> Option<&TypeName> {
        match &self.ty {
            TypeExpr::Named(name) => Some(name),
            TypeExpr::Pointer(inner) => inner.named_refs(),
            _ => None,
        }
    }
}

/// Array bound of a field or opaque view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrayLen {
    Count(u32),
    /// As many elements as fit into the given number of bytes (`128/sizeof(long)`).
    Bytes(u32),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: QualType,
    pub len: Option<ArrayLen>,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, ty: QualType) -> Self {
        Self {
            name: name.into(),
            ty,
            len: None,
        }
    }

    pub fn with_len(mut self, len: ArrayLen) -> Self {
        self.len = Some(len);
        self
    }
}

/// A struct or union definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordLayout {
    pub kind: AggregateKind,
    pub tag: Option<String>,
    /// Declared only as `struct tag { ... };` without a typedef.
    pub tag_only: bool,
    pub fields: Vec<FieldDecl>,
}

/// Opaque handle: a struct wrapping a union of alternative views of equal purpose.
///
/// Only the total size and alignment are contractual; the runtime library owns the
/// real layout behind the views.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpaqueLayout {
    pub views: SmallVec<[FieldDecl; 3]>,
}

impl OpaqueLayout {
    pub const UNION_MEMBER: &'static str = "__u";
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutBody {
    Alias(QualType),
    Record(RecordLayout),
    Opaque(OpaqueLayout),
}

impl LayoutBody {
    /// Every table name the body references.
    pub fn named_refs(&self) -> Vec<&TypeName> {
        match self {
            LayoutBody::Alias(ty) => ty.named_refs().into_iter().collect(),
            LayoutBody::Record(record) => record
                .fields
                .iter()
                .filter_map(|field| field.ty.named_refs())
                .collect(),
            LayoutBody::Opaque(opaque) => opaque
                .views
                .iter()
                .filter_map(|view| view.ty.named_refs())
                .collect(),
        }
    }
}

/// One row of a target's layout table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutEntry {
    pub name: TypeName,
    pub scope: DialectScope,
    pub body: LayoutBody,
    /// Whether the table-wide alias templates apply to this entry.
    pub foreign_aliases: bool,
    /// Alias guards named explicitly for this entry only.
    pub extra_aliases: SmallVec<[String; 1]>,
}

impl LayoutEntry {
    pub fn new(name: impl Into<TypeName>, body: LayoutBody) -> Self {
        Self {
            name: name.into(),
            scope: DialectScope::Any,
            body,
            foreign_aliases: true,
            extra_aliases: SmallVec::new(),
        }
    }

    pub fn scoped(mut self, scope: DialectScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn without_foreign_aliases(mut self) -> Self {
        self.foreign_aliases = false;
        self
    }

    pub fn with_alias(mut self, guard: impl Into<String>) -> Self {
        self.extra_aliases.push(guard.into());
        self
    }

    pub fn applies_to(&self, dialect: Dialect) -> bool {
        self.scope.admits(dialect)
    }
}
