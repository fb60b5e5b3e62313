//! Type model for target layout tables: scalars, records, opaque handles, target
//! parameters and the table that ties them to request names.

pub mod aggregate;
pub mod diagnostic;
pub mod dialect;
pub mod record;
pub mod scalar;
pub mod size;
pub mod table;
pub mod target;
pub mod vocabulary;

pub use aggregate::{OpaqueBuilder, RecordBuilder};
pub use diagnostic::TableDiagnostic;
pub use dialect::{Dialect, DialectScope};
pub use record::{
    AggregateKind, ArrayLen, FieldDecl, LayoutBody, LayoutEntry, OpaqueLayout, QualType,
    RecordLayout, TypeExpr, TypeName,
};
pub use scalar::{ScalarKind, ScalarType, Signedness};
pub use size::{LayoutCalc, SizeAlign};
pub use table::LayoutTable;
pub use target::{
    AlignOverrides, BuiltinLayout, DataModel, Endianness, MacroExpansion, ScalarWidths,
    TargetConfig, TargetMacros,
};
