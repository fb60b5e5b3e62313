//! Size and alignment of table entries under one target and dialect.

use super::dialect::Dialect;
use super::record::{AggregateKind, ArrayLen, FieldDecl, LayoutBody, QualType, TypeExpr};
use super::table::LayoutTable;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeAlign {
    pub size: u32,
    pub align: u32,
}

impl SizeAlign {
    pub const fn new(size: u32, align: u32) -> Self {
        Self { size, align }
    }
}

/// `None` for a zero alignment or when rounding up overflows.
fn align_up(value: u32, align: u32) -> Option<u32> {
    value.checked_next_multiple_of(align)
}

pub struct LayoutCalc<'t> {
    table: &'t LayoutTable,
    dialect: Dialect,
}

impl<'t> LayoutCalc<'t> {
    pub fn new(table: &'t LayoutTable, dialect: Dialect) -> Self {
        Self { table, dialect }
    }

    /// Layout of the named entry, `None` when it is unknown or incomplete.
    pub fn entry(&self, name: &str) -> Option<SizeAlign> {
        self.named(name, 0)
    }

    pub fn body(&self, body: &LayoutBody) -> Option<SizeAlign> {
        self.body_at(body, 0)
    }

    fn named(&self, name: &str, depth: usize) -> Option<SizeAlign> {
        if depth > self.table.len() {
            return None;
        }
        let entry = self.table.lookup(name, self.dialect)?;
        self.body_at(&entry.body, depth + 1)
    }

    fn body_at(&self, body: &LayoutBody, depth: usize) -> Option<SizeAlign> {
        match body {
            LayoutBody::Alias(ty) => self.expr(ty, depth),
            LayoutBody::Record(record) => self.aggregate(record.kind, &record.fields, depth),
            LayoutBody::Opaque(opaque) => self.aggregate(AggregateKind::Union, &opaque.views, depth),
        }
    }

    fn expr(&self, ty: &QualType, depth: usize) -> Option<SizeAlign> {
        let target = self.table.target();
        match &ty.ty {
            TypeExpr::Void | TypeExpr::Tagged { .. } => None,
            TypeExpr::Scalar(scalar) => Some(SizeAlign::new(
                target.size_of(scalar.kind),
                target.align_of(scalar.kind),
            )),
            TypeExpr::Builtin(name) => target
                .builtin(name)
                .map(|builtin| SizeAlign::new(builtin.size, builtin.align)),
            TypeExpr::Named(name) => self.named(name.as_str(), depth),
            TypeExpr::Pointer(_) => Some(SizeAlign::new(
                target.pointer_size(),
                target.pointer_size(),
            )),
        }
    }

    fn field(&self, field: &FieldDecl, depth: usize) -> Option<SizeAlign> {
        let element = self.expr(&field.ty, depth)?;
        let count = match field.len {
            None => 1,
            Some(ArrayLen::Count(count)) => count,
            Some(ArrayLen::Bytes(bytes)) => bytes / element.size.max(1),
        };
        Some(SizeAlign::new(element.size.checked_mul(count)?, element.align))
    }

    fn aggregate(&self, kind: AggregateKind, fields: &[FieldDecl], depth: usize) -> Option<SizeAlign> {
        let mut size = 0u32;
        let mut align = 1u32;
        for field in fields {
            let layout = self.field(field, depth)?;
            align = align.max(layout.align);
            size = match kind {
                AggregateKind::Struct => align_up(size, layout.align)?.checked_add(layout.size)?,
                AggregateKind::Union => size.max(layout.size),
            };
        }
        Some(SizeAlign::new(align_up(size, align)?, align))
    }
}

#[cfg(test)]
mod tests {
    //! Layout arithmetic over a minimal ILP32 table.
    use super::*;
    use crate::abi::aggregate::{OpaqueBuilder, RecordBuilder};
    use crate::abi::record::LayoutEntry;
    use crate::abi::scalar::{ScalarKind, ScalarType};
    use crate::abi::target::{DataModel, TargetConfig};
    use crate::registry::guard::GuardScheme;

    fn scalar(kind: ScalarKind) -> QualType {
        QualType::scalar(ScalarType::plain(kind))
    }

    fn table(model: DataModel) -> LayoutTable {
        let mutex = OpaqueBuilder::new()
            .view("__i", scalar(ScalarKind::Int), if model == DataModel::Lp64 { 10 } else { 6 })
            .view(
                "__p",
                QualType::volatile(TypeExpr::Void).pointer_to(),
                if model == DataModel::Lp64 { 5 } else { 6 },
            )
            .finish();
        let timespec = RecordBuilder::new(AggregateKind::Struct)
            .tag("timespec")
            .tag_only()
            .field("tv_sec", QualType::new(TypeExpr::Named("time_t".into())))
            .field("tv_nsec", scalar(ScalarKind::Long))
            .finish();
        let sigset = RecordBuilder::new(AggregateKind::Struct)
            .tag("__sigset_t")
            .array_field(
                "__bits",
                QualType::scalar(ScalarType::unsigned(ScalarKind::Long)),
                ArrayLen::Bytes(128),
            )
            .finish();
        LayoutTable::from_entries(
            TargetConfig::from_model("test", model),
            GuardScheme::default(),
            [
                LayoutEntry::new("time_t", LayoutBody::Alias(scalar(ScalarKind::Int64))),
                LayoutEntry::new("pthread_mutex_t", mutex),
                LayoutEntry::new("struct_timespec", timespec),
                LayoutEntry::new("sigset_t", sigset),
            ],
        )
        .expect("test table is well formed")
    }

    #[test]
    fn opaque_mutex_is_six_words_on_ilp32() {
        // 6 ints and 6 pointers overlap in a 24 byte union
        let table = table(DataModel::Ilp32);
        let calc = LayoutCalc::new(&table, Dialect::C);
        assert_eq!(calc.entry("pthread_mutex_t"), Some(SizeAlign::new(24, 4)));
    }

    #[test]
    fn opaque_mutex_takes_worst_case_view_on_lp64() {
        // 10 ints (40 bytes) against 5 pointers (40 bytes), pointer alignment wins
        let table = table(DataModel::Lp64);
        let calc = LayoutCalc::new(&table, Dialect::C);
        assert_eq!(calc.entry("pthread_mutex_t"), Some(SizeAlign::new(40, 8)));
    }

    #[test]
    fn struct_padding_follows_widest_member() {
        // 64-bit time_t followed by a 32-bit long pads out to 16 bytes
        let table = table(DataModel::Ilp32);
        let calc = LayoutCalc::new(&table, Dialect::C);
        assert_eq!(calc.entry("struct_timespec"), Some(SizeAlign::new(16, 8)));
    }

    #[test]
    fn byte_bounded_arrays_scale_with_long() {
        // sigset_t is always 128 bytes regardless of long width
        for model in [DataModel::Ilp32, DataModel::Lp64] {
            let table = table(model);
            let calc = LayoutCalc::new(&table, Dialect::C);
            assert_eq!(calc.entry("sigset_t").map(|l| l.size), Some(128), "{model:?}");
        }
    }

    #[test]
    fn incomplete_types_have_no_layout() {
        // tagged forward declarations and void report unknown sizes
        let table = table(DataModel::Ilp32);
        let calc = LayoutCalc::new(&table, Dialect::C);
        let file = LayoutBody::Alias(QualType::new(TypeExpr::Tagged {
            kind: AggregateKind::Struct,
            tag: "_IO_FILE".into(),
        }));
        assert_eq!(calc.body(&file), None);
        assert_eq!(calc.entry("missing_t"), None);
    }

    #[test]
    fn degenerate_targets_yield_no_layout() {
        // zero alignment and oversized arrays must not panic the arithmetic
        let mut target = TargetConfig::from_model("broken", DataModel::Ilp32);
        target.widths.int = 0;
        let mut table = LayoutTable::new(target, GuardScheme::default());
        let pair = RecordBuilder::new(AggregateKind::Struct)
            .field("a", scalar(ScalarKind::Int))
            .field("b", scalar(ScalarKind::Char))
            .finish();
        table.insert(LayoutEntry::new("s_t", pair)).expect("unique name");
        let huge = RecordBuilder::new(AggregateKind::Struct)
            .array_field("a", scalar(ScalarKind::Char), ArrayLen::Count(u32::MAX))
            .array_field("b", scalar(ScalarKind::Char), ArrayLen::Count(u32::MAX))
            .finish();
        table.insert(LayoutEntry::new("huge_t", huge)).expect("unique name");

        let calc = LayoutCalc::new(&table, Dialect::C);
        assert_eq!(calc.entry("s_t"), None, "zero-aligned int has no layout");
        assert_eq!(calc.entry("huge_t"), None, "size overflow has no layout");
    }
}
