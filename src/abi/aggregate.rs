//! Fluent builders for struct, union and opaque-handle layouts.

use smallvec::SmallVec;

use super::record::{
    AggregateKind, ArrayLen, FieldDecl, LayoutBody, OpaqueLayout, QualType, RecordLayout,
};

pub struct RecordBuilder {
    kind: AggregateKind,
    tag: Option<String>,
    tag_only: bool,
    fields: Vec<FieldDecl>,
}

impl RecordBuilder {
    pub fn new(kind: AggregateKind) -> Self {
        Self {
            kind,
            tag: None,
            tag_only: false,
            fields: Vec::new(),
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Declare `struct tag { ... };` instead of a typedef. Requires a tag.
    pub fn tag_only(mut self) -> Self {
        self.tag_only = true;
        self
    }

    pub fn field(mut self, name: impl Into<String>, ty: QualType) -> Self {
        self.fields.push(FieldDecl::new(name, ty));
        self
    }

    pub fn array_field(mut self, name: impl Into<String>, ty: QualType, len: ArrayLen) -> Self {
        self.fields.push(FieldDecl::new(name, ty).with_len(len));
        self
    }

    pub fn field_decl(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    pub fn finish(self) -> LayoutBody {
        LayoutBody::Record(RecordLayout {
            kind: self.kind,
            tag: self.tag,
            tag_only: self.tag_only,
            fields: self.fields,
        })
    }
}

#[derive(Default)]
pub struct OpaqueBuilder {
    views: SmallVec<[FieldDecl; 3]>,
}

impl OpaqueBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(mut self, name: impl Into<String>, ty: QualType, count: u32) -> Self {
        self.views
            .push(FieldDecl::new(name, ty).with_len(ArrayLen::Count(count)));
        self
    }

    pub fn finish(self) -> LayoutBody {
        LayoutBody::Opaque(OpaqueLayout { views: self.views })
    }
}
