//! C text rendering for emitted definitions and for whole gated headers.

pub mod header;

pub use header::render_header;

use crate::abi::{
    ArrayLen, FieldDecl, LayoutBody, OpaqueLayout, QualType, ScalarType, TargetConfig, TypeExpr,
};
use crate::registry::Definition;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderStyle {
    /// Keep `_Addr`, `_Int64` and `_Reg`; the surrounding header defines them.
    Portable,
    /// Expand target macros to plain C types.
    #[default]
    Resolved,
}

/// Spells types and declarators for one target.
pub(crate) struct Speller<'a> {
    target: &'a TargetConfig,
    style: RenderStyle,
}

impl<'a> Speller<'a> {
    pub(crate) fn new(target: &'a TargetConfig, style: RenderStyle) -> Self {
        Self { target, style }
    }

    fn scalar(&self, scalar: &ScalarType) -> String {
        let kind = match self.style {
            RenderStyle::Portable => scalar.kind,
            RenderStyle::Resolved => self.target.concrete(scalar.kind),
        };
        let mut out = String::new();
        scalar.write_with_base(&mut out, kind.spelling());
        out
    }

    pub(crate) fn qual(&self, ty: &QualType) -> String {
        let mut out = String::new();
        match &ty.ty {
            TypeExpr::Pointer(inner) => {
                out.push_str(&self.qual(inner));
                out.push_str(if out.ends_with('*') { "*" } else { " *" });
                if ty.volatile {
                    out.push_str("volatile");
                }
            }
            other => {
                if ty.volatile {
                    out.push_str("volatile ");
                }
                match other {
                    TypeExpr::Void => out.push_str("void"),
                    TypeExpr::Scalar(scalar) => out.push_str(&self.scalar(scalar)),
                    TypeExpr::Builtin(name) => out.push_str(name),
                    TypeExpr::Named(name) => out.push_str(name.as_str()),
                    TypeExpr::Tagged { kind, tag } => {
                        out.push_str(kind.keyword());
                        out.push(' ');
                        out.push_str(tag);
                    }
                    TypeExpr::Pointer(_) => unreachable!("handled above"),
                }
            }
        }
        out
    }

    pub(crate) fn declarator(&self, ty: &QualType, name: &str, len: Option<ArrayLen>) -> String {
        let spelled = self.qual(ty);
        let sep = if spelled.ends_with('*') { "" } else { " " };
        let bound = match len {
            None => String::new(),
            Some(ArrayLen::Count(count)) => format!("[{count}]"),
            Some(ArrayLen::Bytes(bytes)) => {
                // the sign keyword does not change the element size
                let element = match &ty.ty {
                    TypeExpr::Scalar(scalar) => self.scalar(&ScalarType::plain(scalar.kind)),
                    _ => spelled.clone(),
                };
                format!("[{bytes}/sizeof({element})]")
            }
        };
        format!("{spelled}{sep}{name}{bound}")
    }

    fn members(&self, fields: &[FieldDecl]) -> String {
        let mut out = String::from("{ ");
        for field in fields {
            out.push_str(&self.declarator(&field.ty, &field.name, field.len));
            out.push_str("; ");
        }
        out.push('}');
        out
    }

    fn opaque(&self, opaque: &OpaqueLayout) -> String {
        format!(
            "{{ union {} {}; }}",
            self.members(&opaque.views),
            OpaqueLayout::UNION_MEMBER
        )
    }

    /// The declaration for `name`, terminated by `;`.
    pub(crate) fn declaration(&self, name: &str, body: &LayoutBody) -> String {
        match body {
            LayoutBody::Alias(ty) => format!("typedef {};", self.declarator(ty, name, None)),
            LayoutBody::Record(record) => {
                let keyword = record.kind.keyword();
                let members = self.members(&record.fields);
                match (&record.tag, record.tag_only) {
                    (Some(tag), true) => format!("{keyword} {tag} {members};"),
                    (Some(tag), false) => format!("typedef {keyword} {tag} {members} {name};"),
                    (None, _) => format!("typedef {keyword} {members} {name};"),
                }
            }
            LayoutBody::Opaque(opaque) => {
                format!("typedef struct {} {name};", self.opaque(opaque))
            }
        }
    }
}

/// One definition followed by a `#define` for every guard it sets.
pub fn render_definition(definition: &Definition, target: &TargetConfig, style: RenderStyle) -> String {
    let speller = Speller::new(target, style);
    let mut out = speller.declaration(definition.name.as_str(), &definition.body);
    out.push('\n');
    for guard in &definition.guards {
        out.push_str("#define ");
        out.push_str(guard.as_str());
        out.push('\n');
    }
    out
}

pub fn render_definitions(definitions: &[Definition], target: &TargetConfig, style: RenderStyle) -> String {
    definitions
        .iter()
        .map(|definition| render_definition(definition, target, style))
        .collect::<Vec<_>>()
        .join("\n")
}
