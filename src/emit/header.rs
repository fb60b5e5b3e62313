//! Renders a whole target table as a preprocessor-gated header.
//!
//! Each entry becomes a block that is only compiled when a consumer has defined the
//! entry's request macro and none of its guards is set yet. The same registry
//! protocol then runs inside the C preprocessor of every consuming unit.

use crate::abi::{DialectScope, LayoutEntry, LayoutTable, ScalarKind};
use crate::registry::GuardScheme;

use super::{RenderStyle, Speller};

const TARGET_MACROS: [ScalarKind; 3] = [ScalarKind::Addr, ScalarKind::Int64, ScalarKind::Reg];

pub fn render_header(table: &LayoutTable) -> String {
    let target = table.target();
    let speller = Speller::new(target, RenderStyle::Portable);
    let scheme = table.guards();
    let mut out = String::new();

    for kind in TARGET_MACROS {
        if let Some(name) = kind.macro_name() {
            out.push_str(&format!(
                "#define {name} {}\n",
                target.concrete(kind).spelling()
            ));
        }
    }
    out.push('\n');

    for group in table.grouped() {
        match group.as_slice() {
            [entry] => match entry.scope {
                DialectScope::Any => block(&mut out, &speller, scheme, entry),
                DialectScope::C => {
                    out.push_str("#ifndef __cplusplus\n");
                    block(&mut out, &speller, scheme, entry);
                    out.push_str("#endif\n\n");
                }
                DialectScope::Cxx => {
                    out.push_str("#ifdef __cplusplus\n");
                    block(&mut out, &speller, scheme, entry);
                    out.push_str("#endif\n\n");
                }
            },
            split => {
                let cxx = split.iter().find(|entry| entry.scope == DialectScope::Cxx);
                let c = split.iter().find(|entry| entry.scope == DialectScope::C);
                out.push_str("#ifdef __cplusplus\n");
                if let Some(entry) = cxx {
                    block(&mut out, &speller, scheme, entry);
                }
                out.push_str("#else\n");
                if let Some(entry) = c {
                    block(&mut out, &speller, scheme, entry);
                }
                out.push_str("#endif\n\n");
            }
        }
    }

    for kind in TARGET_MACROS {
        if let Some(name) = kind.macro_name() {
            out.push_str(&format!("#undef {name}\n"));
        }
    }
    out
}

fn block(out: &mut String, speller: &Speller<'_>, scheme: &GuardScheme, entry: &LayoutEntry) {
    let name = entry.name.as_str();
    let guards = scheme.guards_for(entry);
    out.push_str(&format!("#if defined({})", scheme.need_for(name)));
    for guard in &guards {
        out.push_str(&format!(" && !defined({guard})"));
    }
    out.push('\n');
    out.push_str(&speller.declaration(name, &entry.body));
    out.push('\n');
    for guard in &guards {
        out.push_str(&format!("#define {guard}\n"));
    }
    out.push_str("#endif\n\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::{
        AggregateKind, DataModel, LayoutBody, QualType, ScalarType, TargetConfig, TypeExpr,
    };

    fn table() -> LayoutTable {
        let pthread_c = LayoutEntry::new(
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
        let pthread_cxx = LayoutEntry::new(
            "pthread_t",
            LayoutBody::Alias(QualType::scalar(ScalarType::unsigned(ScalarKind::Long))),
        )
        .scoped(DialectScope::Cxx);
        LayoutTable::from_entries(
            TargetConfig::from_model("test", DataModel::Ilp32),
            GuardScheme::default(),
            [
                LayoutEntry::new(
                    "size_t",
                    LayoutBody::Alias(QualType::scalar(ScalarType::unsigned(ScalarKind::Addr))),
                ),
                pthread_c,
                pthread_cxx,
            ],
        )
        .expect("table is well formed")
    }

    #[test]
    fn header_gates_each_entry_on_need_and_guards() {
        // every block tests the request macro and every guard before defining
        let header = render_header(&table());
        assert!(header.starts_with("#define _Addr int\n#define _Int64 long long\n#define _Reg int\n"));
        assert!(header.contains(
            "#if defined(__NEED_size_t) && !defined(__DEFINED_size_t) && !defined(__CLANG_SIZE_T_DEFINED)\n\
             typedef unsigned _Addr size_t;\n\
             #define __DEFINED_size_t\n\
             #define __CLANG_SIZE_T_DEFINED\n\
             #endif\n"
        ));
        assert!(header.ends_with("#undef _Addr\n#undef _Int64\n#undef _Reg\n"));
    }

    #[test]
    fn split_entries_render_both_branches() {
        // C++ branch first, C branch under #else
        let header = render_header(&table());
        let cxx = header.find("typedef unsigned long pthread_t;").expect("C++ branch");
        let c = header.find("typedef struct __pthread *pthread_t;").expect("C branch");
        let ifdef = header.find("#ifdef __cplusplus").expect("dialect switch");
        let else_at = header.find("#else").expect("else branch");
        assert!(ifdef < cxx && cxx < else_at && else_at < c);
    }
}
