//! Target table loading: TOML files (or the embedded built-in targets) into a checked
//! [`LayoutTable`].

pub mod error;
pub mod schema;
pub mod spelling;

pub use error::{LoadError, SpellingError};
pub use spelling::parse_spelling;

use std::fs;
use std::path::Path;

use crate::abi::{
    ArrayLen, BuiltinLayout, DataModel, FieldDecl, LayoutBody, LayoutEntry, LayoutTable,
    OpaqueBuilder, RecordBuilder, ScalarWidths, TableDiagnostic, TargetConfig, TargetMacros,
    TypeName,
};
use crate::registry::GuardScheme;

use schema::{GuardSection, LenSection, TableFile, TargetSection, TypeSection};

/// Target tables compiled into the crate, by name.
pub const BUILTIN_TARGETS: &[(&str, &str)] = &[
    (
        "armv7-none-eabi",
        include_str!("../../defs/armv7-none-eabi.toml"),
    ),
    (
        "x86_64-linux-musl",
        include_str!("../../defs/x86_64-linux-musl.toml"),
    ),
];

pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTIN_TARGETS.iter().map(|(name, _)| *name)
}

pub fn builtin(name: &str) -> Result<LayoutTable, LoadError> {
    let (_, source) = BUILTIN_TARGETS
        .iter()
        .find(|(builtin, _)| *builtin == name)
        .ok_or_else(|| LoadError::UnknownTarget(name.to_owned()))?;
    from_str(source)
}

pub fn load_path(path: impl AsRef<Path>) -> Result<LayoutTable, LoadError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "reading target table");
    from_str(&source)
}

pub fn from_str(source: &str) -> Result<LayoutTable, LoadError> {
    let file: TableFile = toml::from_str(source)?;
    build_table(file)
}

/// Converts a parsed file into a table, collecting every structural defect.
pub fn build_table(file: TableFile) -> Result<LayoutTable, LoadError> {
    let target = target_config(&file.target);
    let scheme = guard_scheme(&file.guards);
    let mut diagnostics = Vec::new();
    let mut entries = Vec::with_capacity(file.types.len());
    for section in &file.types {
        match entry(section)? {
            Ok(entry) => entries.push(entry),
            Err(diagnostic) => diagnostics.push(diagnostic),
        }
    }

    let table = match LayoutTable::from_entries(target, scheme, entries) {
        Ok(table) if diagnostics.is_empty() => table,
        Ok(_) => return Err(LoadError::Diagnostics(diagnostics)),
        Err(found) => {
            diagnostics.extend(found);
            return Err(LoadError::Diagnostics(diagnostics));
        }
    };
    tracing::info!(
        table = %table.target().name,
        entries = table.len(),
        "layout table loaded"
    );
    Ok(table)
}

fn target_config(section: &TargetSection) -> TargetConfig {
    let model: DataModel = section.model.into();
    let mut widths = ScalarWidths::for_model(model);
    section.widths.apply(&mut widths);
    let defaults = TargetMacros::for_model(model);
    let macros = &section.macros;
    TargetConfig {
        name: section.name.clone(),
        endian: section.endian.into(),
        char_signed: section.char_signed,
        widths,
        align: (&section.align).into(),
        macros: TargetMacros {
            addr: macros.addr.map_or(defaults.addr, Into::into),
            int64: macros.int64.map_or(defaults.int64, Into::into),
            reg: macros.reg.map_or(defaults.reg, Into::into),
        },
        builtins: section
            .builtins
            .iter()
            .map(|builtin| BuiltinLayout {
                name: builtin.name.clone(),
                size: builtin.size,
                align: builtin.align,
            })
            .collect(),
    }
}

fn guard_scheme(section: &GuardSection) -> GuardScheme {
    let defaults = GuardScheme::default();
    let primary = section
        .primary
        .clone()
        .unwrap_or_else(|| defaults.primary_template().to_owned());
    let aliases = section
        .aliases
        .clone()
        .unwrap_or_else(|| defaults.alias_templates().to_vec());
    let scheme = GuardScheme::new(primary, aliases);
    match &section.need {
        Some(need) => scheme.with_need(need.clone()),
        None => scheme,
    }
}

/// Spelling errors abort the load; body shape defects become diagnostics.
fn entry(section: &TypeSection) -> Result<Result<LayoutEntry, TableDiagnostic>, LoadError> {
    let name = TypeName::new(section.name.as_str());
    let spell = |ty: &str| {
        parse_spelling(ty).map_err(|source| LoadError::Spelling {
            entry: section.name.clone(),
            source,
        })
    };

    let body = match (&section.typedef, &section.record, &section.opaque) {
        (Some(ty), None, None) => LayoutBody::Alias(spell(ty.as_str())?),
        (None, Some(record), None) => {
            let mut builder = RecordBuilder::new(record.kind.into());
            if let Some(tag) = &record.tag {
                builder = builder.tag(tag.as_str());
            }
            if record.tag_only {
                builder = builder.tag_only();
            }
            for field in &record.fields {
                let mut decl = FieldDecl::new(field.name.as_str(), spell(field.ty.as_str())?);
                if let Some(len) = field.len {
                    decl = decl.with_len(array_len(len));
                }
                builder = builder.field_decl(decl);
            }
            builder.finish()
        }
        (None, None, Some(views)) => {
            let mut builder = OpaqueBuilder::new();
            for view in views {
                builder = builder.view(view.name.as_str(), spell(view.ty.as_str())?, view.len);
            }
            builder.finish()
        }
        (None, None, None) => {
            return Ok(Err(TableDiagnostic::new(
                "table.body",
                Some(&name),
                "entry needs one of 'typedef', 'record' or 'opaque'",
            )));
        }
        _ => {
            return Ok(Err(TableDiagnostic::new(
                "table.body",
                Some(&name),
                "entry sets more than one of 'typedef', 'record' and 'opaque'",
            )));
        }
    };

    let mut entry = LayoutEntry::new(name, body).scoped(section.dialect.into());
    if !section.foreign_aliases {
        entry = entry.without_foreign_aliases();
    }
    for alias in &section.aliases {
        entry = entry.with_alias(alias.as_str());
    }
    Ok(Ok(entry))
}

fn array_len(len: LenSection) -> ArrayLen {
    match len {
        LenSection::Count(count) => ArrayLen::Count(count),
        LenSection::Bytes { bytes } => ArrayLen::Bytes(bytes),
    }
}
