use std::path::PathBuf;

use crate::abi::TableDiagnostic;

#[derive(Debug, thiserror::Error)]
pub enum SpellingError {
    #[error("unexpected character '{ch}' at column {column} in '{spelling}'")]
    UnexpectedChar {
        ch: char,
        column: usize,
        spelling: String,
    },
    #[error("expected {expected}, found {found} at column {column} in '{spelling}'")]
    Unexpected {
        expected: &'static str,
        found: String,
        column: usize,
        spelling: String,
    },
}

/// Any failure while reading a target table from TOML.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed target table: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("entry '{entry}': {source}")]
    Spelling {
        entry: String,
        #[source]
        source: SpellingError,
    },
    #[error("unknown built-in target '{0}'")]
    UnknownTarget(String),
    #[error("target table has {} defect(s):\n{}", .0.len(), render_diagnostics(.0))]
    Diagnostics(Vec<TableDiagnostic>),
}

fn render_diagnostics(diagnostics: &[TableDiagnostic]) -> String {
    diagnostics
        .iter()
        .map(|diagnostic| format!("  {diagnostic}"))
        .collect::<Vec<_>>()
        .join("\n")
}
