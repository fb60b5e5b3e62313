use std::fmt;

use super::record::TypeName;

/// A configuration-time defect found in a layout table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableDiagnostic {
    pub code: &'static str,
    pub entry: Option<TypeName>,
    pub message: String,
}

impl TableDiagnostic {
    pub fn new(code: &'static str, entry: Option<&TypeName>, message: impl Into<String>) -> Self {
        Self {
            code,
            entry: entry.cloned(),
            message: message.into(),
        }
    }
}

impl fmt::Display for TableDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entry {
            Some(entry) => write!(f, "[{}] {entry}: {}", self.code, self.message),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}
