//! Assembler errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssemblerError {
    #[error("Syntax error at row {row}: {message}")]
    SyntaxError { row: usize, message: String },

    #[error("Range error at row {row}, field {field}: {value} ({reason})")]
    RangeError {
        row: usize,
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{}", describe_all(.0))]
    Multiple(Vec<AssemblerError>),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

fn describe_all(errors: &[AssemblerError]) -> String {
    let mut out = format!("{} errors:", errors.len());
    for err in errors {
        out.push_str("\n  ");
        out.push_str(&err.to_string());
    }
    out
}

impl AssemblerError {
    pub(crate) fn syntax(row: usize, message: impl Into<String>) -> Self {
        AssemblerError::SyntaxError {
            row,
            message: message.into(),
        }
    }

    pub(crate) fn range(
        row: usize,
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        AssemblerError::RangeError {
            row,
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Collapse a list of row errors into one error
    pub(crate) fn from_errors(mut errors: Vec<AssemblerError>) -> Self {
        if errors.len() == 1 {
            errors.remove(0)
        } else {
            AssemblerError::Multiple(errors)
        }
    }

    /// Source row of the (first) offending line
    pub fn row(&self) -> Option<usize> {
        match self {
            AssemblerError::SyntaxError { row, .. } | AssemblerError::RangeError { row, .. } => {
                Some(*row)
            }
            AssemblerError::Multiple(errors) => errors.first().and_then(|e| e.row()),
            AssemblerError::IoError(_) => None,
        }
    }

    /// Individual errors, flattening `Multiple`
    pub fn errors(&self) -> Vec<&AssemblerError> {
        match self {
            AssemblerError::Multiple(errors) => errors.iter().flat_map(|e| e.errors()).collect(),
            other => vec![other],
        }
    }
}

pub type Result<T> = std::result::Result<T, AssemblerError>;
