use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Result alias for errors emitted by the lint engine.
pub type LintResult<T> = Result<T, LintError>;

/// Structured error type for the lint engine.
///
/// Only configuration-shaped problems surface as `LintError`. Failures of a
/// single parser, rule or fixer are logged and absorbed where they happen.
#[derive(Debug, Error)]
pub enum LintError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("could not find {kind} {name} named in {context}")]
    UnknownComponent {
        kind: &'static str,
        name: String,
        context: String,
    },

    #[error("{kind} {name} is already registered (attempted by {registrant})")]
    Duplicate {
        kind: &'static str,
        name: String,
        registrant: String,
    },

    #[error("invalid {kind}: {reason}")]
    InvalidComponent { kind: &'static str, reason: String },

    #[error(
        "{kind} {name} processes representations of type {actual}, but filetype {file_type} \
         handles type {expected}"
    )]
    TypeMismatch {
        kind: &'static str,
        name: String,
        actual: String,
        file_type: String,
        expected: String,
    },

    #[error("plugin {name} failed: {reason}")]
    Plugin { name: String, reason: String },

    #[error("{0}")]
    Other(String),
}

impl LintError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn unknown(kind: &'static str, name: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnknownComponent {
            kind,
            name: name.into(),
            context: context.into(),
        }
    }

    pub fn duplicate(
        kind: &'static str,
        name: impl Into<String>,
        registrant: impl Into<String>,
    ) -> Self {
        Self::Duplicate {
            kind,
            name: name.into(),
            registrant: registrant.into(),
        }
    }

    pub fn invalid(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidComponent {
            kind,
            reason: reason.into(),
        }
    }

    pub fn plugin(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Plugin {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Convert to anyhow::Error for interop with anyhow-based code.
    pub fn into_anyhow(self) -> AnyhowError {
        AnyhowError::new(self)
    }
}

impl From<AnyhowError> for LintError {
    fn from(err: AnyhowError) -> Self {
        LintError::other(format!("{err:#}"))
    }
}

/// Convenience macro mirroring `anyhow::bail!` but returning LintError.
#[macro_export]
macro_rules! loclint_bail {
    ($($arg:tt)*) => {
        return Err($crate::error::LintError::other(format!($($arg)*)));
    };
}

/// Convenience macro mirroring `anyhow::ensure!`.
#[macro_export]
macro_rules! loclint_ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::loclint_bail!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positive(n: i64) -> LintResult<i64> {
        crate::loclint_ensure!(n > 0, "expected a positive number, got {n}");
        Ok(n)
    }

    #[test]
    fn ensure_macro_returns_other() {
        assert_eq!(positive(3).unwrap(), 3);
        let err = positive(-1).unwrap_err();
        assert!(matches!(err, LintError::Other(_)));
        assert_eq!(err.to_string(), "expected a positive number, got -1");
    }

    #[test]
    fn type_mismatch_names_both_sides() {
        let err = LintError::TypeMismatch {
            kind: "transformer",
            name: "errorfilter".to_string(),
            actual: "resource".to_string(),
            file_type: "javascript".to_string(),
            expected: "string".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("transformer errorfilter"));
        assert!(msg.contains("filetype javascript"));
    }

    #[test]
    fn anyhow_round_trip_keeps_context() {
        let inner = anyhow::anyhow!("disk full").context("writing output");
        let err: LintError = inner.into();
        assert_eq!(err.to_string(), "writing output: disk full");
    }
}
