use serde::{Deserialize, Serialize};

/// Severity of a single lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Suggestion,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Suggestion => "suggestion",
        }
    }

    /// Lenient parse used for declarative rules; anything unrecognized is a warning.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Severity::Error,
            "suggestion" => Severity::Suggestion,
            _ => Severity::Warning,
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::Warning
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_severity_falls_back_to_warning() {
        assert_eq!(Severity::from_str_lossy("ERROR"), Severity::Error);
        assert_eq!(Severity::from_str_lossy("suggestion"), Severity::Suggestion);
        assert_eq!(Severity::from_str_lossy("fatal"), Severity::Warning);
    }
}
