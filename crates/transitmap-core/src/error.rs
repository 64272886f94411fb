use std::fmt;
use std::io;
use std::path::PathBuf;

use transitmap_graph::SortError;

/// Machine-readable error codes for operators and tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigReadFailed,
    ConfigParseError,
    UnknownCondition,
    InvalidConditionValue,
    InvalidThreshold,
    DuplicateGroup,
    CannotSort,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigReadFailed => "E1001",
            Self::ConfigParseError => "E1002",
            Self::UnknownCondition => "E1003",
            Self::InvalidConditionValue => "E1004",
            Self::InvalidThreshold => "E1005",
            Self::DuplicateGroup => "E1006",
            Self::CannotSort => "E2001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigReadFailed => "Config file could not be read",
            Self::ConfigParseError => "Config file parse error",
            Self::UnknownCondition => "Unknown trip condition",
            Self::InvalidConditionValue => "Invalid trip condition value",
            Self::InvalidThreshold => "Frequency threshold out of range",
            Self::DuplicateGroup => "Duplicate service-map group",
            Self::CannotSort => "Stop graph contains a cycle",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigReadFailed => Some("Check the config path and its read permissions."),
            Self::ConfigParseError => {
                Some("Fix the TOML syntax in the service-map config and retry.")
            }
            Self::UnknownCondition => Some(
                "Use all_of, one_of, none_of, weekday, weekend, starts_earlier_than, \
                 starts_later_than, ends_earlier_than, ends_later_than or route_id.",
            ),
            Self::InvalidConditionValue => Some(
                "weekday/weekend take booleans, time conditions take hours, route_id a string.",
            ),
            Self::InvalidThreshold => Some("Set threshold to a value between 0.0 and 1.0."),
            Self::DuplicateGroup => Some("Give every [[groups]] entry a unique name."),
            Self::CannotSort => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised while loading or compiling service-map configuration.
///
/// All of these are deployment problems rather than data problems, so
/// callers should fail fast on them.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A condition tree used a key the matcher does not know.
    #[error("unknown condition {key:?}")]
    UnknownCondition {
        /// The offending key.
        key: String,
    },

    /// A known condition key carried a value of the wrong type.
    #[error("condition {key:?} expects {expected}, got {found}")]
    InvalidConditionValue {
        /// The condition key.
        key: String,
        /// What the key accepts.
        expected: &'static str,
        /// The value found, rendered as JSON.
        found: String,
    },

    /// A group threshold was outside `[0, 1]`.
    #[error("group {group:?} has threshold {threshold}, expected a value in [0, 1]")]
    InvalidThreshold {
        /// Group name.
        group: String,
        /// The configured threshold.
        threshold: f64,
    },

    /// Two groups share a name.
    #[error("group {0:?} is defined more than once")]
    DuplicateGroup(String),

    /// The config file is not valid TOML or does not fit the schema.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Underlying parser error.
        source: toml::de::Error,
    },

    /// The config file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl ConfigError {
    /// Return the machine-readable error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownCondition { .. } => ErrorCode::UnknownCondition,
            Self::InvalidConditionValue { .. } => ErrorCode::InvalidConditionValue,
            Self::InvalidThreshold { .. } => ErrorCode::InvalidThreshold,
            Self::DuplicateGroup(_) => ErrorCode::DuplicateGroup,
            Self::Parse { .. } => ErrorCode::ConfigParseError,
            Self::Io { .. } => ErrorCode::ConfigReadFailed,
        }
    }

    pub(crate) fn invalid_value(
        key: &str,
        expected: &'static str,
        found: &serde_json::Value,
    ) -> Self {
        Self::InvalidConditionValue {
            key: key.to_string(),
            expected,
            found: found.to_string(),
        }
    }
}

impl From<SortError> for ErrorCode {
    fn from(err: SortError) -> Self {
        match err {
            SortError::CannotSort { .. } => Self::CannotSort,
        }
    }
}
