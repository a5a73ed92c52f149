//! Condition classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a stamp is mint (unused), used, or not yet classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    /// Never postally used.
    Mint,
    /// Postally used or cancelled.
    Used,
    /// Not classified.
    #[default]
    Unknown,
}

impl Condition {
    /// All conditions, in declaration order.
    pub const ALL: [Condition; 3] = [Condition::Mint, Condition::Used, Condition::Unknown];

    /// Stored label.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Condition::Mint => "mint",
            Condition::Used => "used",
            Condition::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown condition label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCondition(pub String);

impl fmt::Display for UnknownCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown condition {:?} (expected mint, used or unknown)", self.0)
    }
}

impl std::error::Error for UnknownCondition {}

impl FromStr for Condition {
    type Err = UnknownCondition;

    /// Parses a label case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mint" => Ok(Condition::Mint),
            "used" => Ok(Condition::Used),
            "unknown" => Ok(Condition::Unknown),
            _ => Err(UnknownCondition(s.to_string())),
        }
    }
}
