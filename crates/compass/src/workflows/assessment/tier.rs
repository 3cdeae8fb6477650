use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// EU AI Act risk tier. Variant order is severity order, so `Ord` compares by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Minimal,
    Limited,
    High,
    Unacceptable,
}

impl RiskTier {
    /// Tiers from most to least severe.
    pub const fn ordered() -> [Self; 4] {
        [Self::Unacceptable, Self::High, Self::Limited, Self::Minimal]
    }

    pub const fn severity(self) -> u8 {
        match self {
            Self::Minimal => 0,
            Self::Limited => 1,
            Self::High => 2,
            Self::Unacceptable => 3,
        }
    }

    /// Canonical literal used on the wire and in storage.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "Minimal",
            Self::Limited => "Limited",
            Self::High => "High",
            Self::Unacceptable => "Unacceptable",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Minimal => "Minimal Risk",
            Self::Limited => "Limited Risk",
            Self::High => "High Risk",
            Self::Unacceptable => "Unacceptable Risk",
        }
    }

    /// Display class for dashboards and alerts.
    pub const fn alert_class(self) -> &'static str {
        match self {
            Self::Minimal => "success",
            Self::Limited => "info",
            Self::High => "warning",
            Self::Unacceptable => "danger",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskTier {
    type Err = TierParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Minimal" => Ok(Self::Minimal),
            "Limited" => Ok(Self::Limited),
            "High" => Ok(Self::High),
            "Unacceptable" => Ok(Self::Unacceptable),
            other => Err(TierParseError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a risk tier (expected Unacceptable, High, Limited or Minimal)")]
pub struct TierParseError(pub String);
