use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::workflows::assessment::{RiskAssessment, RiskTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(pub u64);

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SolutionId(pub u64);

impl fmt::Display for SolutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Named grouping of catalogued AI solutions, e.g. a team or department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Board {
    pub fn new(id: BoardId, draft: BoardDraft) -> Self {
        Self {
            id,
            name: draft.name,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDraft {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSummary {
    pub id: BoardId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub solution_count: usize,
}

/// Role the organization plays for the AI system under the Act.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    Provider,
    Deployer,
    User,
    Distributor,
    #[default]
    #[serde(rename = "Not specified")]
    NotSpecified,
}

impl UserRole {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Provider => "Provider",
            Self::Deployer => "Deployer",
            Self::User => "User",
            Self::Distributor => "Distributor",
            Self::NotSpecified => "Not specified",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionDraft {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub user_role: UserRole,
}

/// Stored outcome of one classification path.
///
/// Crosses storage and the wire as a bare string. Values that are not one of the
/// known literals are kept verbatim as `Unrecognized` so they can be reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskStatus {
    #[default]
    Pending,
    Error,
    Assessed(RiskTier),
    Unrecognized(String),
}

impl RiskStatus {
    pub fn tier(&self) -> Option<RiskTier> {
        match self {
            Self::Assessed(tier) => Some(*tier),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::Error => "Error",
            Self::Assessed(tier) => tier.as_str(),
            Self::Unrecognized(value) => value.as_str(),
        }
    }
}

impl From<String> for RiskStatus {
    fn from(value: String) -> Self {
        if value == "Pending" {
            return Self::Pending;
        }
        if value == "Error" {
            return Self::Error;
        }
        match value.parse::<RiskTier>() {
            Ok(tier) => Self::Assessed(tier),
            Err(_) => Self::Unrecognized(value),
        }
    }
}

impl From<RiskStatus> for String {
    fn from(value: RiskStatus) -> Self {
        match value {
            RiskStatus::Unrecognized(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one AI classification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiOutcome {
    Classified { tier: RiskTier, rationale: String },
    Failed { reason: String },
}

/// Both classification paths for a solution. Neither path writes the other's fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionRiskRecord {
    pub risk_survey: RiskStatus,
    pub survey_details: Option<String>,
    pub risk_ai: RiskStatus,
    pub ai_rationale: Option<String>,
}

impl SolutionRiskRecord {
    pub fn record_survey(&mut self, verdict: RiskAssessment) {
        self.risk_survey = RiskStatus::Assessed(verdict.risk_level);
        self.survey_details = Some(verdict.details);
    }

    pub fn record_ai(&mut self, tier: RiskTier, rationale: String) {
        self.risk_ai = RiskStatus::Assessed(tier);
        self.ai_rationale = Some(rationale);
    }

    pub fn record_ai_failure(&mut self, reason: String) {
        self.risk_ai = RiskStatus::Error;
        self.ai_rationale = Some(reason);
    }

    pub fn apply_ai(&mut self, outcome: AiOutcome) {
        match outcome {
            AiOutcome::Classified { tier, rationale } => self.record_ai(tier, rationale),
            AiOutcome::Failed { reason } => self.record_ai_failure(reason),
        }
    }

    /// True until a classification has succeeded; failed runs are retried.
    pub fn needs_ai_analysis(&self) -> bool {
        matches!(self.risk_ai, RiskStatus::Pending | RiskStatus::Error)
    }
}

/// Catalogued AI system with its two independently tracked risk tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub id: SolutionId,
    pub board_id: BoardId,
    pub name: String,
    pub description: String,
    pub user_role: UserRole,
    #[serde(flatten)]
    pub risk: SolutionRiskRecord,
}

impl Solution {
    /// New solutions start with both classification paths pending.
    pub fn new(id: SolutionId, board_id: BoardId, draft: SolutionDraft) -> Self {
        Self {
            id,
            board_id,
            name: draft.name,
            description: draft.description,
            user_role: draft.user_role,
            risk: SolutionRiskRecord::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn risk_status_round_trips_through_strings() {
        assert_eq!(RiskStatus::from("Pending".to_string()), RiskStatus::Pending);
        assert_eq!(RiskStatus::from("Error".to_string()), RiskStatus::Error);
        assert_eq!(
            RiskStatus::from("High".to_string()),
            RiskStatus::Assessed(RiskTier::High)
        );
        assert_eq!(
            RiskStatus::from("Severe".to_string()),
            RiskStatus::Unrecognized("Severe".to_string())
        );
        assert_eq!(
            RiskStatus::from(" High ".to_string()),
            RiskStatus::Unrecognized(" High ".to_string())
        );
        assert_eq!(String::from(RiskStatus::Unrecognized(" High ".to_string())), " High ");
        assert_eq!(String::from(RiskStatus::Assessed(RiskTier::Minimal)), "Minimal");
        assert_eq!(String::from(RiskStatus::Unrecognized("?".to_string())), "?");
    }

    #[test]
    fn solution_serializes_flat_risk_fields() {
        let mut solution = Solution {
            id: SolutionId(4),
            board_id: BoardId(1),
            name: "Resume screener".to_string(),
            description: "Ranks applicants".to_string(),
            user_role: UserRole::NotSpecified,
            risk: SolutionRiskRecord::default(),
        };
        solution.risk.record_ai(RiskTier::High, "Annex III employment".to_string());

        let value = serde_json::to_value(&solution).expect("serializes");
        assert_eq!(value["id"], json!(4));
        assert_eq!(value["user_role"], json!("Not specified"));
        assert_eq!(value["risk_survey"], json!("Pending"));
        assert_eq!(value["risk_ai"], json!("High"));
        assert_eq!(value["ai_rationale"], json!("Annex III employment"));

        let decoded: Solution = serde_json::from_value(value).expect("deserializes");
        assert_eq!(decoded, solution);
    }

    #[test]
    fn survey_and_ai_paths_are_independent() {
        let mut record = SolutionRiskRecord::default();
        record.record_survey(RiskAssessment::minimal());
        record.record_ai_failure("timeout".to_string());

        assert_eq!(record.risk_survey, RiskStatus::Assessed(RiskTier::Minimal));
        assert_eq!(record.risk_ai, RiskStatus::Error);
        assert!(record.needs_ai_analysis());

        record.record_ai(RiskTier::Limited, "chatbot".to_string());
        assert!(!record.needs_ai_analysis());
        assert_eq!(record.risk_survey.tier(), Some(RiskTier::Minimal));
    }
}
