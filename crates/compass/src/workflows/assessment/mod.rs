//! EU AI Act questionnaire, escalation rules, and KPI roll-ups.

mod catalog;
mod kpi;
mod survey;
mod tier;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, Question, QuestionCatalog, QuestionCategory};
pub use kpi::{
    aggregate, BoardKpi, GlobalKpi, RiskAggregate, RiskPath, TierAnomaly, TierCounts,
};
pub use survey::{
    escalate, RiskAssessment, SurveyChoice, SurveyError, SurveySession, SurveyState,
    MINIMAL_RISK_DETAILS,
};
pub use tier::{RiskTier, TierParseError};
