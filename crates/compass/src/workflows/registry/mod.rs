//! Boards of catalogued AI solutions and their two classification paths.

pub mod classifier;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use classifier::{
    Classification, ClassificationRequest, ClassifierError, LlmRiskClassifier, RiskClassifier,
    UnconfiguredClassifier,
};
pub use domain::{
    AiOutcome, Board, BoardDraft, BoardId, BoardSummary, RiskStatus, Solution, SolutionDraft,
    SolutionId, SolutionRiskRecord, UserRole,
};
pub use repository::{RegistryRepository, RepositoryError};
pub use router::registry_router;
pub use service::{
    AnalysisReport, ComplianceRegistryService, RegistryServiceError, SurveyResponse,
};
