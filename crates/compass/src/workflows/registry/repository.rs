use super::domain::{AiOutcome, Board, BoardDraft, BoardId, Solution, SolutionDraft, SolutionId};
use crate::workflows::assessment::RiskAssessment;

/// Storage abstraction for boards and their solutions.
///
/// Implementations assign identifiers. Deleting a board removes its solutions.
/// The two classification writes each touch only their own path and must apply
/// atomically against the stored record, returning `NotFound` once it is gone.
pub trait RegistryRepository: Send + Sync {
    fn insert_board(&self, draft: BoardDraft) -> Result<Board, RepositoryError>;
    fn boards(&self) -> Result<Vec<Board>, RepositoryError>;
    fn fetch_board(&self, id: BoardId) -> Result<Option<Board>, RepositoryError>;
    fn delete_board(&self, id: BoardId) -> Result<(), RepositoryError>;

    fn insert_solution(
        &self,
        board_id: BoardId,
        draft: SolutionDraft,
    ) -> Result<Solution, RepositoryError>;
    fn fetch_solution(&self, id: SolutionId) -> Result<Option<Solution>, RepositoryError>;
    fn record_survey(
        &self,
        id: SolutionId,
        verdict: RiskAssessment,
    ) -> Result<Solution, RepositoryError>;
    fn record_ai_outcome(
        &self,
        id: SolutionId,
        outcome: AiOutcome,
    ) -> Result<Solution, RepositoryError>;
    fn delete_solution(&self, id: SolutionId) -> Result<(), RepositoryError>;
    fn solutions_for_board(&self, board_id: BoardId) -> Result<Vec<Solution>, RepositoryError>;
    fn all_solutions(&self) -> Result<Vec<Solution>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
