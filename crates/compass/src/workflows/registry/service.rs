use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::classifier::{ClassificationRequest, RiskClassifier};
use super::domain::{
    AiOutcome, Board, BoardDraft, BoardId, BoardSummary, Solution, SolutionDraft, SolutionId,
};
use super::repository::{RegistryRepository, RepositoryError};
use crate::workflows::assessment::{
    BoardKpi, GlobalKpi, QuestionCatalog, RiskAssessment, SurveyChoice, SurveyError,
    SurveySession,
};

/// One answer in an ordered survey submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub question_id: String,
    pub choice: SurveyChoice,
}

/// Outcome of a board-level AI analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub message: String,
    pub updated: usize,
    pub total: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Service composing the board/solution repository, survey catalog, and AI classifier.
pub struct ComplianceRegistryService<R, C> {
    repository: Arc<R>,
    classifier: Arc<C>,
    catalog: Arc<QuestionCatalog>,
}

impl<R, C> ComplianceRegistryService<R, C>
where
    R: RegistryRepository + 'static,
    C: RiskClassifier + 'static,
{
    pub fn new(repository: Arc<R>, classifier: Arc<C>) -> Self {
        Self::with_catalog(repository, classifier, QuestionCatalog::eu_ai_act())
    }

    pub fn with_catalog(repository: Arc<R>, classifier: Arc<C>, catalog: QuestionCatalog) -> Self {
        Self {
            repository,
            classifier,
            catalog: Arc::new(catalog),
        }
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn create_board(&self, draft: BoardDraft) -> Result<Board, RegistryServiceError> {
        let name = require_text("board name", &draft.name)?;
        let board = self.repository.insert_board(BoardDraft { name })?;
        info!(board_id = %board.id, name = %board.name, "board created");
        Ok(board)
    }

    pub fn boards(&self) -> Result<Vec<BoardSummary>, RegistryServiceError> {
        let boards = self.repository.boards()?;
        let solutions = self.repository.all_solutions()?;

        Ok(boards
            .into_iter()
            .map(|board| BoardSummary {
                solution_count: solutions
                    .iter()
                    .filter(|solution| solution.board_id == board.id)
                    .count(),
                id: board.id,
                name: board.name,
                created_at: board.created_at,
            })
            .collect())
    }

    pub fn delete_board(&self, board_id: BoardId) -> Result<(), RegistryServiceError> {
        self.board(board_id)?;
        self.repository.delete_board(board_id)?;
        info!(%board_id, "board deleted with its solutions");
        Ok(())
    }

    pub fn add_solution(
        &self,
        board_id: BoardId,
        draft: SolutionDraft,
    ) -> Result<Solution, RegistryServiceError> {
        self.board(board_id)?;
        let draft = SolutionDraft {
            name: require_text("solution name", &draft.name)?,
            description: require_text("solution description", &draft.description)?,
            user_role: draft.user_role,
        };
        let solution = self.repository.insert_solution(board_id, draft)?;
        info!(%board_id, solution_id = %solution.id, "solution catalogued");
        Ok(solution)
    }

    pub fn solutions(&self, board_id: BoardId) -> Result<Vec<Solution>, RegistryServiceError> {
        self.board(board_id)?;
        Ok(self.repository.solutions_for_board(board_id)?)
    }

    pub fn delete_solution(&self, solution_id: SolutionId) -> Result<(), RegistryServiceError> {
        self.solution(solution_id)?;
        self.repository.delete_solution(solution_id)?;
        info!(%solution_id, "solution deleted");
        Ok(())
    }

    /// Persists a survey verdict onto the solution's survey path. Re-submission overwrites.
    pub fn submit_survey_result(
        &self,
        solution_id: SolutionId,
        verdict: RiskAssessment,
    ) -> Result<Solution, RegistryServiceError> {
        let risk_level = verdict.risk_level;
        let solution = match self.repository.record_survey(solution_id, verdict) {
            Ok(solution) => solution,
            Err(RepositoryError::NotFound) => {
                return Err(RegistryServiceError::SolutionNotFound(solution_id))
            }
            Err(err) => return Err(err.into()),
        };
        info!(%solution_id, %risk_level, "survey result recorded");
        Ok(solution)
    }

    /// Replays ordered responses through a fresh survey session and stores the verdict.
    pub fn complete_survey(
        &self,
        solution_id: SolutionId,
        responses: &[SurveyResponse],
    ) -> Result<Solution, RegistryServiceError> {
        self.solution(solution_id)?;
        let verdict = SurveySession::replay(
            &self.catalog,
            responses
                .iter()
                .map(|response| (response.question_id.as_str(), response.choice)),
        )?;
        self.submit_survey_result(solution_id, verdict)
    }

    /// Classifies every solution on the board that has no successful AI verdict yet.
    ///
    /// Individual failures are recorded on the solution and listed in the report; they
    /// never stop the rest of the batch. Only the AI path is written back, so a survey
    /// verdict stored while the classifier is running survives. Solutions deleted
    /// mid-run are skipped.
    pub async fn run_ai_analysis(
        &self,
        board_id: BoardId,
    ) -> Result<AnalysisReport, RegistryServiceError> {
        self.board(board_id)?;
        let solutions = self.repository.solutions_for_board(board_id)?;
        let total = solutions.len();
        let mut updated = 0;
        let mut errors = Vec::new();

        for solution in solutions
            .into_iter()
            .filter(|solution| solution.risk.needs_ai_analysis())
        {
            let request = ClassificationRequest::from(&solution);
            let outcome = match self.classifier.classify(&request).await {
                Ok(classification) => AiOutcome::Classified {
                    tier: classification.risk_level,
                    rationale: classification.rationale,
                },
                Err(err) => {
                    warn!(solution_id = %solution.id, error = %err, "AI classification failed");
                    errors.push(format!("{}: {}", solution.name, err));
                    AiOutcome::Failed {
                        reason: err.to_string(),
                    }
                }
            };

            let classified = matches!(outcome, AiOutcome::Classified { .. });
            match self.repository.record_ai_outcome(solution.id, outcome) {
                Ok(stored) => {
                    if classified {
                        info!(
                            solution_id = %stored.id,
                            risk_level = %stored.risk.risk_ai,
                            "AI classification stored"
                        );
                        updated += 1;
                    }
                }
                Err(RepositoryError::NotFound) => {
                    warn!(solution_id = %solution.id, "solution removed during analysis, skipping");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(AnalysisReport {
            message: format!("Analysis complete. Updated {updated} solutions."),
            updated,
            total,
            errors,
        })
    }

    pub fn board_kpi(&self, board_id: BoardId) -> Result<BoardKpi, RegistryServiceError> {
        let board = self.board(board_id)?;
        let solutions = self.repository.solutions_for_board(board_id)?;
        Ok(BoardKpi::from_solutions(&board, &solutions))
    }

    pub fn global_kpi(&self) -> Result<GlobalKpi, RegistryServiceError> {
        let total_boards = self.repository.boards()?.len();
        let solutions = self.repository.all_solutions()?;
        Ok(GlobalKpi::from_solutions(total_boards, &solutions))
    }

    fn board(&self, board_id: BoardId) -> Result<Board, RegistryServiceError> {
        self.repository
            .fetch_board(board_id)?
            .ok_or(RegistryServiceError::BoardNotFound(board_id))
    }

    fn solution(&self, solution_id: SolutionId) -> Result<Solution, RegistryServiceError> {
        self.repository
            .fetch_solution(solution_id)?
            .ok_or(RegistryServiceError::SolutionNotFound(solution_id))
    }
}

fn require_text(field: &'static str, value: &str) -> Result<String, RegistryServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RegistryServiceError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

/// Error raised by the registry service.
#[derive(Debug, thiserror::Error)]
pub enum RegistryServiceError {
    #[error("board {0} not found")]
    BoardNotFound(BoardId),
    #[error("solution {0} not found")]
    SolutionNotFound(SolutionId),
    #[error("{0} must not be empty")]
    MissingField(&'static str),
    #[error(transparent)]
    Survey(#[from] SurveyError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
