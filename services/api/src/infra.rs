use ai_act_compass::config::ClassifierConfig;
use ai_act_compass::workflows::assessment::RiskAssessment;
use ai_act_compass::workflows::registry::{
    AiOutcome, Board, BoardDraft, BoardId, Classification, ClassificationRequest, ClassifierError,
    LlmRiskClassifier, RegistryRepository, RepositoryError, RiskClassifier, Solution,
    SolutionDraft, SolutionId, UnconfiguredClassifier,
};
use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct RegistryTables {
    boards: BTreeMap<BoardId, Board>,
    solutions: BTreeMap<SolutionId, Solution>,
    last_board_id: u64,
    last_solution_id: u64,
}

/// Process-local board and solution store. Contents are lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRegistryRepository {
    tables: Arc<Mutex<RegistryTables>>,
}

impl InMemoryRegistryRepository {
    fn tables(&self) -> Result<MutexGuard<'_, RegistryTables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("registry mutex poisoned".to_string()))
    }
}

impl RegistryRepository for InMemoryRegistryRepository {
    fn insert_board(&self, draft: BoardDraft) -> Result<Board, RepositoryError> {
        let mut tables = self.tables()?;
        tables.last_board_id += 1;
        let board = Board::new(BoardId(tables.last_board_id), draft);
        tables.boards.insert(board.id, board.clone());
        Ok(board)
    }

    fn boards(&self) -> Result<Vec<Board>, RepositoryError> {
        Ok(self.tables()?.boards.values().cloned().collect())
    }

    fn fetch_board(&self, id: BoardId) -> Result<Option<Board>, RepositoryError> {
        Ok(self.tables()?.boards.get(&id).cloned())
    }

    fn delete_board(&self, id: BoardId) -> Result<(), RepositoryError> {
        let mut tables = self.tables()?;
        if tables.boards.remove(&id).is_none() {
            return Err(RepositoryError::NotFound);
        }
        tables.solutions.retain(|_, solution| solution.board_id != id);
        Ok(())
    }

    fn insert_solution(
        &self,
        board_id: BoardId,
        draft: SolutionDraft,
    ) -> Result<Solution, RepositoryError> {
        let mut tables = self.tables()?;
        if !tables.boards.contains_key(&board_id) {
            return Err(RepositoryError::NotFound);
        }
        tables.last_solution_id += 1;
        let solution = Solution::new(SolutionId(tables.last_solution_id), board_id, draft);
        tables.solutions.insert(solution.id, solution.clone());
        Ok(solution)
    }

    fn fetch_solution(&self, id: SolutionId) -> Result<Option<Solution>, RepositoryError> {
        Ok(self.tables()?.solutions.get(&id).cloned())
    }

    fn record_survey(
        &self,
        id: SolutionId,
        verdict: RiskAssessment,
    ) -> Result<Solution, RepositoryError> {
        let mut tables = self.tables()?;
        match tables.solutions.get_mut(&id) {
            Some(solution) => {
                solution.risk.record_survey(verdict);
                Ok(solution.clone())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn record_ai_outcome(
        &self,
        id: SolutionId,
        outcome: AiOutcome,
    ) -> Result<Solution, RepositoryError> {
        let mut tables = self.tables()?;
        match tables.solutions.get_mut(&id) {
            Some(solution) => {
                solution.risk.apply_ai(outcome);
                Ok(solution.clone())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn delete_solution(&self, id: SolutionId) -> Result<(), RepositoryError> {
        let mut tables = self.tables()?;
        match tables.solutions.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound),
        }
    }

    fn solutions_for_board(&self, board_id: BoardId) -> Result<Vec<Solution>, RepositoryError> {
        Ok(self
            .tables()?
            .solutions
            .values()
            .filter(|solution| solution.board_id == board_id)
            .cloned()
            .collect())
    }

    fn all_solutions(&self) -> Result<Vec<Solution>, RepositoryError> {
        Ok(self.tables()?.solutions.values().cloned().collect())
    }
}

/// Classifier selected from configuration at startup.
#[derive(Clone)]
pub(crate) enum ConfiguredClassifier {
    Llm(LlmRiskClassifier),
    Unconfigured(UnconfiguredClassifier),
}

impl ConfiguredClassifier {
    /// Falls back to the unconfigured classifier when no API key is set. A key that
    /// is present but unusable fails startup.
    pub(crate) fn from_config(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        if !config.is_configured() {
            warn!("APP_CLASSIFIER_API_KEY not set; AI analysis will report every solution as failed");
            return Ok(Self::Unconfigured(UnconfiguredClassifier));
        }

        Ok(Self::Llm(LlmRiskClassifier::new(config)?))
    }

    pub(crate) fn is_live(&self) -> bool {
        matches!(self, Self::Llm(_))
    }
}

#[async_trait]
impl RiskClassifier for ConfiguredClassifier {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<Classification, ClassifierError> {
        match self {
            Self::Llm(classifier) => classifier.classify(request).await,
            Self::Unconfigured(classifier) => classifier.classify(request).await,
        }
    }
}
