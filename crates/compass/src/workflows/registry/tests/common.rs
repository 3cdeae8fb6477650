use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::workflows::assessment::{RiskAssessment, RiskTier};
use crate::workflows::registry::classifier::{
    Classification, ClassificationRequest, ClassifierError, RiskClassifier,
};
use crate::workflows::registry::domain::{
    AiOutcome, Board, BoardDraft, BoardId, Solution, SolutionDraft, SolutionId, UserRole,
};
use crate::workflows::registry::repository::{RegistryRepository, RepositoryError};
use crate::workflows::registry::service::ComplianceRegistryService;

pub(super) type TestService = ComplianceRegistryService<MemoryRegistry, ScriptedClassifier>;

#[derive(Default)]
struct Tables {
    boards: BTreeMap<BoardId, Board>,
    solutions: BTreeMap<SolutionId, Solution>,
    next_board: u64,
    next_solution: u64,
}

#[derive(Default, Clone)]
pub(super) struct MemoryRegistry {
    tables: Arc<Mutex<Tables>>,
}

impl RegistryRepository for MemoryRegistry {
    fn insert_board(&self, draft: BoardDraft) -> Result<Board, RepositoryError> {
        let mut tables = self.tables.lock().expect("registry mutex poisoned");
        tables.next_board += 1;
        let board = Board::new(BoardId(tables.next_board), draft);
        tables.boards.insert(board.id, board.clone());
        Ok(board)
    }

    fn boards(&self) -> Result<Vec<Board>, RepositoryError> {
        let tables = self.tables.lock().expect("registry mutex poisoned");
        Ok(tables.boards.values().cloned().collect())
    }

    fn fetch_board(&self, id: BoardId) -> Result<Option<Board>, RepositoryError> {
        let tables = self.tables.lock().expect("registry mutex poisoned");
        Ok(tables.boards.get(&id).cloned())
    }

    fn delete_board(&self, id: BoardId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().expect("registry mutex poisoned");
        tables.boards.remove(&id).ok_or(RepositoryError::NotFound)?;
        tables.solutions.retain(|_, solution| solution.board_id != id);
        Ok(())
    }

    fn insert_solution(
        &self,
        board_id: BoardId,
        draft: SolutionDraft,
    ) -> Result<Solution, RepositoryError> {
        let mut tables = self.tables.lock().expect("registry mutex poisoned");
        tables.next_solution += 1;
        let solution = Solution::new(SolutionId(tables.next_solution), board_id, draft);
        tables.solutions.insert(solution.id, solution.clone());
        Ok(solution)
    }

    fn fetch_solution(&self, id: SolutionId) -> Result<Option<Solution>, RepositoryError> {
        let tables = self.tables.lock().expect("registry mutex poisoned");
        Ok(tables.solutions.get(&id).cloned())
    }

    fn record_survey(
        &self,
        id: SolutionId,
        verdict: RiskAssessment,
    ) -> Result<Solution, RepositoryError> {
        let mut tables = self.tables.lock().expect("registry mutex poisoned");
        let solution = tables
            .solutions
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        solution.risk.record_survey(verdict);
        Ok(solution.clone())
    }

    fn record_ai_outcome(
        &self,
        id: SolutionId,
        outcome: AiOutcome,
    ) -> Result<Solution, RepositoryError> {
        let mut tables = self.tables.lock().expect("registry mutex poisoned");
        let solution = tables
            .solutions
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        solution.risk.apply_ai(outcome);
        Ok(solution.clone())
    }

    fn delete_solution(&self, id: SolutionId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().expect("registry mutex poisoned");
        tables
            .solutions
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn solutions_for_board(&self, board_id: BoardId) -> Result<Vec<Solution>, RepositoryError> {
        let tables = self.tables.lock().expect("registry mutex poisoned");
        Ok(tables
            .solutions
            .values()
            .filter(|solution| solution.board_id == board_id)
            .cloned()
            .collect())
    }

    fn all_solutions(&self) -> Result<Vec<Solution>, RepositoryError> {
        let tables = self.tables.lock().expect("registry mutex poisoned");
        Ok(tables.solutions.values().cloned().collect())
    }
}

pub(super) struct UnavailableRegistry;

impl RegistryRepository for UnavailableRegistry {
    fn insert_board(&self, _draft: BoardDraft) -> Result<Board, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn boards(&self) -> Result<Vec<Board>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_board(&self, _id: BoardId) -> Result<Option<Board>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete_board(&self, _id: BoardId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_solution(
        &self,
        _board_id: BoardId,
        _draft: SolutionDraft,
    ) -> Result<Solution, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_solution(&self, _id: SolutionId) -> Result<Option<Solution>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn record_survey(
        &self,
        _id: SolutionId,
        _verdict: RiskAssessment,
    ) -> Result<Solution, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn record_ai_outcome(
        &self,
        _id: SolutionId,
        _outcome: AiOutcome,
    ) -> Result<Solution, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete_solution(&self, _id: SolutionId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn solutions_for_board(&self, _board_id: BoardId) -> Result<Vec<Solution>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn all_solutions(&self) -> Result<Vec<Solution>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Classifier answering from a fixed table keyed by solution name.
///
/// Names missing from the table fail with `Unavailable`.
#[derive(Default, Clone)]
pub(super) struct ScriptedClassifier {
    verdicts: HashMap<String, RiskTier>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedClassifier {
    pub(super) fn with(mut self, name: &str, tier: RiskTier) -> Self {
        self.verdicts.insert(name.to_string(), tier);
        self
    }

    pub(super) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("classifier mutex poisoned").clone()
    }
}

#[async_trait]
impl RiskClassifier for ScriptedClassifier {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<Classification, ClassifierError> {
        self.calls
            .lock()
            .expect("classifier mutex poisoned")
            .push(request.name.clone());

        match self.verdicts.get(&request.name) {
            Some(tier) => Ok(Classification {
                risk_level: *tier,
                rationale: format!("{} per scripted review", tier.label()),
            }),
            None => Err(ClassifierError::Unavailable("model timed out".to_string())),
        }
    }
}

/// What happens to the stored solution while its classification is in flight.
#[derive(Clone)]
pub(super) enum Interference {
    SurveySubmitted(RiskAssessment),
    Deleted,
}

/// Scripted classifier that mutates the registry mid-request, the way a concurrent
/// HTTP caller could while the model call is awaited.
pub(super) struct InterleavingClassifier {
    registry: Arc<MemoryRegistry>,
    scripted: ScriptedClassifier,
    interference: HashMap<String, Interference>,
}

impl InterleavingClassifier {
    pub(super) fn new(registry: Arc<MemoryRegistry>, scripted: ScriptedClassifier) -> Self {
        Self {
            registry,
            scripted,
            interference: HashMap::new(),
        }
    }

    pub(super) fn during(mut self, name: &str, interference: Interference) -> Self {
        self.interference.insert(name.to_string(), interference);
        self
    }
}

#[async_trait]
impl RiskClassifier for InterleavingClassifier {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<Classification, ClassifierError> {
        if let Some(interference) = self.interference.get(&request.name) {
            let id = self
                .registry
                .all_solutions()
                .expect("list solutions")
                .into_iter()
                .find(|solution| solution.name == request.name)
                .map(|solution| solution.id)
                .expect("solution under classification is stored");
            match interference {
                Interference::SurveySubmitted(verdict) => {
                    self.registry
                        .record_survey(id, verdict.clone())
                        .expect("survey written mid-analysis");
                }
                Interference::Deleted => {
                    self.registry
                        .delete_solution(id)
                        .expect("solution deleted mid-analysis");
                }
            }
        }
        self.scripted.classify(request).await
    }
}

pub(super) fn build_service(
    classifier: ScriptedClassifier,
) -> (TestService, Arc<MemoryRegistry>, Arc<ScriptedClassifier>) {
    let repository = Arc::new(MemoryRegistry::default());
    let classifier = Arc::new(classifier);
    let service = ComplianceRegistryService::new(repository.clone(), classifier.clone());
    (service, repository, classifier)
}

pub(super) fn draft(name: &str, description: &str) -> SolutionDraft {
    SolutionDraft {
        name: name.to_string(),
        description: description.to_string(),
        user_role: UserRole::Deployer,
    }
}

pub(super) fn board_draft(name: &str) -> BoardDraft {
    BoardDraft {
        name: name.to_string(),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
