use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::classifier::RiskClassifier;
use super::domain::{
    Board, BoardDraft, BoardId, BoardSummary, Solution, SolutionDraft, SolutionId,
};
use super::repository::RegistryRepository;
use super::service::{AnalysisReport, ComplianceRegistryService, SurveyResponse};
use crate::error::AppError;
use crate::workflows::assessment::{BoardKpi, GlobalKpi, Question, RiskAssessment, RiskTier};

type SharedService<R, C> = Arc<ComplianceRegistryService<R, C>>;
type HandlerResult<T> = Result<(StatusCode, Json<T>), AppError>;

/// Body of a direct survey verdict submission.
#[derive(Debug, Deserialize)]
pub struct SurveySubmission {
    pub risk_level: RiskTier,
    #[serde(default)]
    pub details: String,
}

#[derive(Debug, Deserialize)]
pub struct SurveyResponses {
    pub answers: Vec<SurveyResponse>,
}

/// Router builder exposing board, solution, survey, analysis, and KPI endpoints.
pub fn registry_router<R, C>(service: SharedService<R, C>) -> Router
where
    R: RegistryRepository + 'static,
    C: RiskClassifier + 'static,
{
    Router::new()
        .route(
            "/api/v1/boards",
            get(list_boards_handler::<R, C>).post(create_board_handler::<R, C>),
        )
        .route(
            "/api/v1/boards/:board_id",
            delete(delete_board_handler::<R, C>),
        )
        .route(
            "/api/v1/boards/:board_id/solutions",
            get(list_solutions_handler::<R, C>).post(create_solution_handler::<R, C>),
        )
        .route(
            "/api/v1/boards/:board_id/analyze",
            post(analyze_board_handler::<R, C>),
        )
        .route("/api/v1/boards/:board_id/kpi", get(board_kpi_handler::<R, C>))
        .route("/api/v1/kpi", get(global_kpi_handler::<R, C>))
        .route(
            "/api/v1/solutions/:solution_id",
            delete(delete_solution_handler::<R, C>),
        )
        .route(
            "/api/v1/solutions/:solution_id/survey",
            post(submit_survey_handler::<R, C>),
        )
        .route(
            "/api/v1/solutions/:solution_id/survey/responses",
            post(survey_responses_handler::<R, C>),
        )
        .route("/api/v1/survey/questions", get(questions_handler::<R, C>))
        .with_state(service)
}

pub(crate) async fn list_boards_handler<R, C>(
    State(service): State<SharedService<R, C>>,
) -> HandlerResult<Vec<BoardSummary>>
where
    R: RegistryRepository + 'static,
    C: RiskClassifier + 'static,
{
    Ok((StatusCode::OK, Json(service.boards()?)))
}

pub(crate) async fn create_board_handler<R, C>(
    State(service): State<SharedService<R, C>>,
    Json(draft): Json<BoardDraft>,
) -> HandlerResult<Board>
where
    R: RegistryRepository + 'static,
    C: RiskClassifier + 'static,
{
    Ok((StatusCode::CREATED, Json(service.create_board(draft)?)))
}

pub(crate) async fn delete_board_handler<R, C>(
    State(service): State<SharedService<R, C>>,
    Path(board_id): Path<u64>,
) -> HandlerResult<Value>
where
    R: RegistryRepository + 'static,
    C: RiskClassifier + 'static,
{
    service.delete_board(BoardId(board_id))?;
    Ok((StatusCode::OK, Json(json!({ "message": "Board deleted" }))))
}

pub(crate) async fn list_solutions_handler<R, C>(
    State(service): State<SharedService<R, C>>,
    Path(board_id): Path<u64>,
) -> HandlerResult<Vec<Solution>>
where
    R: RegistryRepository + 'static,
    C: RiskClassifier + 'static,
{
    Ok((StatusCode::OK, Json(service.solutions(BoardId(board_id))?)))
}

pub(crate) async fn create_solution_handler<R, C>(
    State(service): State<SharedService<R, C>>,
    Path(board_id): Path<u64>,
    Json(draft): Json<SolutionDraft>,
) -> HandlerResult<Solution>
where
    R: RegistryRepository + 'static,
    C: RiskClassifier + 'static,
{
    let solution = service.add_solution(BoardId(board_id), draft)?;
    Ok((StatusCode::CREATED, Json(solution)))
}

pub(crate) async fn delete_solution_handler<R, C>(
    State(service): State<SharedService<R, C>>,
    Path(solution_id): Path<u64>,
) -> HandlerResult<Value>
where
    R: RegistryRepository + 'static,
    C: RiskClassifier + 'static,
{
    service.delete_solution(SolutionId(solution_id))?;
    Ok((StatusCode::OK, Json(json!({ "message": "Solution deleted" }))))
}

pub(crate) async fn submit_survey_handler<R, C>(
    State(service): State<SharedService<R, C>>,
    Path(solution_id): Path<u64>,
    Json(submission): Json<SurveySubmission>,
) -> HandlerResult<Solution>
where
    R: RegistryRepository + 'static,
    C: RiskClassifier + 'static,
{
    let verdict = RiskAssessment {
        risk_level: submission.risk_level,
        details: submission.details,
    };
    let solution = service.submit_survey_result(SolutionId(solution_id), verdict)?;
    Ok((StatusCode::OK, Json(solution)))
}

pub(crate) async fn survey_responses_handler<R, C>(
    State(service): State<SharedService<R, C>>,
    Path(solution_id): Path<u64>,
    Json(responses): Json<SurveyResponses>,
) -> HandlerResult<Solution>
where
    R: RegistryRepository + 'static,
    C: RiskClassifier + 'static,
{
    let solution = service.complete_survey(SolutionId(solution_id), &responses.answers)?;
    Ok((StatusCode::OK, Json(solution)))
}

pub(crate) async fn questions_handler<R, C>(
    State(service): State<SharedService<R, C>>,
) -> Json<Vec<Question>>
where
    R: RegistryRepository + 'static,
    C: RiskClassifier + 'static,
{
    Json(service.catalog().list().to_vec())
}

pub(crate) async fn analyze_board_handler<R, C>(
    State(service): State<SharedService<R, C>>,
    Path(board_id): Path<u64>,
) -> HandlerResult<AnalysisReport>
where
    R: RegistryRepository + 'static,
    C: RiskClassifier + 'static,
{
    let report = service.run_ai_analysis(BoardId(board_id)).await?;
    Ok((StatusCode::OK, Json(report)))
}

pub(crate) async fn board_kpi_handler<R, C>(
    State(service): State<SharedService<R, C>>,
    Path(board_id): Path<u64>,
) -> HandlerResult<BoardKpi>
where
    R: RegistryRepository + 'static,
    C: RiskClassifier + 'static,
{
    Ok((StatusCode::OK, Json(service.board_kpi(BoardId(board_id))?)))
}

pub(crate) async fn global_kpi_handler<R, C>(
    State(service): State<SharedService<R, C>>,
) -> HandlerResult<GlobalKpi>
where
    R: RegistryRepository + 'static,
    C: RiskClassifier + 'static,
{
    Ok((StatusCode::OK, Json(service.global_kpi()?)))
}
