use crate::workflows::assessment::{
    Question, QuestionCatalog, QuestionCategory, RiskTier, SurveyChoice, SurveySession,
};
use crate::workflows::registry::domain::{
    BoardId, RiskStatus, Solution, SolutionId, SolutionRiskRecord, UserRole,
};

pub(super) const PROHIBITED_TEXT: &str = "Does it score citizens for public authorities?";
pub(super) const HIGH_TEXT: &str = "Does it screen job applicants?";
pub(super) const LIMITED_TEXT: &str = "Does it chat with people?";

/// Three-question catalog: one question per category, in severity order.
pub(super) fn mini_catalog() -> QuestionCatalog {
    QuestionCatalog::new(vec![
        question("p", PROHIBITED_TEXT, QuestionCategory::Prohibited, RiskTier::Unacceptable),
        question("h", HIGH_TEXT, QuestionCategory::HighRisk, RiskTier::High),
        question("l", LIMITED_TEXT, QuestionCategory::LimitedRisk, RiskTier::Limited),
    ])
    .expect("valid catalog")
}

pub(super) fn question(
    id: &'static str,
    text: &'static str,
    category: QuestionCategory,
    tier: RiskTier,
) -> Question {
    Question {
        id,
        text,
        category,
        risk_if_yes: Some(tier),
        note: None,
    }
}

/// Answers every question in catalog order, using `choose` to pick each choice.
pub(super) fn answer_all<'c>(
    catalog: &'c QuestionCatalog,
    mut choose: impl FnMut(&Question) -> SurveyChoice,
) -> SurveySession<'c> {
    let mut session = SurveySession::new(catalog);
    for question in catalog.list() {
        session
            .answer(question.id, choose(question))
            .expect("in-turn answer accepted");
    }
    session
}

pub(super) fn solution(id: u64, board: u64, survey: RiskStatus, ai: RiskStatus) -> Solution {
    Solution {
        id: SolutionId(id),
        board_id: BoardId(board),
        name: format!("solution-{id}"),
        description: "catalogued system".to_string(),
        user_role: UserRole::Deployer,
        risk: SolutionRiskRecord {
            risk_survey: survey,
            survey_details: None,
            risk_ai: ai,
            ai_rationale: None,
        },
    }
}

pub(super) fn assessed(tier: RiskTier) -> RiskStatus {
    RiskStatus::Assessed(tier)
}
