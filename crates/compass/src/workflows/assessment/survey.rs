use super::catalog::{Question, QuestionCatalog};
use super::tier::RiskTier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const MINIMAL_RISK_DETAILS: &str =
    "No high-risk characteristics identified based on survey responses";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyChoice {
    Yes,
    No,
    Unsure,
}

impl SurveyChoice {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Unsure => "unsure",
        }
    }
}

impl fmt::Display for SurveyChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SurveyChoice {
    type Err = SurveyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => Ok(Self::Yes),
            "no" | "n" => Ok(Self::No),
            "unsure" | "u" => Ok(Self::Unsure),
            other => Err(SurveyError::InvalidChoice(other.to_string())),
        }
    }
}

/// Current best-known explanation for a solution's risk. Replaced, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_level: RiskTier,
    pub details: String,
}

impl RiskAssessment {
    pub fn minimal() -> Self {
        Self {
            risk_level: RiskTier::Minimal,
            details: MINIMAL_RISK_DETAILS.to_string(),
        }
    }
}

/// Applies the escalation policy for a "yes" on `question`.
///
/// Returns the replacement assessment, or `None` when the running one stands:
/// Unacceptable always replaces (last match wins), High replaces anything but
/// Unacceptable (last match wins), Limited only fills an empty slot (first match wins).
pub fn escalate(current: Option<&RiskAssessment>, question: &Question) -> Option<RiskAssessment> {
    let tier = question.risk_if_yes?;
    let prefix = match tier {
        RiskTier::Unacceptable => "Prohibited",
        RiskTier::High
            if current.map_or(true, |held| held.risk_level != RiskTier::Unacceptable) =>
        {
            "High Risk"
        }
        RiskTier::Limited if current.is_none() => "Limited Risk",
        _ => return None,
    };

    Some(RiskAssessment {
        risk_level: tier,
        details: format!("{prefix}: {}", question.text),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyState {
    AtQuestion(usize),
    Completed,
}

/// One walk through a question catalog for a single solution.
///
/// Answers are accepted only for the question currently displayed. Navigating back
/// keeps both the recorded answers and the running assessment.
#[derive(Debug, Clone)]
pub struct SurveySession<'c> {
    catalog: &'c QuestionCatalog,
    state: SurveyState,
    answers: BTreeMap<&'static str, SurveyChoice>,
    assessment: Option<RiskAssessment>,
    advance_pending: bool,
}

impl<'c> SurveySession<'c> {
    pub fn new(catalog: &'c QuestionCatalog) -> Self {
        Self {
            catalog,
            state: SurveyState::AtQuestion(0),
            answers: BTreeMap::new(),
            assessment: None,
            advance_pending: false,
        }
    }

    /// Runs ordered responses through a fresh session and finalizes it.
    pub fn replay<'r, I>(catalog: &'c QuestionCatalog, responses: I) -> Result<RiskAssessment, SurveyError>
    where
        I: IntoIterator<Item = (&'r str, SurveyChoice)>,
    {
        let mut session = Self::new(catalog);
        for (question_id, choice) in responses {
            session.answer(question_id, choice)?;
        }
        session.finalize()
    }

    pub fn state(&self) -> SurveyState {
        self.state
    }

    pub fn catalog(&self) -> &'c QuestionCatalog {
        self.catalog
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            SurveyState::AtQuestion(index) => Some(index),
            SurveyState::Completed => None,
        }
    }

    pub fn current_question(&self) -> Option<&'c Question> {
        self.current_index()
            .and_then(|index| self.catalog.get(index))
    }

    pub fn assessment(&self) -> Option<&RiskAssessment> {
        self.assessment.as_ref()
    }

    pub fn answers(&self) -> &BTreeMap<&'static str, SurveyChoice> {
        &self.answers
    }

    pub fn answer_for(&self, question_id: &str) -> Option<SurveyChoice> {
        self.answers.get(question_id).copied()
    }

    pub fn is_advance_pending(&self) -> bool {
        self.advance_pending
    }

    /// Position through the catalog as a percentage, counting the current question.
    pub fn progress_pct(&self) -> f32 {
        match self.state {
            SurveyState::AtQuestion(index) => {
                (index + 1) as f32 / self.catalog.len() as f32 * 100.0
            }
            SurveyState::Completed => 100.0,
        }
    }

    /// Records an answer for the current question and advances immediately.
    pub fn answer(
        &mut self,
        question_id: &str,
        choice: SurveyChoice,
    ) -> Result<Option<&RiskAssessment>, SurveyError> {
        let index = self.record(question_id, choice)?;
        if index + 1 < self.catalog.len() {
            self.state = SurveyState::AtQuestion(index + 1);
        }
        Ok(self.assessment.as_ref())
    }

    /// Records an answer but holds the advance until [`Self::complete_advance`].
    ///
    /// No other input is accepted while the advance is pending.
    pub fn answer_deferred(
        &mut self,
        question_id: &str,
        choice: SurveyChoice,
    ) -> Result<Option<&RiskAssessment>, SurveyError> {
        let index = self.record(question_id, choice)?;
        self.advance_pending = index + 1 < self.catalog.len();
        Ok(self.assessment.as_ref())
    }

    pub fn complete_advance(&mut self) -> Result<(), SurveyError> {
        if !self.advance_pending {
            return Err(SurveyError::NoAdvancePending);
        }
        let index = self.open_index()?;
        self.advance_pending = false;
        self.state = SurveyState::AtQuestion(index + 1);
        Ok(())
    }

    pub fn previous(&mut self) -> Result<(), SurveyError> {
        let index = self.accepting_index()?;
        if index == 0 {
            return Err(SurveyError::AtFirstQuestion);
        }
        self.state = SurveyState::AtQuestion(index - 1);
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        match self.state {
            SurveyState::AtQuestion(index) => {
                index + 1 == self.catalog.len()
                    && self
                        .catalog
                        .get(index)
                        .is_some_and(|question| self.answers.contains_key(question.id))
            }
            SurveyState::Completed => false,
        }
    }

    /// Closes the session and returns the verdict.
    pub fn finalize(&mut self) -> Result<RiskAssessment, SurveyError> {
        let index = self.accepting_index()?;
        if !self.is_complete() {
            return Err(SurveyError::Incomplete {
                index,
                total: self.catalog.len(),
            });
        }

        self.state = SurveyState::Completed;
        Ok(self
            .assessment
            .clone()
            .unwrap_or_else(RiskAssessment::minimal))
    }

    fn record(&mut self, question_id: &str, choice: SurveyChoice) -> Result<usize, SurveyError> {
        let index = self.accepting_index()?;
        let question = self
            .catalog
            .get(index)
            .ok_or(SurveyError::Closed)?;
        if question.id != question_id {
            return Err(SurveyError::OutOfTurn {
                expected: question.id,
                received: question_id.to_string(),
            });
        }

        self.answers.insert(question.id, choice);
        if choice == SurveyChoice::Yes {
            if let Some(next) = escalate(self.assessment.as_ref(), question) {
                self.assessment = Some(next);
            }
        }
        Ok(index)
    }

    fn open_index(&self) -> Result<usize, SurveyError> {
        self.current_index().ok_or(SurveyError::Closed)
    }

    fn accepting_index(&self) -> Result<usize, SurveyError> {
        let index = self.open_index()?;
        if self.advance_pending {
            return Err(SurveyError::AdvancePending);
        }
        Ok(index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurveyError {
    #[error("answer for '{received}' is out of turn; current question is '{expected}'")]
    OutOfTurn {
        expected: &'static str,
        received: String,
    },
    #[error("already at the first question")]
    AtFirstQuestion,
    #[error("survey is incomplete: at question {} of {total} and the final question is unanswered", .index + 1)]
    Incomplete { index: usize, total: usize },
    #[error("previous answer is still advancing to the next question")]
    AdvancePending,
    #[error("no question advance is pending")]
    NoAdvancePending,
    #[error("survey session is already finalized")]
    Closed,
    #[error("'{0}' is not a survey answer (expected yes, no or unsure)")]
    InvalidChoice(String),
}
