use super::tier::RiskTier;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum QuestionCategory {
    #[serde(rename = "Prohibited")]
    Prohibited,
    #[serde(rename = "High Risk")]
    HighRisk,
    #[serde(rename = "Limited Risk")]
    LimitedRisk,
}

impl QuestionCategory {
    pub const fn ordered() -> [Self; 3] {
        [Self::Prohibited, Self::HighRisk, Self::LimitedRisk]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Prohibited => "Prohibited",
            Self::HighRisk => "High Risk",
            Self::LimitedRisk => "Limited Risk",
        }
    }
}

/// Static survey entry. A "yes" answer asserts `risk_if_yes` when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: &'static str,
    pub text: &'static str,
    pub category: QuestionCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_if_yes: Option<RiskTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

/// Ordered, read-only question set. Order is traversal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    pub fn new(questions: Vec<Question>) -> Result<Self, CatalogError> {
        if questions.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for question in &questions {
            if !seen.insert(question.id) {
                return Err(CatalogError::DuplicateId(question.id));
            }
        }

        Ok(Self { questions })
    }

    /// The EU AI Act screening questionnaire (Article 5, Annex III, Article 50).
    pub fn eu_ai_act() -> Self {
        Self {
            questions: eu_ai_act_questions(),
        }
    }

    pub fn list(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.questions.iter().position(|question| question.id == id)
    }

    pub fn in_category(&self, category: QuestionCategory) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|question| question.category == category)
            .collect()
    }
}

impl Default for QuestionCatalog {
    fn default() -> Self {
        Self::eu_ai_act()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("question catalog must contain at least one question")]
    Empty,
    #[error("question id '{0}' appears more than once")]
    DuplicateId(&'static str),
}

fn eu_ai_act_questions() -> Vec<Question> {
    vec![
        Question {
            id: "prohibited_1",
            text: "Does this AI system deploy subliminal techniques to materially distort behavior in a manner that causes or is likely to cause physical or psychological harm?",
            category: QuestionCategory::Prohibited,
            risk_if_yes: Some(RiskTier::Unacceptable),
            note: None,
        },
        Question {
            id: "prohibited_2",
            text: "Does this AI system exploit vulnerabilities of specific groups (children, elderly, persons with disabilities) in a manner that causes or is likely to cause physical or psychological harm?",
            category: QuestionCategory::Prohibited,
            risk_if_yes: Some(RiskTier::Unacceptable),
            note: None,
        },
        Question {
            id: "prohibited_3",
            text: "Is this AI system used for social scoring by public authorities that leads to detrimental or unfavorable treatment?",
            category: QuestionCategory::Prohibited,
            risk_if_yes: Some(RiskTier::Unacceptable),
            note: None,
        },
        Question {
            id: "prohibited_4",
            text: "Does this AI system use real-time remote biometric identification in publicly accessible spaces for law enforcement purposes?",
            category: QuestionCategory::Prohibited,
            risk_if_yes: Some(RiskTier::Unacceptable),
            note: Some("Exceptions exist for specific law enforcement purposes"),
        },
        Question {
            id: "prohibited_5",
            text: "Does this AI system categorize individuals based on biometric data to infer sensitive attributes (race, political opinions, trade union membership, religious beliefs, sex life, or sexual orientation)?",
            category: QuestionCategory::Prohibited,
            risk_if_yes: Some(RiskTier::Unacceptable),
            note: None,
        },
        Question {
            id: "prohibited_6",
            text: "Is this AI system used for emotion recognition in the workplace or educational institutions?",
            category: QuestionCategory::Prohibited,
            risk_if_yes: Some(RiskTier::Unacceptable),
            note: Some("Exceptions for medical or safety reasons"),
        },
        Question {
            id: "high_risk_1",
            text: "Is this AI system used in critical infrastructure management (e.g., road traffic, water, gas, electricity supply)?",
            category: QuestionCategory::HighRisk,
            risk_if_yes: Some(RiskTier::High),
            note: None,
        },
        Question {
            id: "high_risk_2",
            text: "Is this AI system used in education or vocational training for assessment, evaluation, monitoring students, or detecting plagiarism?",
            category: QuestionCategory::HighRisk,
            risk_if_yes: Some(RiskTier::High),
            note: None,
        },
        Question {
            id: "high_risk_3",
            text: "Is this AI system used in employment decisions (recruitment, screening, evaluation, promotion, monitoring, or termination)?",
            category: QuestionCategory::HighRisk,
            risk_if_yes: Some(RiskTier::High),
            note: None,
        },
        Question {
            id: "high_risk_4",
            text: "Is this AI system used for essential services like creditworthiness assessment, insurance risk assessment, or emergency response dispatch?",
            category: QuestionCategory::HighRisk,
            risk_if_yes: Some(RiskTier::High),
            note: None,
        },
        Question {
            id: "high_risk_5",
            text: "Is this AI system used for law enforcement purposes (individual risk assessment, polygraphs, evidence evaluation, migration/asylum/border control)?",
            category: QuestionCategory::HighRisk,
            risk_if_yes: Some(RiskTier::High),
            note: None,
        },
        Question {
            id: "high_risk_6",
            text: "Is this AI system used to assist judicial research or influence election/voting behavior?",
            category: QuestionCategory::HighRisk,
            risk_if_yes: Some(RiskTier::High),
            note: None,
        },
        Question {
            id: "limited_1",
            text: "Does this AI system interact directly with people (chatbot, virtual assistant)?",
            category: QuestionCategory::LimitedRisk,
            risk_if_yes: Some(RiskTier::Limited),
            note: None,
        },
        Question {
            id: "limited_2",
            text: "Does this AI system perform emotion recognition or biometric categorization (outside prohibited uses)?",
            category: QuestionCategory::LimitedRisk,
            risk_if_yes: Some(RiskTier::Limited),
            note: None,
        },
        Question {
            id: "limited_3",
            text: "Does this AI system generate or manipulate content (deep fakes, synthetic media)?",
            category: QuestionCategory::LimitedRisk,
            risk_if_yes: Some(RiskTier::Limited),
            note: None,
        },
    ]
}
