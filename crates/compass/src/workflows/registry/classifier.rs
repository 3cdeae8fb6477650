//! Contract and adapters for the external AI risk classifier.
//!
//! The registry only depends on [`RiskClassifier`]. [`LlmRiskClassifier`] talks to an
//! Anthropic-style messages endpoint; [`UnconfiguredClassifier`] stands in when no API
//! key is available so batch analysis still reports a per-solution failure.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{Solution, UserRole};
use crate::config::ClassifierConfig;
use crate::workflows::assessment::{RiskTier, TierParseError};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MISSING_RATIONALE: &str = "No rationale provided";

const EU_AI_ACT_CONTEXT: &str = "\
THE EU AI ACT CLASSIFICATION RULES (Regulation EU 2024/1689):

1. PROHIBITED AI SYSTEMS (Article 5 - Unacceptable Risk):
   - Subliminal techniques that materially distort behavior causing harm
   - Exploiting vulnerabilities of specific groups (age, disability) causing harm
   - Social scoring by public authorities leading to detrimental treatment
   - Real-time remote biometric identification in publicly accessible spaces for law enforcement (with exceptions)
   - Biometric categorization to infer sensitive attributes (race, political opinions, religion, etc.)
   - Emotion recognition in workplace and educational institutions (with exceptions for medical/safety)
   - Scraping facial images from internet/CCTV to build facial recognition databases

2. HIGH-RISK AI SYSTEMS (Annex III):
   a) Biometrics: remote biometric identification, biometric categorization, emotion recognition
   b) Critical infrastructure: road traffic, water, gas, electricity, heating
   c) Education/vocational training: assessment, evaluation, monitoring, plagiarism detection
   d) Employment: recruitment, screening, evaluation, promotion, monitoring, termination
   e) Essential services: creditworthiness, insurance risk assessment, emergency dispatch
   f) Law enforcement: individual risk assessment, polygraphs, evidence reliability, migration/asylum/border control
   g) Justice and democracy: assisting judicial research, influencing elections or voting behavior

3. LIMITED RISK AI SYSTEMS (Article 50 - Transparency Obligations):
   - Systems interacting directly with natural persons (chatbots, virtual assistants)
   - Emotion recognition and biometric categorization systems (users must be informed)
   - AI-generated or manipulated content (deep fakes, synthetic media) must be labeled

4. MINIMAL RISK AI SYSTEMS:
   - Spam filters, AI-enabled video games, inventory management, recommendation systems,
     translation tools and most other applications not covered above

KEY DEFINITIONS:
- Provider: develops an AI system or has it developed and places it on the market under its own name
- Deployer: uses an AI system under its authority
- Distributor: makes an AI system available in the supply chain (other than provider or importer)
- User: any natural or legal person using an AI system
";

/// Free-text facts about a solution handed to the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRequest {
    pub name: String,
    pub description: String,
    pub user_role: UserRole,
}

impl From<&Solution> for ClassificationRequest {
    fn from(solution: &Solution) -> Self {
        Self {
            name: solution.name.clone(),
            description: solution.description.clone(),
            user_role: solution.user_role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub risk_level: RiskTier,
    pub rationale: String,
}

/// Capability interface for AI risk analysis of a single solution.
#[async_trait]
pub trait RiskClassifier: Send + Sync {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<Classification, ClassifierError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("classifier unavailable: {0}")]
    Unavailable(String),
    #[error("classifier request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("classifier API error: status {0}")]
    Status(u16),
    #[error("classifier reply is not valid JSON: {0}")]
    MalformedReply(#[from] serde_json::Error),
    #[error(transparent)]
    UnknownTier(#[from] TierParseError),
}

/// Builds the analysis prompt for a solution.
pub fn classification_prompt(request: &ClassificationRequest) -> String {
    format!(
        "You are an expert EU AI Act Compliance Officer with deep knowledge of Regulation (EU) 2024/1689.

CONTEXT - EU AI ACT CLASSIFICATION RULES:
{context}
ANALYZE THIS AI SYSTEM:
Name: {name}
Description: {description}
User Role: {role}

TASK:
1. Determine the Risk Level based STRICTLY on the EU AI Act categories above
2. Provide a clear, professional rationale citing specific articles/categories
3. Consider the user's role (Provider, Deployer, User, Distributor) in your assessment

IMPORTANT:
- If the system could fall into multiple categories, choose the HIGHEST risk level
- Consider both the technology AND its application/purpose
- Chatbots are Limited risk, but chatbots used for recruitment are High risk

OUTPUT FORMAT (JSON only, no markdown):
{{
  \"risk_level\": \"Unacceptable|High|Limited|Minimal\",
  \"rationale\": \"Explanation citing the EU AI Act articles/annexes that apply\"
}}",
        context = EU_AI_ACT_CONTEXT,
        name = request.name,
        description = request.description,
        role = request.user_role.label(),
    )
}

#[derive(Debug, Deserialize)]
struct ClassifierReply {
    risk_level: String,
    #[serde(default)]
    rationale: Option<String>,
}

/// Parses the model's JSON verdict, tolerating a surrounding markdown code fence.
pub fn parse_classification_reply(text: &str) -> Result<Classification, ClassifierError> {
    let reply: ClassifierReply = serde_json::from_str(strip_code_fence(text))?;
    let risk_level = reply.risk_level.trim().parse::<RiskTier>()?;
    let rationale = reply
        .rationale
        .filter(|rationale| !rationale.trim().is_empty())
        .unwrap_or_else(|| MISSING_RATIONALE.to_string());

    Ok(Classification {
        risk_level,
        rationale,
    })
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    let body = trimmed
        .split_once('\n')
        .map(|(_, rest)| rest)
        .unwrap_or_default();
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Classifier backed by a hosted large language model.
#[derive(Clone)]
pub struct LlmRiskClassifier {
    client: Client,
    config: ClassifierConfig,
    api_key: String,
}

impl LlmRiskClassifier {
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| ClassifierError::Unavailable("APP_CLASSIFIER_API_KEY is not set".to_string()))?;
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }
}

#[async_trait]
impl RiskClassifier for LlmRiskClassifier {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<Classification, ClassifierError> {
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: vec![ChatMessage {
                role: "user",
                content: classification_prompt(request),
            }],
        };

        debug!(solution = %request.name, model = %self.config.model, "requesting AI risk classification");
        let response = self
            .client
            .post(&self.config.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifierError::Status(status.as_u16()));
        }

        let payload: MessagesResponse = response.json().await?;
        let text: String = payload
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();

        parse_classification_reply(&text)
    }
}

/// Stand-in used when no classifier credentials are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredClassifier;

#[async_trait]
impl RiskClassifier for UnconfiguredClassifier {
    async fn classify(
        &self,
        _request: &ClassificationRequest,
    ) -> Result<Classification, ClassifierError> {
        Err(ClassifierError::Unavailable(
            "no AI classifier is configured (set APP_CLASSIFIER_API_KEY)".to_string(),
        ))
    }
}
