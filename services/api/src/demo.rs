use crate::infra::InMemoryRegistryRepository;
use ai_act_compass::error::AppError;
use ai_act_compass::workflows::assessment::{
    RiskTier, SurveyChoice, TierCounts,
};
use ai_act_compass::workflows::registry::{
    BoardDraft, Classification, ClassificationRequest, ClassifierError,
    ComplianceRegistryService, RiskClassifier, SolutionDraft, SurveyResponse, UserRole,
};
use async_trait::async_trait;
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the stored per-solution verdicts after the KPI summary
    #[arg(long)]
    pub(crate) list_solutions: bool,
}

/// Offline stand-in for the hosted model: matches description keywords to tiers.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct KeywordClassifier;

const KEYWORD_TIERS: &[(&str, RiskTier, &str)] = &[
    (
        "social scoring",
        RiskTier::Unacceptable,
        "Article 5: social scoring by public authorities is prohibited",
    ),
    (
        "recruit",
        RiskTier::High,
        "Annex III point 4: employment and worker management",
    ),
    (
        "credit",
        RiskTier::High,
        "Annex III point 5: access to essential private services",
    ),
    (
        "chatbot",
        RiskTier::Limited,
        "Article 50: users must be told they are interacting with AI",
    ),
    (
        "forecast",
        RiskTier::Minimal,
        "No Article 5, Annex III, or Article 50 use identified",
    ),
];

#[async_trait]
impl RiskClassifier for KeywordClassifier {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<Classification, ClassifierError> {
        let description = request.description.to_ascii_lowercase();
        KEYWORD_TIERS
            .iter()
            .find(|(keyword, _, _)| description.contains(keyword))
            .map(|(_, tier, rationale)| Classification {
                risk_level: *tier,
                rationale: (*rationale).to_string(),
            })
            .ok_or_else(|| {
                ClassifierError::Unavailable(format!(
                    "no offline rule matches '{}'",
                    request.name
                ))
            })
    }
}

struct DemoSolution {
    name: &'static str,
    description: &'static str,
    user_role: UserRole,
    yes_to: &'static [&'static str],
}

const DEMO_BOARDS: &[(&str, &[DemoSolution])] = &[
    (
        "Human Resources",
        &[
            DemoSolution {
                name: "Talent Screener",
                description: "Ranks candidates during recruitment using CV parsing",
                user_role: UserRole::Deployer,
                yes_to: &["high_risk_3"],
            },
            DemoSolution {
                name: "Benefits Assistant",
                description: "Chatbot answering employee benefits questions",
                user_role: UserRole::Deployer,
                yes_to: &["limited_1"],
            },
        ],
    ),
    (
        "Finance",
        &[
            DemoSolution {
                name: "Loan Scorer",
                description: "Estimates credit worthiness of retail applicants",
                user_role: UserRole::Provider,
                yes_to: &["high_risk_4", "limited_1"],
            },
            DemoSolution {
                name: "Cash Forecaster",
                description: "Forecasts treasury positions from ledger history",
                user_role: UserRole::Provider,
                yes_to: &[],
            },
            DemoSolution {
                name: "Vendor Black Box",
                description: "Undocumented third-party model",
                user_role: UserRole::NotSpecified,
                yes_to: &[],
            },
        ],
    ),
];

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let repository = Arc::new(InMemoryRegistryRepository::default());
    let service = ComplianceRegistryService::new(repository, Arc::new(KeywordClassifier));

    println!("AI Act Compass demo");
    for (board_name, solutions) in DEMO_BOARDS {
        let board = service.create_board(BoardDraft {
            name: (*board_name).to_string(),
        })?;

        for demo in solutions.iter() {
            let solution = service.add_solution(
                board.id,
                SolutionDraft {
                    name: demo.name.to_string(),
                    description: demo.description.to_string(),
                    user_role: demo.user_role,
                },
            )?;

            let responses: Vec<SurveyResponse> = service
                .catalog()
                .list()
                .iter()
                .map(|question| SurveyResponse {
                    question_id: question.id.to_string(),
                    choice: if demo.yes_to.contains(&question.id) {
                        SurveyChoice::Yes
                    } else {
                        SurveyChoice::No
                    },
                })
                .collect();
            service.complete_survey(solution.id, &responses)?;
        }

        let report = service.run_ai_analysis(board.id).await?;
        println!("\nBoard: {} ({} solutions)", board.name, report.total);
        println!("- {}", report.message);
        for error in &report.errors {
            println!("- AI analysis failed for {error}");
        }

        let kpi = service.board_kpi(board.id)?;
        print_counts("AI analysis", &kpi.ai_analysis);
        print_counts("Survey", &kpi.survey);

        if args.list_solutions {
            for solution in service.solutions(board.id)? {
                println!(
                    "  * {} [{}] survey={} ai={}",
                    solution.name,
                    solution.user_role.label(),
                    solution.risk.risk_survey,
                    solution.risk.risk_ai
                );
            }
        }
    }

    let global = service.global_kpi()?;
    println!(
        "\nPortfolio: {} boards | {} solutions",
        global.total_boards, global.total_solutions
    );
    print_counts("AI analysis", &global.ai_analysis);
    print_counts("Survey", &global.survey);

    Ok(())
}

fn print_counts(path: &str, counts: &TierCounts) {
    let buckets: Vec<String> = RiskTier::ordered()
        .iter()
        .map(|tier| format!("{} {}", counts.count(*tier), tier.label()))
        .collect();
    println!("  {path}: {}", buckets.join(" | "));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(description: &str) -> ClassificationRequest {
        ClassificationRequest {
            name: "demo".to_string(),
            description: description.to_string(),
            user_role: UserRole::User,
        }
    }

    #[tokio::test]
    async fn keyword_classifier_matches_descriptions() {
        let classification = KeywordClassifier
            .classify(&request("Chatbot for the help desk"))
            .await
            .expect("matched");
        assert_eq!(classification.risk_level, RiskTier::Limited);

        assert!(KeywordClassifier
            .classify(&request("Undocumented model"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn demo_runs_end_to_end() {
        run_demo(DemoArgs {
            list_solutions: true,
        })
        .await
        .expect("demo completes");
    }
}
