use super::tier::RiskTier;
use crate::workflows::registry::domain::{Board, BoardId, RiskStatus, Solution, SolutionId};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Fixed-shape tier counts, one field per tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub high: usize,
    pub unacceptable: usize,
    pub limited: usize,
    pub minimal: usize,
}

impl TierCounts {
    pub fn record(&mut self, tier: RiskTier) {
        match tier {
            RiskTier::Unacceptable => self.unacceptable += 1,
            RiskTier::High => self.high += 1,
            RiskTier::Limited => self.limited += 1,
            RiskTier::Minimal => self.minimal += 1,
        }
    }

    pub fn count(&self, tier: RiskTier) -> usize {
        match tier {
            RiskTier::Unacceptable => self.unacceptable,
            RiskTier::High => self.high,
            RiskTier::Limited => self.limited,
            RiskTier::Minimal => self.minimal,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.unacceptable + self.limited + self.minimal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskPath {
    AiAnalysis,
    Survey,
}

/// A stored tier value that is none of the canonical literals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierAnomaly {
    pub solution_id: SolutionId,
    pub path: RiskPath,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RiskAggregate {
    pub total_solutions: usize,
    pub ai_analysis: TierCounts,
    pub survey: TierCounts,
    pub anomalies: Vec<TierAnomaly>,
}

/// Counts both classification paths independently over a snapshot of solutions.
///
/// Pending or failed paths are not counted. Unrecognized stored values are
/// reported as anomalies instead of being bucketed.
pub fn aggregate<'a, I>(solutions: I) -> RiskAggregate
where
    I: IntoIterator<Item = &'a Solution>,
{
    let mut aggregate = RiskAggregate::default();

    for solution in solutions {
        aggregate.total_solutions += 1;
        tally(
            &mut aggregate,
            solution.id,
            RiskPath::AiAnalysis,
            &solution.risk.risk_ai,
        );
        tally(
            &mut aggregate,
            solution.id,
            RiskPath::Survey,
            &solution.risk.risk_survey,
        );
    }

    aggregate
}

fn tally(aggregate: &mut RiskAggregate, solution_id: SolutionId, path: RiskPath, status: &RiskStatus) {
    let counts = match path {
        RiskPath::AiAnalysis => &mut aggregate.ai_analysis,
        RiskPath::Survey => &mut aggregate.survey,
    };

    match status {
        RiskStatus::Assessed(tier) => counts.record(*tier),
        RiskStatus::Pending | RiskStatus::Error => {}
        RiskStatus::Unrecognized(value) => {
            warn!(%solution_id, ?path, value = %value, "unrecognized risk tier in solution record");
            aggregate.anomalies.push(TierAnomaly {
                solution_id,
                path,
                value: value.clone(),
            });
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardKpi {
    pub board_id: BoardId,
    pub board_name: String,
    pub total_solutions: usize,
    pub ai_analysis: TierCounts,
    pub survey: TierCounts,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anomalies: Vec<TierAnomaly>,
}

impl BoardKpi {
    pub fn from_solutions(board: &Board, solutions: &[Solution]) -> Self {
        let RiskAggregate {
            total_solutions,
            ai_analysis,
            survey,
            anomalies,
        } = aggregate(solutions.iter().filter(|solution| solution.board_id == board.id));

        Self {
            board_id: board.id,
            board_name: board.name.clone(),
            total_solutions,
            ai_analysis,
            survey,
            anomalies,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalKpi {
    pub total_boards: usize,
    pub total_solutions: usize,
    pub ai_analysis: TierCounts,
    pub survey: TierCounts,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anomalies: Vec<TierAnomaly>,
}

impl GlobalKpi {
    pub fn from_solutions(total_boards: usize, solutions: &[Solution]) -> Self {
        let RiskAggregate {
            total_solutions,
            ai_analysis,
            survey,
            anomalies,
        } = aggregate(solutions);

        Self {
            total_boards,
            total_solutions,
            ai_analysis,
            survey,
            anomalies,
        }
    }
}
