use crate::error::Result;
use crate::scoring::weights::{AlgorithmRegistry, RankingWeights};
use crate::types::ranking::{
    ChangeCategory, ChangeReport, FactorChange, FactorTrend, MajorMovers, RankedTool,
    RankingChange, RankingPeriod,
};
use crate::types::scoring::{round_score, Factor, Score};
use std::collections::{BTreeMap, BTreeSet};

pub const MAJOR_MOVE_POSITIONS: i64 = 5;
pub const MAJOR_MOVERS_LIMIT: usize = 5;
/// Factor movement, in points, that counts towards a trend.
pub const TREND_THRESHOLD: Score = 0.5;

/// Compares two ranking periods tool by tool.
pub fn analyze(
    previous: &RankingPeriod,
    current: &RankingPeriod,
    registry: &AlgorithmRegistry,
) -> Result<ChangeReport> {
    let weights = &registry.get(&current.algorithm_version)?.weights;

    let mut changes = current
        .rankings
        .iter()
        .map(|ranked| compare(previous.find(&ranked.score.tool_id), Some(ranked), weights))
        .collect::<Vec<_>>();

    let mut dropped = previous
        .rankings
        .iter()
        .filter(|ranked| current.find(&ranked.score.tool_id).is_none())
        .map(|ranked| compare(Some(ranked), None, weights))
        .collect::<Vec<_>>();
    dropped.sort_by_key(|change| change.previous_position);
    changes.extend(dropped);

    tracing::info!(
        previous = %previous.period,
        current = %current.period,
        changes = changes.len(),
        "analyzed ranking changes"
    );

    Ok(ChangeReport {
        previous_period: previous.period.clone(),
        current_period: current.period.clone(),
        algorithm_version: current.algorithm_version.clone(),
        major_movers: major_movers(&changes),
        factor_trends: factor_trends(&changes, weights),
        changes,
    })
}

fn compare(
    previous: Option<&RankedTool>,
    current: Option<&RankedTool>,
    weights: &RankingWeights,
) -> RankingChange {
    let either = current.or(previous);
    let tool_id = either
        .map(|ranked| ranked.score.tool_id.clone())
        .unwrap_or_default();
    let tool_name = either
        .map(|ranked| ranked.tool_name.clone())
        .unwrap_or_default();

    let previous_position = previous.map(|ranked| ranked.position);
    let current_position = current.map(|ranked| ranked.position);
    let position_change = match (previous_position, current_position) {
        (Some(before), Some(after)) => i64::from(before) - i64::from(after),
        _ => 0,
    };

    let previous_score = previous.map(|ranked| ranked.score.overall_score).unwrap_or(0.0);
    let current_score = current.map(|ranked| ranked.score.overall_score).unwrap_or(0.0);

    let category = match (previous, current) {
        (None, _) => ChangeCategory::NewEntry,
        (_, None) => ChangeCategory::Dropped,
        _ => categorize(position_change),
    };

    let factor_changes = factor_changes(previous, current, weights);
    let primary_factor = factor_changes
        .iter()
        .filter(|change| change.impact != 0.0)
        .max_by(|a, b| a.impact.abs().total_cmp(&b.impact.abs()))
        .map(|change| change.factor);

    RankingChange {
        tool_id,
        tool_name,
        previous_position,
        current_position,
        position_change,
        previous_score,
        current_score,
        score_change: round_score(current_score - previous_score),
        percent_change: percent_change(previous_score, current_score - previous_score),
        category,
        factor_changes,
        primary_factor,
    }
}

fn categorize(position_change: i64) -> ChangeCategory {
    match position_change {
        change if change >= MAJOR_MOVE_POSITIONS => ChangeCategory::MajorRise,
        change if change >= 1 => ChangeCategory::Rise,
        change if change <= -MAJOR_MOVE_POSITIONS => ChangeCategory::MajorDecline,
        change if change <= -1 => ChangeCategory::Decline,
        _ => ChangeCategory::Stable,
    }
}

/// Factors present on both sides are diffed. A tool seen in only one period
/// is diffed against zero on every factor it carries.
fn factor_changes(
    previous: Option<&RankedTool>,
    current: Option<&RankedTool>,
    weights: &RankingWeights,
) -> Vec<FactorChange> {
    let factors = match (previous, current) {
        (Some(before), Some(after)) => before
            .score
            .factor_scores
            .keys()
            .filter(|factor| after.score.factor_scores.contains_key(*factor))
            .copied()
            .collect::<BTreeSet<Factor>>(),
        _ => previous
            .into_iter()
            .chain(current)
            .flat_map(|ranked| ranked.score.factor_scores.keys().copied())
            .collect(),
    };

    factors
        .into_iter()
        .map(|factor| {
            let previous_value = previous.map(|ranked| ranked.score.factor(factor)).unwrap_or(0.0);
            let current_value = current.map(|ranked| ranked.score.factor(factor)).unwrap_or(0.0);
            let change = current_value - previous_value;
            FactorChange {
                factor,
                previous_value,
                current_value,
                change,
                percent_change: percent_change(previous_value, change),
                impact: change * weights.get(factor).unwrap_or(0.0),
            }
        })
        .collect()
}

/// Change relative to `previous`. Growth from zero counts as 100%.
fn percent_change(previous: Score, change: Score) -> Score {
    if previous > 0.0 {
        round_score(change / previous * 100.0)
    } else if change == 0.0 {
        0.0
    } else {
        100.0
    }
}

fn major_movers(changes: &[RankingChange]) -> MajorMovers {
    let mut rises = changes
        .iter()
        .filter(|change| change.category == ChangeCategory::MajorRise)
        .collect::<Vec<_>>();
    rises.sort_by(|a, b| b.position_change.cmp(&a.position_change));

    let mut declines = changes
        .iter()
        .filter(|change| change.category == ChangeCategory::MajorDecline)
        .collect::<Vec<_>>();
    declines.sort_by_key(|change| change.position_change);

    let ids = |movers: Vec<&RankingChange>| -> Vec<String> {
        movers
            .into_iter()
            .take(MAJOR_MOVERS_LIMIT)
            .map(|change| change.tool_id.clone())
            .collect()
    };
    MajorMovers {
        rise_count: rises.len(),
        decline_count: declines.len(),
        rises: ids(rises),
        declines: ids(declines),
    }
}

/// Counts tools whose factor moved beyond [`TREND_THRESHOLD`], for every
/// factor the current version scores.
fn factor_trends(
    changes: &[RankingChange],
    weights: &RankingWeights,
) -> BTreeMap<Factor, FactorTrend> {
    let mut trends = weights
        .factors()
        .into_iter()
        .map(|factor| (factor, FactorTrend::default()))
        .collect::<BTreeMap<_, _>>();

    for factor_change in changes.iter().flat_map(|change| &change.factor_changes) {
        let Some(trend) = trends.get_mut(&factor_change.factor) else {
            continue;
        };
        if factor_change.change > TREND_THRESHOLD {
            trend.improving += 1;
        } else if factor_change.change < -TREND_THRESHOLD {
            trend.declining += 1;
        }
    }
    trends
}
