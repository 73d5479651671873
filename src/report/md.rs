use crate::scoring::weights::AlgorithmVersion;
use crate::types::ranking::{ChangeReport, RankingPeriod};
use crate::types::scoring::{Factor, ToolScore};
use std::collections::BTreeSet;

pub fn scores_to_markdown(scores: &[ToolScore], version: &str) -> String {
    let mut output = String::new();
    output.push_str("# Tool Scores\n\n");
    output.push_str(&format!("Algorithm: {version}\n\n"));
    if scores.is_empty() {
        output.push_str("- none\n");
        return output;
    }

    let factors = factors_in(scores.iter());
    output.push_str(&table_header(&["Tool"], &factors));
    for score in scores {
        output.push_str(&format!("| {} | {:.3} |", score.tool_id, score.overall_score));
        for factor in &factors {
            output.push_str(&format!(" {:.1} |", score.factor(*factor)));
        }
        output.push('\n');
    }
    output
}

pub fn period_to_markdown(period: &RankingPeriod) -> String {
    let mut output = String::new();
    output.push_str(&format!("# Rankings {}\n\n", period.period));
    output.push_str(&format!(
        "Algorithm: {}\nReference date: {}\nGenerated: {}\nInput digest: {}\n\n",
        period.algorithm_version, period.reference_date, period.generated_at, period.input_digest
    ));

    output.push_str("## Rankings\n\n");
    if period.rankings.is_empty() {
        output.push_str("- none\n\n");
    } else {
        let factors = factors_in(period.rankings.iter().map(|ranked| &ranked.score));
        output.push_str(&table_header(&["#", "Tool"], &factors));
        for ranked in &period.rankings {
            output.push_str(&format!(
                "| {} | {} | {:.3} |",
                ranked.position, ranked.tool_name, ranked.score.overall_score
            ));
            for factor in &factors {
                output.push_str(&format!(" {:.1} |", ranked.score.factor(*factor)));
            }
            output.push('\n');
        }
        output.push('\n');
    }

    if !period.excluded.is_empty() {
        output.push_str("## Excluded\n\n");
        for tool_id in &period.excluded {
            output.push_str(&format!("- {tool_id}\n"));
        }
    }

    output
}

pub fn changes_to_markdown(report: &ChangeReport) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "# Ranking Changes {} -> {}\n\n",
        report.previous_period, report.current_period
    ));
    output.push_str(&format!("Algorithm: {}\n\n", report.algorithm_version));
    if report.changes.is_empty() {
        output.push_str("- none\n");
        return output;
    }

    let movers = &report.major_movers;
    output.push_str(&format!(
        "{} tools analyzed. {} major rises, {} major declines.\n\n",
        report.changes.len(),
        movers.rise_count,
        movers.decline_count
    ));

    if !movers.rises.is_empty() || !movers.declines.is_empty() {
        output.push_str("## Major Movers\n\n");
        for tool_id in movers.rises.iter().chain(&movers.declines) {
            if let Some(change) = report.changes.iter().find(|change| &change.tool_id == tool_id) {
                output.push_str(&format!(
                    "- {} {:+} positions\n",
                    change.tool_name, change.position_change
                ));
            }
        }
        output.push('\n');
    }

    if !report.factor_trends.is_empty() {
        output.push_str("## Factor Trends\n\n");
        output.push_str("| Factor | Improving | Declining |\n|---|---|---|\n");
        for (factor, trend) in &report.factor_trends {
            output.push_str(&format!(
                "| {} | {} | {} |\n",
                factor.label(),
                trend.improving,
                trend.declining
            ));
        }
        output.push('\n');
    }

    output.push_str("## Changes\n\n");
    for change in &report.changes {
        let positions = match (change.previous_position, change.current_position) {
            (Some(before), Some(after)) => format!("#{before} -> #{after}"),
            (None, Some(after)) => format!("new at #{after}"),
            (Some(before), None) => format!("was #{before}"),
            (None, None) => String::new(),
        };
        output.push_str(&format!(
            "- {} [{}] {} (score {:+.3}, {:+.1}%)",
            change.tool_name,
            change.category.as_str(),
            positions,
            change.score_change,
            change.percent_change
        ));
        if let Some(factor) = change.primary_factor {
            output.push_str(&format!(", driven by {}", factor.label()));
        }
        output.push('\n');
    }

    output
}

pub fn versions_to_markdown(versions: &[AlgorithmVersion]) -> String {
    let mut output = String::new();
    output.push_str("# Algorithm Versions\n\n");
    for version in versions {
        output.push_str(&format!(
            "## {} ({}, {})\n\n",
            version.id, version.name, version.released
        ));
        for (factor, weight) in version.weights.iter() {
            output.push_str(&format!("- {}: {:.3}\n", factor, weight));
        }
        output.push('\n');
    }
    output
}

fn factors_in<'a>(scores: impl Iterator<Item = &'a ToolScore>) -> Vec<Factor> {
    scores
        .flat_map(|score| score.factor_scores.keys().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn table_header(leading: &[&str], factors: &[Factor]) -> String {
    let mut header = String::from("|");
    let mut rule = String::from("|");
    for column in leading.iter().copied().chain(["Overall"]) {
        header.push_str(&format!(" {column} |"));
        rule.push_str("---|");
    }
    for factor in factors {
        header.push_str(&format!(" {} |", factor.label()));
        rule.push_str("---|");
    }
    format!("{header}\n{rule}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::weights::AlgorithmRegistry;
    use crate::types::ranking::{
        ChangeCategory, FactorTrend, MajorMovers, RankedTool, RankingChange,
    };
    use crate::types::scoring::FactorScores;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn score(id: &str) -> ToolScore {
        let mut factor_scores = FactorScores::new();
        factor_scores.insert(Factor::MarketTraction, 50.0);
        factor_scores.insert(Factor::Innovation, 88.0);
        ToolScore {
            tool_id: id.to_string(),
            overall_score: 61.25,
            factor_scores,
        }
    }

    #[test]
    fn scores_markdown_lists_factor_columns() {
        let rendered = scores_to_markdown(&[score("cursor")], "v7.3.1");
        assert!(rendered.contains("# Tool Scores"));
        assert!(rendered.contains("Algorithm: v7.3.1"));
        assert!(rendered.contains("| Market Traction |"));
        assert!(rendered.contains("| cursor | 61.250 | 50.0 | 88.0 |"));
    }

    #[test]
    fn period_markdown_contains_sections() {
        let period = RankingPeriod {
            period: "2025-11".to_string(),
            algorithm_version: "v7.3.1".to_string(),
            generated_at: "now".to_string(),
            reference_date: NaiveDate::from_ymd_opt(2025, 11, 1).expect("valid date"),
            input_digest: "abc".to_string(),
            rankings: vec![RankedTool {
                position: 1,
                tool_name: "Cursor".to_string(),
                completeness: 1.0,
                score: score("cursor"),
            }],
            excluded: vec!["sparse".to_string()],
        };

        let rendered = period_to_markdown(&period);
        assert!(rendered.contains("# Rankings 2025-11"));
        assert!(rendered.contains("| 1 | Cursor | 61.250 |"));
        assert!(rendered.contains("## Excluded"));
        assert!(rendered.contains("- sparse"));
    }

    #[test]
    fn changes_markdown_names_category_and_driver() {
        let mut factor_trends = BTreeMap::new();
        factor_trends.insert(
            Factor::DeveloperAdoption,
            FactorTrend {
                improving: 1,
                declining: 0,
            },
        );
        let report = ChangeReport {
            previous_period: "2025-10".to_string(),
            current_period: "2025-11".to_string(),
            algorithm_version: "v6".to_string(),
            major_movers: MajorMovers {
                rise_count: 1,
                decline_count: 0,
                rises: vec!["b".to_string()],
                declines: Vec::new(),
            },
            factor_trends,
            changes: vec![RankingChange {
                tool_id: "b".to_string(),
                tool_name: "B".to_string(),
                previous_position: Some(8),
                current_position: Some(1),
                position_change: 7,
                previous_score: 50.0,
                current_score: 60.0,
                score_change: 10.0,
                percent_change: 20.0,
                category: ChangeCategory::MajorRise,
                factor_changes: Vec::new(),
                primary_factor: Some(Factor::DeveloperAdoption),
            }],
        };

        let rendered = changes_to_markdown(&report);
        assert!(rendered.contains("# Ranking Changes 2025-10 -> 2025-11"));
        assert!(rendered.contains("1 tools analyzed. 1 major rises, 0 major declines."));
        assert!(rendered.contains("## Major Movers\n\n- B +7 positions\n"));
        assert!(rendered.contains("| Developer Adoption | 1 | 0 |"));
        assert!(rendered.contains(
            "- B [major_rise] #8 -> #1 (score +10.000, +20.0%), driven by Developer Adoption"
        ));
    }

    #[test]
    fn versions_markdown_lists_every_version() {
        let registry = AlgorithmRegistry::builtin();
        let rendered = versions_to_markdown(registry.versions());
        for id in ["v6", "v7", "v7.3", "v7.3.1"] {
            assert!(rendered.contains(&format!("## {id} (")));
        }
        assert!(rendered.contains("- market_traction: 0.250"));
    }
}
