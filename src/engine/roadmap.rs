//! Integration planning
//!
//! Turns per-component assessments and compatible sets into recommended
//! combinations and a phased integration roadmap. Both lists are
//! rank-ordered; that order is part of the report contract.

use super::{ComprehensiveCompatibility, Priority, RoadmapPhase};
use crate::frameworks::CompatibleSet;

/// Compatible sets below this score are not worth recommending.
pub(crate) const SET_SCORE_FLOOR: f64 = 0.6;
/// Cap on recommended combinations in the report.
const MAX_COMBINATIONS: usize = 5;

/// Component-name groups worth integrating together: qualifying compatible
/// sets first, then the strong individual components as one group when
/// there are few enough to be actionable.
pub fn recommended_combinations(
    compatible_sets: &[CompatibleSet],
    results: &[ComprehensiveCompatibility],
) -> Vec<Vec<String>> {
    let mut combinations: Vec<Vec<String>> = compatible_sets
        .iter()
        .filter(|set| set.compatibility_score >= SET_SCORE_FLOOR)
        .map(|set| set.component_names.clone())
        .collect();

    let individuals: Vec<String> = results
        .iter()
        .filter(|r| {
            r.overall_score >= 0.8 && matches!(r.priority, Priority::High | Priority::Medium)
        })
        .map(|r| r.component_name.clone())
        .collect();
    if !individuals.is_empty() && individuals.len() <= MAX_COMBINATIONS {
        combinations.push(individuals);
    }

    combinations.truncate(MAX_COMBINATIONS);
    combinations
}

/// Fixed three-phase plan; empty phases are omitted, keeping their number.
pub fn build_roadmap(results: &[ComprehensiveCompatibility]) -> Vec<RoadmapPhase> {
    let mut roadmap = Vec::new();

    let quick_wins: Vec<&ComprehensiveCompatibility> = results
        .iter()
        .filter(|r| {
            r.priority == Priority::High && r.integration_complexity.setup_complexity < 0.5
        })
        .collect();
    if let Some(phase) = phase(
        1,
        "Quick Wins - High Value, Low Complexity",
        "Start with these components for immediate value",
        &quick_wins,
    ) {
        roadmap.push(phase);
    }

    let core: Vec<&ComprehensiveCompatibility> = results
        .iter()
        .filter(|r| r.priority == Priority::Medium)
        .collect();
    if let Some(phase) = phase(
        2,
        "Core Integration - Moderate Complexity",
        "Integrate these components after establishing foundation",
        &core,
    ) {
        roadmap.push(phase);
    }

    let advanced: Vec<&ComprehensiveCompatibility> = results
        .iter()
        .filter(|r| r.priority == Priority::Low && r.overall_score >= 0.5)
        .collect();
    if let Some(phase) = phase(
        3,
        "Advanced Features - High Complexity",
        "Consider these components for advanced functionality",
        &advanced,
    ) {
        roadmap.push(phase);
    }

    roadmap
}

fn phase(
    number: u8,
    title: &str,
    description: &str,
    members: &[&ComprehensiveCompatibility],
) -> Option<RoadmapPhase> {
    if members.is_empty() {
        return None;
    }
    Some(RoadmapPhase {
        phase: number,
        title: title.to_string(),
        components: members.iter().map(|r| r.component_name.clone()).collect(),
        estimated_hours: members
            .iter()
            .map(|r| r.integration_complexity.integration_effort_hours)
            .sum(),
        description: description.to_string(),
    })
}
