//! Risk rollups and the report summary

use super::{
    ComprehensiveCompatibility, ConflictRisk, HighRiskComponent, Priority, PriorityDistribution,
    ReportSummary, RiskAssessment, ScoreDistribution, SummaryStats,
};
use crate::frameworks::{ConflictSeverity, FrameworkAnalysis};
use crate::license::LicenseAnalysis;

/// Batch risk assessment. Every list is present only when its trigger
/// holds, so an all-clear batch produces an empty assessment.
pub fn assess_risks(
    results: &[ComprehensiveCompatibility],
    framework_analysis: &FrameworkAnalysis,
    license_analysis: &LicenseAnalysis,
) -> RiskAssessment {
    let high_risk_components: Vec<HighRiskComponent> = results
        .iter()
        .filter(|r| r.overall_score < 0.4)
        .map(|r| HighRiskComponent {
            name: r.component_name.clone(),
            score: r.overall_score,
            issues: r.integration_complexity.risk_factors.clone(),
        })
        .collect();

    let mut license_risks = Vec::new();
    if license_analysis
        .overall_compliance_status
        .starts_with("Non-compliant")
    {
        license_risks.push("Incompatible licenses detected".to_string());
    }
    if license_analysis.source_disclosure_required {
        license_risks.push("Source code disclosure required".to_string());
    }

    let framework_conflicts: Vec<ConflictRisk> = framework_analysis
        .conflicts
        .iter()
        .filter(|c| c.severity == ConflictSeverity::Critical)
        .map(|c| ConflictRisk {
            frameworks: [c.framework_a.clone(), c.framework_b.clone()],
            reason: c.reason.clone(),
        })
        .collect();

    let mut technical_risks = Vec::new();
    let complex_count = results
        .iter()
        .filter(|r| r.integration_complexity.setup_complexity > 0.7)
        .count();
    if complex_count > 0 {
        technical_risks.push(format!(
            "{} components have high integration complexity",
            complex_count
        ));
    }

    let mut mitigation_strategies = Vec::new();
    if !high_risk_components.is_empty() {
        mitigation_strategies.push("Remove or replace high-risk components".to_string());
    }
    if !framework_conflicts.is_empty() {
        mitigation_strategies
            .push("Use microservices architecture to isolate conflicting frameworks".to_string());
    }
    if license_analysis.source_disclosure_required {
        mitigation_strategies.push("Prepare for open source compliance requirements".to_string());
    }

    RiskAssessment {
        high_risk_components,
        license_risks,
        framework_conflicts,
        technical_risks,
        mitigation_strategies,
    }
}

/// Summary block for the report; a neutral status object for empty input.
pub fn summarize(
    results: &[ComprehensiveCompatibility],
    framework_analysis: &FrameworkAnalysis,
    license_analysis: &LicenseAnalysis,
) -> ReportSummary {
    if results.is_empty() {
        return ReportSummary::no_components();
    }

    let total_components = results.len();
    let average_score =
        results.iter().map(|r| r.overall_score).sum::<f64>() / total_components as f64;

    let mut score_distribution = ScoreDistribution::default();
    for r in results {
        if r.overall_score >= 0.8 {
            score_distribution.high += 1;
        } else if r.overall_score >= 0.6 {
            score_distribution.medium += 1;
        } else {
            score_distribution.low += 1;
        }
    }

    let mut priority_distribution = PriorityDistribution::default();
    for r in results {
        match r.priority {
            Priority::High => priority_distribution.high += 1,
            Priority::Medium => priority_distribution.medium += 1,
            Priority::Low => priority_distribution.low += 1,
            Priority::Skip => priority_distribution.skip += 1,
        }
    }

    let recommended_combinations = framework_analysis
        .compatible_sets
        .iter()
        .filter(|set| set.compatibility_score >= super::roadmap::SET_SCORE_FLOOR)
        .count();

    let assessment = if average_score >= 0.8 {
        "Excellent compatibility - Low integration risk"
    } else if average_score >= 0.6 {
        "Good compatibility - Moderate integration effort"
    } else if average_score >= 0.4 {
        "Fair compatibility - Significant planning required"
    } else {
        "Poor compatibility - High risk integration"
    };

    let total_estimated_hours = results
        .iter()
        .map(|r| r.integration_complexity.integration_effort_hours)
        .sum();

    ReportSummary::Stats(SummaryStats {
        total_components,
        average_score,
        score_distribution,
        priority_distribution,
        framework_compatibility: framework_analysis.overall_compatibility,
        license_status: license_analysis.overall_compliance_status.clone(),
        recommended_combinations,
        total_estimated_hours,
        assessment: assessment.to_string(),
    })
}
