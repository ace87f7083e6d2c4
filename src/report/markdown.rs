//! Markdown report renderer
//!
//! Produces a review-ready Markdown document with summary tables, conflict
//! details, license compliance findings, and the integration roadmap.

use crate::engine::{CompatibilityReport, ReportSummary};
use crate::frameworks::ConflictSeverity;
use crate::CovalentResult;

/// Render a compatibility report as Markdown
pub fn render(report: &CompatibilityReport) -> CovalentResult<String> {
    let mut md = String::with_capacity(8192);

    // Title
    md.push_str("# Covalent Compatibility Report\n\n");

    // Metadata
    md.push_str("| Field | Value |\n|---|---|\n");
    md.push_str(&format!("| **Report ID** | `{}` |\n", report.report_id));
    md.push_str(&format!(
        "| **Target Language** | {} |\n",
        report.target_language
    ));
    md.push_str(&format!(
        "| **Components Analyzed** | {} |\n",
        report.components.len()
    ));
    md.push_str(&format!(
        "| **Generated** | {} |\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!(
        "| **Analysis Duration** | {}ms |\n",
        report.duration_ms
    ));
    md.push_str(&format!(
        "| **Engine Version** | {} |\n",
        report.engine_version
    ));
    md.push_str("\n");

    // Summary
    md.push_str("## Summary\n\n");
    match &report.summary {
        ReportSummary::Empty { status } => {
            md.push_str(&format!("{}\n\n", status));
        }
        ReportSummary::Stats(stats) => {
            md.push_str(&format!("**{}**\n\n", stats.assessment));
            md.push_str("| Metric | Value |\n|---|---|\n");
            md.push_str(&format!(
                "| Average Score | {:.2} |\n",
                stats.average_score
            ));
            md.push_str(&format!(
                "| Framework Compatibility | {:.2} |\n",
                stats.framework_compatibility
            ));
            md.push_str(&format!(
                "| License Status | {} {} |\n",
                compliance_badge(&stats.license_status),
                stats.license_status
            ));
            md.push_str(&format!(
                "| Score Distribution | {} high / {} medium / {} low |\n",
                stats.score_distribution.high,
                stats.score_distribution.medium,
                stats.score_distribution.low
            ));
            md.push_str(&format!(
                "| Priority Distribution | {} high / {} medium / {} low / {} skip |\n",
                stats.priority_distribution.high,
                stats.priority_distribution.medium,
                stats.priority_distribution.low,
                stats.priority_distribution.skip
            ));
            md.push_str(&format!(
                "| Recommended Combinations | {} |\n",
                stats.recommended_combinations
            ));
            md.push_str(&format!(
                "| Total Estimated Effort | {} hours |\n",
                stats.total_estimated_hours
            ));
            md.push_str("\n");
        }
    }

    // Component assessments
    if !report.compatibility_results.is_empty() {
        md.push_str("## Component Assessments\n\n");
        md.push_str("| Component | Overall | Priority | License | Frameworks | Recommendation |\n");
        md.push_str("|-----------|--------:|----------|---------|------------|----------------|\n");
        for result in &report.compatibility_results {
            let frameworks = report
                .framework_analysis
                .components
                .get(&result.component_id)
                .map(|profile| profile.frameworks.join(", "))
                .unwrap_or_default();
            md.push_str(&format!(
                "| {} | {:.2} | {} | {} | {} | {} |\n",
                result.component_name,
                result.overall_score,
                result.priority,
                result.license_status,
                frameworks,
                truncate(&result.recommendation, 120),
            ));
        }
        md.push_str("\n");
    }

    // Framework conflicts
    let conflicts = &report.framework_analysis.conflicts;
    if !conflicts.is_empty() {
        md.push_str("## Framework Conflicts\n\n");
        md.push_str("| Severity | Frameworks | Components | Reason |\n");
        md.push_str("|----------|------------|------------|--------|\n");
        for conflict in conflicts {
            md.push_str(&format!(
                "| {} | {} vs {} | {} / {} | {} |\n",
                severity_icon(conflict.severity),
                conflict.framework_a,
                conflict.framework_b,
                conflict.component_a,
                conflict.component_b,
                truncate(&conflict.reason, 120),
            ));
        }
        md.push_str("\n");

        let severe: Vec<_> = conflicts
            .iter()
            .filter(|c| c.severity >= ConflictSeverity::High)
            .collect();
        if !severe.is_empty() {
            md.push_str("### Resolution Suggestions\n\n");
            for conflict in severe {
                md.push_str(&format!(
                    "**{} vs {}** ({})\n",
                    conflict.framework_a, conflict.framework_b, conflict.severity
                ));
                for suggestion in &conflict.resolution_suggestions {
                    md.push_str(&format!("- {}\n", suggestion));
                }
                md.push_str("\n");
            }
        }
    }

    // Compatible sets
    if !report.framework_analysis.compatible_sets.is_empty() {
        md.push_str("## Compatible Sets\n\n");
        for set in &report.framework_analysis.compatible_sets {
            md.push_str(&format!(
                "- **{}** (score {:.2})",
                set.component_names.join(", "),
                set.compatibility_score
            ));
            if !set.frameworks.is_empty() {
                md.push_str(&format!(" using {}", set.frameworks.join(", ")));
            }
            md.push_str("\n");
        }
        md.push_str("\n");
    }

    // License compliance
    let la = &report.license_analysis;
    md.push_str("## License Compliance\n\n");
    md.push_str(&format!(
        "{} **{}**\n\n",
        compliance_badge(&la.overall_compliance_status),
        la.overall_compliance_status
    ));
    if !la.compatibility_entries.is_empty() {
        md.push_str("| License A | License B | Status | Reason |\n");
        md.push_str("|-----------|-----------|--------|--------|\n");
        for entry in &la.compatibility_entries {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                entry.license_a,
                entry.license_b,
                entry.status,
                truncate(&entry.reason, 120),
            ));
        }
        md.push_str("\n");
    }
    if !la.attribution_requirements.is_empty() {
        md.push_str("**Attribution required:**\n");
        for attr in &la.attribution_requirements {
            md.push_str(&format!(
                "- {} ({})\n",
                attr.component_name, attr.license_type
            ));
        }
        md.push_str("\n");
    }
    if !la.redistribution_requirements.is_empty() {
        md.push_str("**Redistribution requirements:**\n");
        for requirement in &la.redistribution_requirements {
            md.push_str(&format!("- {}\n", requirement));
        }
        md.push_str("\n");
    }
    if !la.recommendations.is_empty() {
        md.push_str("**Recommendations:**\n");
        for recommendation in &la.recommendations {
            md.push_str(&format!("- {}\n", recommendation));
        }
        md.push_str("\n");
    }

    // Recommended combinations
    if !report.recommended_combinations.is_empty() {
        md.push_str("## Recommended Combinations\n\n");
        for (i, combination) in report.recommended_combinations.iter().enumerate() {
            md.push_str(&format!("{}. {}\n", i + 1, combination.join(", ")));
        }
        md.push_str("\n");
    }

    // Integration roadmap
    if !report.integration_roadmap.is_empty() {
        md.push_str("## Integration Roadmap\n\n");
        for phase in &report.integration_roadmap {
            md.push_str(&format!(
                "### Phase {}: {}\n\n",
                phase.phase, phase.title
            ));
            md.push_str(&format!("{}\n\n", phase.description));
            md.push_str(&format!(
                "- **Components:** {}\n",
                phase.components.join(", ")
            ));
            md.push_str(&format!(
                "- **Estimated Effort:** {} hours\n\n",
                phase.estimated_hours
            ));
        }
    }

    // Risk assessment
    let risks = &report.risk_assessment;
    let has_risks = !risks.high_risk_components.is_empty()
        || !risks.license_risks.is_empty()
        || !risks.framework_conflicts.is_empty()
        || !risks.technical_risks.is_empty();
    if has_risks {
        md.push_str("## Risk Assessment\n\n");
        if !risks.high_risk_components.is_empty() {
            md.push_str("**High-risk components:**\n");
            for component in &risks.high_risk_components {
                md.push_str(&format!(
                    "- {} (score {:.2}): {}\n",
                    component.name,
                    component.score,
                    component.issues.join(", ")
                ));
            }
            md.push_str("\n");
        }
        if !risks.license_risks.is_empty() {
            md.push_str("**License risks:**\n");
            for risk in &risks.license_risks {
                md.push_str(&format!("- {}\n", risk));
            }
            md.push_str("\n");
        }
        if !risks.framework_conflicts.is_empty() {
            md.push_str("**Critical framework conflicts:**\n");
            for conflict in &risks.framework_conflicts {
                md.push_str(&format!(
                    "- {} vs {}: {}\n",
                    conflict.frameworks[0], conflict.frameworks[1], conflict.reason
                ));
            }
            md.push_str("\n");
        }
        if !risks.technical_risks.is_empty() {
            md.push_str("**Technical risks:**\n");
            for risk in &risks.technical_risks {
                md.push_str(&format!("- {}\n", risk));
            }
            md.push_str("\n");
        }
        if !risks.mitigation_strategies.is_empty() {
            md.push_str("**Mitigation strategies:**\n");
            for strategy in &risks.mitigation_strategies {
                md.push_str(&format!("- {}\n", strategy));
            }
            md.push_str("\n");
        }
    }

    // Footer
    md.push_str("---\n\n");
    md.push_str(&format!(
        "*Generated by covalent v{} — Compatibility & Licensing Analysis Engine*\n",
        report.engine_version
    ));

    Ok(md)
}

fn severity_icon(severity: ConflictSeverity) -> &'static str {
    match severity {
        ConflictSeverity::Critical => "🔴 Critical",
        ConflictSeverity::High => "🟠 High",
        ConflictSeverity::Medium => "🟡 Medium",
        ConflictSeverity::Low => "🔵 Low",
        ConflictSeverity::Info => "⚪ Info",
    }
}

fn compliance_badge(status: &str) -> &'static str {
    if status.starts_with("Compliant") {
        "✅"
    } else if status.starts_with("Non-compliant") {
        "❌"
    } else {
        "⚠️"
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{}…", cut)
    }
}
