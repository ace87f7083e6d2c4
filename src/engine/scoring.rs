//! Multi-factor component scoring
//!
//! Combines framework, license, technical, and complexity signals into one
//! weighted score per component, plus the derived recommendation text and
//! integration priority. The weights are calibration constants carried from
//! operational tuning, not semantic invariants.

use super::{
    ComprehensiveCompatibility, IntegrationComplexity, Priority, TechnicalCompatibility,
};
use crate::component::Component;
use crate::frameworks::{self, FrameworkAnalysis, FrameworkConflict};
use crate::license::{
    component_license_status, LicenseAnalysis, LicenseInfo, LicenseStatus, LicenseType,
};

/// Weighted sub-score shares of the overall score.
const WEIGHT_FRAMEWORK: f64 = 0.30;
const WEIGHT_LICENSE: f64 = 0.25;
const WEIGHT_TECHNICAL: f64 = 0.25;
const WEIGHT_COMPLEXITY: f64 = 0.20;

/// Full assessment for one component against the batch analyses.
pub fn assess_component(
    component: &Component,
    framework_analysis: &FrameworkAnalysis,
    license_analysis: &LicenseAnalysis,
    target_language: &str,
) -> ComprehensiveCompatibility {
    let empty: &[String] = &[];
    let component_frameworks = framework_analysis
        .components
        .get(&component.id)
        .map(|profile| profile.frameworks.as_slice())
        .unwrap_or(empty);

    let detection = license_analysis.detected_licenses.get(&component.id);
    let license_status = match detection {
        Some(info) => {
            component_license_status(info.license_type, &license_analysis.compatibility_entries)
        }
        None => LicenseStatus::Unknown,
    };

    let framework_score =
        frameworks::framework_score(component_frameworks, &framework_analysis.conflicts);
    let technical_compatibility = assess_technical(component, target_language);
    let integration_complexity = assess_integration_complexity(
        component,
        component_frameworks,
        &framework_analysis.conflicts,
        detection,
    );

    let overall_score = overall_score(
        framework_score,
        license_status,
        &technical_compatibility,
        integration_complexity.setup_complexity,
    );
    let recommendation = build_recommendation(
        overall_score,
        framework_score,
        license_status,
        integration_complexity.setup_complexity,
    );
    let priority = integration_priority(overall_score, integration_complexity.setup_complexity);

    ComprehensiveCompatibility {
        component_id: component.id.clone(),
        component_name: component.name.clone(),
        framework_score,
        license_status,
        technical_compatibility,
        integration_complexity,
        overall_score,
        recommendation,
        priority,
    }
}

/// Language match against the target plus fixed version/runtime defaults.
/// Real version and runtime probing is out of scope for this engine.
fn assess_technical(component: &Component, target_language: &str) -> TechnicalCompatibility {
    let language_compatibility = if component.language.eq_ignore_ascii_case(target_language) {
        1.0
    } else {
        0.5
    };

    let mut dependency_conflicts = Vec::new();
    if component.dependency_count() > 20 {
        dependency_conflicts.push("High dependency count may cause conflicts".to_string());
    }

    TechnicalCompatibility {
        language_compatibility,
        version_compatibility: 0.8,
        runtime_compatibility: 0.9,
        dependency_conflicts,
    }
}

fn assess_integration_complexity(
    component: &Component,
    component_frameworks: &[String],
    conflicts: &[FrameworkConflict],
    detection: Option<&LicenseInfo>,
) -> IntegrationComplexity {
    let setup_complexity = (component.dependency_count() as f64 / 20.0).min(1.0);

    let mut configuration_conflicts: Vec<String> = Vec::new();
    for conflict in conflicts {
        let touches = component_frameworks
            .iter()
            .any(|f| f == &conflict.framework_a || f == &conflict.framework_b);
        if touches {
            let note = format!("Framework conflict: {}", conflict.reason);
            if !configuration_conflicts.contains(&note) {
                configuration_conflicts.push(note);
            }
        }
    }

    // Base effort plus dependency-driven setup; copyleft and other
    // non-permissive attribution obligations add compliance work
    let mut integration_effort_hours = 4 + (setup_complexity * 16.0) as u32;
    let attribution_beyond_baseline = detection
        .map(|info| info.requires_attribution && !info.license_type.is_permissive())
        .unwrap_or(false);
    if attribution_beyond_baseline {
        integration_effort_hours += 2;
    }

    let unknown_license = detection
        .map(|info| info.license_type == LicenseType::Unknown)
        .unwrap_or(true);

    let mut risk_factors = Vec::new();
    if setup_complexity > 0.7 {
        risk_factors.push("High setup complexity".to_string());
    }
    if !configuration_conflicts.is_empty() {
        risk_factors.push("Configuration conflicts present".to_string());
    }
    if unknown_license {
        risk_factors.push("Unknown license".to_string());
    }

    IntegrationComplexity {
        setup_complexity,
        configuration_conflicts,
        integration_effort_hours,
        risk_factors,
    }
}

fn overall_score(
    framework_score: f64,
    license_status: LicenseStatus,
    technical: &TechnicalCompatibility,
    setup_complexity: f64,
) -> f64 {
    let technical_score = 0.3 * technical.language_compatibility
        + 0.3 * technical.version_compatibility
        + 0.4 * technical.runtime_compatibility;

    let score = WEIGHT_FRAMEWORK * framework_score
        + WEIGHT_LICENSE * license_status.score()
        + WEIGHT_TECHNICAL * technical_score
        + WEIGHT_COMPLEXITY * (1.0 - setup_complexity);
    score.clamp(0.0, 1.0)
}

fn build_recommendation(
    overall_score: f64,
    framework_score: f64,
    license_status: LicenseStatus,
    setup_complexity: f64,
) -> String {
    let tier = if overall_score >= 0.8 {
        "Highly recommended - Low risk, high compatibility"
    } else if overall_score >= 0.6 {
        "Recommended - Good compatibility with minor considerations"
    } else if overall_score >= 0.4 {
        "Consider carefully - Moderate compatibility issues"
    } else {
        "Not recommended - Significant compatibility issues"
    };

    let mut concerns: Vec<&str> = Vec::new();
    if framework_score < 1.0 {
        concerns.push("framework conflicts");
    }
    match license_status {
        LicenseStatus::Incompatible => concerns.push("license incompatibility"),
        LicenseStatus::Conditional => concerns.push("conditional license compatibility"),
        LicenseStatus::Unknown => concerns.push("unknown license compatibility"),
        LicenseStatus::Compatible => {}
    }
    if setup_complexity > 0.7 {
        concerns.push("high integration complexity");
    }

    if concerns.is_empty() {
        tier.to_string()
    } else {
        format!("{} (Issues: {})", tier, concerns.join(", "))
    }
}

/// High demands both a strong score and low setup; a heavy setup burden
/// downgrades an otherwise-High component one tier.
fn integration_priority(overall_score: f64, setup_complexity: f64) -> Priority {
    if overall_score >= 0.8 {
        if setup_complexity < 0.5 {
            Priority::High
        } else {
            Priority::Medium
        }
    } else if overall_score >= 0.6 {
        Priority::Medium
    } else if overall_score >= 0.4 {
        Priority::Low
    } else {
        Priority::Skip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frameworks::{ConflictSeverity, ExtractedProfile};
    use crate::license::compatibility::analyze_pairs;
    use std::collections::BTreeMap;

    fn conflict(a: &str, b: &str, severity: ConflictSeverity, reason: &str) -> FrameworkConflict {
        FrameworkConflict {
            framework_a: a.to_string(),
            framework_b: b.to_string(),
            component_a: "c0".to_string(),
            component_b: "c1".to_string(),
            severity,
            reason: reason.to_string(),
            resolution_suggestions: vec![],
        }
    }

    fn framework_analysis(
        profiles: &[(&str, &[&str])],
        conflicts: Vec<FrameworkConflict>,
    ) -> FrameworkAnalysis {
        let components: BTreeMap<String, ExtractedProfile> = profiles
            .iter()
            .map(|(id, frameworks)| {
                (
                    id.to_string(),
                    ExtractedProfile {
                        frameworks: frameworks.iter().map(|f| f.to_string()).collect(),
                        dependencies: vec![],
                    },
                )
            })
            .collect();
        FrameworkAnalysis {
            components,
            conflicts,
            compatible_sets: vec![],
            recommendations: vec![],
            overall_compatibility: 1.0,
        }
    }

    fn license_analysis(detections: &[(&str, LicenseType)]) -> LicenseAnalysis {
        let types: Vec<LicenseType> = detections.iter().map(|(_, t)| *t).collect();
        let compatibility_entries = analyze_pairs(&types);
        LicenseAnalysis {
            detected_licenses: detections
                .iter()
                .map(|(id, t)| {
                    (
                        id.to_string(),
                        LicenseInfo::from_classification(*t, 0.7, None),
                    )
                })
                .collect(),
            compatibility_entries,
            commercial_use_allowed: true,
            attribution_requirements: vec![],
            redistribution_requirements: vec![],
            source_disclosure_required: false,
            overall_compliance_status: String::new(),
            recommendations: vec![],
        }
    }

    // ─── Sub-Scores ─────────────────────────────────────────────────

    #[test]
    fn test_overall_score_is_bounded() {
        let floor = overall_score(
            0.0,
            LicenseStatus::Incompatible,
            &TechnicalCompatibility {
                language_compatibility: 0.0,
                version_compatibility: 0.0,
                runtime_compatibility: 0.0,
                dependency_conflicts: vec![],
            },
            1.0,
        );
        assert_eq!(floor, 0.0);

        let ceiling = overall_score(
            1.0,
            LicenseStatus::Compatible,
            &TechnicalCompatibility {
                language_compatibility: 1.0,
                version_compatibility: 1.0,
                runtime_compatibility: 1.0,
                dependency_conflicts: vec![],
            },
            0.0,
        );
        assert!((ceiling - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_language_mismatch_halves_sub_score() {
        let same = assess_technical(&Component::new("c", "lib", "Python"), "python");
        assert_eq!(same.language_compatibility, 1.0);

        let other = assess_technical(&Component::new("c", "lib", "javascript"), "python");
        assert_eq!(other.language_compatibility, 0.5);
    }

    #[test]
    fn test_heavy_dependency_count_is_flagged() {
        let mut c = Component::new("c", "lib", "python");
        c.dependencies_count = 25;
        let technical = assess_technical(&c, "python");
        assert_eq!(
            technical.dependency_conflicts,
            vec!["High dependency count may cause conflicts".to_string()]
        );

        c.dependencies_count = 20;
        assert!(assess_technical(&c, "python").dependency_conflicts.is_empty());
    }

    #[test]
    fn test_effort_hours_formula() {
        // 25 deps saturate setup at 1.0: 4 + 16, permissive license adds
        // nothing
        let mut c = Component::new("c", "lib", "python");
        c.dependencies_count = 25;
        let mit = LicenseInfo::from_classification(LicenseType::Mit, 0.7, None);
        let complexity = assess_integration_complexity(&c, &[], &[], Some(&mit));
        assert_eq!(complexity.setup_complexity, 1.0);
        assert_eq!(complexity.integration_effort_hours, 20);
        assert!(complexity
            .risk_factors
            .contains(&"High setup complexity".to_string()));

        // 10 deps: 4 + 8, copyleft attribution surcharge applies
        c.dependencies_count = 10;
        let gpl = LicenseInfo::from_classification(LicenseType::Gpl3, 0.7, None);
        let complexity = assess_integration_complexity(&c, &[], &[], Some(&gpl));
        assert_eq!(complexity.setup_complexity, 0.5);
        assert_eq!(complexity.integration_effort_hours, 14);
    }

    #[test]
    fn test_configuration_conflicts_deduplicate() {
        let conflicts = vec![
            conflict(
                "django",
                "fastapi",
                ConflictSeverity::High,
                "Different WSGI/ASGI patterns and ORM approaches",
            ),
            conflict(
                "django",
                "fastapi",
                ConflictSeverity::High,
                "Different WSGI/ASGI patterns and ORM approaches",
            ),
        ];
        let c = Component::new("c", "lib", "python");
        let complexity = assess_integration_complexity(
            &c,
            &["django".to_string()],
            &conflicts,
            None,
        );
        assert_eq!(complexity.configuration_conflicts.len(), 1);
        assert_eq!(
            complexity.configuration_conflicts[0],
            "Framework conflict: Different WSGI/ASGI patterns and ORM approaches"
        );
        assert!(complexity
            .risk_factors
            .contains(&"Configuration conflicts present".to_string()));
    }

    #[test]
    fn test_priority_tiers() {
        assert_eq!(integration_priority(0.85, 0.3), Priority::High);
        // Heavy setup downgrades an otherwise-High component
        assert_eq!(integration_priority(0.85, 0.6), Priority::Medium);
        assert_eq!(integration_priority(0.7, 0.0), Priority::Medium);
        assert_eq!(integration_priority(0.5, 0.0), Priority::Low);
        assert_eq!(integration_priority(0.3, 0.0), Priority::Skip);
    }

    #[test]
    fn test_recommendation_lists_concerns() {
        let text = build_recommendation(0.84, 0.8, LicenseStatus::Conditional, 0.0);
        assert_eq!(
            text,
            "Highly recommended - Low risk, high compatibility \
             (Issues: framework conflicts, conditional license compatibility)"
        );

        let clean = build_recommendation(0.95, 1.0, LicenseStatus::Compatible, 0.1);
        assert_eq!(clean, "Highly recommended - Low risk, high compatibility");
    }

    // ─── Full Assessment ────────────────────────────────────────────

    #[test]
    fn test_assess_component_weighs_all_factors() {
        // django component in a medium conflict with flask, GPL-3.0 against
        // an MIT sibling, language matching the target, no dependencies
        let component = Component::new("c1", "django-app", "python");
        let fa = framework_analysis(
            &[("c0", &["flask"]), ("c1", &["django"])],
            vec![conflict(
                "flask",
                "django",
                ConflictSeverity::Medium,
                "Different templating and ORM systems",
            )],
        );
        let la = license_analysis(&[("c0", LicenseType::Mit), ("c1", LicenseType::Gpl3)]);

        let result = assess_component(&component, &fa, &la, "python");

        assert!((result.framework_score - 0.8).abs() < 1e-9);
        assert_eq!(result.license_status, LicenseStatus::Conditional);
        assert!((result.overall_score - 0.84).abs() < 1e-9);
        assert_eq!(result.priority, Priority::High);
        assert!(result.recommendation.contains("framework conflicts"));
        assert!(result
            .recommendation
            .contains("conditional license compatibility"));
    }

    #[test]
    fn test_assess_component_without_detection_entry() {
        let component = Component::new("ghost", "ghost", "python");
        let fa = framework_analysis(&[], vec![]);
        let la = license_analysis(&[]);

        let result = assess_component(&component, &fa, &la, "python");

        assert_eq!(result.license_status, LicenseStatus::Unknown);
        assert!(result
            .integration_complexity
            .risk_factors
            .contains(&"Unknown license".to_string()));
    }
}
