//! Framework conflict analysis
//!
//! Detects framework-level incompatibilities between candidate components
//! using a curated per-ecosystem rule table, scores the damage, and groups
//! components into heuristic conflict-free sets.

pub mod clustering;
pub mod detector;

pub use clustering::find_compatible_sets;
pub use detector::FrameworkDetector;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ─── Severity ───────────────────────────────────────────────────────

/// How disruptive a framework conflict is.
///
/// Ordering is ascending: `Info < Low < Medium < High < Critical`, so
/// `severity >= ConflictSeverity::High` selects the disruptive tiers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ConflictSeverity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl ConflictSeverity {
    /// Penalty subtracted from a per-component framework score for each
    /// conflict instance at this severity. Calibration constants.
    pub fn score_penalty(&self) -> f64 {
        match self {
            Self::Critical => 0.4,
            Self::High => 0.3,
            Self::Medium => 0.2,
            Self::Low => 0.1,
            Self::Info => 0.0,
        }
    }

    /// Smaller penalty used for the batch-wide compatibility rollup.
    pub fn overall_penalty(&self) -> f64 {
        match self {
            Self::Critical => 0.3,
            Self::High => 0.2,
            Self::Medium => 0.1,
            Self::Low => 0.05,
            Self::Info => 0.0,
        }
    }
}

impl fmt::Display for ConflictSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

// ─── Rule & Conflict Types ──────────────────────────────────────────

/// A documented incompatibility between two frameworks of one ecosystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameworkConflictRule {
    pub framework_a: String,
    pub framework_b: String,
    pub severity: ConflictSeverity,
    pub reason: String,
    pub resolution_suggestions: Vec<String>,
}

/// A rule instantiated against two specific components. `framework_a` is
/// held by `component_a`, `framework_b` by `component_b`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameworkConflict {
    pub framework_a: String,
    pub framework_b: String,
    pub component_a: String,
    pub component_b: String,
    pub severity: ConflictSeverity,
    pub reason: String,
    pub resolution_suggestions: Vec<String>,
}

/// Frameworks and dependency profile extracted for one component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedProfile {
    pub frameworks: Vec<String>,
    pub dependencies: Vec<String>,
}

/// A heuristically-computed group of components with no severe framework
/// conflict between any two members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibleSet {
    pub component_ids: Vec<String>,
    pub component_names: Vec<String>,
    /// Union of member frameworks, first-appearance order
    pub frameworks: Vec<String>,
    /// Union of member dependency profiles, first-appearance order
    pub shared_dependencies: Vec<String>,
    pub compatibility_score: f64,
}

/// Complete framework compatibility analysis for one component batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameworkAnalysis {
    /// Extraction profile per component id
    pub components: BTreeMap<String, ExtractedProfile>,
    pub conflicts: Vec<FrameworkConflict>,
    pub compatible_sets: Vec<CompatibleSet>,
    pub recommendations: Vec<String>,
    /// Batch-wide compatibility rollup in [0, 1]
    pub overall_compatibility: f64,
}

// ─── Ecosystem Tables ───────────────────────────────────────────────

/// One language ecosystem: its framework taxonomy and known conflicts.
/// All framework names are lowercase; extraction lowercases to match.
#[derive(Debug, Clone)]
pub struct EcosystemRules {
    pub language: &'static str,
    /// category → known framework names
    pub categories: Vec<(&'static str, Vec<&'static str>)>,
    pub conflicts: Vec<FrameworkConflictRule>,
}

impl EcosystemRules {
    /// Every framework name in this ecosystem, across categories.
    pub fn framework_names(&self) -> Vec<&'static str> {
        self.categories
            .iter()
            .flat_map(|(_, names)| names.iter().copied())
            .collect()
    }
}

/// Infrastructure keywords recognized in component descriptions and added
/// to the dependency profile.
pub(crate) const INFRA_KEYWORDS: [&str; 6] = [
    "redis",
    "postgresql",
    "mysql",
    "mongodb",
    "elasticsearch",
    "kafka",
];

static ECOSYSTEMS: Lazy<Vec<EcosystemRules>> = Lazy::new(build_ecosystem_rules);

fn rule(
    framework_a: &str,
    framework_b: &str,
    severity: ConflictSeverity,
    reason: &str,
    resolutions: &[&str],
) -> FrameworkConflictRule {
    FrameworkConflictRule {
        framework_a: framework_a.into(),
        framework_b: framework_b.into(),
        severity,
        reason: reason.into(),
        resolution_suggestions: resolutions.iter().map(|s| s.to_string()).collect(),
    }
}

fn build_ecosystem_rules() -> Vec<EcosystemRules> {
    vec![
        EcosystemRules {
            language: "python",
            categories: vec![
                (
                    "web",
                    vec!["django", "flask", "fastapi", "tornado", "pyramid"],
                ),
                ("async", vec!["asyncio", "twisted"]),
                ("concurrency", vec!["threading", "multiprocessing"]),
                ("orm", vec!["sqlalchemy", "peewee", "tortoise"]),
                ("task_queue", vec!["celery", "dramatiq"]),
                ("testing", vec!["pytest"]),
            ],
            conflicts: vec![
                rule(
                    "django",
                    "fastapi",
                    ConflictSeverity::High,
                    "Different WSGI/ASGI patterns and ORM approaches",
                    &[
                        "Use Django REST Framework instead of FastAPI",
                        "Separate services approach",
                    ],
                ),
                rule(
                    "flask",
                    "django",
                    ConflictSeverity::Medium,
                    "Different templating and ORM systems",
                    &[
                        "Choose one as primary framework",
                        "Use microservices architecture",
                    ],
                ),
                rule(
                    "asyncio",
                    "threading",
                    ConflictSeverity::High,
                    "Different concurrency models",
                    &[
                        "Stick to one concurrency model",
                        "Use asyncio-compatible libraries",
                    ],
                ),
            ],
        },
        EcosystemRules {
            language: "javascript",
            categories: vec![
                ("frontend", vec!["react", "vue", "angular", "svelte"]),
                ("backend", vec!["express", "nestjs", "fastify"]),
                ("bundler", vec!["webpack", "rollup", "parcel", "esbuild"]),
                ("state", vec!["redux", "mobx"]),
                ("testing", vec!["mocha", "jasmine"]),
            ],
            conflicts: vec![
                rule(
                    "react",
                    "vue",
                    ConflictSeverity::Critical,
                    "Different component systems and virtual DOM implementations",
                    &[
                        "Choose one frontend framework",
                        "Use micro-frontends architecture",
                    ],
                ),
                rule(
                    "webpack",
                    "rollup",
                    ConflictSeverity::Medium,
                    "Different bundling strategies and plugin systems",
                    &[
                        "Choose primary bundler",
                        "Use different bundlers for different purposes",
                    ],
                ),
            ],
        },
        EcosystemRules {
            language: "java",
            categories: vec![
                (
                    "application",
                    vec!["spring-boot", "dropwizard", "micronaut", "quarkus"],
                ),
                ("build", vec!["maven", "gradle"]),
                ("persistence", vec!["hibernate"]),
                ("testing", vec!["junit", "testng"]),
            ],
            conflicts: vec![rule(
                "spring-boot",
                "dropwizard",
                ConflictSeverity::High,
                "Different application bootstrapping and configuration",
                &["Choose one application framework", "Separate services"],
            )],
        },
    ]
}

/// All known ecosystems.
pub fn ecosystems() -> &'static [EcosystemRules] {
    &ECOSYSTEMS
}

/// Rule set for a language, case-insensitive. Unknown languages have no
/// taxonomy and therefore produce no conflicts.
pub fn ecosystem_for(language: &str) -> Option<&'static EcosystemRules> {
    let lang = language.to_lowercase();
    ECOSYSTEMS.iter().find(|eco| eco.language == lang)
}

// ─── Score Rollups ──────────────────────────────────────────────────

/// Per-component framework score: 1.0 minus the severity penalty of every
/// conflict instance touching one of the component's frameworks, floored
/// at zero.
pub fn framework_score(frameworks: &[String], conflicts: &[FrameworkConflict]) -> f64 {
    let mut score = 1.0;
    for conflict in conflicts {
        let touches = frameworks
            .iter()
            .any(|f| f == &conflict.framework_a || f == &conflict.framework_b);
        if touches {
            score -= conflict.severity.score_penalty();
        }
    }
    score.max(0.0)
}

/// Batch-wide framework compatibility: 1.0 minus a smaller per-conflict
/// penalty, floored at zero. An empty batch is fully compatible.
pub fn overall_compatibility(conflicts: &[FrameworkConflict], total_components: usize) -> f64 {
    if total_components == 0 {
        return 1.0;
    }
    let mut score = 1.0;
    for conflict in conflicts {
        score -= conflict.severity.overall_penalty();
    }
    score.max(0.0)
}

/// Human-readable guidance derived from the conflict list and the best
/// compatible sets.
pub fn build_recommendations(
    conflicts: &[FrameworkConflict],
    compatible_sets: &[CompatibleSet],
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if conflicts.is_empty() {
        recommendations.push("No major compatibility conflicts detected".to_string());
    } else {
        let critical: Vec<&FrameworkConflict> = conflicts
            .iter()
            .filter(|c| c.severity == ConflictSeverity::Critical)
            .collect();
        let high: Vec<&FrameworkConflict> = conflicts
            .iter()
            .filter(|c| c.severity == ConflictSeverity::High)
            .collect();

        if !critical.is_empty() {
            recommendations.push(format!(
                "{} critical conflicts require immediate attention",
                critical.len()
            ));
            for conflict in critical.iter().take(3) {
                recommendations.push(format!(
                    "{} vs {}: {}",
                    conflict.framework_a, conflict.framework_b, conflict.reason
                ));
            }
        }
        if !high.is_empty() {
            recommendations.push(format!(
                "{} high-priority conflicts need resolution",
                high.len()
            ));
        }
    }

    if let Some(best) = compatible_sets.first() {
        recommendations.push(format!(
            "Recommended compatible set: {} components with {:.2} compatibility score",
            best.component_ids.len(),
            best.compatibility_score
        ));
        let preview: Vec<String> = best.frameworks.iter().take(5).cloned().collect();
        if !preview.is_empty() {
            recommendations.push(format!("Frameworks: {}", preview.join(", ")));
        }
    }

    if conflicts.len() > 5 {
        recommendations.push(
            "Consider using microservices architecture to isolate conflicting frameworks"
                .to_string(),
        );
    }
    if conflicts
        .iter()
        .any(|c| c.severity == ConflictSeverity::Critical)
    {
        recommendations
            .push("Focus on one primary framework per category (web, database, etc.)".to_string());
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_conflict(a: &str, b: &str, severity: ConflictSeverity) -> FrameworkConflict {
        FrameworkConflict {
            framework_a: a.into(),
            framework_b: b.into(),
            component_a: "c_a".into(),
            component_b: "c_b".into(),
            severity,
            reason: "test".into(),
            resolution_suggestions: vec![],
        }
    }

    // ─── Severity ───────────────────────────────────────────────────

    #[test]
    fn test_severity_ordering_is_ascending() {
        assert!(ConflictSeverity::Info < ConflictSeverity::Low);
        assert!(ConflictSeverity::Low < ConflictSeverity::Medium);
        assert!(ConflictSeverity::Medium < ConflictSeverity::High);
        assert!(ConflictSeverity::High < ConflictSeverity::Critical);
        assert!(ConflictSeverity::High >= ConflictSeverity::High);
    }

    #[test]
    fn test_score_penalties() {
        assert_eq!(ConflictSeverity::Critical.score_penalty(), 0.4);
        assert_eq!(ConflictSeverity::High.score_penalty(), 0.3);
        assert_eq!(ConflictSeverity::Medium.score_penalty(), 0.2);
        assert_eq!(ConflictSeverity::Low.score_penalty(), 0.1);
        assert_eq!(ConflictSeverity::Info.score_penalty(), 0.0);
    }

    // ─── Ecosystem Tables ───────────────────────────────────────────

    #[test]
    fn test_ecosystem_lookup_is_case_insensitive() {
        assert!(ecosystem_for("Python").is_some());
        assert!(ecosystem_for("JAVASCRIPT").is_some());
        assert!(ecosystem_for("cobol").is_none());
    }

    #[test]
    fn test_conflict_rules_reference_known_frameworks() {
        // Every framework named in a rule must exist in that ecosystem's
        // taxonomy, otherwise extraction can never trigger the rule.
        for eco in ecosystems() {
            let names = eco.framework_names();
            for rule in &eco.conflicts {
                assert!(
                    names.contains(&rule.framework_a.as_str()),
                    "{} missing from {} taxonomy",
                    rule.framework_a,
                    eco.language
                );
                assert!(
                    names.contains(&rule.framework_b.as_str()),
                    "{} missing from {} taxonomy",
                    rule.framework_b,
                    eco.language
                );
            }
        }
    }

    // ─── Score Rollups ──────────────────────────────────────────────

    #[test]
    fn test_framework_score_subtracts_touching_conflicts() {
        let frameworks = vec!["django".to_string()];
        let conflicts = vec![
            make_conflict("flask", "django", ConflictSeverity::Medium),
            make_conflict("react", "vue", ConflictSeverity::Critical),
        ];
        // Only the medium conflict touches django: 1.0 - 0.2
        let score = framework_score(&frameworks, &conflicts);
        assert!((score - 0.8).abs() < 1e-9, "got {}", score);
    }

    #[test]
    fn test_framework_score_floors_at_zero() {
        let frameworks = vec!["react".to_string()];
        let conflicts = vec![
            make_conflict("react", "vue", ConflictSeverity::Critical),
            make_conflict("react", "vue", ConflictSeverity::Critical),
            make_conflict("react", "vue", ConflictSeverity::Critical),
        ];
        assert_eq!(framework_score(&frameworks, &conflicts), 0.0);
    }

    #[test]
    fn test_overall_compatibility_empty_batch() {
        assert_eq!(overall_compatibility(&[], 0), 1.0);
        assert_eq!(overall_compatibility(&[], 3), 1.0);
    }

    #[test]
    fn test_overall_compatibility_penalties() {
        let conflicts = vec![
            make_conflict("react", "vue", ConflictSeverity::Critical),
            make_conflict("flask", "django", ConflictSeverity::Medium),
        ];
        // 1.0 - 0.3 - 0.1
        let score = overall_compatibility(&conflicts, 3);
        assert!((score - 0.6).abs() < 1e-9, "got {}", score);
    }

    // ─── Recommendations ────────────────────────────────────────────

    #[test]
    fn test_recommendations_no_conflicts() {
        let recs = build_recommendations(&[], &[]);
        assert_eq!(recs, vec!["No major compatibility conflicts detected"]);
    }

    #[test]
    fn test_recommendations_critical_details_capped_at_three() {
        let conflicts: Vec<FrameworkConflict> = (0..4)
            .map(|_| make_conflict("react", "vue", ConflictSeverity::Critical))
            .collect();
        let recs = build_recommendations(&conflicts, &[]);
        assert!(recs[0].starts_with("4 critical conflicts"));
        let details = recs.iter().filter(|r| r.contains(" vs ")).count();
        assert_eq!(details, 3);
        assert!(recs
            .iter()
            .any(|r| r.contains("one primary framework per category")));
    }

    #[test]
    fn test_recommendations_include_best_set() {
        let sets = vec![CompatibleSet {
            component_ids: vec!["a".into(), "b".into()],
            component_names: vec!["a".into(), "b".into()],
            frameworks: vec!["flask".into(), "celery".into()],
            shared_dependencies: vec![],
            compatibility_score: 0.9,
        }];
        let recs = build_recommendations(&[], &sets);
        assert!(recs
            .iter()
            .any(|r| r.contains("2 components with 0.90 compatibility score")));
        assert!(recs.iter().any(|r| r.contains("flask, celery")));
    }

    #[test]
    fn test_recommendations_many_conflicts_suggest_isolation() {
        let conflicts: Vec<FrameworkConflict> = (0..6)
            .map(|_| make_conflict("flask", "django", ConflictSeverity::Medium))
            .collect();
        let recs = build_recommendations(&conflicts, &[]);
        assert!(recs.iter().any(|r| r.contains("microservices architecture")));
    }
}
