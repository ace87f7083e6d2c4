//! # Covalent Engine — Analysis Orchestrator
//!
//! The analysis pipeline runs in five steps:
//!
//! - normalization — canonical component records, fail-fast validation
//! - framework analysis — extraction, pairwise conflicts, clustering
//! - license analysis — staged classification, compatibility matrix
//! - `scoring` — per-component multi-factor assessment
//! - `roadmap` / `risk` — combinations, phased plan, risk rollups, summary

pub mod risk;
pub mod roadmap;
pub mod scoring;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::component::{normalize_components, Component};
use crate::frameworks::{self, ExtractedProfile, FrameworkAnalysis, FrameworkDetector};
use crate::license::{
    AnalyzerOptions, HttpLicenseSource, LicenseAnalysis, LicenseAnalyzer, LicenseSource,
    LicenseStatus,
};
use crate::{CovalentError, CovalentResult};

// ─── Configuration ─────────────────────────────────────────────────

/// Engine configuration (loadable from `covalent.toml`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fetch license files from source hosts for low-confidence components
    #[serde(default = "default_true")]
    pub fetch_license_files: bool,

    /// Per-request timeout for license-file fetches, in seconds
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Bound on concurrently running license-file fetches
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_fetches: usize,

    /// Classification confidence at which later detection stages are skipped
    #[serde(default = "default_confidence_floor")]
    pub classification_confidence_floor: f64,
}

fn default_true() -> bool {
    true
}
fn default_fetch_timeout() -> u64 {
    5
}
fn default_max_concurrent() -> usize {
    4
}
fn default_confidence_floor() -> f64 {
    0.5
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fetch_license_files: true,
            fetch_timeout_secs: 5,
            max_concurrent_fetches: 4,
            classification_confidence_floor: 0.5,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a `covalent.toml` file
    pub fn from_file(path: &Path) -> CovalentResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)
            .map_err(|e| CovalentError::ConfigError(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Try to load from the project root, fall back to defaults
    pub fn from_project_root(root: &Path) -> Self {
        let config_path = root.join("covalent.toml");
        if config_path.exists() {
            match Self::from_file(&config_path) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {}", config_path.display());
                    return config;
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to load {}: {} — using defaults",
                        config_path.display(),
                        e
                    );
                }
            }
        }
        Self::default()
    }
}

// ─── Per-Component Assessment ──────────────────────────────────────

/// Technical compatibility sub-scores for one component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalCompatibility {
    /// 1.0 for a language match with the target, 0.5 otherwise
    pub language_compatibility: f64,
    pub version_compatibility: f64,
    pub runtime_compatibility: f64,
    pub dependency_conflicts: Vec<String>,
}

/// Heuristic integration-effort estimate for one component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationComplexity {
    /// Dependency-count-driven complexity in [0, 1]
    pub setup_complexity: f64,
    pub configuration_conflicts: Vec<String>,
    pub integration_effort_hours: u32,
    pub risk_factors: Vec<String>,
}

/// Integration priority tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
    Skip,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
            Self::Skip => write!(f, "Skip"),
        }
    }
}

/// Full multi-factor assessment for one component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComprehensiveCompatibility {
    pub component_id: String,
    pub component_name: String,
    pub framework_score: f64,
    pub license_status: LicenseStatus,
    pub technical_compatibility: TechnicalCompatibility,
    pub integration_complexity: IntegrationComplexity,
    /// Weighted aggregate in [0, 1]
    pub overall_score: f64,
    pub recommendation: String,
    pub priority: Priority,
}

// ─── Synthesis Types ───────────────────────────────────────────────

/// One phase of the integration roadmap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapPhase {
    pub phase: u8,
    pub title: String,
    pub components: Vec<String>,
    pub estimated_hours: u32,
    pub description: String,
}

/// Component flagged by the risk assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighRiskComponent {
    pub name: String,
    pub score: f64,
    pub issues: Vec<String>,
}

/// Critical framework conflict surfaced as a standalone risk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictRisk {
    pub frameworks: [String; 2],
    pub reason: String,
}

/// Batch risk rollup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub high_risk_components: Vec<HighRiskComponent>,
    pub license_risks: Vec<String>,
    pub framework_conflicts: Vec<ConflictRisk>,
    pub technical_risks: Vec<String>,
    pub mitigation_strategies: Vec<String>,
}

/// Component counts by overall-score bucket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreDistribution {
    /// overall ≥ 0.8
    pub high: usize,
    /// 0.6 ≤ overall < 0.8
    pub medium: usize,
    /// overall < 0.6
    pub low: usize,
}

/// Component counts by priority tier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriorityDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub skip: usize,
}

/// Summary statistics for a non-empty batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_components: usize,
    pub average_score: f64,
    pub score_distribution: ScoreDistribution,
    pub priority_distribution: PriorityDistribution,
    pub framework_compatibility: f64,
    pub license_status: String,
    pub recommended_combinations: usize,
    pub total_estimated_hours: u32,
    pub assessment: String,
}

/// Summary block: a neutral status object for an empty batch, full
/// statistics otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportSummary {
    /// Serializes as `{"status": "..."}`
    Empty { status: String },
    Stats(SummaryStats),
}

impl ReportSummary {
    pub fn no_components() -> Self {
        Self::Empty {
            status: "No components to analyze".to_string(),
        }
    }
}

// ─── Compatibility Report ──────────────────────────────────────────

/// Complete analysis report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityReport {
    pub report_id: Uuid,
    pub target_language: String,
    pub generated_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub engine_version: String,
    /// Normalized input components, in input order
    pub components: Vec<Component>,
    pub framework_analysis: FrameworkAnalysis,
    pub license_analysis: LicenseAnalysis,
    /// Per-component assessments, in input order
    pub compatibility_results: Vec<ComprehensiveCompatibility>,
    /// Rank-ordered component-name groups worth integrating together
    pub recommended_combinations: Vec<Vec<String>>,
    pub integration_roadmap: Vec<RoadmapPhase>,
    pub risk_assessment: RiskAssessment,
    pub summary: ReportSummary,
}

// ─── Engine ────────────────────────────────────────────────────────

/// The Covalent compatibility engine
pub struct CovalentEngine {
    config: EngineConfig,
    detector: FrameworkDetector,
    analyzer: LicenseAnalyzer,
}

impl CovalentEngine {
    /// Engine with the production license source wired in.
    pub fn new(config: EngineConfig) -> CovalentResult<Self> {
        let source: Arc<dyn LicenseSource> = Arc::new(HttpLicenseSource::new(
            Duration::from_secs(config.fetch_timeout_secs),
        )?);
        Ok(Self::with_license_source(config, source))
    }

    /// Engine with an injected license source, for offline use and tests.
    pub fn with_license_source(config: EngineConfig, source: Arc<dyn LicenseSource>) -> Self {
        let options = AnalyzerOptions {
            fetch_enabled: config.fetch_license_files,
            confidence_floor: config.classification_confidence_floor,
            max_concurrent_fetches: config.max_concurrent_fetches,
        };
        Self {
            config,
            detector: FrameworkDetector::new(),
            analyzer: LicenseAnalyzer::new(source, options),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Main analysis entry point — orchestrates the full pipeline
    pub async fn analyze(
        &self,
        components: &[Component],
        target_language: &str,
    ) -> CovalentResult<CompatibilityReport> {
        let start = std::time::Instant::now();
        tracing::info!("═══════════════════════════════════════════════════════");
        tracing::info!(
            "Covalent analysis: {} components, target language {}",
            components.len(),
            target_language
        );
        tracing::info!("═══════════════════════════════════════════════════════");

        // ── Step 1: Normalize input (fail fast on malformed batches) ──
        let components = normalize_components(components, target_language)?;

        // ── Step 2: Framework extraction, conflicts, clustering ──
        let profiles: Vec<ExtractedProfile> = components
            .iter()
            .map(|c| self.detector.extract_profile(c, target_language))
            .collect();
        let conflicts = self
            .detector
            .detect_conflicts(&components, &profiles, target_language);
        let compatible_sets = frameworks::find_compatible_sets(&components, &profiles, &conflicts);
        let overall_compatibility = frameworks::overall_compatibility(&conflicts, components.len());
        let recommendations = frameworks::build_recommendations(&conflicts, &compatible_sets);
        tracing::info!(
            "Framework analysis: {} conflicts, {} compatible sets",
            conflicts.len(),
            compatible_sets.len()
        );
        let framework_analysis = FrameworkAnalysis {
            components: components.iter().map(|c| c.id.clone()).zip(profiles).collect(),
            conflicts,
            compatible_sets,
            recommendations,
            overall_compatibility,
        };

        // ── Step 3: License classification and compliance ──
        let license_analysis = self.analyzer.analyze_batch(&components).await;
        tracing::info!(
            "License analysis: {}",
            license_analysis.overall_compliance_status
        );

        // ── Step 4: Per-component scoring ──
        let compatibility_results: Vec<ComprehensiveCompatibility> = components
            .par_iter()
            .map(|component| {
                scoring::assess_component(
                    component,
                    &framework_analysis,
                    &license_analysis,
                    target_language,
                )
            })
            .collect();

        // ── Step 5: Synthesis ──
        let recommended_combinations = roadmap::recommended_combinations(
            &framework_analysis.compatible_sets,
            &compatibility_results,
        );
        let integration_roadmap = roadmap::build_roadmap(&compatibility_results);
        let risk_assessment =
            risk::assess_risks(&compatibility_results, &framework_analysis, &license_analysis);
        let summary =
            risk::summarize(&compatibility_results, &framework_analysis, &license_analysis);

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!("Analysis complete in {}ms", duration_ms);

        Ok(CompatibilityReport {
            report_id: Uuid::new_v4(),
            target_language: target_language.to_string(),
            generated_at: Utc::now(),
            duration_ms,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            components,
            framework_analysis,
            license_analysis,
            compatibility_results,
            recommended_combinations,
            integration_roadmap,
            risk_assessment,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = EngineConfig::default();
        assert!(config.fetch_license_files);
        assert_eq!(config.fetch_timeout_secs, 5);
        assert_eq!(config.max_concurrent_fetches, 4);
        assert_eq!(config.classification_confidence_floor, 0.5);
    }

    #[test]
    fn test_config_partial_toml_fills_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            fetch_license_files = false
            fetch_timeout_secs = 2
            "#,
        )
        .unwrap();
        assert!(!config.fetch_license_files);
        assert_eq!(config.fetch_timeout_secs, 2);
        assert_eq!(config.max_concurrent_fetches, 4);
        assert_eq!(config.classification_confidence_floor, 0.5);
    }

    #[test]
    fn test_empty_summary_serializes_as_status_object() {
        let summary = ReportSummary::no_components();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "No components to analyze"})
        );
    }

    #[test]
    fn test_summary_round_trips_both_shapes() {
        let empty: ReportSummary =
            serde_json::from_value(serde_json::json!({"status": "No components to analyze"}))
                .unwrap();
        assert!(matches!(empty, ReportSummary::Empty { .. }));

        let stats = ReportSummary::Stats(SummaryStats {
            total_components: 2,
            average_score: 0.75,
            score_distribution: ScoreDistribution::default(),
            priority_distribution: PriorityDistribution::default(),
            framework_compatibility: 0.9,
            license_status: "Compliant - All licenses are compatible".to_string(),
            recommended_combinations: 1,
            total_estimated_hours: 8,
            assessment: "Good compatibility - Moderate integration effort".to_string(),
        });
        let json = serde_json::to_string(&stats).unwrap();
        let back: ReportSummary = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, ReportSummary::Stats(s) if s.total_components == 2));
    }

    #[test]
    fn test_priority_display() {
        assert_eq!(Priority::High.to_string(), "High");
        assert_eq!(Priority::Skip.to_string(), "Skip");
    }
}
