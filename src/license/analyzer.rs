//! Component license analysis
//!
//! Runs staged classification per component (declared field, combined
//! metadata, fetched license file), then rolls the per-component results
//! into batch compliance findings.

use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::classifier::{Classification, LicenseClassifier};
use super::compatibility::{self, CompatibilityStatus, LicenseCompatibilityEntry};
use super::fetcher::LicenseSource;
use super::{truncate_chars, AttributionRequirement, LicenseAnalysis, LicenseInfo, LicenseType};
use crate::component::Component;

/// Stored license-text excerpts are capped to keep reports small.
const EXCERPT_CHARS: usize = 500;

/// Tuning knobs for license detection.
#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    /// Attempt remote license-file retrieval for low-confidence components
    pub fetch_enabled: bool,
    /// Confidence at which later detection stages are skipped
    pub confidence_floor: f64,
    /// Bound on concurrently running license-file fetches
    pub max_concurrent_fetches: usize,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            fetch_enabled: true,
            confidence_floor: 0.5,
            max_concurrent_fetches: 4,
        }
    }
}

/// Classifies component licenses and evaluates batch compliance.
pub struct LicenseAnalyzer {
    classifier: LicenseClassifier,
    source: Arc<dyn LicenseSource>,
    options: AnalyzerOptions,
}

impl LicenseAnalyzer {
    pub fn new(source: Arc<dyn LicenseSource>, options: AnalyzerOptions) -> Self {
        Self {
            classifier: LicenseClassifier::new(),
            source,
            options,
        }
    }

    /// Staged license detection for one component.
    ///
    /// Stages run in priority order and each later stage only runs while
    /// the running best confidence sits below the configured floor:
    /// the declared license field alone, then combined metadata, then the
    /// fetched license file. A stage replaces the running best only at
    /// strictly higher confidence, so earlier (cheaper, more precise)
    /// sources win ties.
    pub async fn detect_component_license(&self, component: &Component) -> LicenseInfo {
        let mut best = Classification::unknown();
        let mut best_text = String::new();

        let declared = component.license.as_deref().unwrap_or("").trim();
        if !declared.is_empty() {
            let classified = self.classifier.classify(declared);
            if classified.confidence > best.confidence {
                best = classified;
                best_text = declared.to_string();
            }
        }

        let metadata = combined_metadata(component);
        if best.confidence < self.options.confidence_floor && !metadata.is_empty() {
            let classified = self.classifier.classify(&metadata);
            if classified.confidence > best.confidence {
                best = classified;
                best_text = metadata.clone();
            }
        }

        if best.confidence < self.options.confidence_floor && self.options.fetch_enabled {
            if let Some(url) = component.repository_url.as_deref() {
                match self.source.fetch_license_text(url).await {
                    Ok(Some(fetched)) => {
                        let with_file = if metadata.is_empty() {
                            fetched
                        } else {
                            format!("{} {}", metadata, fetched)
                        };
                        let classified = self.classifier.classify(&with_file);
                        if classified.confidence > best.confidence {
                            best = classified;
                            best_text = with_file;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::debug!("License fetch failed for {}: {}", component.id, e);
                    }
                }
            }
        }

        tracing::debug!(
            "Component {} classified as {} (confidence {:.2})",
            component.id,
            best.license_type,
            best.confidence
        );

        let excerpt = if best_text.is_empty() {
            None
        } else {
            Some(truncate_chars(&best_text, EXCERPT_CHARS))
        };
        LicenseInfo::from_classification(best.license_type, best.confidence, excerpt)
    }

    /// Detect every component's license and evaluate the batch.
    ///
    /// Detection runs concurrently up to the configured fetch bound while
    /// preserving input order, so all downstream rollups are deterministic
    /// for a given batch.
    pub async fn analyze_batch(&self, components: &[Component]) -> LicenseAnalysis {
        let infos: Vec<LicenseInfo> = stream::iter(components)
            .map(|component| self.detect_component_license(component))
            .buffered(self.options.max_concurrent_fetches.max(1))
            .collect()
            .await;

        let types_in_order: Vec<LicenseType> = infos.iter().map(|i| i.license_type).collect();
        let compatibility_entries = compatibility::analyze_pairs(&types_in_order);
        let overall_compliance_status =
            compatibility::overall_compliance_status(&compatibility_entries);

        let commercial_use_allowed = infos.iter().all(|i| i.allows_commercial_use);
        let source_disclosure_required = infos.iter().any(|i| i.requires_source_disclosure);

        let attribution_requirements: Vec<AttributionRequirement> = components
            .iter()
            .zip(&infos)
            .filter(|(_, info)| info.requires_attribution)
            .map(|(component, info)| {
                AttributionRequirement::for_component(&component.name, info.license_type)
            })
            .collect();

        let redistribution_requirements = redistribution_requirements(&infos);
        let recommendations = build_recommendations(
            &overall_compliance_status,
            &compatibility_entries,
            attribution_requirements.len(),
            source_disclosure_required,
            commercial_use_allowed,
        );

        let detected_licenses: BTreeMap<String, LicenseInfo> = components
            .iter()
            .map(|c| c.id.clone())
            .zip(infos)
            .collect();

        LicenseAnalysis {
            detected_licenses,
            compatibility_entries,
            commercial_use_allowed,
            attribution_requirements,
            redistribution_requirements,
            source_disclosure_required,
            overall_compliance_status,
            recommendations,
        }
    }
}

/// License field, description, and repository URL joined for stage-two
/// classification.
fn combined_metadata(component: &Component) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(license) = component.license.as_deref() {
        if !license.trim().is_empty() {
            parts.push(license);
        }
    }
    if !component.description.trim().is_empty() {
        parts.push(&component.description);
    }
    if let Some(url) = component.repository_url.as_deref() {
        if !url.trim().is_empty() {
            parts.push(url);
        }
    }
    parts.join(" ")
}

fn redistribution_requirements(infos: &[LicenseInfo]) -> Vec<String> {
    let mut requirements = Vec::new();
    if infos.iter().any(|i| i.requires_attribution) {
        requirements.push("Must include attribution notices for all components".to_string());
    }
    if infos.iter().any(|i| i.requires_source_disclosure) {
        requirements.push("Must provide source code when distributing".to_string());
    }
    if infos.iter().any(|i| i.requires_same_license) {
        requirements.push("Derivative works must use compatible copyleft license".to_string());
    }
    requirements
}

fn build_recommendations(
    overall_status: &str,
    entries: &[LicenseCompatibilityEntry],
    attribution_count: usize,
    source_disclosure_required: bool,
    commercial_use_allowed: bool,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if overall_status.starts_with("Non-compliant") {
        recommendations.push("Critical: Remove components with incompatible licenses".to_string());
        for entry in entries
            .iter()
            .filter(|e| e.status == CompatibilityStatus::Incompatible)
            .take(3)
        {
            recommendations.push(format!(
                "{} and {}: {}",
                entry.license_a, entry.license_b, entry.reason
            ));
        }
    } else if overall_status.starts_with("Unknown") {
        recommendations.push("Manual review required for unknown license combinations".to_string());
    } else if overall_status.starts_with("Conditional") {
        recommendations.push("Additional requirements must be met:".to_string());
        for entry in entries
            .iter()
            .filter(|e| e.status == CompatibilityStatus::Conditional)
        {
            for condition in &entry.conditions {
                if !recommendations.contains(condition) {
                    recommendations.push(condition.clone());
                }
            }
        }
    }

    if attribution_count > 0 {
        recommendations.push(format!(
            "{} components require attribution notices",
            attribution_count
        ));
    }
    if source_disclosure_required {
        recommendations
            .push("Source code must be made available due to copyleft licenses".to_string());
    }
    if !commercial_use_allowed {
        recommendations.push("Commercial use may be restricted by some licenses".to_string());
    }

    if recommendations.is_empty() {
        recommendations.push("All licenses are compatible and compliant".to_string());
    }
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::fetcher::NullLicenseSource;
    use crate::{CovalentError, CovalentResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedSource(String);

    #[async_trait]
    impl LicenseSource for FixedSource {
        async fn fetch_license_text(&self, _url: &str) -> CovalentResult<Option<String>> {
            Ok(Some(self.0.clone()))
        }
    }

    struct CountingSource(AtomicUsize);

    #[async_trait]
    impl LicenseSource for CountingSource {
        async fn fetch_license_text(&self, _url: &str) -> CovalentResult<Option<String>> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }
    }

    struct FailingSource;

    #[async_trait]
    impl LicenseSource for FailingSource {
        async fn fetch_license_text(&self, _url: &str) -> CovalentResult<Option<String>> {
            Err(CovalentError::FetchError("connection refused".to_string()))
        }
    }

    fn offline_analyzer() -> LicenseAnalyzer {
        LicenseAnalyzer::new(
            Arc::new(NullLicenseSource),
            AnalyzerOptions {
                fetch_enabled: false,
                ..AnalyzerOptions::default()
            },
        )
    }

    fn component(id: &str, license: Option<&str>) -> Component {
        let mut c = Component::new(id, id, "python");
        c.license = license.map(str::to_string);
        c
    }

    // ─── Staged Detection ───────────────────────────────────────────

    #[tokio::test]
    async fn test_declared_spdx_id_classifies() {
        let analyzer = offline_analyzer();
        let info = analyzer
            .detect_component_license(&component("lib-a", Some("MIT")))
            .await;

        assert_eq!(info.license_type, LicenseType::Mit);
        assert!((info.confidence - 0.3).abs() < 1e-9);
        assert_eq!(info.license_text.as_deref(), Some("MIT"));
    }

    #[tokio::test]
    async fn test_fetched_file_lifts_low_confidence() {
        let analyzer = LicenseAnalyzer::new(
            Arc::new(FixedSource(
                "MIT License\n\nPermission is hereby granted, free of charge, \
                 to any person obtaining a copy"
                    .to_string(),
            )),
            AnalyzerOptions::default(),
        );
        let mut c = component("lib-a", None);
        c.repository_url = Some("https://github.com/example/lib-a".to_string());

        let info = analyzer.detect_component_license(&c).await;

        // Two of four MIT patterns match the fetched text: 0.5 * 1.4
        assert_eq!(info.license_type, LicenseType::Mit);
        assert!((info.confidence - 0.7).abs() < 1e-9);
        assert!(info.license_text.unwrap().contains("MIT License"));
    }

    #[tokio::test]
    async fn test_confident_declaration_skips_fetch() {
        let source = Arc::new(CountingSource(AtomicUsize::new(0)));
        let analyzer = LicenseAnalyzer::new(source.clone(), AnalyzerOptions::default());
        let mut c = component(
            "lib-a",
            Some("MIT License\nPermission is hereby granted, free of charge"),
        );
        c.repository_url = Some("https://github.com/example/lib-a".to_string());

        let info = analyzer.detect_component_license(&c).await;

        assert!((info.confidence - 0.7).abs() < 1e-9);
        assert_eq!(source.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_degrades_to_unknown() {
        let analyzer =
            LicenseAnalyzer::new(Arc::new(FailingSource), AnalyzerOptions::default());
        let mut c = component("lib-a", None);
        c.repository_url = Some("https://github.com/example/lib-a".to_string());

        let info = analyzer.detect_component_license(&c).await;

        assert_eq!(info.license_type, LicenseType::Unknown);
        assert_eq!(info.confidence, 0.0);
        assert_eq!(info.license_text, None);
    }

    #[tokio::test]
    async fn test_no_signal_is_unknown() {
        let analyzer = offline_analyzer();
        let info = analyzer
            .detect_component_license(&Component::new("bare", "bare", "python"))
            .await;

        assert_eq!(info.license_type, LicenseType::Unknown);
        assert_eq!(info.license_text, None);
    }

    // ─── Batch Rollups ──────────────────────────────────────────────

    #[tokio::test]
    async fn test_batch_conditional_rollup() {
        let analyzer = offline_analyzer();
        let components = vec![
            component("web-lib", Some("MIT")),
            component("orm-lib", Some("GPL-3.0")),
        ];

        let analysis = analyzer.analyze_batch(&components).await;

        assert_eq!(
            analysis.detected_licenses["web-lib"].license_type,
            LicenseType::Mit
        );
        assert_eq!(
            analysis.detected_licenses["orm-lib"].license_type,
            LicenseType::Gpl3
        );
        assert_eq!(analysis.compatibility_entries.len(), 1);
        assert!(analysis
            .overall_compliance_status
            .starts_with("Conditional"));
        assert!(analysis.source_disclosure_required);
        assert!(analysis.commercial_use_allowed);
        assert_eq!(analysis.attribution_requirements.len(), 2);
        assert!(analysis
            .redistribution_requirements
            .contains(&"Must provide source code when distributing".to_string()));
        assert!(analysis
            .recommendations
            .contains(&"Combined work must be licensed under GPL-3.0".to_string()));
    }

    #[tokio::test]
    async fn test_batch_permissive_only() {
        let analyzer = offline_analyzer();
        let components = vec![
            component("a", Some("MIT")),
            component("b", Some("Apache-2.0")),
            component("c", Some("BSD 3-Clause")),
        ];

        let analysis = analyzer.analyze_batch(&components).await;

        assert!(analysis.overall_compliance_status.starts_with("Compliant"));
        assert!(!analysis.source_disclosure_required);
        assert_eq!(analysis.attribution_requirements.len(), 3);
        assert_eq!(
            analysis.recommendations,
            vec!["3 components require attribution notices".to_string()]
        );
    }

    #[tokio::test]
    async fn test_batch_incompatible_names_pair() {
        let analyzer = offline_analyzer();
        let components = vec![
            component("old", Some("GPL-2.0")),
            component("new", Some("GPL-3.0")),
        ];

        let analysis = analyzer.analyze_batch(&components).await;

        assert!(analysis
            .overall_compliance_status
            .starts_with("Non-compliant"));
        assert_eq!(
            analysis.recommendations[0],
            "Critical: Remove components with incompatible licenses"
        );
        assert!(analysis.recommendations[1].contains("GPL-2.0 and GPL-3.0"));
    }

    #[tokio::test]
    async fn test_batch_empty() {
        let analyzer = offline_analyzer();
        let analysis = analyzer.analyze_batch(&[]).await;

        assert!(analysis.detected_licenses.is_empty());
        assert!(analysis.compatibility_entries.is_empty());
        assert!(analysis.overall_compliance_status.starts_with("Compliant"));
        assert_eq!(
            analysis.recommendations,
            vec!["All licenses are compatible and compliant".to_string()]
        );
    }
}
