//! Canonical component record
//!
//! Every discovery source (package registry, curated collection, code-host
//! search) adapts its results into this single shape before analysis, so the
//! engine never probes for source-specific fields downstream.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{CovalentError, CovalentResult};

/// Immutable snapshot of one candidate component.
///
/// Only `name` is genuinely required; everything else degrades to a safe
/// default during normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Component {
    /// Stable identifier, unique within one analysis request
    #[serde(default)]
    pub id: String,
    /// Human-readable component name
    #[serde(default)]
    pub name: String,
    /// Primary implementation language
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Source host URL, used for framework hints and license-file retrieval
    #[serde(default)]
    pub repository_url: Option<String>,
    /// License string as declared by the discovery source
    #[serde(default)]
    pub license: Option<String>,
    /// Topic tags from the source host
    #[serde(default)]
    pub topics: Vec<String>,
    /// Frameworks declared by the discovery source, merged with detected ones
    #[serde(default)]
    pub frameworks: Vec<String>,
    /// Declared direct dependencies
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Declared dependency count; may exceed the listed dependencies
    #[serde(default)]
    pub dependencies_count: usize,
    /// Quality score supplied by the discovery tier, if any
    #[serde(default)]
    pub quality_score: Option<f64>,
    /// Security score supplied by the discovery tier, if any
    #[serde(default)]
    pub security_score: Option<f64>,
}

impl Component {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            language: language.into(),
            ..Default::default()
        }
    }

    /// Effective dependency count: the declared count or the number of
    /// listed dependencies, whichever is larger.
    pub fn dependency_count(&self) -> usize {
        self.dependencies_count.max(self.dependencies.len())
    }
}

/// Validate and normalize an input batch.
///
/// Blank ids are filled positionally (`component_{i}`), blank names fall
/// back to the id, and a blank language inherits the target language.
/// Duplicate ids after normalization are fatal: two indistinguishable
/// components have no meaningful partial result.
pub fn normalize_components(
    components: &[Component],
    target_language: &str,
) -> CovalentResult<Vec<Component>> {
    let mut normalized = Vec::with_capacity(components.len());
    let mut seen: HashSet<String> = HashSet::with_capacity(components.len());

    for (i, component) in components.iter().enumerate() {
        let mut component = component.clone();
        if component.id.trim().is_empty() {
            component.id = format!("component_{}", i);
        }
        if component.name.trim().is_empty() {
            component.name = component.id.clone();
        }
        if component.language.trim().is_empty() {
            component.language = target_language.to_string();
        }
        if !seen.insert(component.id.clone()) {
            return Err(CovalentError::InvalidInput(format!(
                "Duplicate component id '{}'",
                component.id
            )));
        }
        normalized.push(component);
    }

    Ok(normalized)
}
