//! Framework extraction and pairwise conflict detection
//!
//! Extraction is deliberately shallow: case-insensitive substring scanning
//! of component metadata against the ecosystem taxonomy, plus exact topic
//! matches and caller-declared frameworks. It trades precision for zero
//! setup cost; the conflict rules only fire on taxonomy names.

use aho_corasick::AhoCorasick;

use super::{
    ecosystem_for, ecosystems, ExtractedProfile, FrameworkConflict, FrameworkConflictRule,
    INFRA_KEYWORDS,
};
use crate::component::Component;

/// Framework detector with one substring matcher per known ecosystem.
pub struct FrameworkDetector {
    matchers: Vec<EcosystemMatcher>,
}

struct EcosystemMatcher {
    language: &'static str,
    matcher: AhoCorasick,
    /// Pattern index → framework name
    names: Vec<&'static str>,
}

impl FrameworkDetector {
    pub fn new() -> Self {
        let matchers = ecosystems()
            .iter()
            .map(|eco| {
                let names = eco.framework_names();
                let matcher = AhoCorasick::builder()
                    .ascii_case_insensitive(true)
                    .build(&names)
                    .expect("Failed to build framework matcher");
                EcosystemMatcher {
                    language: eco.language,
                    matcher,
                    names,
                }
            })
            .collect();
        Self { matchers }
    }

    fn matcher_for(&self, language: &str) -> Option<&EcosystemMatcher> {
        let lang = language.to_lowercase();
        self.matchers.iter().find(|m| m.language == lang)
    }

    /// Extract the framework and dependency profile for one component,
    /// against the target language's taxonomy.
    pub fn extract_profile(&self, component: &Component, language: &str) -> ExtractedProfile {
        ExtractedProfile {
            frameworks: self.extract_frameworks(component, language),
            dependencies: extract_dependencies(component),
        }
    }

    /// Framework identifiers for one component: declared frameworks first,
    /// then taxonomy substring matches over name + description + URL, then
    /// exact topic matches. Deduplicated, first appearance wins.
    pub fn extract_frameworks(&self, component: &Component, language: &str) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();

        for declared in &component.frameworks {
            push_unique(&mut found, declared.to_lowercase());
        }

        let eco_matcher = match self.matcher_for(language) {
            Some(matcher) => matcher,
            None => return found,
        };

        let mut text = String::with_capacity(
            component.name.len() + component.description.len() + 64,
        );
        text.push_str(&component.name);
        text.push(' ');
        text.push_str(&component.description);
        if let Some(url) = &component.repository_url {
            text.push(' ');
            text.push_str(url);
        }

        for mat in eco_matcher.matcher.find_iter(&text) {
            push_unique(
                &mut found,
                eco_matcher.names[mat.pattern().as_usize()].to_string(),
            );
        }

        // Topic tags must equal a taxonomy name exactly
        for topic in &component.topics {
            let topic = topic.to_lowercase();
            if eco_matcher.names.iter().any(|name| *name == topic) {
                push_unique(&mut found, topic);
            }
        }

        found
    }

    /// Pairwise conflict detection over the batch, against the target
    /// language's rule set. `profiles` is aligned with `components`.
    ///
    /// A rule fires for a pair when both components hold frameworks from
    /// the rule pair but not the same side set: two components that both
    /// use django are not in conflict with each other.
    pub fn detect_conflicts(
        &self,
        components: &[Component],
        profiles: &[ExtractedProfile],
        language: &str,
    ) -> Vec<FrameworkConflict> {
        let eco = match ecosystem_for(language) {
            Some(eco) => eco,
            None => return Vec::new(),
        };

        let mut conflicts = Vec::new();
        for i in 0..components.len() {
            for j in (i + 1)..components.len() {
                for rule in &eco.conflicts {
                    if let Some(conflict) = check_pair(
                        rule,
                        &components[i].id,
                        &profiles[i].frameworks,
                        &components[j].id,
                        &profiles[j].frameworks,
                    ) {
                        conflicts.push(conflict);
                    }
                }
            }
        }
        conflicts
    }
}

impl Default for FrameworkDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply one rule to one component pair.
fn check_pair(
    rule: &FrameworkConflictRule,
    id_a: &str,
    frameworks_a: &[String],
    id_b: &str,
    frameworks_b: &[String],
) -> Option<FrameworkConflict> {
    let holds = |fws: &[String], name: &str| fws.iter().any(|f| f == name);

    let a_first = holds(frameworks_a, &rule.framework_a);
    let a_second = holds(frameworks_a, &rule.framework_b);
    let b_first = holds(frameworks_b, &rule.framework_a);
    let b_second = holds(frameworks_b, &rule.framework_b);

    let a_any = a_first || a_second;
    let b_any = b_first || b_second;
    let same_sides = a_first == b_first && a_second == b_second;
    if !a_any || !b_any || same_sides {
        return None;
    }

    Some(FrameworkConflict {
        framework_a: pick_side(rule, a_first, a_second, b_first, b_second),
        framework_b: pick_side(rule, b_first, b_second, a_first, a_second),
        component_a: id_a.to_string(),
        component_b: id_b.to_string(),
        severity: rule.severity,
        reason: rule.reason.clone(),
        resolution_suggestions: rule.resolution_suggestions.clone(),
    })
}

/// Name the framework a component brings to a conflict: prefer the side the
/// other component does not hold, so the pair reads as an actual clash.
fn pick_side(
    rule: &FrameworkConflictRule,
    has_first: bool,
    has_second: bool,
    other_has_first: bool,
    other_has_second: bool,
) -> String {
    if has_first && !other_has_first {
        rule.framework_a.clone()
    } else if has_second && !other_has_second {
        rule.framework_b.clone()
    } else if has_first {
        rule.framework_a.clone()
    } else {
        rule.framework_b.clone()
    }
}

/// Dependency profile: declared dependencies plus infrastructure keywords
/// mentioned in the description.
fn extract_dependencies(component: &Component) -> Vec<String> {
    let mut deps: Vec<String> = Vec::new();
    for dep in &component.dependencies {
        push_unique(&mut deps, dep.to_lowercase());
    }
    let description = component.description.to_lowercase();
    for keyword in INFRA_KEYWORDS {
        if description.contains(keyword) {
            push_unique(&mut deps, keyword.to_string());
        }
    }
    deps
}

fn push_unique(items: &mut Vec<String>, item: String) {
    if !items.contains(&item) {
        items.push(item);
    }
}
