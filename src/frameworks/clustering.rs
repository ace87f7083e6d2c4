//! Compatible-set clustering
//!
//! Greedy input-order partition of components into groups with no high or
//! critical framework conflict between any two members. This is a heuristic,
//! not a maximum-clique search: the partition is valid but may be
//! sub-optimal, and its shape depends on input order. The order dependence
//! is part of the contract and kept stable.

use std::collections::HashSet;

use super::{CompatibleSet, ConflictSeverity, ExtractedProfile, FrameworkConflict};
use crate::component::Component;

/// Partition the batch into compatible sets. `profiles` is aligned with
/// `components`, both in input order. Only groups of at least two members
/// are reported, sorted by descending score.
pub fn find_compatible_sets(
    components: &[Component],
    profiles: &[ExtractedProfile],
    conflicts: &[FrameworkConflict],
) -> Vec<CompatibleSet> {
    let conflict_pairs = build_conflict_pairs(profiles, conflicts);

    let mut visited = vec![false; components.len()];
    let mut sets: Vec<CompatibleSet> = Vec::new();

    for start in 0..components.len() {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let mut group = vec![start];

        for candidate in (start + 1)..components.len() {
            if visited[candidate] {
                continue;
            }
            let clashes = group
                .iter()
                .any(|&member| conflict_pairs.contains(&ordered(member, candidate)));
            if !clashes {
                visited[candidate] = true;
                group.push(candidate);
            }
        }

        if group.len() > 1 {
            sets.push(build_set(&group, components, profiles, conflicts));
        }
    }

    // Highest-scoring sets first; stable sort keeps formation order on ties
    sets.sort_by(|a, b| {
        b.compatibility_score
            .partial_cmp(&a.compatibility_score)
            .unwrap()
    });
    sets
}

/// Index pairs that must not share a group, derived from high and critical
/// conflicts only: every holder of one side clashes with every holder of
/// the other.
fn build_conflict_pairs(
    profiles: &[ExtractedProfile],
    conflicts: &[FrameworkConflict],
) -> HashSet<(usize, usize)> {
    let mut pairs = HashSet::new();

    for conflict in conflicts {
        if conflict.severity < ConflictSeverity::High {
            continue;
        }
        let holders_a: Vec<usize> = holders(profiles, &conflict.framework_a);
        let holders_b: Vec<usize> = holders(profiles, &conflict.framework_b);
        for &a in &holders_a {
            for &b in &holders_b {
                if a != b {
                    pairs.insert(ordered(a, b));
                }
            }
        }
    }
    pairs
}

fn holders(profiles: &[ExtractedProfile], framework: &str) -> Vec<usize> {
    profiles
        .iter()
        .enumerate()
        .filter(|(_, p)| p.frameworks.iter().any(|f| f == framework))
        .map(|(i, _)| i)
        .collect()
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn build_set(
    group: &[usize],
    components: &[Component],
    profiles: &[ExtractedProfile],
    conflicts: &[FrameworkConflict],
) -> CompatibleSet {
    let mut frameworks: Vec<String> = Vec::new();
    let mut shared_dependencies: Vec<String> = Vec::new();
    for &member in group {
        for framework in &profiles[member].frameworks {
            if !frameworks.contains(framework) {
                frameworks.push(framework.clone());
            }
        }
        for dependency in &profiles[member].dependencies {
            if !shared_dependencies.contains(dependency) {
                shared_dependencies.push(dependency.clone());
            }
        }
    }

    let compatibility_score = group_score(&frameworks, conflicts);

    CompatibleSet {
        component_ids: group.iter().map(|&i| components[i].id.clone()).collect(),
        component_names: group.iter().map(|&i| components[i].name.clone()).collect(),
        frameworks,
        shared_dependencies,
        compatibility_score,
    }
}

/// Group score: 1.0 minus one severity penalty per distinct conflicting
/// framework pair whose two sides both appear in the group's framework
/// union, floored at zero. A group can only contain low/medium pairs, so
/// this measures the residual friction inside the set.
fn group_score(group_frameworks: &[String], conflicts: &[FrameworkConflict]) -> f64 {
    let mut score = 1.0;
    let mut counted: HashSet<(String, String)> = HashSet::new();

    for conflict in conflicts {
        let both_present = group_frameworks.contains(&conflict.framework_a)
            && group_frameworks.contains(&conflict.framework_b);
        if !both_present {
            continue;
        }
        let key = if conflict.framework_a <= conflict.framework_b {
            (conflict.framework_a.clone(), conflict.framework_b.clone())
        } else {
            (conflict.framework_b.clone(), conflict.framework_a.clone())
        };
        if counted.insert(key) {
            score -= conflict.severity.score_penalty();
        }
    }
    score.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(
        frameworks: &[&[&str]],
    ) -> (Vec<Component>, Vec<ExtractedProfile>) {
        let components: Vec<Component> = frameworks
            .iter()
            .enumerate()
            .map(|(i, _)| {
                Component::new(format!("component_{}", i), format!("c{}", i), "python")
            })
            .collect();
        let profiles: Vec<ExtractedProfile> = frameworks
            .iter()
            .map(|fws| ExtractedProfile {
                frameworks: fws.iter().map(|f| f.to_string()).collect(),
                dependencies: vec![],
            })
            .collect();
        (components, profiles)
    }

    fn conflict(a: &str, b: &str, severity: ConflictSeverity) -> FrameworkConflict {
        FrameworkConflict {
            framework_a: a.into(),
            framework_b: b.into(),
            component_a: String::new(),
            component_b: String::new(),
            severity,
            reason: "test".into(),
            resolution_suggestions: vec![],
        }
    }

    #[test]
    fn test_no_conflicts_yields_one_group() {
        let (components, profiles) = fixture(&[&["flask"], &["celery"], &[]]);
        let sets = find_compatible_sets(&components, &profiles, &[]);
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].component_ids.len(), 3);
        assert_eq!(sets[0].compatibility_score, 1.0);
    }

    #[test]
    fn test_high_conflict_splits_groups() {
        let (components, profiles) = fixture(&[&["django"], &["fastapi"], &["celery"]]);
        let conflicts = vec![conflict("django", "fastapi", ConflictSeverity::High)];
        let sets = find_compatible_sets(&components, &profiles, &conflicts);

        // Greedy: component_0 seeds a group, component_1 clashes, component_2
        // joins; component_1 is left alone and singletons are dropped.
        assert_eq!(sets.len(), 1);
        assert_eq!(
            sets[0].component_ids,
            vec!["component_0".to_string(), "component_2".to_string()]
        );
    }

    #[test]
    fn test_medium_conflicts_do_not_split() {
        let (components, profiles) = fixture(&[&["flask"], &["django"]]);
        let conflicts = vec![conflict("flask", "django", ConflictSeverity::Medium)];
        let sets = find_compatible_sets(&components, &profiles, &conflicts);

        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].component_ids.len(), 2);
        // Residual medium friction inside the group: 1.0 - 0.2
        assert!((sets[0].compatibility_score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_no_group_holds_both_sides_of_severe_conflict() {
        let (components, profiles) = fixture(&[
            &["react"],
            &["vue"],
            &["webpack"],
            &["react", "redux"],
        ]);
        let conflicts = vec![conflict("react", "vue", ConflictSeverity::Critical)];
        let sets = find_compatible_sets(&components, &profiles, &conflicts);

        for set in &sets {
            let has_react = set.frameworks.iter().any(|f| f == "react");
            let has_vue = set.frameworks.iter().any(|f| f == "vue");
            assert!(
                !(has_react && has_vue),
                "group {:?} holds both sides of a critical conflict",
                set.component_ids
            );
        }
    }

    #[test]
    fn test_duplicate_conflict_instances_count_once() {
        // Two instances of the same framework pair (different component
        // pairs) must not double-penalize the group score.
        let (components, profiles) = fixture(&[&["flask"], &["django"], &["django"]]);
        let conflicts = vec![
            conflict("flask", "django", ConflictSeverity::Medium),
            conflict("flask", "django", ConflictSeverity::Medium),
        ];
        let sets = find_compatible_sets(&components, &profiles, &conflicts);
        assert_eq!(sets.len(), 1);
        assert!((sets[0].compatibility_score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_sets_sorted_by_score_descending() {
        // Two react holders and two vue holders split into two groups; the
        // vue group carries residual flask/django friction and sorts last.
        let (components, profiles) = fixture(&[
            &["react"],
            &["vue", "flask"],
            &["react"],
            &["vue", "django"],
        ]);
        let conflicts = vec![
            conflict("react", "vue", ConflictSeverity::Critical),
            conflict("flask", "django", ConflictSeverity::Medium),
        ];
        let sets = find_compatible_sets(&components, &profiles, &conflicts);

        assert_eq!(sets.len(), 2);
        assert_eq!(
            sets[0].component_ids,
            vec!["component_0".to_string(), "component_2".to_string()]
        );
        assert_eq!(sets[0].compatibility_score, 1.0);
        assert_eq!(
            sets[1].component_ids,
            vec!["component_1".to_string(), "component_3".to_string()]
        );
        assert!((sets[1].compatibility_score - 0.8).abs() < 1e-9);
        for window in sets.windows(2) {
            assert!(window[0].compatibility_score >= window[1].compatibility_score);
        }
    }

    #[test]
    fn test_union_profiles_deduplicate() {
        let (components, mut profiles) = fixture(&[&["flask"], &["flask", "celery"]]);
        profiles[0].dependencies = vec!["redis".into()];
        profiles[1].dependencies = vec!["redis".into(), "postgresql".into()];
        let sets = find_compatible_sets(&components, &profiles, &[]);
        assert_eq!(sets[0].frameworks, vec!["flask", "celery"]);
        assert_eq!(sets[0].shared_dependencies, vec!["redis", "postgresql"]);
    }
}
