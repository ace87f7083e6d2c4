//! License compatibility matrix
//!
//! Static symmetric table over the recognized taxonomy, with an inference
//! fallback for pairs the table does not cover: two permissive licenses
//! combine freely, anything else needs manual review.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::LicenseType;

// ─── Status Types ───────────────────────────────────────────────────

/// Compatibility verdict between two license types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompatibilityStatus {
    Compatible,
    Conditional,
    Incompatible,
    Unknown,
}

impl fmt::Display for CompatibilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compatible => write!(f, "compatible"),
            Self::Conditional => write!(f, "conditional"),
            Self::Incompatible => write!(f, "incompatible"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// One component's license standing within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LicenseStatus {
    Compatible,
    Conditional,
    Incompatible,
    Unknown,
}

impl LicenseStatus {
    /// Contribution to the weighted overall score.
    pub fn score(&self) -> f64 {
        match self {
            Self::Compatible => 1.0,
            Self::Conditional => 0.7,
            Self::Unknown => 0.5,
            Self::Incompatible => 0.0,
        }
    }
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compatible => write!(f, "Compatible"),
            Self::Conditional => write!(f, "Conditional"),
            Self::Incompatible => write!(f, "Incompatible"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// One pairwise compatibility ruling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseCompatibilityEntry {
    pub license_a: LicenseType,
    pub license_b: LicenseType,
    pub status: CompatibilityStatus,
    pub reason: String,
    /// Requirements that make a conditional pair workable
    pub conditions: Vec<String>,
}

// ─── Static Rules ───────────────────────────────────────────────────

static COMPATIBILITY_RULES: Lazy<Vec<LicenseCompatibilityEntry>> =
    Lazy::new(build_compatibility_rules);

fn entry(
    license_a: LicenseType,
    license_b: LicenseType,
    status: CompatibilityStatus,
    reason: &str,
    conditions: &[&str],
) -> LicenseCompatibilityEntry {
    LicenseCompatibilityEntry {
        license_a,
        license_b,
        status,
        reason: reason.into(),
        conditions: conditions.iter().map(|c| c.to_string()).collect(),
    }
}

fn build_compatibility_rules() -> Vec<LicenseCompatibilityEntry> {
    use CompatibilityStatus::*;
    use LicenseType::*;

    vec![
        // ── Permissive pairs ──
        entry(Mit, Apache2, Compatible, "Both are permissive licenses", &[]),
        entry(Mit, Bsd3Clause, Compatible, "Both are permissive licenses", &[]),
        entry(
            Apache2,
            Bsd3Clause,
            Compatible,
            "Both are permissive licenses",
            &[],
        ),
        // ── Copyleft interactions ──
        entry(
            Mit,
            Gpl3,
            Conditional,
            "MIT can be combined with GPL, but result must be GPL",
            &["Combined work must be licensed under GPL-3.0"],
        ),
        entry(
            Gpl2,
            Gpl3,
            Incompatible,
            "GPL-2.0 and GPL-3.0 are incompatible",
            &["Use GPL-3.0 only or GPL-2.0 only"],
        ),
        entry(
            Apache2,
            Gpl2,
            Incompatible,
            "Apache-2.0 and GPL-2.0 are incompatible",
            &["Use different components or separate projects"],
        ),
        entry(
            Apache2,
            Gpl3,
            Conditional,
            "Apache-2.0 can be combined with GPL-3.0 but result must be GPL-3.0",
            &["Combined work must be licensed under GPL-3.0"],
        ),
        // ── Proprietary interactions ──
        entry(
            Proprietary,
            Gpl3,
            Incompatible,
            "Proprietary software cannot be combined with GPL",
            &["Use different license or separate deployment"],
        ),
        entry(
            Proprietary,
            Mit,
            Conditional,
            "Proprietary can use MIT components with attribution",
            &["Must provide attribution for MIT components"],
        ),
    ]
}

// ─── Lookup & Batch Evaluation ──────────────────────────────────────

/// Compatibility ruling between two license types, symmetric in its
/// arguments. Identical types are trivially compatible; pairs absent from
/// the table fall back to inference.
pub fn lookup(a: LicenseType, b: LicenseType) -> LicenseCompatibilityEntry {
    if a == b {
        return entry(a, b, CompatibilityStatus::Compatible, "Identical licenses", &[]);
    }

    for rule in COMPATIBILITY_RULES.iter() {
        if rule.license_a == a && rule.license_b == b {
            return rule.clone();
        }
        if rule.license_a == b && rule.license_b == a {
            // Re-orient to the caller's argument order
            let mut oriented = rule.clone();
            oriented.license_a = a;
            oriented.license_b = b;
            return oriented;
        }
    }

    if a.is_permissive() && b.is_permissive() {
        return entry(
            a,
            b,
            CompatibilityStatus::Compatible,
            "Both licenses are permissive",
            &[],
        );
    }

    entry(
        a,
        b,
        CompatibilityStatus::Unknown,
        "Compatibility unknown - manual review required",
        &["Review license terms manually"],
    )
}

/// Pairwise entries over the distinct license types present in a batch.
/// Distinct types are taken in first-appearance order, which keeps the
/// entry list deterministic for a given input order.
pub fn analyze_pairs(types_in_order: &[LicenseType]) -> Vec<LicenseCompatibilityEntry> {
    let mut distinct: Vec<LicenseType> = Vec::new();
    for license_type in types_in_order {
        if !distinct.contains(license_type) {
            distinct.push(*license_type);
        }
    }

    let mut entries = Vec::new();
    for i in 0..distinct.len() {
        for j in (i + 1)..distinct.len() {
            entries.push(lookup(distinct[i], distinct[j]));
        }
    }
    entries
}

/// Batch compliance status string. Precedence: incompatible > unknown >
/// conditional > compliant.
pub fn overall_compliance_status(entries: &[LicenseCompatibilityEntry]) -> String {
    let has = |status: CompatibilityStatus| entries.iter().any(|e| e.status == status);

    if has(CompatibilityStatus::Incompatible) {
        "Non-compliant - Incompatible licenses detected".to_string()
    } else if has(CompatibilityStatus::Unknown) {
        "Unknown - Manual review required".to_string()
    } else if has(CompatibilityStatus::Conditional) {
        "Conditional - Additional requirements must be met".to_string()
    } else {
        "Compliant - All licenses are compatible".to_string()
    }
}

/// Worst standing of one license type across the batch's pairwise entries,
/// using the same precedence as the batch status.
pub fn component_license_status(
    license_type: LicenseType,
    entries: &[LicenseCompatibilityEntry],
) -> LicenseStatus {
    let mut has_unknown = false;
    let mut has_conditional = false;

    for entry in entries {
        if entry.license_a != license_type && entry.license_b != license_type {
            continue;
        }
        match entry.status {
            CompatibilityStatus::Incompatible => return LicenseStatus::Incompatible,
            CompatibilityStatus::Unknown => has_unknown = true,
            CompatibilityStatus::Conditional => has_conditional = true,
            CompatibilityStatus::Compatible => {}
        }
    }

    if has_unknown {
        LicenseStatus::Unknown
    } else if has_conditional {
        LicenseStatus::Conditional
    } else {
        LicenseStatus::Compatible
    }
}
