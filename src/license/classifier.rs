//! License text classifier
//!
//! Matches free-form license text against fixed per-type pattern sets and
//! scores each candidate by pattern coverage. Built for registry metadata
//! and license-file excerpts, not full legal parsing.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use super::LicenseType;

/// Per-type detection patterns, in classification priority order: ties
/// break toward the earlier entry. LGPL precedes GPL because every LGPL
/// identifier contains a GPL identifier as a substring.
static LICENSE_PATTERNS: Lazy<Vec<(LicenseType, Vec<Regex>)>> = Lazy::new(|| {
    fn build(patterns: &[&str]) -> Vec<Regex> {
        patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .expect("Failed to build license pattern")
            })
            .collect()
    }

    vec![
        (
            LicenseType::Mit,
            build(&[
                r"MIT License",
                r"Permission is hereby granted, free of charge",
                r"\bMIT\s*$",
                r"mit-license",
            ]),
        ),
        (
            LicenseType::Apache2,
            build(&[
                r"Apache License.*Version 2\.0",
                r"Licensed under the Apache License",
                r"Apache-2\.0",
                r"apache\.org/licenses/LICENSE-2\.0",
            ]),
        ),
        (
            LicenseType::Lgpl3,
            build(&[
                r"GNU LESSER GENERAL PUBLIC LICENSE.*Version 3",
                r"LGPL-3\.0",
                r"GNU LGPL v3",
                r"www\.gnu\.org/licenses/lgpl-3\.0",
            ]),
        ),
        (
            LicenseType::Lgpl21,
            build(&[
                r"GNU LESSER GENERAL PUBLIC LICENSE.*Version 2\.1",
                r"LGPL-2\.1",
                r"GNU LGPL v2\.1",
                r"www\.gnu\.org/licenses/lgpl-2\.1",
            ]),
        ),
        (
            LicenseType::Gpl3,
            build(&[
                r"GNU GENERAL PUBLIC LICENSE.*Version 3",
                r"GPL-3\.0",
                r"GNU GPL v3",
                r"www\.gnu\.org/licenses/gpl-3\.0",
            ]),
        ),
        (
            LicenseType::Gpl2,
            build(&[
                r"GNU GENERAL PUBLIC LICENSE.*Version 2",
                r"GPL-2\.0",
                r"GNU GPL v2",
                r"www\.gnu\.org/licenses/gpl-2\.0",
            ]),
        ),
        (
            LicenseType::Bsd3Clause,
            build(&[
                r"BSD 3-Clause",
                r"Redistribution and use in source and binary forms.*3\.",
                r"BSD-3-Clause",
                r"three-clause BSD",
            ]),
        ),
        (
            LicenseType::Bsd2Clause,
            build(&[
                r"BSD 2-Clause",
                r"BSD-2-Clause",
                r"two-clause BSD",
                r"Simplified BSD",
            ]),
        ),
        (
            LicenseType::Isc,
            build(&[
                r"ISC License",
                r"Permission to use, copy, modify, and/or distribute",
                r"\bISC\s*$",
            ]),
        ),
        (
            LicenseType::Unlicense,
            build(&[
                r"This is free and unencumbered software",
                r"\bUNLICENSE\b",
                r"unlicense\.org",
            ]),
        ),
        (
            LicenseType::Proprietary,
            build(&[
                r"Proprietary License",
                r"proprietary and confidential",
                r"Commercial License",
            ]),
        ),
    ]
});

/// Result of classifying one piece of text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub license_type: LicenseType,
    pub confidence: f64,
    /// Patterns that matched, for explainability
    pub evidence: Vec<String>,
}

impl Classification {
    pub fn unknown() -> Self {
        Self {
            license_type: LicenseType::Unknown,
            confidence: 0.0,
            evidence: Vec::new(),
        }
    }
}

/// Pattern-based license classifier over the static pattern table.
pub struct LicenseClassifier;

impl LicenseClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify license text.
    ///
    /// Confidence per candidate is matched/total patterns, boosted by 20%
    /// per matched pattern and capped at 1.0. The highest-confidence
    /// candidate wins; ties break toward the earlier table entry, keeping
    /// classification deterministic. No match yields `Unknown` at 0.0.
    pub fn classify(&self, text: &str) -> Classification {
        if text.trim().is_empty() {
            return Classification::unknown();
        }

        let mut best = Classification::unknown();
        for (license_type, patterns) in LICENSE_PATTERNS.iter() {
            let mut matched = 0usize;
            let mut evidence = Vec::new();
            for pattern in patterns {
                if pattern.is_match(text) {
                    matched += 1;
                    evidence.push(pattern.as_str().to_string());
                }
            }
            if matched == 0 {
                continue;
            }
            let coverage = matched as f64 / patterns.len() as f64;
            let confidence = (coverage * (1.0 + matched as f64 * 0.2)).min(1.0);
            if confidence > best.confidence {
                best = Classification {
                    license_type: *license_type,
                    confidence,
                    evidence,
                };
            }
        }
        best
    }
}

impl Default for LicenseClassifier {
    fn default() -> Self {
        Self::new()
    }
}
