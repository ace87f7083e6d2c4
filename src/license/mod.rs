//! License classification and compatibility
//!
//! Contains the license taxonomy, per-type obligations, the pattern
//! classifier, the pairwise compatibility matrix, and the batch compliance
//! analyzer. All of it is best-effort heuristics over metadata and license
//! text — a compliance aid, not a legal determination.

pub mod analyzer;
pub mod classifier;
pub mod compatibility;
pub mod fetcher;

pub use analyzer::{AnalyzerOptions, LicenseAnalyzer};
pub use classifier::{Classification, LicenseClassifier};
pub use compatibility::{
    component_license_status, overall_compliance_status, CompatibilityStatus,
    LicenseCompatibilityEntry, LicenseStatus,
};
pub use fetcher::{HttpLicenseSource, LicenseSource, NullLicenseSource};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ─── License Taxonomy ───────────────────────────────────────────────

/// Recognized license families, identified by SPDX-style names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LicenseType {
    #[serde(rename = "MIT")]
    Mit,
    #[serde(rename = "Apache-2.0")]
    Apache2,
    #[serde(rename = "GPL-2.0")]
    Gpl2,
    #[serde(rename = "GPL-3.0")]
    Gpl3,
    #[serde(rename = "LGPL-2.1")]
    Lgpl21,
    #[serde(rename = "LGPL-3.0")]
    Lgpl3,
    #[serde(rename = "BSD-2-Clause")]
    Bsd2Clause,
    #[serde(rename = "BSD-3-Clause")]
    Bsd3Clause,
    #[serde(rename = "ISC")]
    Isc,
    #[serde(rename = "Unlicense")]
    Unlicense,
    #[serde(rename = "Proprietary")]
    Proprietary,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl LicenseType {
    /// SPDX-style identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mit => "MIT",
            Self::Apache2 => "Apache-2.0",
            Self::Gpl2 => "GPL-2.0",
            Self::Gpl3 => "GPL-3.0",
            Self::Lgpl21 => "LGPL-2.1",
            Self::Lgpl3 => "LGPL-3.0",
            Self::Bsd2Clause => "BSD-2-Clause",
            Self::Bsd3Clause => "BSD-3-Clause",
            Self::Isc => "ISC",
            Self::Unlicense => "Unlicense",
            Self::Proprietary => "Proprietary",
            Self::Unknown => "Unknown",
        }
    }

    /// Obligations and permissions for this license type. Unknown uses
    /// conservative defaults: attribution assumed required, commercial use
    /// assumed allowed, no copyleft obligations assumed.
    pub fn traits(&self) -> LicenseTraits {
        match self {
            Self::Mit | Self::Apache2 | Self::Bsd2Clause | Self::Bsd3Clause | Self::Isc => {
                LicenseTraits {
                    requires_attribution: true,
                    allows_commercial_use: true,
                    allows_modification: true,
                    allows_distribution: true,
                    requires_source_disclosure: false,
                    requires_same_license: false,
                    permissive: true,
                }
            }
            Self::Gpl2 | Self::Gpl3 => LicenseTraits {
                requires_attribution: true,
                allows_commercial_use: true,
                allows_modification: true,
                allows_distribution: true,
                requires_source_disclosure: true,
                requires_same_license: true,
                permissive: false,
            },
            // Weak copyleft: disclosure applies, the combined work's license
            // does not have to follow
            Self::Lgpl21 | Self::Lgpl3 => LicenseTraits {
                requires_attribution: true,
                allows_commercial_use: true,
                allows_modification: true,
                allows_distribution: true,
                requires_source_disclosure: true,
                requires_same_license: false,
                permissive: false,
            },
            Self::Unlicense => LicenseTraits {
                requires_attribution: false,
                allows_commercial_use: true,
                allows_modification: true,
                allows_distribution: true,
                requires_source_disclosure: false,
                requires_same_license: false,
                permissive: true,
            },
            // No grant can be assumed without negotiated terms
            Self::Proprietary => LicenseTraits {
                requires_attribution: true,
                allows_commercial_use: false,
                allows_modification: false,
                allows_distribution: false,
                requires_source_disclosure: false,
                requires_same_license: false,
                permissive: false,
            },
            Self::Unknown => LicenseTraits {
                requires_attribution: true,
                allows_commercial_use: true,
                allows_modification: true,
                allows_distribution: true,
                requires_source_disclosure: false,
                requires_same_license: false,
                permissive: false,
            },
        }
    }

    pub fn is_permissive(&self) -> bool {
        self.traits().permissive
    }

    /// Canonical URL for the license text, where one exists.
    pub fn url(&self) -> Option<&'static str> {
        match self {
            Self::Mit => Some("https://opensource.org/licenses/MIT"),
            Self::Apache2 => Some("https://www.apache.org/licenses/LICENSE-2.0"),
            Self::Gpl2 => Some("https://www.gnu.org/licenses/gpl-2.0.html"),
            Self::Gpl3 => Some("https://www.gnu.org/licenses/gpl-3.0.html"),
            Self::Lgpl21 => Some("https://www.gnu.org/licenses/lgpl-2.1.html"),
            Self::Lgpl3 => Some("https://www.gnu.org/licenses/lgpl-3.0.html"),
            Self::Bsd2Clause => Some("https://opensource.org/licenses/BSD-2-Clause"),
            Self::Bsd3Clause => Some("https://opensource.org/licenses/BSD-3-Clause"),
            Self::Isc => Some("https://opensource.org/licenses/ISC"),
            Self::Unlicense => Some("https://unlicense.org"),
            Self::Proprietary | Self::Unknown => None,
        }
    }
}

impl fmt::Display for LicenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Static per-license characteristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseTraits {
    pub requires_attribution: bool,
    pub allows_commercial_use: bool,
    pub allows_modification: bool,
    pub allows_distribution: bool,
    pub requires_source_disclosure: bool,
    pub requires_same_license: bool,
    pub permissive: bool,
}

// ─── Per-Component Detection ────────────────────────────────────────

/// Classified license for one component, with its obligations expanded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseInfo {
    pub license_type: LicenseType,
    /// Excerpt of the text the classification was based on
    pub license_text: Option<String>,
    pub confidence: f64,
    pub requires_attribution: bool,
    pub allows_commercial_use: bool,
    pub allows_modification: bool,
    pub allows_distribution: bool,
    pub requires_source_disclosure: bool,
    pub requires_same_license: bool,
}

impl LicenseInfo {
    /// Expand a classification into the full obligation record.
    pub fn from_classification(
        license_type: LicenseType,
        confidence: f64,
        license_text: Option<String>,
    ) -> Self {
        let traits = license_type.traits();
        Self {
            license_type,
            license_text,
            confidence,
            requires_attribution: traits.requires_attribution,
            allows_commercial_use: traits.allows_commercial_use,
            allows_modification: traits.allows_modification,
            allows_distribution: traits.allows_distribution,
            requires_source_disclosure: traits.requires_source_disclosure,
            requires_same_license: traits.requires_same_license,
        }
    }
}

/// Attribution notice owed for one component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributionRequirement {
    pub component_name: String,
    pub license_type: LicenseType,
    pub copyright_notice: String,
    pub attribution_text: String,
    pub license_url: Option<String>,
}

impl AttributionRequirement {
    pub fn for_component(name: &str, license_type: LicenseType) -> Self {
        Self {
            component_name: name.to_string(),
            license_type,
            copyright_notice: format!("Copyright (c) {}", name),
            attribution_text: attribution_text(name, license_type),
            license_url: license_type.url().map(str::to_string),
        }
    }
}

fn attribution_text(name: &str, license_type: LicenseType) -> String {
    match license_type {
        LicenseType::Mit => format!(
            "This software includes {}, licensed under the MIT License.",
            name
        ),
        LicenseType::Apache2 => format!(
            "This software includes {}, licensed under the Apache License 2.0.",
            name
        ),
        LicenseType::Bsd3Clause => format!(
            "This software includes {}, licensed under the BSD 3-Clause License.",
            name
        ),
        LicenseType::Bsd2Clause => format!(
            "This software includes {}, licensed under the BSD 2-Clause License.",
            name
        ),
        other => format!("This software includes {}, licensed under {}.", name, other),
    }
}

// ─── Batch Analysis ─────────────────────────────────────────────────

/// Batch-level license compliance analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseAnalysis {
    /// Classified license per component id
    pub detected_licenses: BTreeMap<String, LicenseInfo>,
    /// Pairwise entries over the distinct license types present
    pub compatibility_entries: Vec<LicenseCompatibilityEntry>,
    /// Every component allows commercial use
    pub commercial_use_allowed: bool,
    pub attribution_requirements: Vec<AttributionRequirement>,
    pub redistribution_requirements: Vec<String>,
    /// Any component carries a source-disclosure obligation
    pub source_disclosure_required: bool,
    pub overall_compliance_status: String,
    pub recommendations: Vec<String>,
}

/// Truncate to a maximum number of characters, on a char boundary.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
