//! # covalent — Compatibility & Licensing Analysis Engine
//!
//! Analyzes a set of software components for framework conflicts, license
//! compatibility, and integration risk, and produces a scored report with a
//! phased integration roadmap.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      CovalentEngine                        │
//! │  ┌───────────┐  ┌─────────────┐  ┌────────────────────┐   │
//! │  │ Framework │  │ License     │  │ License Fetcher    │   │
//! │  │ Detector  │  │ Classifier  │  │ (async, bounded)   │   │
//! │  └─────┬─────┘  └──────┬──────┘  └─────────┬──────────┘   │
//! │        │               │                   │              │
//! │  ┌─────▼───────────────▼───────────────────▼───────────┐  │
//! │  │ Conflict Detection → Compatibility Matrix →          │  │
//! │  │ Multi-Factor Scoring (rayon parallel)                │  │
//! │  └──────────────────────────┬──────────────────────────┘  │
//! │                             │                             │
//! │  ┌──────────────────────────▼──────────────────────────┐  │
//! │  │ Clustering → Roadmap → Risk Assessment → Report     │  │
//! │  └─────────────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Capabilities
//!
//! - **Framework Conflict Detection**: Pairwise conflicts across frontend,
//!   backend, database, and CSS ecosystems with severity grading
//! - **License Classification**: Pattern-based detection of declared licenses
//!   and repository license files, with confidence scoring
//! - **Compatibility Matrix**: Curated pairwise license compatibility rules
//!   with a permissive fallback for uncovered pairs
//! - **Compatible-Set Clustering**: Greedy grouping of components that can be
//!   integrated together without framework conflicts
//! - **Multi-Factor Scoring**: Weighted framework / license / technical /
//!   complexity assessment per component
//! - **Integration Roadmap**: Phased rollout plan with effort estimates
//! - **Risk Assessment**: High-risk components, license risks, and mitigation
//!   strategies
//! - **Reports**: JSON and Markdown output

pub mod component;
pub mod engine;
pub mod frameworks;
pub mod license;
pub mod report;

// Re-exports for convenience
pub use component::Component;
pub use engine::{
    CompatibilityReport, ComprehensiveCompatibility, CovalentEngine, EngineConfig, Priority,
    ReportSummary,
};
pub use frameworks::{ConflictSeverity, FrameworkAnalysis, FrameworkConflict, FrameworkDetector};
pub use license::{
    LicenseAnalysis, LicenseAnalyzer, LicenseClassifier, LicenseStatus, LicenseType,
};
pub use report::{render_report, write_report, ReportFormat};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CovalentError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("License fetch error: {0}")]
    FetchError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type CovalentResult<T> = Result<T, CovalentError>;
