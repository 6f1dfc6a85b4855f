//! Heuristic text analyzers
//!
//! Pure functions over text: user input goes in, a structured payload
//! comes out. The session/dispatch core only sees the narrow traits and
//! assumes nothing about the implementations behind them.

mod clarify;
mod preferences;
mod review;

pub use clarify::{AnalysisDepth, RequirementAnalysis, RequirementAnalyzer};
pub use preferences::{KeywordPreferenceExtractor, PreferenceExtractor};
pub use review::{ReviewFocus, ReviewReport, Severity, analyze_code};
