//! Design analysis: requirement extraction, keyword classification,
//! structure metrics, user-flow inference and recommendations.

pub mod analyzer;
pub mod flow;
pub mod keywords;
pub mod patterns;
pub mod recommendations;
pub mod requirements;
pub mod structure;
pub mod types;
pub mod walker;

pub use analyzer::{analyze_design, compare_summaries, FigmaAnalyzer};
pub use flow::infer_user_flow;
pub use keywords::analyze_keywords;
pub use patterns::{FlowPattern, UiPattern};
pub use recommendations::recommend;
pub use requirements::{extract_requirements, is_requirement_text};
pub use structure::analyze_structure;
pub use types::{
    AnalysisReport, AnalysisSummary, BasicReport, Change, DetectedFlow, DetectedPattern,
    Differences, KeywordAnalysis, Recommendations, Requirement, RequirementSource,
    ScreenComparison, ScreenshotAnalysis, TestingPriority, UiElements, UiStructure, UserFlow,
};
pub use walker::walk;
