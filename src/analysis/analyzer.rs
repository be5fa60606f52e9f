use super::flow::infer_user_flow;
use super::keywords::analyze_keywords;
use super::patterns::UiPattern;
use super::recommendations::recommend;
use super::requirements::extract_requirements;
use super::structure::analyze_structure;
use super::types::{
    AnalysisReport, AnalysisSummary, BasicReport, Change, Differences, ScreenComparison,
    ScreenshotAnalysis,
};
use crate::figma::{parse_figma_url, FigmaError, FigmaFile, FigmaLink, FigmaSource};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Runs the analyzers against designs fetched from a [`FigmaSource`]
pub struct FigmaAnalyzer<S: FigmaSource> {
    source: S,
}

impl<S: FigmaSource> FigmaAnalyzer<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Parses the link and fetches the file (or the linked node)
    pub async fn fetch(&self, url: &str) -> Result<(FigmaLink, FigmaFile), FigmaError> {
        let link = parse_figma_url(url)?;
        let node_id = link.api_node_id();
        debug!(
            source = self.source.name(),
            file_id = %link.file_id,
            node_id = ?node_id,
            "Fetching design"
        );
        let file = self.source.fetch_file(&link.file_id, node_id.as_deref()).await?;
        Ok((link, file))
    }

    pub async fn basic_analysis(&self, url: &str) -> Result<BasicReport, FigmaError> {
        let (link, file) = self.fetch(url).await?;
        let requirements = extract_requirements(&file);
        info!(
            file_id = %link.file_id,
            requirements = requirements.len(),
            "Basic analysis complete"
        );
        Ok(BasicReport {
            file: link,
            requirements,
        })
    }

    pub async fn enhanced_analysis(
        &self,
        url: &str,
        include_screenshot: bool,
    ) -> Result<AnalysisReport, FigmaError> {
        let (link, file) = self.fetch(url).await?;

        let screenshot = if include_screenshot {
            Some(self.screenshot(&link).await)
        } else {
            None
        };

        let report = analyze_design(link, &file, screenshot);
        info!(
            file_id = %report.file.file_id,
            patterns = report.summary.ui_patterns.len(),
            flow_type = %report.summary.flow_type,
            complexity = %report.summary.ui_complexity,
            "Enhanced analysis complete"
        );
        Ok(report)
    }

    async fn screenshot(&self, link: &FigmaLink) -> ScreenshotAnalysis {
        let Some(node_id) = link.api_node_id() else {
            return ScreenshotAnalysis::Failed {
                error: FigmaError::NodeIdRequired.to_string(),
            };
        };

        match self.source.render_image(&link.file_id, &node_id).await {
            Ok(image) => ScreenshotAnalysis::Rendered(image),
            Err(e) => {
                warn!(node_id = %node_id, error = %e, "Screenshot analysis failed");
                ScreenshotAnalysis::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Compares two screens analyzed without screenshots
    pub async fn compare_screens(
        &self,
        as_is_url: &str,
        to_be_url: &str,
    ) -> Result<ScreenComparison, FigmaError> {
        let as_is = self.enhanced_analysis(as_is_url, false).await?;
        let to_be = self.enhanced_analysis(to_be_url, false).await?;
        Ok(compare_summaries(as_is.summary, to_be.summary))
    }
}

/// Builds the full report from an already fetched file
pub fn analyze_design(
    link: FigmaLink,
    file: &FigmaFile,
    screenshot: Option<ScreenshotAnalysis>,
) -> AnalysisReport {
    let requirements = extract_requirements(file);
    let keywords = analyze_keywords(file);
    let ui_structure = analyze_structure(file);
    let user_flow = infer_user_flow(&keywords, &ui_structure);
    let recommendations = recommend(&keywords, &ui_structure, &user_flow);

    let summary = AnalysisSummary {
        total_elements: keywords.total_elements,
        ui_patterns: keywords.pattern_names(),
        flow_type: user_flow.primary_flow_type.clone(),
        confidence: user_flow.confidence,
        ui_complexity: ui_structure.ui_complexity,
    };

    AnalysisReport {
        file: link,
        requirements,
        keywords,
        ui_structure,
        user_flow,
        screenshot,
        recommendations,
        summary,
    }
}

pub fn compare_summaries(as_is: AnalysisSummary, to_be: AnalysisSummary) -> ScreenComparison {
    let before: BTreeSet<_> = as_is.ui_patterns.iter().copied().collect();
    let after: BTreeSet<_> = to_be.ui_patterns.iter().copied().collect();

    let differences = Differences {
        new_patterns: after.difference(&before).copied().collect(),
        removed_patterns: before.difference(&after).copied().collect(),
        ui_complexity_change: Change {
            from: as_is.ui_complexity,
            to: to_be.ui_complexity,
        },
        flow_type_change: Change {
            from: as_is.flow_type.clone(),
            to: to_be.flow_type.clone(),
        },
    };
    let recommendations = comparison_recommendations(&differences);

    ScreenComparison {
        as_is,
        to_be,
        differences,
        recommendations,
    }
}

fn comparison_recommendations(differences: &Differences) -> Vec<String> {
    let join = |patterns: &[UiPattern]| {
        patterns
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut recommendations = Vec::new();
    if !differences.new_patterns.is_empty() {
        recommendations.push(format!(
            "Add tests for new UI patterns: {}",
            join(&differences.new_patterns)
        ));
    }
    if !differences.removed_patterns.is_empty() {
        recommendations.push(format!(
            "Run regression tests for removed UI patterns: {}",
            join(&differences.removed_patterns)
        ));
    }
    let complexity = &differences.ui_complexity_change;
    if complexity.is_changed() {
        recommendations.push(format!(
            "UI complexity changed: {} → {}",
            complexity.from, complexity.to
        ));
    }
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figma::{Complexity, FigmaNode, FixtureSource, RenderedImage};

    const NODE_URL: &str = "https://www.figma.com/design/AbC123/Login?node-id=2-4";
    const FILE_URL: &str = "https://www.figma.com/file/AbC123/Login";

    fn login_screen() -> FigmaFile {
        FigmaFile::new(FigmaNode::new("DOCUMENT", "Document").with_children(vec![
            FigmaNode::new("FRAME", "Login Screen")
                .with_id("2:4")
                .with_children(vec![
                    FigmaNode::new("INSTANCE", "Email Input"),
                    FigmaNode::new("INSTANCE", "Password Field"),
                    FigmaNode::new("INSTANCE", "Login Button")
                        .with_children(vec![FigmaNode::text("label", "Sign in")]),
                    FigmaNode::text("hint", "Forgot password?"),
                ]),
        ]))
    }

    fn summary(patterns: Vec<UiPattern>, complexity: Complexity, flow: &str) -> AnalysisSummary {
        AnalysisSummary {
            total_elements: 0,
            ui_patterns: patterns,
            flow_type: flow.to_string(),
            confidence: 0,
            ui_complexity: complexity,
        }
    }

    #[tokio::test]
    async fn test_basic_analysis_extracts_requirements() {
        let analyzer = FigmaAnalyzer::new(FixtureSource::new(login_screen()));
        let report = analyzer.basic_analysis(NODE_URL).await.unwrap();

        assert_eq!(report.file.file_id, "AbC123");
        assert!(report
            .requirements
            .iter()
            .any(|r| r.text == "Forgot password?"));
    }

    #[tokio::test]
    async fn test_invalid_url_fails_before_fetch() {
        let analyzer = FigmaAnalyzer::new(FixtureSource::new(login_screen()));
        let result = analyzer.basic_analysis("https://example.com/nope").await;
        assert!(matches!(result, Err(FigmaError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_enhanced_analysis_summary() {
        let analyzer = FigmaAnalyzer::new(FixtureSource::new(login_screen()));
        let report = analyzer.enhanced_analysis(NODE_URL, false).await.unwrap();

        assert!(report.screenshot.is_none());
        assert!(report.keywords.has_pattern(UiPattern::Authentication));
        assert_eq!(report.summary.ui_patterns, report.keywords.pattern_names());
        assert_eq!(report.user_flow.flow_steps[0], "User authentication");
        assert_eq!(report.ui_structure.ui_elements.buttons.len(), 1);
        assert_eq!(report.ui_structure.ui_elements.inputs.len(), 2);
    }

    #[tokio::test]
    async fn test_screenshot_without_node_id_is_recorded() {
        let analyzer = FigmaAnalyzer::new(FixtureSource::new(login_screen()));
        let report = analyzer.enhanced_analysis(FILE_URL, true).await.unwrap();

        assert!(matches!(
            report.screenshot,
            Some(ScreenshotAnalysis::Failed { .. })
        ));
    }

    #[tokio::test]
    async fn test_screenshot_rendered() {
        let source = FixtureSource::new(login_screen())
            .with_image(RenderedImage::new("https://img".to_string(), 200_000));
        let analyzer = FigmaAnalyzer::new(source);
        let report = analyzer.enhanced_analysis(NODE_URL, true).await.unwrap();

        match report.screenshot {
            Some(ScreenshotAnalysis::Rendered(image)) => {
                assert_eq!(image.complexity, Complexity::Medium)
            }
            other => panic!("unexpected screenshot result: {:?}", other),
        }
    }

    #[test]
    fn test_compare_summaries() {
        let as_is = summary(
            vec![UiPattern::Settings, UiPattern::Navigation],
            Complexity::Low,
            "navigation",
        );
        let to_be = summary(
            vec![UiPattern::Transaction, UiPattern::Navigation, UiPattern::Authentication],
            Complexity::High,
            "transaction_flow",
        );

        let comparison = compare_summaries(as_is, to_be);
        let diff = &comparison.differences;

        assert_eq!(
            diff.new_patterns,
            vec![UiPattern::Authentication, UiPattern::Transaction]
        );
        assert_eq!(diff.removed_patterns, vec![UiPattern::Settings]);
        assert!(diff.flow_type_change.is_changed());
        assert_eq!(comparison.recommendations.len(), 3);
        assert_eq!(
            comparison.recommendations[0],
            "Add tests for new UI patterns: authentication, transaction"
        );
        assert_eq!(
            comparison.recommendations[2],
            "UI complexity changed: low → high"
        );
    }

    #[test]
    fn test_compare_identical_has_no_recommendations() {
        let a = summary(vec![UiPattern::Social], Complexity::Medium, "social_interaction");
        let comparison = compare_summaries(a.clone(), a);
        assert!(comparison.recommendations.is_empty());
        assert!(!comparison.differences.flow_type_change.is_changed());
    }
}
