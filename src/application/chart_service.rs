// Chart service - Use case for producing one chart from a benchmark source
use crate::application::chart_renderer::{ChartRenderer, RenderTarget};
use crate::application::layout_engine::LayoutEngine;
use crate::application::normalizer::normalize;
use crate::application::observation_source::ObservationSource;
use crate::domain::chart::{ChartKind, LayoutPlan};
use crate::domain::color::ColorAssigner;
use crate::domain::error::ChartError;
use crate::domain::observation::Metric;
use crate::infrastructure::config::{expand_template, ChartConfig, OutputSettings};
use crate::infrastructure::plan_export;
use anyhow::Context;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    All,
    Named(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct ChartRequest {
    pub id: String,
    pub title: Option<String>,
    pub kind: ChartKind,
    pub selection: Selection,
    pub metric: Metric,
    pub annotate: bool,
    pub export_plan: bool,
    pub target: RenderTarget,
}

impl ChartRequest {
    pub fn from_config(chart: &ChartConfig, output: &OutputSettings) -> Self {
        let mut vars = HashMap::new();
        vars.insert("id".to_string(), chart.id.clone());
        vars.insert("metric".to_string(), chart.metric.label().to_lowercase());
        let file = expand_template(chart.file.as_deref().unwrap_or("${id}.png"), &vars);

        // Default figure sizes in inches
        let (default_width, default_height) = match chart.kind {
            ChartKind::Bars => (15.0, 8.0),
            ChartKind::Lines => (14.0, 8.0),
        };

        let selection = if chart.processors.is_empty() {
            Selection::All
        } else {
            Selection::Named(chart.processors.clone())
        };

        Self {
            id: chart.id.clone(),
            title: chart.title.clone(),
            kind: chart.kind,
            selection,
            metric: chart.metric,
            annotate: chart.annotate,
            export_plan: output.export_plan,
            target: RenderTarget::new(
                Path::new(&output.dir).join(file),
                chart.dpi.unwrap_or(output.dpi),
                chart.width_in.unwrap_or(default_width),
                chart.height_in.unwrap_or(default_height),
            ),
        }
    }
}

/// What happened to one chart request.
#[derive(Debug, Clone)]
pub struct ChartOutcome {
    pub id: String,
    pub plan: Option<LayoutPlan>,
    pub rendered: bool,
    pub diagnostics: Vec<ChartError>,
}

impl ChartOutcome {
    fn aborted(id: &str, plan: Option<LayoutPlan>, diagnostics: Vec<ChartError>) -> Self {
        Self {
            id: id.to_string(),
            plan,
            rendered: false,
            diagnostics,
        }
    }
}

#[derive(Clone)]
pub struct ChartService {
    source: Arc<dyn ObservationSource>,
    renderer: Arc<dyn ChartRenderer>,
    engine: LayoutEngine,
}

impl ChartService {
    pub fn new(
        source: Arc<dyn ObservationSource>,
        renderer: Arc<dyn ChartRenderer>,
        engine: LayoutEngine,
    ) -> Self {
        Self {
            source,
            renderer,
            engine,
        }
    }

    /// Load, normalize, lay out and render one chart.
    ///
    /// Only an unreadable source is returned as `Err`. Every other failure is logged,
    /// collected into the outcome, and leaves the process free to run the next request.
    pub fn run(&self, request: &ChartRequest, colors: &mut ColorAssigner) -> anyhow::Result<ChartOutcome> {
        let report = self
            .source
            .load()
            .with_context(|| format!("Failed to load observations from {}", self.source.describe()))?;
        let mut diagnostics = report.diagnostics;

        let series_map = match normalize(&report.observations) {
            Ok(series_map) => series_map,
            Err(e) => {
                tracing::warn!("Chart {}: {}", request.id, e);
                diagnostics.push(e);
                return Ok(ChartOutcome::aborted(&request.id, None, diagnostics));
            }
        };

        let selected: Vec<String> = match &request.selection {
            Selection::All => series_map.keys().cloned().collect(),
            Selection::Named(names) => names.clone(),
        };

        let mut plan = match request.kind {
            ChartKind::Bars => self
                .engine
                .grouped_bars(&series_map, &selected, request.metric, colors),
            ChartKind::Lines => self.engine.lines(&series_map, &selected, colors),
        };
        if let Some(title) = &request.title {
            plan.title = title.clone();
        }
        diagnostics.extend(plan.diagnostics.iter().cloned());

        if plan.is_empty() || diagnostics.iter().any(ChartError::is_fatal_for_request) {
            tracing::warn!("Chart {}: nothing to plot, no image written", request.id);
            return Ok(ChartOutcome::aborted(&request.id, Some(plan), diagnostics));
        }

        if request.annotate {
            self.engine.annotate(&mut plan, &series_map);
        }

        if request.export_plan {
            let plan_path = plan_export::plan_path(&request.target.path);
            match plan_export::write_plan(&plan, &plan_path) {
                Ok(()) => tracing::info!("Chart {}: plan written to {}", request.id, plan_path.display()),
                Err(e) => {
                    tracing::warn!("Chart {}: {:#}", request.id, e);
                    diagnostics.push(ChartError::RenderFailure {
                        path: plan_path,
                        reason: format!("{:#}", e),
                    });
                }
            }
        }

        let rendered = match self.renderer.render(&plan, &request.target) {
            Ok(()) => {
                tracing::info!(
                    "Chart {} saved to {} (DPI: {})",
                    request.id,
                    request.target.path.display(),
                    request.target.dpi
                );
                true
            }
            Err(e) => {
                tracing::warn!("Chart {}: {}", request.id, e);
                diagnostics.push(e);
                false
            }
        };

        Ok(ChartOutcome {
            id: request.id.clone(),
            plan: Some(plan),
            rendered,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::observation_source::LoadReport;
    use crate::domain::observation::Observation;
    use crate::infrastructure::config::LayoutSettings;
    use std::path::PathBuf;
    use std::sync::Mutex;

    struct FixedSource {
        report: LoadReport,
    }

    impl ObservationSource for FixedSource {
        fn describe(&self) -> String {
            "fixed".to_string()
        }

        fn load(&self) -> anyhow::Result<LoadReport> {
            Ok(self.report.clone())
        }
    }

    struct UnreadableSource;

    impl ObservationSource for UnreadableSource {
        fn describe(&self) -> String {
            "nowhere.csv".to_string()
        }

        fn load(&self) -> anyhow::Result<LoadReport> {
            anyhow::bail!("No such file or directory")
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        rendered: Mutex<Vec<(String, PathBuf)>>,
        fail: bool,
    }

    impl ChartRenderer for RecordingRenderer {
        fn render(&self, plan: &LayoutPlan, target: &RenderTarget) -> Result<(), ChartError> {
            if self.fail {
                return Err(ChartError::RenderFailure {
                    path: target.path.clone(),
                    reason: "read-only file system".to_string(),
                });
            }
            self.rendered
                .lock()
                .unwrap()
                .push((plan.title.clone(), target.path.clone()));
            Ok(())
        }
    }

    fn observations() -> Vec<Observation> {
        vec![
            Observation::new("Intel Core i5-12400", 1, 220.85, 11.84),
            Observation::new("Intel Core i5-12400", 2, 220.85, 3.14),
            Observation::new("AMD Ryzen 5 7530U", 1, 252.5, 12.99),
            Observation::new("AMD Ryzen 5 7530U", 2, 252.5, 3.37),
        ]
    }

    fn request(kind: ChartKind, selection: Selection) -> ChartRequest {
        ChartRequest {
            id: "test".to_string(),
            title: Some("Test chart".to_string()),
            kind,
            selection,
            metric: Metric::Sa,
            annotate: true,
            export_plan: false,
            target: RenderTarget::new(PathBuf::from("out/test.png"), 100, 14.0, 8.0),
        }
    }

    fn service(report: LoadReport, renderer: Arc<RecordingRenderer>) -> ChartService {
        ChartService::new(
            Arc::new(FixedSource { report }),
            renderer,
            LayoutEngine::new(LayoutSettings::default()),
        )
    }

    #[test]
    fn test_run_renders_all_processors() {
        let renderer = Arc::new(RecordingRenderer::default());
        let service = service(LoadReport::new(observations(), vec![]), renderer.clone());
        let mut colors = ColorAssigner::new();

        let outcome = service
            .run(&request(ChartKind::Lines, Selection::All), &mut colors)
            .unwrap();

        assert!(outcome.rendered);
        assert!(outcome.diagnostics.is_empty());
        let plan = outcome.plan.unwrap();
        assert_eq!(plan.title, "Test chart");
        assert_eq!(plan.lines.len(), 4);
        assert!(plan.annotation.is_some());
        assert_eq!(
            renderer.rendered.lock().unwrap().as_slice(),
            &[("Test chart".to_string(), PathBuf::from("out/test.png"))]
        );
    }

    #[test]
    fn test_load_diagnostics_and_unknown_processors_are_reported() {
        let renderer = Arc::new(RecordingRenderer::default());
        let skipped = ChartError::MalformedValue {
            line: 4,
            column: "Threads".to_string(),
            value: "abc".to_string(),
        };
        let service = service(LoadReport::new(observations(), vec![skipped.clone()]), renderer.clone());
        let mut colors = ColorAssigner::new();

        let selection = Selection::Named(vec!["AMD Ryzen 5 7530U".to_string(), "Apple M2".to_string()]);
        let outcome = service
            .run(&request(ChartKind::Bars, selection), &mut colors)
            .unwrap();

        assert!(outcome.rendered);
        assert_eq!(
            outcome.diagnostics,
            vec![skipped, ChartError::UnknownProcessor("Apple M2".to_string())]
        );
        assert_eq!(outcome.plan.unwrap().bars.len(), 1);
    }

    #[test]
    fn test_empty_input_aborts_before_rendering() {
        let renderer = Arc::new(RecordingRenderer::default());
        let missing = ChartError::MissingColumn {
            origin: "data.csv".to_string(),
            column: "SA_Time".to_string(),
        };
        let service = service(LoadReport::aborted(missing.clone()), renderer.clone());
        let mut colors = ColorAssigner::new();

        let outcome = service
            .run(&request(ChartKind::Lines, Selection::All), &mut colors)
            .unwrap();

        assert!(!outcome.rendered);
        assert!(outcome.plan.is_none());
        assert_eq!(outcome.diagnostics, vec![missing, ChartError::EmptyInput]);
        assert!(renderer.rendered.lock().unwrap().is_empty());
    }

    #[test]
    fn test_no_resolvable_processor_aborts_before_rendering() {
        let renderer = Arc::new(RecordingRenderer::default());
        let service = service(LoadReport::new(observations(), vec![]), renderer.clone());
        let mut colors = ColorAssigner::new();

        let outcome = service
            .run(&request(ChartKind::Bars, Selection::Named(vec![])), &mut colors)
            .unwrap();

        assert!(!outcome.rendered);
        assert_eq!(outcome.diagnostics, vec![ChartError::EmptyInput]);
        assert!(renderer.rendered.lock().unwrap().is_empty());
    }

    #[test]
    fn test_render_failure_is_reported_not_raised() {
        let renderer = Arc::new(RecordingRenderer {
            fail: true,
            ..RecordingRenderer::default()
        });
        let service = service(LoadReport::new(observations(), vec![]), renderer);
        let mut colors = ColorAssigner::new();

        let outcome = service
            .run(&request(ChartKind::Lines, Selection::All), &mut colors)
            .unwrap();

        assert!(!outcome.rendered);
        assert!(matches!(
            outcome.diagnostics.as_slice(),
            [ChartError::RenderFailure { .. }]
        ));
    }

    #[test]
    fn test_unreadable_source_fails_the_request() {
        let service = ChartService::new(
            Arc::new(UnreadableSource),
            Arc::new(RecordingRenderer::default()),
            LayoutEngine::new(LayoutSettings::default()),
        );
        let mut colors = ColorAssigner::new();

        let err = service
            .run(&request(ChartKind::Lines, Selection::All), &mut colors)
            .unwrap_err();

        assert!(format!("{:#}", err).contains("nowhere.csv"));
    }

    #[test]
    fn test_colors_persist_across_requests() {
        let renderer = Arc::new(RecordingRenderer::default());
        let service = service(LoadReport::new(observations(), vec![]), renderer);
        let mut colors = ColorAssigner::new();

        let bars = service
            .run(&request(ChartKind::Bars, Selection::All), &mut colors)
            .unwrap()
            .plan
            .unwrap();
        let lines = service
            .run(&request(ChartKind::Lines, Selection::All), &mut colors)
            .unwrap()
            .plan
            .unwrap();

        assert_eq!(bars.bars[0].color, lines.lines[0].color);
        assert_eq!(bars.bars[1].color, lines.lines[2].color);
    }

    #[test]
    fn test_request_from_config() {
        let chart = ChartConfig {
            id: "amd".to_string(),
            title: None,
            kind: ChartKind::Bars,
            processors: vec!["AMD Ryzen 5 7535HS".to_string()],
            metric: Metric::Sa,
            annotate: false,
            file: Some("${id}_${metric}.png".to_string()),
            dpi: None,
            width_in: None,
            height_in: Some(6.0),
        };
        let output = OutputSettings::default();

        let request = ChartRequest::from_config(&chart, &output);

        assert_eq!(request.target.path, PathBuf::from("charts/amd_sa.png"));
        assert_eq!(request.target.dpi, 300);
        assert_eq!((request.target.width_in, request.target.height_in), (15.0, 6.0));
        assert_eq!(
            request.selection,
            Selection::Named(vec!["AMD Ryzen 5 7535HS".to_string()])
        );
    }
}
