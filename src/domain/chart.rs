// Chart layout domain models
use super::color::Color;
use super::error::ChartError;
use super::observation::Metric;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bars,
    Lines,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkerShape {
    Circle,
    Cross,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTick {
    pub position: f64,
    pub label: String,
}

impl AxisTick {
    pub fn new(position: f64, label: String) -> Self {
        Self { position, label }
    }
}

/// One processor's bars in a grouped bar chart.
///
/// `values` is aligned with the plan's categories; `None` marks a gap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub processor: String,
    pub color: Color,
    pub offset: f64,
    pub slot_width: f64,
    pub bar_width: f64,
    pub values: Vec<Option<f64>>,
}

impl BarSeries {
    pub fn center(&self, category: usize) -> f64 {
        category as f64 + self.offset
    }

    /// `(left, right, height)` of every drawn bar.
    pub fn rects(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        let half = self.bar_width / 2.0;
        self.values.iter().enumerate().filter_map(move |(category, value)| {
            value.map(|height| {
                let center = self.center(category);
                (center - half, center + half, height)
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub processor: String,
    pub label: String,
    pub metric: Metric,
    pub color: Color,
    pub style: LineStyle,
    pub marker: MarkerShape,
    pub points: Vec<(f64, f64)>,
}

/// The plotted point with the largest OM/SA speedup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationCandidate {
    pub processor: String,
    pub threads: u32,
    pub om_time: f64,
    pub sa_time: f64,
    pub ratio: f64,
}

impl AnnotationCandidate {
    pub fn time(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Om => self.om_time,
            Metric::Sa => self.sa_time,
        }
    }

    pub fn label_lines(&self) -> Vec<String> {
        vec![
            format!("Max SA speedup: {:.2}x", self.ratio),
            format!("Processor: {}", self.processor),
            format!("Threads: {}", self.threads),
            format!("(OM: {:.2}s, SA: {:.2}s)", self.om_time, self.sa_time),
        ]
    }
}

/// Where the annotation text goes, in data coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementHint {
    pub text: (f64, f64),
    pub nudged_left: bool,
    pub nudged_down: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub candidate: AnnotationCandidate,
    pub anchor: (f64, f64),
    pub placement: PlacementHint,
    pub color: Color,
}

/// Everything a plotting backend needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutPlan {
    pub title: String,
    pub kind: ChartKind,
    pub metric: Option<Metric>,
    pub processors: Vec<String>,
    pub categories: Vec<u32>,
    pub x_ticks: Vec<AxisTick>,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub x_label: String,
    pub y_label: String,
    pub legend_title: String,
    pub bars: Vec<BarSeries>,
    pub lines: Vec<LineSeries>,
    pub annotation: Option<Annotation>,
    pub diagnostics: Vec<ChartError>,
}

impl LayoutPlan {
    pub fn empty(kind: ChartKind, metric: Option<Metric>, diagnostics: Vec<ChartError>) -> Self {
        Self {
            title: default_title(kind, metric),
            kind,
            metric,
            processors: Vec::new(),
            categories: Vec::new(),
            x_ticks: Vec::new(),
            x_range: (0.0, 1.0),
            y_range: (0.0, 1.0),
            x_label: "Threads".to_string(),
            y_label: y_label(metric),
            legend_title: legend_title(kind).to_string(),
            bars: Vec::new(),
            lines: Vec::new(),
            annotation: None,
            diagnostics,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty() && self.lines.is_empty()
    }
}

fn default_title(kind: ChartKind, metric: Option<Metric>) -> String {
    match (kind, metric) {
        (ChartKind::Bars, Some(metric)) => {
            format!("Processor performance: {} time vs threads", metric)
        }
        _ => "OM vs SA performance across processors".to_string(),
    }
}

fn y_label(metric: Option<Metric>) -> String {
    match metric {
        Some(metric) => format!("{} time (s)", metric),
        None => "Execution time (s)".to_string(),
    }
}

fn legend_title(kind: ChartKind) -> &'static str {
    match kind {
        ChartKind::Bars => "Processor",
        ChartKind::Lines => "Processor and algorithm",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_rects_skip_gaps() {
        let bars = BarSeries {
            processor: "X".to_string(),
            color: Color::rgb(0, 0, 0),
            offset: -0.2,
            slot_width: 0.4,
            bar_width: 0.2,
            values: vec![Some(10.0), None, Some(5.0)],
        };
        let rects: Vec<_> = bars.rects().collect();
        assert_eq!(rects.len(), 2);
        let (left, right, height) = rects[1];
        assert!((left - 1.7).abs() < 1e-9);
        assert!((right - 1.9).abs() < 1e-9);
        assert_eq!(height, 5.0);
    }

    #[test]
    fn test_annotation_label() {
        let candidate = AnnotationCandidate {
            processor: "X".to_string(),
            threads: 2,
            om_time: 10.0,
            sa_time: 2.0,
            ratio: 5.0,
        };
        assert_eq!(
            candidate.label_lines(),
            vec![
                "Max SA speedup: 5.00x",
                "Processor: X",
                "Threads: 2",
                "(OM: 10.00s, SA: 2.00s)",
            ]
        );
    }

    #[test]
    fn test_candidate_time_by_metric() {
        let candidate = AnnotationCandidate {
            processor: "X".to_string(),
            threads: 4,
            om_time: 12.0,
            sa_time: 3.0,
            ratio: 4.0,
        };
        assert_eq!(candidate.time(Metric::Om), 12.0);
        assert_eq!(candidate.time(Metric::Sa), 3.0);
    }

    #[test]
    fn test_empty_plan_titles() {
        let plan = LayoutPlan::empty(ChartKind::Bars, Some(Metric::Sa), vec![ChartError::EmptyInput]);
        assert!(plan.is_empty());
        assert_eq!(plan.title, "Processor performance: SA time vs threads");
        assert_eq!(plan.y_label, "SA time (s)");
        assert_eq!(plan.diagnostics, vec![ChartError::EmptyInput]);
    }
}
