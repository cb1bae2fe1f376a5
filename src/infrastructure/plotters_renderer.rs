// Raster chart renderer backed by plotters
use crate::application::chart_renderer::{ChartRenderer, RenderTarget};
use crate::domain::chart::{AxisTick, ChartKind, LayoutPlan, LineStyle, MarkerShape};
use crate::domain::color::Color as SeriesColor;
use crate::domain::error::ChartError;
use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint, Ranged};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use std::error::Error;
use std::ops::Range;

const FONT: &str = "sans-serif";

// Sizes in points; scaled to pixels by the target DPI.
const TITLE_PT: f64 = 16.0;
const AXIS_DESC_PT: f64 = 14.0;
const TICK_PT: f64 = 10.0;
const LEGEND_PT: f64 = 10.0;
const ANNOTATION_PT: f64 = 9.0;
const LINE_PT: f64 = 1.5;
const MARKER_PT: f64 = 3.0;

#[derive(Debug, Clone, Default)]
pub struct PlottersRenderer;

impl PlottersRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&self, plan: &LayoutPlan, target: &RenderTarget) -> Result<(), ChartError> {
        draw(plan, target).map_err(|e| ChartError::RenderFailure {
            path: target.path.clone(),
            reason: e.to_string(),
        })
    }
}

fn rgb(color: SeriesColor) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

/// Linear x axis whose ticks and grid lines sit exactly on the planned positions.
struct PlannedAxis {
    coord: RangedCoordf64,
    ticks: Vec<f64>,
}

impl PlannedAxis {
    fn new(range: (f64, f64), ticks: &[AxisTick]) -> Self {
        Self {
            coord: RangedCoordf64::from(range.0..range.1),
            ticks: ticks
                .iter()
                .map(|t| t.position)
                .filter(|p| (range.0..=range.1).contains(p))
                .collect(),
        }
    }
}

impl Ranged for PlannedAxis {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.coord.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, _hint: Hint) -> Vec<f64> {
        self.ticks.clone()
    }

    fn range(&self) -> Range<f64> {
        self.coord.range()
    }
}

fn tick_label(ticks: &[AxisTick], x: f64) -> String {
    ticks
        .iter()
        .find(|t| (t.position - x).abs() < 1e-9)
        .map(|t| t.label.clone())
        .unwrap_or_default()
}

fn draw(plan: &LayoutPlan, target: &RenderTarget) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = target.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let px = |points: f64| (target.scale_points(points).round() as u32).max(1);

    let root = BitMapBackend::new(&target.path, target.pixel_size()).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&plan.title, (FONT, px(TITLE_PT)))
        .margin(px(12.0))
        .x_label_area_size(px(40.0))
        .y_label_area_size(px(60.0))
        .build_cartesian_2d(
            PlannedAxis::new(plan.x_range, &plan.x_ticks),
            plan.y_range.0..plan.y_range.1,
        )?;

    let x_label_for = |x: &f64| tick_label(&plan.x_ticks, *x);

    {
        let mut mesh = chart.configure_mesh();
        mesh.x_labels(plan.x_ticks.len().max(2))
            .x_label_formatter(&x_label_for)
            .x_desc(plan.x_label.as_str())
            .y_desc(plan.y_label.as_str())
            .label_style((FONT, px(TICK_PT)))
            .axis_desc_style((FONT, px(AXIS_DESC_PT)));
        if plan.kind == ChartKind::Bars {
            mesh.disable_x_mesh();
        }
        mesh.draw()?;
    }

    let legend_len = px(16.0) as i32;
    let legend_half = px(4.0) as i32;

    for bar in &plan.bars {
        let color = rgb(bar.color);
        chart
            .draw_series(
                bar.rects()
                    .map(|(left, right, height)| Rectangle::new([(left, 0.0), (right, height)], color.filled())),
            )?
            .label(bar.processor.as_str())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - legend_half), (x + legend_len, y + legend_half)], color.filled())
            });
    }

    let marker = px(MARKER_PT);
    for line in &plan.lines {
        let color = rgb(line.color);
        let stroke = color.stroke_width(px(LINE_PT));
        let points = line.points.iter().copied();

        let series = match line.style {
            LineStyle::Solid => chart.draw_series(LineSeries::new(points, stroke))?,
            LineStyle::Dashed => {
                chart.draw_series(DashedLineSeries::new(points, px(6.0), px(4.0), stroke))?
            }
        };
        series
            .label(line.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + legend_len, y)], stroke));

        match line.marker {
            MarkerShape::Circle => {
                chart.draw_series(line.points.iter().map(|&p| Circle::new(p, marker, color.filled())))?
            }
            MarkerShape::Cross => {
                chart.draw_series(line.points.iter().map(|&p| Cross::new(p, marker, stroke)))?
            }
        };
    }

    if let Some(annotation) = &plan.annotation {
        let color = rgb(annotation.color);
        let text_at = annotation.placement.text;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![text_at, annotation.anchor],
            color.stroke_width(px(1.0)),
        )))?;
        chart.draw_series(std::iter::once(Circle::new(annotation.anchor, marker, color.filled())))?;

        let lines = annotation.candidate.label_lines();
        let font_px = px(ANNOTATION_PT);
        let line_height = (font_px as f64 * 1.3) as i32;
        let pad = (font_px / 2) as i32;
        let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as i32;
        let width = widest * font_px as i32 * 6 / 10 + 2 * pad;
        let height = line_height * lines.len() as i32 + 2 * pad;

        chart.draw_series(std::iter::once(
            EmptyElement::at(text_at) + Rectangle::new([(0, 0), (width, height)], WHITE.mix(0.9).filled()),
        ))?;
        chart.draw_series(std::iter::once(
            EmptyElement::at(text_at) + Rectangle::new([(0, 0), (width, height)], color.stroke_width(1)),
        ))?;
        chart.draw_series(lines.iter().enumerate().map(|(i, text)| {
            EmptyElement::at(text_at)
                + Text::new(
                    text.clone(),
                    (pad, pad + i as i32 * line_height),
                    (FONT, font_px).into_font().color(&BLACK),
                )
        }))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font((FONT, px(LEGEND_PT)))
        .draw()?;

    root.present()?;
    Ok(())
}
