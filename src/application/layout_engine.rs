// Chart layout engine - Turns normalized series into renderer-ready plans
use crate::domain::chart::{
    Annotation, AnnotationCandidate, AxisTick, BarSeries, ChartKind, LayoutPlan,
    LineSeries, LineStyle, MarkerShape, PlacementHint,
};
use crate::domain::color::{variant_key, ColorAssigner};
use crate::domain::error::ChartError;
use crate::domain::observation::Metric;
use crate::domain::series::{Series, SeriesMap};
use crate::infrastructure::config::LayoutSettings;

// Annotation text starts this far from its anchor, as a share of the axis span.
const TEXT_OFFSET_X: f64 = 0.02;
const TEXT_OFFSET_Y: f64 = 0.05;
// Past this share of the axis upper bound the text is moved back inside.
const TEXT_LIMIT: f64 = 0.85;
const NUDGE_LEFT: f64 = 0.2;
const NUDGE_DOWN: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct LayoutEngine {
    settings: LayoutSettings,
}

impl LayoutEngine {
    pub fn new(settings: LayoutSettings) -> Self {
        Self { settings }
    }

    /// Grouped bar chart of one metric, one group per thread count.
    pub fn grouped_bars(
        &self,
        series_map: &SeriesMap,
        selected: &[String],
        metric: Metric,
        colors: &mut ColorAssigner,
    ) -> LayoutPlan {
        let Some((resolved, diagnostics)) = resolve_selection(series_map, selected) else {
            return LayoutPlan::empty(ChartKind::Bars, Some(metric), vec![ChartError::EmptyInput]);
        };
        if resolved.is_empty() {
            let mut diagnostics = diagnostics;
            diagnostics.push(ChartError::EmptyInput);
            return LayoutPlan::empty(ChartKind::Bars, Some(metric), diagnostics);
        }

        let categories = thread_union(&resolved);
        let n = resolved.len() as f64;
        let slot_width = self.settings.group_width / n;
        let fill = if resolved.len() == 1 {
            self.settings.single_bar_fill
        } else {
            self.settings.bar_fill
        };

        let bars: Vec<BarSeries> = resolved
            .iter()
            .enumerate()
            .map(|(i, series)| BarSeries {
                processor: series.processor.clone(),
                color: colors.color_for(&series.processor, series.manufacturer),
                offset: (i as f64 - n / 2.0 + 0.5) * slot_width,
                slot_width,
                bar_width: slot_width * fill,
                values: categories
                    .iter()
                    .map(|&threads| series.value_at(threads, metric))
                    .collect(),
            })
            .collect();

        let max_value = bars
            .iter()
            .flat_map(|b| b.values.iter().flatten())
            .fold(0.0_f64, |acc, &v| acc.max(v));

        tracing::debug!(
            "Laid out {} bar groups for {} processors (slot width {:.3})",
            categories.len(),
            bars.len(),
            slot_width
        );

        let mut plan = LayoutPlan::empty(ChartKind::Bars, Some(metric), diagnostics);
        plan.processors = resolved.iter().map(|s| s.processor.clone()).collect();
        plan.x_ticks = categories
            .iter()
            .enumerate()
            .map(|(idx, threads)| AxisTick::new(idx as f64, threads.to_string()))
            .collect();
        plan.x_range = (-0.5, categories.len() as f64 - 0.5);
        plan.y_range = (0.0, self.padded_max(max_value));
        plan.categories = categories;
        plan.bars = bars;
        plan
    }

    /// Line chart with an OM and an SA line per processor.
    pub fn lines(
        &self,
        series_map: &SeriesMap,
        selected: &[String],
        colors: &mut ColorAssigner,
    ) -> LayoutPlan {
        let Some((resolved, diagnostics)) = resolve_selection(series_map, selected) else {
            return LayoutPlan::empty(ChartKind::Lines, None, vec![ChartError::EmptyInput]);
        };
        if resolved.is_empty() {
            let mut diagnostics = diagnostics;
            diagnostics.push(ChartError::EmptyInput);
            return LayoutPlan::empty(ChartKind::Lines, None, diagnostics);
        }

        let mut lines = Vec::with_capacity(resolved.len() * 2);
        for series in &resolved {
            for metric in Metric::ALL {
                let key = if self.settings.color_per_metric {
                    variant_key(&series.processor, metric)
                } else {
                    series.processor.clone()
                };
                let (style, marker) = match metric {
                    Metric::Om => (LineStyle::Solid, MarkerShape::Circle),
                    Metric::Sa => (LineStyle::Dashed, MarkerShape::Cross),
                };

                lines.push(LineSeries {
                    processor: series.processor.clone(),
                    label: format!("{} - {}", series.processor, metric),
                    metric,
                    color: colors.color_for(&key, series.manufacturer),
                    style,
                    marker,
                    points: series
                        .threads
                        .iter()
                        .zip(series.values(metric))
                        .map(|(&t, &v)| (t as f64, v))
                        .collect(),
                });
            }
        }

        let categories = thread_union(&resolved);
        let first = categories.first().copied().unwrap_or(1) as f64;
        let last = categories.last().copied().unwrap_or(1) as f64;
        let pad = ((last - first) * 0.05).max(0.5);
        let max_value = lines
            .iter()
            .flat_map(|l| l.points.iter().map(|&(_, y)| y))
            .fold(0.0_f64, f64::max);

        let mut plan = LayoutPlan::empty(ChartKind::Lines, None, diagnostics);
        plan.processors = resolved.iter().map(|s| s.processor.clone()).collect();
        plan.x_ticks = thin_ticks(&categories, self.settings.max_x_ticks)
            .into_iter()
            .map(|threads| AxisTick::new(threads as f64, threads.to_string()))
            .collect();
        plan.x_range = (first - pad, last + pad);
        plan.y_range = (0.0, self.padded_max(max_value));
        plan.categories = categories;
        plan.lines = lines;
        plan
    }

    /// Attach the max-speedup annotation to a laid-out plan.
    pub fn annotate(&self, plan: &mut LayoutPlan, series_map: &SeriesMap) {
        let Some(candidate) = max_speedup(series_map, &plan.processors) else {
            tracing::debug!("No point with both times positive; skipping annotation");
            return;
        };

        let anchor_and_color = match plan.kind {
            ChartKind::Lines => plan
                .lines
                .iter()
                .find(|l| l.processor == candidate.processor && l.metric == Metric::Sa)
                .map(|l| ((candidate.threads as f64, candidate.sa_time), l.color)),
            ChartKind::Bars => {
                let metric = plan.metric.unwrap_or_default();
                let category = plan.categories.binary_search(&candidate.threads).ok();
                let bar = plan.bars.iter().find(|b| b.processor == candidate.processor);
                match (category, bar) {
                    (Some(category), Some(bar)) => {
                        Some(((bar.center(category), candidate.time(metric)), bar.color))
                    }
                    _ => None,
                }
            }
        };

        let Some((anchor, color)) = anchor_and_color else {
            return;
        };

        let placement = place_annotation(anchor, plan.x_range, plan.y_range);
        tracing::debug!(
            "Annotating {:.2}x speedup for '{}' at {} threads",
            candidate.ratio,
            candidate.processor,
            candidate.threads
        );
        plan.annotation = Some(Annotation {
            candidate,
            anchor,
            placement,
            color,
        });
    }

    fn padded_max(&self, max_value: f64) -> f64 {
        if max_value > 0.0 {
            max_value * (1.0 + self.settings.headroom)
        } else {
            1.0
        }
    }
}

/// The point with the largest OM/SA ratio among `processors`, scanning processors in
/// order and threads ascending. Ties keep the first point found.
pub fn max_speedup<S: AsRef<str>>(
    series_map: &SeriesMap,
    processors: &[S],
) -> Option<AnnotationCandidate> {
    let mut best: Option<AnnotationCandidate> = None;

    for processor in processors {
        let Some(series) = series_map.get(processor.as_ref()) else {
            continue;
        };
        for (threads, om_time, sa_time) in series.points() {
            if om_time <= 0.0 || sa_time <= 0.0 {
                continue;
            }
            let ratio = om_time / sa_time;
            if best.as_ref().is_none_or(|b| ratio > b.ratio) {
                best = Some(AnnotationCandidate {
                    processor: series.processor.clone(),
                    threads,
                    om_time,
                    sa_time,
                    ratio,
                });
            }
        }
    }

    best
}

/// Position annotation text near `anchor`, pulling it back left or down when it would
/// land past 85% of the visible axis range.
pub fn place_annotation(anchor: (f64, f64), x_range: (f64, f64), y_range: (f64, f64)) -> PlacementHint {
    let x_span = x_range.1 - x_range.0;
    let y_span = y_range.1 - y_range.0;

    let mut text_x = anchor.0 + x_span * TEXT_OFFSET_X;
    let nudged_left = text_x > x_range.1 * TEXT_LIMIT;
    if nudged_left {
        text_x = anchor.0 - x_span * NUDGE_LEFT;
    }

    let mut text_y = anchor.1 + y_span * TEXT_OFFSET_Y;
    let nudged_down = text_y > y_range.1 * TEXT_LIMIT;
    if nudged_down {
        text_y = anchor.1 - y_span * NUDGE_DOWN;
    }

    PlacementHint {
        text: (text_x, text_y),
        nudged_left,
        nudged_down,
    }
}

/// Resolve selected names against the series map. `None` when nothing was selected.
fn resolve_selection<'a>(
    series_map: &'a SeriesMap,
    selected: &[String],
) -> Option<(Vec<&'a Series>, Vec<ChartError>)> {
    if selected.is_empty() {
        tracing::warn!("Chart requested with no processors selected");
        return None;
    }

    let mut resolved: Vec<&Series> = Vec::with_capacity(selected.len());
    let mut diagnostics = Vec::new();
    for name in selected {
        match series_map.get(name) {
            Some(series) if resolved.iter().any(|s| s.processor == *name) => {
                tracing::debug!("Processor '{}' selected twice; using it once", series.processor);
            }
            Some(series) => resolved.push(series),
            None => {
                tracing::warn!("No data for processor '{}', skipping it", name);
                diagnostics.push(ChartError::UnknownProcessor(name.clone()));
            }
        }
    }

    Some((resolved, diagnostics))
}

fn thread_union(series: &[&Series]) -> Vec<u32> {
    let mut threads: Vec<u32> = series.iter().flat_map(|s| s.threads.iter().copied()).collect();
    threads.sort_unstable();
    threads.dedup();
    threads
}

/// At most `max_ticks` evenly spaced integer ticks covering `values`.
fn thin_ticks(values: &[u32], max_ticks: usize) -> Vec<u32> {
    if max_ticks < 2 || values.len() <= max_ticks {
        return values.to_vec();
    }

    let first = values[0];
    let last = values[values.len() - 1];
    let step = (last - first).div_ceil(max_ticks as u32 - 1).max(1);
    (first..=last).step_by(step as usize).collect()
}
