// Main entry point - Dependency injection and chart generation
mod application;
mod domain;
mod infrastructure;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::application::chart_service::{ChartRequest, ChartService};
use crate::application::layout_engine::LayoutEngine;
use crate::application::observation_source::ObservationSource;
use crate::domain::color::ColorAssigner;
use crate::infrastructure::builtin_data::{builtin_observations, BuiltinSource};
use crate::infrastructure::config::{load_app_config, DataSettings};
use crate::infrastructure::csv_source::{write_observations, CsvObservationSource, CsvSchema};
use crate::infrastructure::plotters_renderer::PlottersRenderer;

const DEFAULT_CONFIG: &str = "config/charts";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = load_app_config(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path))?;

    if config.charts.is_empty() {
        tracing::warn!("No charts configured in {}", config_path);
        return Ok(());
    }

    // Create the data source and renderer (infrastructure layer)
    let source = build_source(&config.data);
    tracing::info!("Reading benchmark results from {}", source.describe());
    let renderer = Arc::new(PlottersRenderer::new());

    // Create the service (application layer)
    let service = ChartService::new(source, renderer, LayoutEngine::new(config.layout.clone()));

    // One assigner for the whole run keeps a processor's color stable across charts
    let mut colors = ColorAssigner::new();
    let mut rendered = 0;
    for chart in &config.charts {
        let request = ChartRequest::from_config(chart, &config.output);
        match service.run(&request, &mut colors) {
            Ok(outcome) => {
                if let Some(plan) = &outcome.plan {
                    tracing::debug!(
                        "Chart {}: '{}' with {} processor(s)",
                        outcome.id,
                        plan.title,
                        plan.processors.len()
                    );
                }
                if outcome.rendered {
                    rendered += 1;
                }
                if !outcome.diagnostics.is_empty() {
                    tracing::debug!("Chart {}: {} diagnostic(s)", outcome.id, outcome.diagnostics.len());
                }
            }
            Err(e) => tracing::error!("Chart {} failed: {:#}", request.id, e),
        }
    }

    tracing::debug!("{} series colors assigned", colors.assigned_count());
    tracing::info!("Rendered {} of {} charts", rendered, config.charts.len());
    Ok(())
}

/// Pick the observation source. A failed export of the built-in table is logged and the
/// CSV is loaded as it stands.
fn build_source(data: &DataSettings) -> Arc<dyn ObservationSource> {
    let Some(csv_path) = &data.csv_path else {
        return Arc::new(BuiltinSource);
    };

    let schema = CsvSchema::from_settings(data);
    if data.export_builtin {
        match write_observations(Path::new(csv_path), &builtin_observations(), &schema) {
            Ok(()) => tracing::info!("Data saved to {}", csv_path),
            Err(e) => tracing::error!("Exporting the built-in table failed: {:#}", e),
        }
    }

    Arc::new(CsvObservationSource::new(csv_path, schema))
}
