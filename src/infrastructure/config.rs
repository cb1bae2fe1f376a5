use crate::domain::chart::ChartKind;
use crate::domain::observation::Metric;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub output: OutputSettings,
    #[serde(default)]
    pub layout: LayoutSettings,
    #[serde(default)]
    pub charts: Vec<ChartConfig>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DataSettings {
    /// CSV file to load. Without one the built-in benchmark table is charted.
    pub csv_path: Option<String>,
    /// Write the built-in table to `csv_path` before loading it.
    pub export_builtin: bool,
    pub om_column: String,
    pub sa_column: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            csv_path: None,
            export_builtin: false,
            om_column: Metric::Om.default_column().to_string(),
            sa_column: Metric::Sa.default_column().to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputSettings {
    pub dir: String,
    pub dpi: u32,
    /// Also write each layout plan as JSON next to its image.
    pub export_plan: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: "charts".to_string(),
            dpi: 300,
            export_plan: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LayoutSettings {
    /// Share of each category occupied by its group of bars.
    pub group_width: f64,
    /// Bar width as a share of its slot when several processors are plotted.
    pub bar_fill: f64,
    /// Bar width as a share of its slot when a single processor is plotted.
    pub single_bar_fill: f64,
    /// Extra room above the tallest value, as a share of it.
    pub headroom: f64,
    pub max_x_ticks: usize,
    /// Give the OM and SA lines of a processor distinct colors.
    pub color_per_metric: bool,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            group_width: 0.8,
            bar_fill: 0.9,
            single_bar_fill: 0.5,
            headroom: 0.05,
            max_x_ticks: 15,
            color_per_metric: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartConfig {
    pub id: String,
    pub title: Option<String>,
    pub kind: ChartKind,
    /// Processors to plot, in display order. Empty means all of them.
    #[serde(default)]
    pub processors: Vec<String>,
    #[serde(default)]
    pub metric: Metric,
    #[serde(default)]
    pub annotate: bool,
    /// Output file name template; `${id}` and `${metric}` are expanded.
    pub file: Option<String>,
    pub dpi: Option<u32>,
    pub width_in: Option<f64>,
    pub height_in: Option<f64>,
}

pub fn load_app_config(path: &str) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace `${name}` placeholders in a template string
pub fn expand_template(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}
