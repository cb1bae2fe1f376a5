// Renderer trait for turning layout plans into image files
use crate::domain::chart::LayoutPlan;
use crate::domain::error::ChartError;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct RenderTarget {
    pub path: PathBuf,
    pub dpi: u32,
    pub width_in: f64,
    pub height_in: f64,
}

impl RenderTarget {
    pub fn new(path: PathBuf, dpi: u32, width_in: f64, height_in: f64) -> Self {
        Self {
            path,
            dpi,
            width_in,
            height_in,
        }
    }

    /// Raster size in pixels for the figure size and resolution
    pub fn pixel_size(&self) -> (u32, u32) {
        let to_pixels = |inches: f64| (inches * self.dpi as f64).round().max(1.0) as u32;
        (to_pixels(self.width_in), to_pixels(self.height_in))
    }

    /// Scale a font size given in points to pixels at this resolution
    pub fn scale_points(&self, points: f64) -> f64 {
        points * self.dpi as f64 / 72.0
    }
}

pub trait ChartRenderer: Send + Sync {
    /// Draw the plan into `target`. Failures come back as `ChartError::RenderFailure`.
    fn render(&self, plan: &LayoutPlan, target: &RenderTarget) -> Result<(), ChartError>;
}
