// Infrastructure layer - Data sources, rendering and configuration
pub mod builtin_data;
pub mod config;
pub mod csv_source;
pub mod plan_export;
pub mod plotters_renderer;
