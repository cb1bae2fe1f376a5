// Domain layer - Benchmark data and chart models
pub mod chart;
pub mod color;
pub mod error;
pub mod observation;
pub mod series;
