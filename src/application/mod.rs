// Application layer - Chart use cases and their ports
pub mod chart_renderer;
pub mod chart_service;
pub mod layout_engine;
pub mod normalizer;
pub mod observation_source;
